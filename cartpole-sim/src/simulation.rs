use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use cartpole_core::{pendulum, rkf45, Parameters, State};

use crate::{ControlLaw, SystemParameters, TickRate};

/// Position magnitude beyond which the state is assumed to have diverged.
const DIVERGENCE_LIMIT: f64 = 1.0e6;

/// Configuration for [`Simulation::new`].
///
/// Only the control law is mandatory; everything else defaults to the
/// reference hardware at rest, ticking at 60 Hz.
pub struct SimulationConfig {
    initial_state: State,
    parameters: Parameters,
    control_law: Box<dyn ControlLaw>,
    tick_rate: TickRate,
}

impl SimulationConfig {
    /// Creates a configuration around the given control law.
    pub fn new(control_law: impl ControlLaw + 'static) -> Self {
        Self {
            initial_state: State::default(),
            parameters: Parameters::default(),
            control_law: Box::new(control_law),
            tick_rate: TickRate::default(),
        }
    }

    /// Sets the initial state, which is also the target of every reset.
    #[must_use]
    pub fn initial_state(mut self, initial_state: State) -> Self {
        self.initial_state = initial_state;
        self
    }

    /// Sets the physical parameters.
    #[must_use]
    pub fn parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Sets the tick rate, which fixes both the real-time cadence and the
    /// integration step size.
    #[must_use]
    pub fn tick_rate(mut self, tick_rate: TickRate) -> Self {
        self.tick_rate = tick_rate;
        self
    }
}

/// State shared between the tick thread and external callers.
struct Shared {
    /// The state vector the integrator advances. Owned by the tick thread
    /// while running; external access goes through [`Simulation::reset`]
    /// and the published snapshot.
    state: Mutex<State>,
    /// The throttled snapshot served to observers.
    published: Mutex<State>,
    /// Cleared by `stop`; checked at each tick boundary, so cancellation is
    /// cooperative rather than preemptive.
    running: AtomicBool,
    /// Pending disturbance: replaces the angle component before the next
    /// integration step while set.
    angle_override: Mutex<Option<f64>>,
    parameters: Mutex<Parameters>,
    control_law: Mutex<Box<dyn ControlLaw>>,
    subscribers: Mutex<Vec<Sender<State>>>,
    /// The caller-supplied initial condition every reset restores.
    initial_state: State,
}

impl Shared {
    /// Executes one tick: control, disturbance, integration, publication,
    /// divergence guard, in that fixed order.
    fn tick(&self, step_size: f64, period: Duration, last_publish: &mut Instant) {
        let pre_step = *self.state.lock().unwrap();
        // The guard samples position before the override and the step, so
        // it reacts one tick late relative to the state it discards.
        let guard_position = pre_step.position;

        let parameters = *self.parameters.lock().unwrap();
        let force = self
            .control_law
            .lock()
            .unwrap()
            .force(&pre_step, &SystemParameters::from(&parameters));

        let mut y = pre_step;
        if let Some(angle) = *self.angle_override.lock().unwrap() {
            y.pendulum_angle = angle;
        }

        let next = rkf45(pendulum, 0.0, y, step_size, &parameters.with_force(force));
        *self.state.lock().unwrap() = next;

        if last_publish.elapsed() >= period {
            self.publish(next);
            *last_publish = Instant::now();
        }

        if guard_position.abs() > DIVERGENCE_LIMIT {
            self.reset();
        }
    }

    fn publish(&self, state: State) {
        *self.published.lock().unwrap() = state;
        self.subscribers
            .lock()
            .unwrap()
            .retain(|tx| tx.send(state).is_ok());
    }

    fn reset(&self) {
        *self.state.lock().unwrap() = self.initial_state;
        *self.published.lock().unwrap() = self.initial_state;
    }
}

/// Runs ticks at the configured cadence until the running flag clears.
fn run(shared: &Shared, tick_rate: TickRate) {
    let period = tick_rate.period();
    let step_size = tick_rate.step_size();
    let mut next_tick = Instant::now() + period;
    let mut last_publish = Instant::now();

    while shared.running.load(Ordering::Acquire) {
        let now = Instant::now();
        if next_tick > now {
            thread::sleep(next_tick - now);
            next_tick += period;
        } else {
            // Fell behind; re-anchor the deadline rather than sprinting
            // through a burst of catch-up ticks.
            next_tick = Instant::now() + period;
        }

        shared.tick(step_size, period, &mut last_publish);
    }
}

/// A real-time cartpole simulation.
///
/// The simulation is a two-state machine, `Idle` or `Running`. While
/// running, a dedicated tick thread advances the state by one fixed
/// integration step per tick at the configured [`TickRate`], invoking the
/// control law each tick and publishing the state to observers at a
/// throttled cadence. Ticks are strictly sequential; a new tick never
/// begins before the previous state write completes.
///
/// All methods are safe to call from any thread. Mutations made between
/// ticks (`reset`, parameter or control-law swaps, the angle override) are
/// observed by the next tick at defined points of its fixed step order.
///
/// The only self-healing behavior is the divergence guard: when the cart
/// position's magnitude exceeds 10⁶, the state silently snaps back to the
/// initial condition and the loop keeps running.
pub struct Simulation {
    shared: Arc<Shared>,
    tick_rate: TickRate,
    /// Tick thread handle; also serializes `start` calls.
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Simulation {
    /// Creates an idle simulation. No thread is spawned until
    /// [`start`](Simulation::start).
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        let SimulationConfig {
            initial_state,
            parameters,
            control_law,
            tick_rate,
        } = config;

        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(initial_state),
                published: Mutex::new(initial_state),
                running: AtomicBool::new(false),
                angle_override: Mutex::new(None),
                parameters: Mutex::new(parameters),
                control_law: Mutex::new(control_law),
                subscribers: Mutex::new(Vec::new()),
                initial_state,
            }),
            tick_rate,
            handle: Mutex::new(None),
        }
    }

    /// Starts the tick cadence. A no-op if already running.
    pub fn start(&self) {
        let mut handle = self.handle.lock().unwrap();
        if self.shared.running.load(Ordering::Acquire) {
            return;
        }
        // A previous loop may still be finishing its last tick after
        // `stop`; let it drain before raising the flag again so two tick
        // threads never overlap.
        if let Some(previous) = handle.take() {
            let _ = previous.join();
        }

        self.shared.running.store(true, Ordering::Release);
        let shared = Arc::clone(&self.shared);
        let tick_rate = self.tick_rate;
        *handle = Some(thread::spawn(move || run(&shared, tick_rate)));
    }

    /// Stops the tick cadence. A no-op if already idle.
    ///
    /// Returns immediately; the in-flight tick, if any, completes before
    /// the tick thread exits.
    pub fn stop(&self) {
        self.shared.running.store(false, Ordering::Release);
    }

    /// Starts if idle, stops if running.
    pub fn toggle(&self) {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Restores the caller-supplied initial state.
    ///
    /// Available in either lifecycle state and does not change it: a
    /// running simulation keeps ticking from the initial condition.
    pub fn reset(&self) {
        self.shared.reset();
    }

    /// Returns whether the simulation is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Sets or clears the pendulum-angle disturbance override.
    ///
    /// While `Some(angle)`, each tick replaces the angle component of the
    /// state with `angle` before integrating, modeling an externally held
    /// perturbation. `Some(0.0)` is an override like any other; only `None`
    /// clears it.
    pub fn set_angle_override(&self, angle: Option<f64>) {
        *self.shared.angle_override.lock().unwrap() = angle;
    }

    /// Replaces the physical parameters, observed from the next tick on.
    pub fn set_parameters(&self, parameters: Parameters) {
        *self.shared.parameters.lock().unwrap() = parameters;
    }

    /// Replaces the control law, observed from the next tick on.
    pub fn set_control_law(&self, control_law: impl ControlLaw + 'static) {
        *self.shared.control_law.lock().unwrap() = Box::new(control_law);
    }

    /// Returns the latest published state snapshot.
    ///
    /// Publication is throttled to the tick period of wall-clock time, so
    /// this lags the integrator by at most one tick under normal cadence.
    #[must_use]
    pub fn state(&self) -> State {
        *self.shared.published.lock().unwrap()
    }

    /// Subscribes to published states.
    ///
    /// The returned channel receives every published snapshot, at the same
    /// throttled cadence as [`state`](Simulation::state). Dropping the
    /// receiver unsubscribes; the sender is pruned on the next publish.
    #[must_use]
    pub fn subscribe(&self) -> Receiver<State> {
        let (tx, rx) = mpsc::channel();
        self.shared.subscribers.lock().unwrap().push(tx);
        rx
    }
}

/// Stopping on drop keeps the tick thread from outliving its handle.
impl Drop for Simulation {
    fn drop(&mut self) {
        self.stop();
        if let Ok(mut handle) = self.handle.lock() {
            if let Some(handle) = handle.take() {
                let _ = handle.join();
            }
        }
    }
}
