use std::{
    sync::Mutex,
    thread,
    time::{
        Duration,
        Instant,
    },
};

#[derive(Debug, Default)]
struct ThrottleState {
    delay: Duration,
    last_request: Option<Instant>,
}

/// Keeps at least `delay` between the end of one request and the start of the next.
#[derive(Debug, Default)]
pub struct Throttle {
    state: Mutex<ThrottleState>,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self {
            state: Mutex::new(ThrottleState {
                delay,
                last_request: None,
            }),
        }
    }

    pub fn delay(&self) -> Duration {
        self.lock().delay
    }

    pub fn set_delay(&self, delay: Duration) {
        debug!(?delay, "Changing inter-request delay");
        self.lock().delay = delay;
    }

    /// Blocks until the configured delay has passed since the last finished request.
    pub fn wait(&self) {
        let remaining = {
            let state = self.lock();
            state
                .last_request
                .map(|last| state.delay.saturating_sub(last.elapsed()))
                .unwrap_or_default()
        };
        if !remaining.is_zero() {
            trace!(?remaining, "Throttling request");
            thread::sleep(remaining);
        }
    }

    /// Records that a request just finished.
    pub fn mark(&self) {
        self.lock().last_request = Some(Instant::now());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ThrottleState> {
        // The state stays consistent even if a holder panicked.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
