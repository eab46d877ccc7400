use super::{
    Executor,
    RawValue,
    Target,
};
use crate::{
    aggregator::ManualClock,
    error::ExecutorError,
    parameter_id::ParameterId,
};
use std::{
    collections::VecDeque,
    sync::{
        Arc,
        Mutex,
    },
    time::Duration,
};

#[derive(Debug, Default)]
struct MockState {
    responses: VecDeque<Result<RawValue, ExecutorError>>,
    gets: Vec<ParameterId>,
    sets: Vec<(ParameterId, RawValue)>,
    delay: Duration,
    last_error: Option<String>,
}

/// Scripted executor. Clones share state so tests can inspect calls after handing one to an
/// aggregator.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockExecutor {
    state: Arc<Mutex<MockState>>,
    clock: Option<(ManualClock, Duration)>,
}

impl MockExecutor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Each request answers with the next scripted response; an exhausted script times out.
    pub(crate) fn with_responses(responses: impl IntoIterator<Item = Result<RawValue, ExecutorError>>) -> Self {
        let mock = Self::new();
        mock.state.lock().unwrap().responses.extend(responses);
        mock
    }

    pub(crate) fn with_samples(samples: &[i64]) -> Self {
        Self::with_responses(samples.iter().map(|sample| Ok(RawValue::Integer(*sample))))
    }

    /// Advances `clock` by `step` on every request.
    pub(crate) fn ticking(mut self, clock: ManualClock, step: Duration) -> Self {
        self.clock = Some((clock, step));
        self
    }

    pub(crate) fn calls(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.gets.len() + state.sets.len()
    }

    pub(crate) fn gets(&self) -> Vec<ParameterId> {
        self.state.lock().unwrap().gets.clone()
    }

    pub(crate) fn sets(&self) -> Vec<(ParameterId, RawValue)> {
        self.state.lock().unwrap().sets.clone()
    }

    fn respond(&self) -> Result<RawValue, ExecutorError> {
        if let Some((clock, step)) = &self.clock {
            clock.advance(*step);
        }
        let mut state = self.state.lock().unwrap();
        let response = state.responses.pop_front().unwrap_or_else(|| {
            Err(ExecutorError::Timeout {
                target: "mock".to_string(),
            })
        });
        if let Err(err) = &response {
            state.last_error = Some(err.to_string());
        }
        response
    }
}

impl Executor for MockExecutor {
    fn get(&self, _target: &Target, id: &ParameterId) -> Result<RawValue, ExecutorError> {
        self.state.lock().unwrap().gets.push(id.clone());
        self.respond()
    }

    fn set(&self, _target: &Target, id: &ParameterId, value: &RawValue) -> Result<RawValue, ExecutorError> {
        self.state.lock().unwrap().sets.push((id.clone(), value.clone()));
        self.respond()
    }

    fn set_delay(&self, delay: Duration) {
        self.state.lock().unwrap().delay = delay;
    }

    fn delay(&self) -> Duration {
        self.state.lock().unwrap().delay
    }

    fn last_error(&self) -> Option<String> {
        self.state.lock().unwrap().last_error.clone()
    }
}
