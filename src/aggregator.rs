//! # Aggregator
//!
//! Turns one logical request into one or more executor calls. Plain reads and writes are passed
//! through; derived statistics sample the same parameter `n` times in order and combine the
//! readings. A single failed sample voids the whole result.

use crate::{
    error::{
        ExecutorError,
        Result,
    },
    executor::{
        Executor,
        RawValue,
        Target,
    },
    parameter_id::ParameterId,
    stats::{
        DerivedStatKind,
        RequestConfig,
        SampleCount,
        SampleSet,
        StatValue,
    },
};
use serde::Serialize;
use std::{
    fmt,
    time::{
        Duration,
        Instant,
    },
};

const PREALLOCATED_SAMPLES: usize = 1024;

/// Source of wall-clock instants for timing a sampling run.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Result of a successful `get`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Reading {
    Raw(RawValue),
    Stat(StatValue),
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Raw(value) => write!(f, "{value}"),
            Reading::Stat(value) => write!(f, "{value}"),
        }
    }
}

pub struct Aggregator {
    executor: Box<dyn Executor>,
    target: Target,
    clock: Box<dyn Clock>,
}

impl fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aggregator")
            .field("target", &self.target)
            .field("delay", &self.executor.delay())
            .finish_non_exhaustive()
    }
}

impl Aggregator {
    pub fn new(executor: impl Executor + 'static, target: Target) -> Self {
        Self {
            executor: Box::new(executor),
            target,
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Changes the executor's inter-request delay for all following requests.
    pub fn set_delay(&self, delay: Duration) {
        self.executor.set_delay(delay);
    }

    pub fn delay(&self) -> Duration {
        self.executor.delay()
    }

    pub fn last_error(&self) -> Option<String> {
        self.executor.last_error()
    }

    /// Entry point taking unvalidated arguments. Bad arguments fail before any request is sent;
    /// `Ok(None)` means the device did not deliver a (complete) result.
    pub fn request(&self, id: &ParameterId, kind: Option<&str>, sample_count: Option<i64>) -> Result<Option<Reading>> {
        let kind = kind.map(DerivedStatKind::parse).transpose()?;
        let sample_count = sample_count.map(SampleCount::new).transpose()?.unwrap_or_default();
        Ok(self.get(id, &RequestConfig { kind, sample_count }))
    }

    pub fn get(&self, id: &ParameterId, request: &RequestConfig) -> Option<Reading> {
        match request.kind {
            None => self.get_raw(id).map(Reading::Raw),
            Some(kind) => self.get_stat(id, kind, request.sample_count).map(Reading::Stat),
        }
    }

    /// A single read, passed through untouched.
    #[instrument(level = "debug", skip(self, id), fields(id = %id))]
    pub fn get_raw(&self, id: &ParameterId) -> Option<RawValue> {
        match self.executor.get(&self.target, id) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(%id, %err, "Read failed");
                None
            }
        }
    }

    #[instrument(level = "debug", skip(self, id), fields(id = %id))]
    pub fn get_stat(&self, id: &ParameterId, kind: DerivedStatKind, sample_count: SampleCount) -> Option<StatValue> {
        let samples = self.sample(id, sample_count)?;
        let value = samples.combine(kind);
        match value {
            Some(value) => debug!(%kind, %value, elapsed = ?samples.elapsed, "Derived statistic"),
            None => warn!(%id, %kind, ?samples, "Samples do not yield a value"),
        }
        value
    }

    /// Reads `id` `sample_count` times in sequence and times the whole run.
    ///
    /// Stops at the first failed or non-numeric reading and returns `None`.
    pub fn sample(&self, id: &ParameterId, sample_count: SampleCount) -> Option<SampleSet> {
        let count = sample_count.get() as usize;
        // caller supplied, may be huge
        let mut samples = Vec::with_capacity(count.min(PREALLOCATED_SAMPLES));
        let start = self.clock.now();
        for n in 0..count {
            let sample = match self.executor.get(&self.target, id) {
                Ok(value) => value.as_integer(),
                Err(err) => {
                    warn!(%id, sample = n + 1, of = count, %err, "Sample unavailable, discarding run");
                    return None;
                }
            };
            match sample {
                Some(sample) => samples.push(sample),
                None => {
                    warn!(%id, sample = n + 1, of = count, "Sample is not numeric, discarding run");
                    return None;
                }
            }
        }
        let elapsed = self.clock.now().saturating_duration_since(start);
        trace!(?samples, ?elapsed, "Sampling done");
        Some(SampleSet::new(samples, elapsed))
    }

    /// A single write. Whatever the executor reports is returned unchanged.
    #[instrument(level = "debug", skip(self, id), fields(id = %id))]
    pub fn set(&self, id: &ParameterId, value: &RawValue) -> Result<RawValue, ExecutorError> {
        self.executor.set(&self.target, id, value)
    }
}

#[cfg(test)]
pub(crate) use manual_clock::ManualClock;

#[cfg(test)]
mod manual_clock {
    use super::Clock;
    use std::{
        sync::{
            Arc,
            Mutex,
        },
        time::{
            Duration,
            Instant,
        },
    };

    /// Clock that only moves when told to.
    #[derive(Debug, Clone)]
    pub(crate) struct ManualClock {
        origin: Instant,
        offset: Arc<Mutex<Duration>>,
    }

    impl ManualClock {
        pub(crate) fn new() -> Self {
            Self {
                origin: Instant::now(),
                offset: Arc::default(),
            }
        }

        pub(crate) fn advance(&self, step: Duration) {
            *self.offset.lock().unwrap() += step;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.origin + *self.offset.lock().unwrap()
        }
    }
}
