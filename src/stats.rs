//! # Derived statistics
//!
//! Pure combinators that turn a [`SampleSet`] into a [`StatValue`]. Every division rounds up so
//! readings err on the high side.

use crate::error::{
    Error,
    Result,
};
use derive_more::Display;
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    fmt,
    str::FromStr,
    time::Duration,
};
use strum::{
    EnumIter,
    EnumString,
};

/// Largest value of the free-running 32-bit counters the rate computation expects.
pub const COUNTER32_MAX: i64 = 0xFFFF_FFFF;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum DerivedStatKind {
    #[strum(to_string = "average", serialize = "avg")]
    Average,
    #[strum(to_string = "maximum", serialize = "max")]
    Maximum,
    #[strum(to_string = "minimum", serialize = "min")]
    Minimum,
    #[strum(to_string = "min_avg_max")]
    MinAvgMax,
    /// Bits per second derived from a byte counter.
    #[strum(to_string = "rate_from_counter", serialize = "rate", serialize = "speed")]
    RateFromCounter,
}

impl DerivedStatKind {
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s.trim()).map_err(|_| Error::InvalidRequestKind(s.to_string()))
    }
}

/// Number of samples taken for one derived statistic. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub struct SampleCount(u32);

impl SampleCount {
    pub const DEFAULT: SampleCount = SampleCount(10);

    pub fn new(count: i64) -> Result<Self> {
        match u32::try_from(count) {
            Ok(count) if count > 0 => Ok(Self(count)),
            _ => Err(Error::InvalidSampleCount(count.to_string())),
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for SampleCount {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for SampleCount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let count = s
            .trim()
            .parse::<i64>()
            .map_err(|_| Error::InvalidSampleCount(s.to_string()))?;
        Self::new(count)
    }
}

impl TryFrom<i64> for SampleCount {
    type Error = Error;

    fn try_from(count: i64) -> Result<Self> {
        Self::new(count)
    }
}

/// What a `get` should do: a single plain read, or `sample_count` reads combined into `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestConfig {
    pub kind: Option<DerivedStatKind>,
    pub sample_count: SampleCount,
}

impl RequestConfig {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn stat(kind: DerivedStatKind, sample_count: SampleCount) -> Self {
        Self {
            kind: Some(kind),
            sample_count,
        }
    }

    /// Validates loosely typed arguments. Both are checked even for a plain read.
    pub fn parse(kind: Option<&str>, sample_count: Option<&str>) -> Result<Self> {
        let kind = kind.map(DerivedStatKind::parse).transpose()?;
        let sample_count = sample_count.map(SampleCount::from_str).transpose()?.unwrap_or_default();
        Ok(Self { kind, sample_count })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Scalar(i64),
    MinAvgMax { min: i64, avg: i64, max: i64 },
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Scalar(value) => write!(f, "{value}"),
            StatValue::MinAvgMax { min, avg, max } => write!(f, "{min}/{avg}/{max}"),
        }
    }
}

/// Successive readings of one parameter and the wall-clock time it took to take them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSet {
    pub samples: Vec<i64>,
    pub elapsed: Duration,
}

impl SampleSet {
    pub fn new(samples: Vec<i64>, elapsed: Duration) -> Self {
        Self { samples, elapsed }
    }

    /// `None` when the set is empty or a rate has no defined value.
    pub fn combine(&self, kind: DerivedStatKind) -> Option<StatValue> {
        match kind {
            DerivedStatKind::Average => average(&self.samples).map(StatValue::Scalar),
            DerivedStatKind::Maximum => self.samples.iter().copied().max().map(StatValue::Scalar),
            DerivedStatKind::Minimum => self.samples.iter().copied().min().map(StatValue::Scalar),
            DerivedStatKind::MinAvgMax => {
                min_avg_max(&self.samples).map(|(min, avg, max)| StatValue::MinAvgMax { min, avg, max })
            }
            DerivedStatKind::RateFromCounter => rate_from_counter(&self.samples, self.elapsed).map(StatValue::Scalar),
        }
    }
}

fn ceil_div(sum: i128, count: i128) -> i128 {
    let quotient = sum.div_euclid(count);
    if sum.rem_euclid(count) == 0 {
        quotient
    } else {
        quotient + 1
    }
}

/// Ceiling of the arithmetic mean.
pub fn average(samples: &[i64]) -> Option<i64> {
    if samples.is_empty() {
        return None;
    }
    let sum: i128 = samples.iter().map(|&sample| sample as i128).sum();
    Some(ceil_div(sum, samples.len() as i128) as i64)
}

/// `(min, ceil(avg), max)` in a single pass.
pub fn min_avg_max(samples: &[i64]) -> Option<(i64, i64, i64)> {
    let (&first, rest) = samples.split_first()?;
    let (min, max, sum) = rest.iter().fold(
        (first, first, first as i128),
        |(min, max, sum), &sample| (min.min(sample), max.max(sample), sum + sample as i128),
    );
    Some((min, ceil_div(sum, samples.len() as i128) as i64, max))
}

/// Increase of a 32-bit counter between two readings. A smaller `current` means it wrapped.
pub fn counter_delta(previous: i64, current: i64) -> i128 {
    let (previous, current) = (previous as i128, current as i128);
    if current < previous {
        COUNTER32_MAX as i128 - previous + current
    } else {
        current - previous
    }
}

/// Bits per second from successive byte counter readings spread over `elapsed`.
///
/// The first sample only seeds the previous value. Returns `None` when counters moved but no
/// time elapsed.
pub fn rate_from_counter(samples: &[i64], elapsed: Duration) -> Option<i64> {
    let (&first, rest) = samples.split_first()?;
    let (total, _) = rest.iter().fold((0i128, first), |(total, previous), &current| {
        (total + counter_delta(previous, current), current)
    });
    if total == 0 {
        return Some(0);
    }
    let seconds = elapsed.as_secs_f64();
    if seconds <= 0.0 {
        return None;
    }
    Some((total as f64 / seconds * 8.0).ceil() as i64)
}
