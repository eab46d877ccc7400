//! # Executor
//!
//! An [`Executor`] performs exactly one blocking request/response exchange with the device per
//! call. Everything above it (sampling, aggregation, the catalog) is transport agnostic.
//!
//! - **`NetSnmpExecutor`**: drives the net-snmp command line tools
//! - **`Throttle`**: inter-request delay shared by executor implementations

#[cfg(test)]
pub(crate) mod mock;
mod net_snmp;
mod throttle;

use crate::{
    error::ExecutorError,
    parameter_id::ParameterId,
};
pub use net_snmp::NetSnmpExecutor;
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    fmt,
    time::Duration,
};
pub use throttle::Throttle;

/// Address and credentials of one SNMP agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub address: String,
    pub port: u16,
    pub read_community: String,
    pub write_community: String,
}

impl Target {
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
            read_community: "public".to_string(),
            write_community: "private".to_string(),
        }
    }

    pub fn with_communities(mut self, read: impl Into<String>, write: impl Into<String>) -> Self {
        self.read_community = read.into();
        self.write_community = write.into();
        self
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.address.contains(':') {
            write!(f, "udp6:[{}]:{}", self.address, self.port)
        } else {
            write!(f, "{}:{}", self.address, self.port)
        }
    }
}

/// A single value as returned by the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Integer(i64),
    Text(String),
}

impl RawValue {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            RawValue::Integer(value) => Some(*value),
            RawValue::Text(_) => None,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Integer(value) => write!(f, "{value}"),
            RawValue::Text(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Integer(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

/// Transport collaborator: one request per call, blocking until it answers or times out.
///
/// An `Err` is the failure marker for that single request. Implementations enforce their own
/// inter-request delay, which may be changed at any time and applies to later calls only.
pub trait Executor: Send + Sync {
    fn get(&self, target: &Target, id: &ParameterId) -> Result<RawValue, ExecutorError>;

    fn set(&self, target: &Target, id: &ParameterId, value: &RawValue) -> Result<RawValue, ExecutorError>;

    fn set_delay(&self, delay: Duration);

    fn delay(&self) -> Duration;

    /// Description of the most recent failed request, if any.
    fn last_error(&self) -> Option<String>;
}
