//! Capability-typed handles to a single catalog parameter.
//!
//! A leaf is bound to one resolved [`ParameterId`] when the catalog hands it out and is never
//! changed afterwards. Only [`ReadOnly`] and [`ReadWrite`] leaves can be read, only [`WriteOnly`]
//! and [`ReadWrite`] leaves can be written.

use crate::{
    aggregator::{
        Aggregator,
        Reading,
    },
    error::{
        ExecutorError,
        Result,
    },
    executor::RawValue,
    parameter_id::ParameterId,
    stats::{
        DerivedStatKind,
        RequestConfig,
        SampleCount,
        StatValue,
    },
};
use serde::{
    Deserialize,
    Serialize,
};
use strum::Display;

/// Declared capability of a catalog parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum Access {
    #[strum(to_string = "ro")]
    ReadOnly,
    #[strum(to_string = "wo")]
    WriteOnly,
    #[strum(to_string = "rw")]
    ReadWrite,
}

impl Access {
    pub fn readable(self) -> bool {
        matches!(self, Access::ReadOnly | Access::ReadWrite)
    }

    pub fn writable(self) -> bool {
        matches!(self, Access::WriteOnly | Access::ReadWrite)
    }
}

/// Common constructor so catalog sections can produce any leaf kind.
pub trait Leaf<'a>: Sized {
    const ACCESS: Access;

    fn bind(aggregator: &'a Aggregator, id: ParameterId) -> Self;

    fn id(&self) -> &ParameterId;
}

pub trait Reader {
    /// One plain read. `None` when the device did not answer.
    fn get(&self) -> Option<RawValue>;

    /// `sample_count` successive reads combined into `kind`. `None` when any read failed.
    fn stat(&self, kind: DerivedStatKind, sample_count: SampleCount) -> Option<StatValue>;

    /// Plain read or derived statistic, depending on `request`.
    fn request(&self, request: &RequestConfig) -> Option<Reading>;

    /// Like [`Reader::request`] for unvalidated arguments.
    fn get_with(&self, kind: Option<&str>, sample_count: Option<i64>) -> Result<Option<Reading>>;
}

pub trait Writer {
    fn set(&self, value: impl Into<RawValue>) -> Result<RawValue, ExecutorError>;
}

macro_rules! leaf_kind {
    ($(#[$meta:meta])* $name:ident, $access:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name<'a> {
            aggregator: &'a Aggregator,
            id: ParameterId,
        }

        impl<'a> Leaf<'a> for $name<'a> {
            const ACCESS: Access = $access;

            fn bind(aggregator: &'a Aggregator, id: ParameterId) -> Self {
                Self { aggregator, id }
            }

            fn id(&self) -> &ParameterId {
                &self.id
            }
        }
    };
}

macro_rules! impl_reader {
    ($name:ident) => {
        impl Reader for $name<'_> {
            fn get(&self) -> Option<RawValue> {
                self.aggregator.get_raw(&self.id)
            }

            fn stat(&self, kind: DerivedStatKind, sample_count: SampleCount) -> Option<StatValue> {
                self.aggregator.get_stat(&self.id, kind, sample_count)
            }

            fn request(&self, request: &RequestConfig) -> Option<Reading> {
                self.aggregator.get(&self.id, request)
            }

            fn get_with(&self, kind: Option<&str>, sample_count: Option<i64>) -> Result<Option<Reading>> {
                self.aggregator.request(&self.id, kind, sample_count)
            }
        }
    };
}

macro_rules! impl_writer {
    ($name:ident) => {
        impl Writer for $name<'_> {
            fn set(&self, value: impl Into<RawValue>) -> Result<RawValue, ExecutorError> {
                self.aggregator.set(&self.id, &value.into())
            }
        }
    };
}

leaf_kind!(
    /// A parameter the device only reports.
    ReadOnly,
    Access::ReadOnly
);
leaf_kind!(
    /// A trigger or command the device accepts but never reports back.
    WriteOnly,
    Access::WriteOnly
);
leaf_kind!(ReadWrite, Access::ReadWrite);

impl_reader!(ReadOnly);
impl_reader!(ReadWrite);
impl_writer!(WriteOnly);
impl_writer!(ReadWrite);
