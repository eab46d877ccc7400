//! # Modem Stats
//!
//! SNMP statistics client for satellite modems.
//!
//! ## Architecture
//!
//! - **`executor`**: one blocking request per call against the modem's agent
//! - **`aggregator`**: plain reads and writes, and derived statistics over repeated samples
//! - **`stats`**: average, minimum, maximum, min/avg/max and counter rates
//! - **`catalog`**: the modem's parameter tree as typed sections and leaves
//! - **`driver`**: entry point owning the aggregator and the top-level sections
//!
//! A failed sample voids the whole statistic: getters return `None` rather than a value computed
//! from a partial sample set. Misuse (bad sample counts, unknown kinds) is an [`Error`] raised
//! before anything is sent.

#[macro_use]
extern crate tracing;

pub mod aggregator;
pub mod catalog;
pub mod driver;
pub mod error;
pub mod executor;
pub mod leaf;
pub mod logging;
pub mod parameter_id;
pub mod stats;

pub use aggregator::{
    Aggregator,
    Reading,
};
pub use driver::Driver;
pub use error::{
    Error,
    ExecutorError,
    Result,
};
pub use executor::{
    Executor,
    NetSnmpExecutor,
    RawValue,
    Target,
};
pub use parameter_id::ParameterId;
pub use stats::{
    DerivedStatKind,
    RequestConfig,
    SampleCount,
    StatValue,
};

pub mod prelude {
    pub use crate::{
        leaf::{
            Leaf as _,
            Reader as _,
            Writer as _,
        },
        DerivedStatKind,
        Driver,
        NetSnmpExecutor,
        RawValue,
        SampleCount,
        Target,
    };
}

pub fn init_errors() -> color_eyre::Result<()> {
    color_eyre::install()
}
