//! # Driver
//!
//! Single entry point: owns the [`Aggregator`] and hands out the top-level catalog sections.
//!
//! ```no_run
//! use modem_stats::prelude::*;
//!
//! let executor = NetSnmpExecutor::locate()?;
//! let driver = Driver::new(executor, Target::new("10.0.0.1", 161));
//! let inbound = driver
//!     .interfaces()
//!     .table()
//!     .in_octets(1)
//!     .stat(Driver::RATE_FROM_COUNTER, SampleCount::new(5)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::{
    aggregator::{
        Aggregator,
        Reading,
    },
    catalog::{
        self,
        CatalogEntry,
        Control,
        DemodulatorStats,
        Interfaces,
        MobileStation,
        ModulatorStats,
        Node,
        Routing,
        Shaper,
        System,
        SystemHealth,
        Tdma,
        Timing,
    },
    error::{
        Error,
        ExecutorError,
        Result,
    },
    executor::{
        Executor,
        NetSnmpExecutor,
        RawValue,
        Target,
    },
    stats::{
        DerivedStatKind,
        RequestConfig,
    },
};
use modem_stats_config::Config;
use std::time::Duration;

/// Root of the vendor-specific subtree.
pub const DEVICE_ENTERPRISE: &str = "1.3.6.1.4.1.8000.22";

const MIB2_SYSTEM: &str = "1.3.6.1.2.1.1";
const MIB2_INTERFACES: &str = "1.3.6.1.2.1.2";

// below DEVICE_ENTERPRISE
const CONTROL: &str = "1";
const DEMODULATOR1: &str = "2.1";
const DEMODULATOR2: &str = "2.2";
const MODULATOR: &str = "3";
const TDMA: &str = "4";
const TIMING: &str = "5";
const ROUTING: &str = "6";
const SHAPER: &str = "7";
const HEALTH: &str = "8";
const MOBILE_STATION: &str = "9";

#[derive(Debug)]
pub struct Driver {
    aggregator: Aggregator,
}

impl Driver {
    pub const AVERAGE: DerivedStatKind = DerivedStatKind::Average;
    pub const MAXIMUM: DerivedStatKind = DerivedStatKind::Maximum;
    pub const MINIMUM: DerivedStatKind = DerivedStatKind::Minimum;
    pub const MIN_AVG_MAX: DerivedStatKind = DerivedStatKind::MinAvgMax;
    pub const RATE_FROM_COUNTER: DerivedStatKind = DerivedStatKind::RateFromCounter;

    pub fn new(executor: impl Executor + 'static, target: Target) -> Self {
        Self::from_aggregator(Aggregator::new(executor, target))
    }

    pub fn from_aggregator(aggregator: Aggregator) -> Self {
        Self { aggregator }
    }

    /// Builds a driver backed by the net-snmp tools, configured from `config`.
    pub fn from_config(config: &Config) -> Result<Self, ExecutorError> {
        let executor = NetSnmpExecutor::from_config(&config.executor)?;
        let target = Target::new(&config.device.address, config.device.port)
            .with_communities(&config.device.read_community, &config.device.write_community);
        info!(%target, delay = ?config.executor.delay(), "Using net-snmp executor");
        Ok(Self::new(executor, target))
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn set_delay(&self, delay: Duration) {
        self.aggregator.set_delay(delay);
    }

    fn vendor(&self, suffix: &str) -> Node<'_> {
        Node::new(&self.aggregator, vendor_base(suffix))
    }

    pub fn system(&self) -> System<'_> {
        System::from_node(Node::new(&self.aggregator, MIB2_SYSTEM))
    }

    pub fn interfaces(&self) -> Interfaces<'_> {
        Interfaces::from_node(Node::new(&self.aggregator, MIB2_INTERFACES))
    }

    pub fn control(&self) -> Control<'_> {
        Control::from_node(self.vendor(CONTROL))
    }

    pub fn demodulator1(&self) -> DemodulatorStats<'_> {
        DemodulatorStats::from_node(self.vendor(DEMODULATOR1))
    }

    pub fn demodulator2(&self) -> DemodulatorStats<'_> {
        DemodulatorStats::from_node(self.vendor(DEMODULATOR2))
    }

    pub fn modulator(&self) -> ModulatorStats<'_> {
        ModulatorStats::from_node(self.vendor(MODULATOR))
    }

    pub fn tdma(&self) -> Tdma<'_> {
        Tdma::from_node(self.vendor(TDMA))
    }

    pub fn timing(&self) -> Timing<'_> {
        Timing::from_node(self.vendor(TIMING))
    }

    pub fn routing(&self) -> Routing<'_> {
        Routing::from_node(self.vendor(ROUTING))
    }

    pub fn shaper(&self) -> Shaper<'_> {
        Shaper::from_node(self.vendor(SHAPER))
    }

    pub fn health(&self) -> SystemHealth<'_> {
        SystemHealth::from_node(self.vendor(HEALTH))
    }

    pub fn mobile_station(&self) -> MobileStation<'_> {
        MobileStation::from_node(self.vendor(MOBILE_STATION))
    }

    /// Every parameter the driver can address, in catalog order.
    pub fn catalog() -> Vec<CatalogEntry> {
        let mut out = Vec::new();
        System::describe(MIB2_SYSTEM, "system", &mut out);
        Interfaces::describe(MIB2_INTERFACES, "interfaces", &mut out);
        Control::describe(&vendor_base(CONTROL), "control", &mut out);
        DemodulatorStats::describe(&vendor_base(DEMODULATOR1), "demodulator1", &mut out);
        DemodulatorStats::describe(&vendor_base(DEMODULATOR2), "demodulator2", &mut out);
        ModulatorStats::describe(&vendor_base(MODULATOR), "modulator", &mut out);
        Tdma::describe(&vendor_base(TDMA), "tdma", &mut out);
        Timing::describe(&vendor_base(TIMING), "timing", &mut out);
        Routing::describe(&vendor_base(ROUTING), "routing", &mut out);
        Shaper::describe(&vendor_base(SHAPER), "shaper", &mut out);
        SystemHealth::describe(&vendor_base(HEALTH), "health", &mut out);
        MobileStation::describe(&vendor_base(MOBILE_STATION), "mobile_station", &mut out);
        out
    }

    pub fn lookup(path: &str) -> Result<CatalogEntry> {
        catalog::lookup(&Self::catalog(), path)
            .cloned()
            .ok_or_else(|| Error::UnknownParameter(path.to_string()))
    }

    /// Reads a parameter addressed by its catalog path, e.g. `demodulator1.cn_ratio`.
    pub fn read(&self, path: &str, index: u32, request: &RequestConfig) -> Result<Option<Reading>> {
        self.read_entry(&Self::lookup(path)?, index, request)
    }

    /// Like [`Driver::read`] for an entry already looked up.
    pub fn read_entry(&self, entry: &CatalogEntry, index: u32, request: &RequestConfig) -> Result<Option<Reading>> {
        if !entry.access.readable() {
            return Err(Error::NotReadable(entry.path.clone()));
        }
        Ok(self.aggregator.get(&entry.id(index), request))
    }

    /// Writes a parameter addressed by its catalog path.
    pub fn write(&self, path: &str, index: u32, value: &RawValue) -> Result<RawValue> {
        self.write_entry(&Self::lookup(path)?, index, value)
    }

    pub fn write_entry(&self, entry: &CatalogEntry, index: u32, value: &RawValue) -> Result<RawValue> {
        if !entry.access.writable() {
            return Err(Error::NotWritable(entry.path.clone()));
        }
        Ok(self.aggregator.set(&entry.id(index), value)?)
    }
}

fn vendor_base(suffix: &str) -> String {
    format!("{DEVICE_ENTERPRISE}.{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::ParameterSpec,
        executor::mock::MockExecutor,
        leaf::{
            Access,
            Leaf,
            Reader,
            Writer,
        },
        parameter_id::ParameterId,
        stats::{
            SampleCount,
            StatValue,
        },
    };
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn driver(mock: &MockExecutor) -> Driver {
        Driver::new(mock.clone(), Target::new("10.0.0.1", 161))
    }

    #[test]
    fn navigation_resolves_ids() {
        let mock = MockExecutor::new();
        let driver = driver(&mock);
        assert_eq!(driver.system().name(None).id().as_str(), "1.3.6.1.2.1.1.5.0");
        assert_eq!(
            driver.interfaces().table().in_octets(3).id().as_str(),
            "1.3.6.1.2.1.2.2.1.10.3"
        );
        assert_eq!(
            driver.demodulator1().cn_ratio(None).id().as_str(),
            "1.3.6.1.4.1.8000.22.2.1.2.0"
        );
        assert_eq!(
            driver.demodulator2().cn_ratio(None).id().as_str(),
            "1.3.6.1.4.1.8000.22.2.2.2.0"
        );
        assert_eq!(
            driver.modulator().queues().dropped_bytes(4).id().as_str(),
            "1.3.6.1.4.1.8000.22.3.10.4.4"
        );
        assert_eq!(driver.tdma().frame().length(None).id().as_str(), "1.3.6.1.4.1.8000.22.4.10.1.0");
    }

    #[test]
    fn navigation_does_not_touch_the_device() {
        let mock = MockExecutor::new();
        let driver = driver(&mock);
        let table = driver.interfaces().table();
        let first = table.in_octets(1);
        let second = table.in_octets(2);
        assert_eq!(mock.calls(), 0);
        // reusing a section never changes leaves handed out earlier
        assert_eq!(first.id().as_str(), "1.3.6.1.2.1.2.2.1.10.1");
        assert_eq!(second.id().as_str(), "1.3.6.1.2.1.2.2.1.10.2");
    }

    #[test]
    fn catalog_templates_are_valid_and_unique() {
        let catalog = Driver::catalog();
        let mut paths = HashSet::new();
        let mut templates = HashSet::new();
        for entry in &catalog {
            assert!(entry.template.parse::<ParameterId>().is_ok(), "{entry:?}");
            assert_eq!(entry.id(7), ParameterId::resolve(&entry.template, 7).unwrap());
            assert!(paths.insert(entry.path.clone()), "duplicate path {}", entry.path);
            assert!(templates.insert(entry.template.clone()), "duplicate id {}", entry.template);
        }
        assert!(catalog.len() > 100);
    }

    #[test]
    fn catalog_matches_navigation() {
        let mock = MockExecutor::new();
        let driver = driver(&mock);
        let entry = Driver::lookup("modulator.queues.dropped_bytes").unwrap();
        assert_eq!(entry.id(4), driver.modulator().queues().dropped_bytes(4).id().clone());
        assert_eq!(entry.access, Access::ReadOnly);

        let entry = Driver::lookup("routing.remove").unwrap();
        assert_eq!(entry.access, Access::WriteOnly);
        assert_eq!(entry.id(2), driver.routing().remove(2).id().clone());
    }

    #[test]
    fn every_top_level_section_is_listed() {
        let mock = MockExecutor::new();
        let driver = driver(&mock);
        let sections: [(&str, String, &[ParameterSpec]); 12] = [
            ("system", driver.system().base().to_string(), System::LEAVES),
            ("interfaces", driver.interfaces().base().to_string(), Interfaces::LEAVES),
            ("control", driver.control().base().to_string(), Control::LEAVES),
            ("demodulator1", driver.demodulator1().base().to_string(), DemodulatorStats::LEAVES),
            ("demodulator2", driver.demodulator2().base().to_string(), DemodulatorStats::LEAVES),
            ("modulator", driver.modulator().base().to_string(), ModulatorStats::LEAVES),
            ("tdma", driver.tdma().base().to_string(), Tdma::LEAVES),
            ("timing", driver.timing().base().to_string(), Timing::LEAVES),
            ("routing", driver.routing().base().to_string(), Routing::LEAVES),
            ("shaper", driver.shaper().base().to_string(), Shaper::LEAVES),
            ("health", driver.health().base().to_string(), SystemHealth::LEAVES),
            ("mobile_station", driver.mobile_station().base().to_string(), MobileStation::LEAVES),
        ];

        let catalog = Driver::catalog();
        let listed: HashSet<&str> = catalog
            .iter()
            .filter_map(|entry| entry.path.split('.').next())
            .collect();
        let navigable: HashSet<&str> = sections.iter().map(|(path, _, _)| *path).collect();
        assert_eq!(listed, navigable);

        for (path, base, leaves) in &sections {
            assert!(base.parse::<ParameterId>().is_ok(), "{path}: {base}");
            for entry in catalog.iter().filter(|entry| entry.path.split('.').next() == Some(*path)) {
                assert!(entry.template.starts_with(&format!("{base}.")), "{entry:?}");
            }
            for spec in *leaves {
                let entry = Driver::lookup(&format!("{path}.{}", spec.name)).unwrap();
                assert_eq!(entry.template, format!("{base}.{}", spec.suffix));
                assert_eq!(entry.access, spec.access);
            }
        }
    }

    #[test]
    fn read_and_write_by_catalog_entry() {
        let mock = MockExecutor::with_samples(&[3]);
        let driver = driver(&mock);
        let reboot = Driver::lookup("control.reboot").unwrap();
        assert_eq!(
            driver.read_entry(&reboot, 0, &RequestConfig::plain()),
            Err(Error::NotReadable("control.reboot".to_string()))
        );
        let cn_ratio = Driver::lookup("demodulator2.cn_ratio").unwrap();
        assert_eq!(
            driver.write_entry(&cn_ratio, 0, &RawValue::Integer(1)),
            Err(Error::NotWritable("demodulator2.cn_ratio".to_string()))
        );
        assert_eq!(mock.calls(), 0);
        assert_eq!(
            driver.read_entry(&cn_ratio, 0, &RequestConfig::plain()),
            Ok(Some(Reading::Raw(RawValue::Integer(3))))
        );
        assert_eq!(mock.gets(), vec![cn_ratio.id(0)]);
    }

    #[test]
    fn unknown_paths_are_rejected() {
        assert_eq!(
            Driver::lookup("interfaces.table.in_bytes"),
            Err(Error::UnknownParameter("interfaces.table.in_bytes".to_string()))
        );
    }

    #[test]
    fn leaves_read_and_write_through_the_aggregator() {
        let mock = MockExecutor::with_responses([Ok(RawValue::from("hub-7")), Ok(RawValue::Integer(1))]);
        let driver = driver(&mock);
        assert_eq!(driver.system().name(None).get(), Some(RawValue::from("hub-7")));
        assert_eq!(driver.control().save_config(None).set(1i64), Ok(RawValue::Integer(1)));
        assert_eq!(
            mock.sets(),
            vec![(
                "1.3.6.1.4.1.8000.22.1.2.0".parse().unwrap(),
                RawValue::Integer(1)
            )]
        );
    }

    #[test]
    fn rate_through_the_catalog() {
        let mock = MockExecutor::with_samples(&[100, 100, 100]);
        let driver = driver(&mock);
        let rate = driver
            .interfaces()
            .table()
            .out_octets(2)
            .stat(Driver::RATE_FROM_COUNTER, SampleCount::new(3).unwrap());
        assert_eq!(rate, Some(StatValue::Scalar(0)));
        assert_eq!(mock.gets(), vec![driver.interfaces().table().out_octets(2).id().clone(); 3]);
    }

    #[test]
    fn path_access_is_checked() {
        let mock = MockExecutor::with_samples(&[5, 7]);
        let driver = driver(&mock);
        assert_eq!(
            driver.read("control.reboot", 0, &RequestConfig::plain()),
            Err(Error::NotReadable("control.reboot".to_string()))
        );
        assert_eq!(
            driver.write("health.temperature", 0, &RawValue::Integer(20)),
            Err(Error::NotWritable("health.temperature".to_string()))
        );
        assert_eq!(mock.calls(), 0);

        let request = RequestConfig::stat(Driver::MAXIMUM, SampleCount::new(2).unwrap());
        assert_eq!(
            driver.read("health.temperature", 0, &request),
            Ok(Some(Reading::Stat(StatValue::Scalar(7))))
        );
    }

    #[test]
    fn path_write_surfaces_executor_failures() {
        let mock = MockExecutor::new();
        let driver = driver(&mock);
        assert!(matches!(
            driver.write("system.location", 0, &RawValue::from("rack 4")),
            Err(Error::Executor(ExecutorError::Timeout { .. }))
        ));
    }
}
