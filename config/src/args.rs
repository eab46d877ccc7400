use std::path::PathBuf;

/// Device and executor overrides shared by every subcommand.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct Args {
    /// Explicit configuration file, read after the one in the config directory.
    #[clap(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Address of the modem's SNMP agent.
    #[clap(long, global = true, value_name = "HOST")]
    pub address: Option<String>,

    /// UDP port of the modem's SNMP agent.
    #[clap(long, global = true)]
    pub port: Option<u16>,

    /// Community used for GET requests.
    #[clap(long = "read-community", global = true, value_name = "COMMUNITY")]
    pub read_community: Option<String>,

    /// Community used for SET requests.
    #[clap(long = "write-community", global = true, value_name = "COMMUNITY")]
    pub write_community: Option<String>,

    /// Minimum pause between two requests, e.g. `250ms` or `1s`.
    #[clap(long, global = true, value_name = "DURATION")]
    pub delay: Option<String>,

    /// Per-request timeout handed to the SNMP tools, in seconds.
    #[clap(long, global = true)]
    pub timeout: Option<u64>,

    /// Retries handed to the SNMP tools.
    #[clap(long, global = true)]
    pub retries: Option<u32>,
}

mod config_ext {
    use super::*;
    use config::{
        ConfigError,
        Map,
        Source,
        Value,
    };
    use std::collections::HashMap;

    impl Source for Args {
        fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
            Box::new((*self).clone())
        }

        fn collect(&self) -> Result<Map<String, Value>, ConfigError> {
            let mut cache = HashMap::<String, Value>::new();
            if let Some(address) = &self.address {
                cache.insert("device.address".to_string(), address.clone().into());
            }
            if let Some(port) = self.port {
                cache.insert("device.port".to_string(), (port as u64).into());
            }
            if let Some(community) = &self.read_community {
                cache.insert("device.read_community".to_string(), community.clone().into());
            }
            if let Some(community) = &self.write_community {
                cache.insert("device.write_community".to_string(), community.clone().into());
            }
            if let Some(delay) = &self.delay {
                let delay = humantime::parse_duration(delay)
                    .map_err(|err| ConfigError::Message(format!("invalid delay {delay:?}: {err}")))?;
                cache.insert("executor.delay_ms".to_string(), (delay.as_millis() as u64).into());
            }
            if let Some(timeout) = self.timeout {
                cache.insert("executor.timeout_secs".to_string(), timeout.into());
            }
            if let Some(retries) = self.retries {
                cache.insert("executor.retries".to_string(), (retries as u64).into());
            }
            Ok(cache)
        }
    }
}
