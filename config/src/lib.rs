#[macro_use]
extern crate tracing;

mod app_config;
mod args;

pub use app_config::get_config_dir;
use app_config::{
    AppConfig,
    PROJECT_NAME,
};
pub use args::Args;
use eyre::{
    Context as _,
    Result,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    path::Path,
    time::Duration,
};

const DEFAULT_CONFIG: &str = include_str!("default-config.yaml");

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(flatten, skip_serializing)]
    pub app_config: AppConfig,
    pub device: DeviceConfig,
    pub executor: ExecutorConfig,
    pub sampling: SamplingConfig,
}

/// Where the modem's SNMP agent lives and which communities it accepts.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceConfig {
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub read_community: String,
    pub write_community: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Minimum pause between two consecutive requests.
    #[serde(default)]
    pub delay_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub retries: u32,
    /// Explicit path to `snmpget`, otherwise looked up in `PATH`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snmpget: Option<String>,
    /// Explicit path to `snmpset`, otherwise looked up in `PATH`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snmpset: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SamplingConfig {
    #[serde(default = "default_sample_count")]
    pub default_sample_count: u32,
}

fn default_port() -> u16 {
    161
}

fn default_timeout_secs() -> u64 {
    2
}

fn default_sample_count() -> u32 {
    10
}

impl ExecutorConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        serde_yml::from_str(DEFAULT_CONFIG).expect("Failed to parse default config")
    }
}

impl Config {
    /// Layers the embedded defaults, `config.yaml` from the config directory, the file passed with
    /// `--config`, `MODEM_STATS_*` environment variables and finally the command line.
    pub fn new(args: Args) -> Result<Self> {
        Self::load(&get_config_dir(), args)
    }

    #[instrument(level = "debug", skip(args))]
    pub fn load(config_dir: &Path, args: Args) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Yaml));

        let config_files = [("config.yaml", config::FileFormat::Yaml)];

        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
        }

        if let Some(path) = &args.config {
            debug!(?path, "Reading explicit configuration file");
            builder = builder.add_source(config::File::from(path.as_path()).required(true));
        }

        builder = builder
            .add_source(
                config::Environment::with_prefix(PROJECT_NAME.as_str())
                    .prefix_separator("_")
                    .separator("__"),
            )
            .add_source(args);

        let cfg: Self = builder
            .build()
            .context("Failed to assemble configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        if cfg.sampling.default_sample_count == 0 {
            eyre::bail!("sampling.default_sample_count must be a positive integer");
        }

        Ok(cfg)
    }

    pub fn config_dir(&self) -> &Path {
        &self.app_config.config_dir
    }

    /// Persists the configuration to `config.yaml` in the config directory.
    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(self.config_dir()).context("Failed to create config directory")?;
        let path = self.config_dir().join("config.yaml");
        let content = serde_yml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(&path, content).wrap_err_with(|| format!("Failed to write config to {:?}", path))
    }
}
