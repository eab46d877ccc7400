//! # Modem Stats - Main Entry Point
//!
//! Command line access to the parameter catalog:
//!
//! 1. Listing the catalog
//! 2. Reading a parameter, plain or as a derived statistic over several samples
//! 3. Writing a parameter

use clap::{
    Parser,
    Subcommand,
};
use color_eyre::Result;
use comfy_table::{
    presets,
    Attribute,
    Cell,
    Color,
    ContentArrangement,
    Table,
};
use eyre::eyre;
use modem_stats::{
    catalog::CatalogEntry,
    leaf::Access,
    logging,
    Driver,
    ParameterId,
    RawValue,
    Reading,
    RequestConfig,
    SampleCount,
};
use modem_stats_config::{
    Args,
    Config,
};
use tracing::{
    debug,
    info,
};

#[derive(Parser)]
#[command(name = "modem-stats")]
#[command(about = "Satellite modem statistics over SNMP")]
#[command(author, version)]
struct Cli {
    #[clap(flatten)]
    args: Args,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the parameter catalog.
    List {
        /// Only show paths starting with this prefix, e.g. `demodulator1`.
        #[arg(long)]
        filter: Option<String>,
    },
    /// Read a catalog parameter.
    Get {
        /// Catalog path, e.g. `interfaces.table.in_octets`.
        path: String,
        #[clap(flatten)]
        read: ReadArgs,
    },
    /// Read a parameter by its numeric id, bypassing the catalog.
    RawGet {
        /// Full id including the instance, e.g. `1.3.6.1.2.1.1.3.0`.
        id: String,
        #[clap(flatten)]
        read: ReadArgs,
    },
    /// Write a catalog parameter.
    Set {
        path: String,
        value: String,
        /// Instance index.
        #[arg(long, default_value_t = 0)]
        index: u32,
        /// Send the value as a string even if it looks like a number.
        #[arg(long)]
        text: bool,
    },
    /// Store the effective device and executor settings in the config directory.
    SaveConfig,
}

#[derive(Debug, clap::Args)]
struct ReadArgs {
    /// Instance index.
    #[arg(long, default_value_t = 0)]
    index: u32,

    /// Derived statistic: average, maximum, minimum, min_avg_max or rate_from_counter.
    #[arg(long)]
    kind: Option<String>,

    /// Number of samples for a derived statistic.
    #[arg(long)]
    samples: Option<String>,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

impl ReadArgs {
    fn request(&self, config: &Config) -> Result<RequestConfig> {
        let mut request = RequestConfig::parse(self.kind.as_deref(), self.samples.as_deref())?;
        if self.samples.is_none() {
            request.sample_count = SampleCount::new(config.sampling.default_sample_count.into())?;
        }
        Ok(request)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    modem_stats::init_errors()?;
    logging::log_init(cli.verbose)?;

    let config = Config::new(cli.args.clone())?;
    debug!(?config, "Loaded configuration");

    match cli.command {
        Command::List { filter } => {
            println!("{}", catalog_table(filter.as_deref()));
            Ok(())
        }
        Command::Get { path, read } => {
            let request = read.request(&config)?;
            let entry = Driver::lookup(&path)?;
            let driver = Driver::from_config(&config)?;
            let reading = driver.read_entry(&entry, read.index, &request)?;
            report(&driver, &entry.id(read.index), Some(&path), &request, reading, read.json)
        }
        Command::RawGet { id, read } => {
            let request = read.request(&config)?;
            let id: ParameterId = id.parse()?;
            let driver = Driver::from_config(&config)?;
            let reading = driver.aggregator().get(&id, &request);
            report(&driver, &id, None, &request, reading, read.json)
        }
        Command::Set {
            path,
            value,
            index,
            text,
        } => {
            let value = match value.parse::<i64>() {
                Ok(number) if !text => RawValue::Integer(number),
                _ => RawValue::Text(value),
            };
            let entry = Driver::lookup(&path)?;
            let driver = Driver::from_config(&config)?;
            let answer = driver.write_entry(&entry, index, &value)?;
            info!(%path, index, %answer, "Parameter written");
            println!("{answer}");
            Ok(())
        }
        Command::SaveConfig => {
            config.save()?;
            println!("{}", config.config_dir().join("config.yaml").display());
            Ok(())
        }
    }
}

fn report(
    driver: &Driver,
    id: &ParameterId,
    path: Option<&str>,
    request: &RequestConfig,
    reading: Option<Reading>,
    json: bool,
) -> Result<()> {
    let Some(reading) = reading else {
        let reason = driver
            .aggregator()
            .last_error()
            .unwrap_or_else(|| "no usable samples".to_string());
        return Err(eyre!("No result for {id}: {reason}"));
    };

    if json {
        let output = serde_json::json!({
            "path": path,
            "id": id,
            "kind": request.kind,
            "samples": request.kind.map(|_| request.sample_count.get()),
            "value": reading,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{reading}");
    }
    Ok(())
}

fn catalog_table(filter: Option<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Path").add_attribute(Attribute::Bold),
            Cell::new("Id").add_attribute(Attribute::Bold),
            Cell::new("Access").add_attribute(Attribute::Bold),
        ]);

    let entries: Vec<CatalogEntry> = Driver::catalog()
        .into_iter()
        .filter(|entry| filter.map_or(true, |prefix| entry.path.starts_with(prefix)))
        .collect();

    for entry in entries {
        let color = match entry.access {
            Access::ReadOnly => Color::Green,
            Access::WriteOnly => Color::Red,
            Access::ReadWrite => Color::Yellow,
        };
        table.add_row(vec![
            Cell::new(&entry.path),
            Cell::new(format!("{}.<index>", entry.template)),
            Cell::new(entry.access.to_string()).fg(color),
        ]);
    }
    table
}
