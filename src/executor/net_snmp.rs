use super::{
    Executor,
    RawValue,
    Target,
    Throttle,
};
use crate::{
    error::ExecutorError,
    parameter_id::ParameterId,
};
use modem_stats_config::ExecutorConfig;
use std::{
    path::{
        Path,
        PathBuf,
    },
    process::Command,
    sync::Mutex,
    time::Duration,
};

/// SNMP v2c executor driving the net-snmp `snmpget`/`snmpset` tools.
#[derive(Debug)]
pub struct NetSnmpExecutor {
    snmpget: PathBuf,
    snmpset: PathBuf,
    timeout: Duration,
    retries: u32,
    throttle: Throttle,
    last_error: Mutex<Option<String>>,
}

impl NetSnmpExecutor {
    pub fn new(snmpget: PathBuf, snmpset: PathBuf) -> Self {
        Self {
            snmpget,
            snmpset,
            timeout: Duration::from_secs(2),
            retries: 1,
            throttle: Throttle::default(),
            last_error: Mutex::new(None),
        }
    }

    /// Finds both tools in `PATH`.
    pub fn locate() -> Result<Self, ExecutorError> {
        Ok(Self::new(find_tool("snmpget")?, find_tool("snmpset")?))
    }

    pub fn from_config(config: &ExecutorConfig) -> Result<Self, ExecutorError> {
        let snmpget = match &config.snmpget {
            Some(path) => PathBuf::from(path),
            None => find_tool("snmpget")?,
        };
        let snmpset = match &config.snmpset {
            Some(path) => PathBuf::from(path),
            None => find_tool("snmpset")?,
        };
        let executor = Self::new(snmpget, snmpset)
            .with_timeout(config.timeout())
            .with_retries(config.retries);
        executor.set_delay(config.delay());
        Ok(executor)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    fn common_args(&self, community: &str, target: &Target) -> Vec<String> {
        vec![
            "-v2c".to_string(),
            "-c".to_string(),
            community.to_string(),
            "-t".to_string(),
            format!("{}", self.timeout.as_secs_f64()),
            "-r".to_string(),
            self.retries.to_string(),
            // value only, numeric enums and raw timeticks
            "-Oqvte".to_string(),
            target.to_string(),
        ]
    }

    fn run(&self, tool: &Path, args: Vec<String>, target: &Target) -> Result<RawValue, ExecutorError> {
        self.throttle.wait();
        let output = Command::new(tool).args(&args).output();
        self.throttle.mark();

        let result = output
            .map_err(|err| ExecutorError::Spawn {
                tool: tool.display().to_string(),
                reason: err.to_string(),
            })
            .and_then(|output| {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);
                if stderr.contains("Timeout") {
                    Err(ExecutorError::Timeout {
                        target: target.to_string(),
                    })
                } else if !output.status.success() {
                    Err(ExecutorError::Command {
                        tool: tool.display().to_string(),
                        status: output.status.to_string(),
                        stderr: stderr.trim().to_string(),
                    })
                } else {
                    parse_output(&stdout)
                }
            });

        let mut last_error = self.last_error.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        match &result {
            Ok(value) => trace!(%value, "Request succeeded"),
            Err(err) => {
                debug!(%err, "Request failed");
                *last_error = Some(err.to_string());
            }
        }
        result
    }
}

impl Executor for NetSnmpExecutor {
    #[instrument(level = "trace", skip(self, target), fields(target = %target))]
    fn get(&self, target: &Target, id: &ParameterId) -> Result<RawValue, ExecutorError> {
        let mut args = self.common_args(&target.read_community, target);
        args.push(id.to_string());
        self.run(&self.snmpget, args, target)
    }

    #[instrument(level = "trace", skip(self, target), fields(target = %target))]
    fn set(&self, target: &Target, id: &ParameterId, value: &RawValue) -> Result<RawValue, ExecutorError> {
        let mut args = self.common_args(&target.write_community, target);
        let kind = match value {
            RawValue::Integer(_) => "i",
            RawValue::Text(_) => "s",
        };
        args.extend([id.to_string(), kind.to_string(), value.to_string()]);
        self.run(&self.snmpset, args, target)
    }

    fn set_delay(&self, delay: Duration) {
        self.throttle.set_delay(delay);
    }

    fn delay(&self) -> Duration {
        self.throttle.delay()
    }

    fn last_error(&self) -> Option<String> {
        self.last_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

fn find_tool(name: &str) -> Result<PathBuf, ExecutorError> {
    let path = which::which(name).map_err(|_| ExecutorError::ToolNotFound(name.to_string()))?;
    debug!(?path, "Found {name}");
    Ok(path)
}

/// Interprets the value-only output of `snmpget -Oqvte`.
fn parse_output(stdout: &str) -> Result<RawValue, ExecutorError> {
    let line = stdout.lines().next().unwrap_or_default().trim();
    if line.is_empty() {
        return Err(ExecutorError::Unparseable(stdout.to_string()));
    }
    if line.starts_with("No Such Object") || line.starts_with("No Such Instance") || line.starts_with("No more variables")
    {
        return Err(ExecutorError::NoSuchObject(line.to_string()));
    }
    if let Some(text) = line.strip_prefix('"') {
        // Quoted strings may span several lines.
        let full = stdout.trim().trim_start_matches('"');
        let text = full.strip_suffix('"').unwrap_or(text);
        return Ok(RawValue::Text(text.to_string()));
    }
    match line.parse::<i64>() {
        Ok(value) => Ok(RawValue::Integer(value)),
        Err(_) => Ok(RawValue::Text(line.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_integers_and_counters() {
        assert_eq!(parse_output("4294967290\n"), Ok(RawValue::Integer(4294967290)));
        assert_eq!(parse_output("-42\n"), Ok(RawValue::Integer(-42)));
    }

    #[test]
    fn parses_quoted_strings() {
        assert_eq!(
            parse_output("\"UHP-200 modem\"\n"),
            Ok(RawValue::Text("UHP-200 modem".to_string()))
        );
        assert_eq!(
            parse_output("\"line one\nline two\"\n"),
            Ok(RawValue::Text("line one\nline two".to_string()))
        );
    }

    #[test]
    fn unquoted_non_numbers_are_text() {
        assert_eq!(parse_output("10.0.0.1\n"), Ok(RawValue::Text("10.0.0.1".to_string())));
    }

    #[test]
    fn missing_objects_are_failures() {
        assert!(matches!(
            parse_output("No Such Instance currently exists at this OID\n"),
            Err(ExecutorError::NoSuchObject(_))
        ));
        assert!(matches!(parse_output(""), Err(ExecutorError::Unparseable(_))));
    }

    #[test]
    fn common_args_use_the_right_community() {
        let executor = NetSnmpExecutor::new("snmpget".into(), "snmpset".into())
            .with_timeout(Duration::from_millis(1500))
            .with_retries(3);
        let target = Target::new("10.0.0.1", 161).with_communities("ro", "rw");
        assert_eq!(
            executor.common_args(&target.write_community, &target),
            vec!["-v2c", "-c", "rw", "-t", "1.5", "-r", "3", "-Oqvte", "10.0.0.1:161"]
        );
    }

    #[test]
    fn spawn_failures_are_recorded_as_last_error() {
        let executor = NetSnmpExecutor::new(
            "/nonexistent/modem-stats/snmpget".into(),
            "/nonexistent/modem-stats/snmpset".into(),
        );
        let target = Target::new("127.0.0.1", 161);
        let id: ParameterId = "1.3.6.1.2.1.1.5.0".parse().unwrap();
        assert!(matches!(executor.get(&target, &id), Err(ExecutorError::Spawn { .. })));
        assert!(executor.last_error().is_some());
    }
}
