//! Command-line interface using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format (default).
    #[default]
    Text,
    /// Structured JSON format for log aggregation.
    Json,
}

/// Check notification receiver configuration.
#[derive(Parser, Debug)]
#[command(name = "receiver-config")]
#[command(version)]
#[command(about = "Decode and validate alert notification receivers")]
pub struct Cli {
    /// Path to configuration file.
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Print the validated receivers, with defaults applied, as YAML.
    #[arg(long = "dump")]
    pub dump: bool,

    /// Log format: text or json.
    #[arg(long = "log-format", value_enum, default_value_t = LogFormat::Text, env = "LOG_FORMAT")]
    pub log_format: LogFormat,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("receiver-config").chain(args.iter().copied()))
    }

    #[test]
    #[serial]
    fn no_arguments_checks_default_path_as_text() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert!(!cli.dump);
        assert!(matches!(cli.log_format, LogFormat::Text));
    }

    #[test]
    fn short_and_long_config_options_agree() {
        for flag in ["-c", "--config"] {
            let cli = parse(&[flag, "/srv/am/alertmanager.yml"]).unwrap();
            assert_eq!(cli.config, PathBuf::from("/srv/am/alertmanager.yml"), "{}", flag);
        }
    }

    #[test]
    fn dump_combines_with_other_options() {
        let cli = parse(&["--dump", "--log-format", "json", "-c", "am.yml"]).unwrap();
        assert!(cli.dump);
        assert!(matches!(cli.log_format, LogFormat::Json));
        assert_eq!(cli.config, PathBuf::from("am.yml"));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        assert!(parse(&["--log-format", "yaml"]).is_err());
    }

    #[test]
    #[serial]
    fn log_format_env_is_used_unless_flag_given() {
        // SAFETY: #[serial] keeps other env-reading tests from running concurrently
        unsafe { std::env::set_var("LOG_FORMAT", "json") };

        let from_env = parse(&[]).map(|cli| cli.log_format);
        let from_flag = parse(&["--log-format", "text"]).map(|cli| cli.log_format);

        unsafe { std::env::remove_var("LOG_FORMAT") };

        assert!(matches!(from_env, Ok(LogFormat::Json)));
        assert!(matches!(from_flag, Ok(LogFormat::Text)));
    }
}
