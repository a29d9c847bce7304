// Command line options and logger setup.

use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "slack-status",
    version,
    about = "Set your Slack status by hand or from saved templates"
)]
pub struct Cli {
    /// Config file holding the Slack access token.
    #[arg(long, value_name = "PATH", env = "SLACK_STATUS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Templates file.
    #[arg(long, value_name = "PATH", env = "SLACK_STATUS_TEMPLATES")]
    pub templates: Option<PathBuf>,

    /// Increase logging verbosity (stackable).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Turn logging off.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Off;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Log to stderr. `RUST_LOG` is honoured for per-module filters, the
    /// flags set the overall level.
    pub fn init_logging(&self) {
        let mut builder =
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
        builder.filter_level(self.log_level());
        if let Err(err) = builder.try_init() {
            eprintln!("logger already initialized: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_flags_map_to_levels() {
        let parse = |args: &[&str]| Cli::try_parse_from(args).unwrap().log_level();
        assert_eq!(parse(&["slack-status"]), LevelFilter::Warn);
        assert_eq!(parse(&["slack-status", "-v"]), LevelFilter::Info);
        assert_eq!(parse(&["slack-status", "-vv"]), LevelFilter::Debug);
        assert_eq!(parse(&["slack-status", "-vvvv"]), LevelFilter::Trace);
        assert_eq!(parse(&["slack-status", "--quiet"]), LevelFilter::Off);
    }

    #[test]
    fn file_overrides_are_parsed() {
        let cli = Cli::try_parse_from([
            "slack-status",
            "--config",
            "/etc/slack/config.json",
            "--templates",
            "t.json",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/slack/config.json")));
        assert_eq!(cli.templates, Some(PathBuf::from("t.json")));
    }
}
