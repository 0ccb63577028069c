use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::Level;

use crate::geometry::PreferredPosition;

#[derive(Parser, Debug)]
#[command(
    name = "term-popover",
    version = env!("CARGO_PKG_VERSION"),
    about = "Guided tour demo: anchored popovers with focus trapping and scroll locking"
)]
pub struct Cli {
    /// Side of the target the first tour step prefers; later steps cycle through the rest.
    #[arg(
        short = 'p',
        long = "position",
        value_name = "POSITION",
        default_value_t = PreferredPosition::BottomCenter
    )]
    pub position: PreferredPosition,

    /// Keep the tour target at its normal stacking order and skip the dimmed backdrop.
    #[arg(long = "no-backdrop")]
    pub no_backdrop: bool,

    /// Idle tick in milliseconds. Timers and frames are applied once per tick.
    #[arg(long = "tick-ms", value_name = "MS", default_value_t = 16)]
    pub tick_ms: u64,

    /// Append diagnostics to this file. Without it, logs are discarded.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[arg(long = "log-level", value_name = "LEVEL", default_value_t = Level::INFO)]
    pub log_level: Level,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub position: PreferredPosition,
    pub show_backdrop: bool,
    pub tick: Duration,
    pub log_file: Option<PathBuf>,
    pub log_level: Level,
}

impl TryFrom<Cli> for Config {
    type Error = String;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        if !(1..=1000).contains(&cli.tick_ms) {
            return Err("tick-ms must be between 1 and 1000".to_string());
        }
        Ok(Self {
            position: cli.position,
            show_backdrop: !cli.no_backdrop,
            tick: Duration::from_millis(cli.tick_ms),
            log_file: cli.log_file,
            log_level: cli.log_level,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            position: PreferredPosition::default(),
            show_backdrop: true,
            tick: Duration::from_millis(16),
            log_file: None,
            log_level: Level::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, String> {
        let cli = Cli::try_parse_from(args).map_err(|err| err.to_string())?;
        Config::try_from(cli)
    }

    #[test]
    fn defaults_match_config_default() {
        let parsed = parse(&["term-popover"]).unwrap();
        let default = Config::default();
        assert_eq!(parsed.position, default.position);
        assert_eq!(parsed.show_backdrop, default.show_backdrop);
        assert_eq!(parsed.tick, default.tick);
        assert_eq!(parsed.log_file, None);
        assert_eq!(parsed.log_level, Level::INFO);
    }

    #[test]
    fn flags_are_applied() {
        let parsed = parse(&[
            "term-popover",
            "--position",
            "left-center",
            "--no-backdrop",
            "--tick-ms",
            "50",
            "--log-file",
            "/tmp/popover.log",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(parsed.position, PreferredPosition::LeftCenter);
        assert!(!parsed.show_backdrop);
        assert_eq!(parsed.tick, Duration::from_millis(50));
        assert_eq!(parsed.log_file, Some(PathBuf::from("/tmp/popover.log")));
        assert_eq!(parsed.log_level, Level::DEBUG);
    }

    #[test]
    fn unknown_position_is_rejected() {
        let err = parse(&["term-popover", "--position", "diagonal"]).unwrap_err();
        assert!(err.contains("diagonal"), "{err}");
    }

    #[test]
    fn tick_out_of_range_is_rejected() {
        assert!(parse(&["term-popover", "--tick-ms", "0"]).is_err());
        assert!(parse(&["term-popover", "--tick-ms", "5000"]).is_err());
    }
}
