use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use daybook_shared::DateKey;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        let key = k.trim();
        if key.is_empty() {
            return Err(anyhow!("empty key in override: {s}"));
        }
        Ok(Self {
            key: key.to_string(),
            value: v.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "daybook",
    version,
    about = "Daybook: this month's calendar with a task list per day",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Override a config key, e.g. `--rc color=off`.
    #[arg(
        long = "rc",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append,
        global = true
    )]
    pub rc_overrides: Vec<KeyVal>,

    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[arg(long = "data", global = true)]
    pub data: Option<PathBuf>,

    /// Pretend today is this date (YYYY-MM-DD).
    #[arg(long = "today", value_parser = parse_today, global = true)]
    pub today: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Default, PartialEq, Eq)]
pub enum Command {
    /// Show the month grid.
    #[default]
    Month,
    /// List the tasks of one day.
    List { day: String },
    /// Append a task to a day.
    Add {
        day: String,
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Replace the task at INDEX.
    Edit {
        day: String,
        index: usize,
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Remove the task at INDEX.
    Delete { day: String, index: usize },
    /// Print the stored task map as JSON.
    Export,
}

fn parse_today(raw: &str) -> anyhow::Result<NaiveDate> {
    Ok(DateKey::parse(raw)?.date())
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = match (quiet, verbose) {
        (q, _) if q >= 2 => "error",
        (1, _) => "warn",
        (_, v) if v >= 3 => "trace",
        (_, 2) => "debug",
        (_, 1) => "info",
        _ => "warn",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> GlobalCli {
        GlobalCli::try_parse_from(args.iter().copied()).expect("valid arguments")
    }

    #[test]
    fn bare_invocation_defaults_to_month() {
        let cli = parse(&["daybook"]);
        assert_eq!(cli.command.unwrap_or_default(), Command::Month);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn add_collects_the_remaining_words() {
        let cli = parse(&["daybook", "add", "10", "Buy", "oat", "milk"]);
        assert_eq!(
            cli.command,
            Some(Command::Add {
                day: "10".to_string(),
                text: vec!["Buy".into(), "oat".into(), "milk".into()],
            })
        );
    }

    #[test]
    fn global_flags_after_the_subcommand() {
        let cli = parse(&[
            "daybook",
            "list",
            "2024-05-10",
            "--today",
            "2024-05-15",
            "--rc",
            "color=off",
            "-vv",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2024, 5, 15));
        assert_eq!(
            cli.rc_overrides,
            vec![KeyVal {
                key: "color".into(),
                value: "off".into()
            }]
        );
    }

    #[test]
    fn rejects_malformed_today_and_overrides() {
        assert!(GlobalCli::try_parse_from(["daybook", "--today", "15/05/2024"]).is_err());
        assert!(GlobalCli::try_parse_from(["daybook", "--rc", "color"]).is_err());
        assert!(GlobalCli::try_parse_from(["daybook", "add", "10"]).is_err());
    }
}
