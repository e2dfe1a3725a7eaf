use clap::{Parser, Subcommand};
use tally_core::config::{ConfigOverrides, canonical_key};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: tally add "Water the plants" --category daily
    Add {
        text: Option<String>,
        /// One of daily, monthly, yearly
        #[arg(long)]
        category: Option<String>,
    },
    /// Flip a task between pending and completed
    ///
    /// Example: tally toggle task-1734652800000000000
    Toggle { id: String },
    /// Delete a task
    ///
    /// Example: tally delete task-1734652800000000000
    Delete { id: String },
    /// Show details of a task
    ///
    /// Example: tally show task-1734652800000000000
    Show { id: String },
    /// List all tasks, newest first
    ///
    /// Example: tally list
    List,
    /// Completion statistics
    ///
    /// Example: tally stats
    /// Example: tally stats --window 7 daily
    Stats {
        /// Trailing days for the daily view (7, 14, 30 or 90)
        #[arg(long, short = 'w')]
        window: Option<u32>,
        #[command(subcommand)]
        view: Option<StatsView>,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsView {
    /// Totals, completion tier and most/least productive weekday
    Summary,
    /// One row per day across the window
    Daily,
    /// One row per weekday, Sunday first
    Weekday,
    /// Completed versus pending
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    Window,
    TimeZone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let (key_raw, value_raw) = raw
        .trim()
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let field = canonical_key(key_raw);
    if field.is_empty() {
        return Err("override key cannot be empty".to_string());
    }

    let target = match field.as_str() {
        "theme" => ConfigOverrideTarget::Theme,
        "window" | "default_window" => ConfigOverrideTarget::Window,
        "timezone" | "time_zone" | "tz" => ConfigOverrideTarget::TimeZone,
        other => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride { target, value })
}

/// Fold every `--config-override` into one set; later values win.
pub fn collect_config_overrides(raw: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();

    for entry in raw {
        let parsed = parse_config_override(entry)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::Window => {
                let days = parsed
                    .value
                    .parse::<u32>()
                    .map_err(|_| format!("window override must be a number: '{}'", parsed.value))?;
                overrides.default_window = Some(days);
            }
            ConfigOverrideTarget::TimeZone => overrides.timezone = Some(parsed.value),
        }
    }

    Ok(overrides)
}
