use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{DashboardError, Result};
use crate::labels::Locale;
use crate::models::{YearCutoff, YearSelection};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Interactive analytics dashboard over customer purchase tickets
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ticket-dashboard",
    about = "Interactive analytics dashboard over customer purchase tickets",
    version
)]
pub struct Settings {
    /// CSV file with the ticket dataset
    #[arg(long, env = "TICKETS_FILE", default_value = "Clientes_Tickets.csv")]
    pub data_file: PathBuf,

    /// Presentation mode
    #[arg(long, default_value = "tui", value_parser = ["tui", "serve"])]
    pub view: String,

    /// Address the HTTP server binds to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port the HTTP server listens on
    #[arg(long, env = "PORT", default_value = "8050")]
    pub port: u16,

    /// Initial year selection, comma separated (defaults to the latest year)
    #[arg(long)]
    pub years: Option<String>,

    /// Year whose data is only complete up to --cutoff-month
    #[arg(long, default_value = "2023")]
    pub cutoff_year: String,

    /// Last month (1-12) kept for --cutoff-year
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u32).range(1..=12))]
    pub cutoff_month: u32,

    /// Disable the partial-year cutoff
    #[arg(long)]
    pub no_cutoff: bool,

    /// Label language
    #[arg(long, default_value = "es", value_parser = ["es", "en"])]
    pub locale: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.ticket-dashboard/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".ticket-dashboard").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments and merge with last-used params where no explicit
    /// CLI value was provided.
    ///
    /// Nothing is written here; call [`Settings::persist_last_used`] once
    /// logging is up.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        // Build raw ArgMatches so we can query ValueSource.
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return Self::apply_debug(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI and environment always win over persisted values.
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "locale") {
            if let Some(v) = last.locale {
                settings.locale = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "data_file") {
            if let Some(v) = last.data_file {
                settings.data_file = v;
            }
        }

        Self::apply_debug(settings)
    }

    /// Save theme, locale, view and data file for the next run.
    pub fn persist_last_used(&self) -> Result<()> {
        self.persist_last_used_to(&LastUsedParams::config_path())
    }

    /// Same as [`Settings::persist_last_used`] with an explicit path.
    ///
    /// Does nothing after `--clear`.
    pub fn persist_last_used_to(&self, config_path: &std::path::Path) -> Result<()> {
        if self.clear {
            return Ok(());
        }
        LastUsedParams::from(self).save_to(config_path)?;
        Ok(())
    }

    /// `--debug` overrides the log level.
    fn apply_debug(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Cutoff rule for the partial year, or `None` with `--no-cutoff`.
    pub fn cutoff(&self) -> Option<YearCutoff> {
        if self.no_cutoff {
            None
        } else {
            Some(YearCutoff::new(self.cutoff_year.trim(), self.cutoff_month))
        }
    }

    /// Parsed label locale.
    pub fn locale(&self) -> Result<Locale> {
        self.locale.parse()
    }

    /// Initial year selection given with `--years`, if any.
    pub fn initial_years(&self) -> Result<Option<YearSelection>> {
        match self.years.as_deref() {
            None => Ok(None),
            Some(list) => {
                let selection = YearSelection::parse_list(list)?;
                if selection.is_empty() {
                    return Err(DashboardError::Config(
                        "--years must name at least one year".to_string(),
                    ));
                }
                Ok(Some(selection))
            }
        }
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            theme: Some(s.theme.clone()),
            locale: Some(s.locale.clone()),
            view: Some(s.view.clone()),
            data_file: Some(s.data_file.clone()),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// or through its environment variable.
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(clap::parser::ValueSource::CommandLine) | Some(clap::parser::ValueSource::EnvVariable)
    )
}

// ── Tests ──────────────────────────────────────────────────────────────────────
