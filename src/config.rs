/*!
 * Configuration handling for bulkpaste
 *
 * Two sources feed the run: command-line arguments and a `config.txt` file of
 * `key|value` lines sitting next to the executable.
 */

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use log::warn;

use crate::aggregator::Template;
use crate::classifier::decode_text;
use crate::error::Result;
use crate::pattern::IgnoreSet;
use crate::{bail, ensure};

/// Name of the settings file looked up next to the executable
pub const CONFIG_FILE_NAME: &str = "config.txt";

pub const DEFAULT_PREPASTE: &str = "(This is the contents of the file <FILEPATH>/<FILENAME>)<CR><CR>";
pub const DEFAULT_POSTPASTE: &str = "<CR><CR>(END OF <FILEPATH>/<FILENAME>)<CR>";

/// Longest accepted `--pause-ms`
pub const MAX_PAUSE_MS: u64 = 60_000;

/// Command-line arguments for bulkpaste
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    name = "bulkpaste",
    version = env!("CARGO_PKG_VERSION"),
    about = "Copy the contents of text files (or all files in directories) to the clipboard",
    long_about = "Collects every text file under the given files and directories, wraps each one with the configured pre/post messages and places the combined text on the system clipboard."
)]
pub struct Args {
    /// Files or directories to copy
    pub paths: Vec<String>,

    /// Path to the key|value settings file (default: config.txt next to the executable)
    #[clap(long, value_name = "FILE")]
    pub config: Option<String>,

    /// Comma-separated list of extra wildcard patterns to ignore
    #[clap(long, value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Do not print the summary table
    #[clap(long)]
    pub no_report: bool,

    /// Milliseconds to wait before exiting, so the console stays readable
    #[clap(long, default_value = "0", value_name = "MS")]
    pub pause_ms: u64,
}

/// Options loaded from the `key|value` settings file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    values: HashMap<String, String>,
    found: bool,
}

impl Settings {
    /// Parse settings text. Lines without exactly one `|` are ignored.
    pub fn parse(content: &str) -> Self {
        let mut values = HashMap::new();

        for line in content.lines() {
            let parts: Vec<&str> = line.split('|').collect();
            if let [key, value] = parts.as_slice() {
                values.insert(key.trim().to_lowercase(), value.trim().to_string());
            }
        }

        Self {
            values,
            found: true,
        }
    }

    /// Load settings from `path`; a missing file yields empty settings
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }

        let bytes = fs::read(path)?;
        Ok(Self::parse(&decode_text(&bytes)))
    }

    /// Whether a settings file was actually read
    pub fn found(&self) -> bool {
        self.found
    }

    /// Look up an option, ignoring key case
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_lowercase()).map(String::as_str)
    }

    /// Default settings location: next to the running executable
    pub fn default_location() -> PathBuf {
        env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Paths given on the command line
    pub inputs: Vec<String>,

    /// Header written before each file
    pub pre_template: Template,

    /// Footer written after each file
    pub post_template: Template,

    /// Wildcards matched against bare file and directory names
    pub ignore: IgnoreSet,

    /// Settings file that was consulted
    pub config_path: PathBuf,

    /// Whether the settings file existed
    pub config_found: bool,

    /// Print the summary table at the end
    pub show_report: bool,

    /// Delay before exiting
    pub pause: Duration,
}

impl Config {
    /// Create configuration from command-line arguments and the settings file
    pub fn from_args(args: Args) -> Result<Self> {
        let explicit = args.config.is_some();
        let config_path = args
            .config
            .map(PathBuf::from)
            .unwrap_or_else(Settings::default_location);

        if explicit && !config_path.is_file() {
            bail!(Config, "Settings file not found: {}", config_path.display());
        }

        let settings = Settings::load(&config_path)?;
        let mut config = Self::from_settings(&settings, args.paths);
        config.config_path = config_path;
        if let Some(message) = config.missing_settings_warning() {
            warn!("{}", message);
        }
        config.ignore.extend(args.ignore);
        config.show_report = !args.no_report;
        config.pause = Duration::from_millis(args.pause_ms);

        Ok(config)
    }

    /// Build configuration from loaded settings, falling back to default templates
    pub fn from_settings(settings: &Settings, inputs: Vec<String>) -> Self {
        let (pre, post) = if settings.found() {
            (
                settings.get("prepaste_message").unwrap_or_default(),
                settings.get("postpaste_message").unwrap_or_default(),
            )
        } else {
            (DEFAULT_PREPASTE, DEFAULT_POSTPASTE)
        };

        let ignore = settings
            .get("ignore_patterns")
            .map(IgnoreSet::from_whitespace_list)
            .unwrap_or_default();

        Self {
            inputs,
            pre_template: Template::new(pre),
            post_template: Template::new(post),
            ignore,
            config_path: PathBuf::from(CONFIG_FILE_NAME),
            config_found: settings.found(),
            show_report: true,
            pause: Duration::ZERO,
        }
    }

    /// Warning to show when no settings file was read
    pub fn missing_settings_warning(&self) -> Option<String> {
        if self.config_found {
            return None;
        }

        Some(format!(
            "Warning: {} not found. Using default pre/post messages.",
            self.config_path.display()
        ))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.inputs.is_empty(),
            InvalidArgument,
            "at least one file or directory is required"
        );

        ensure!(
            self.pause <= Duration::from_millis(MAX_PAUSE_MS),
            InvalidArgument,
            "--pause-ms must be at most {}",
            MAX_PAUSE_MS
        );

        Ok(())
    }
}
