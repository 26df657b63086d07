//! Configuration for the client generator
//!
//! Sources, lowest precedence first:
//! - Default values
//! - Configuration file (`openrpc-codegen.toml`, or the path in `OCG_CONFIG_FILE`)
//! - Environment variables with the `OCG` prefix, e.g. `OCG__OUTPUT__DIR`
//! - Command line flags, applied by the CLI after loading

use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File};
use openrpc_codegen::{TargetLanguage, Transport};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub const DEFAULT_CONFIG_FILE: &str = "openrpc-codegen.toml";
pub const CONFIG_FILE_ENV: &str = "OCG_CONFIG_FILE";
const ENV_PREFIX: &str = "OCG";

/// Main configuration struct for the generator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub output: OutputConfig,
    pub generate: GenerateConfig,
    pub tools: ToolsConfig,
    pub logging: LoggingConfig,

    /// Configuration file the settings were read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory; each language gets `<dir>/<language>/<package>`
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    #[serde(default = "default_languages")]
    pub languages: Vec<TargetLanguage>,

    #[serde(default = "default_transports")]
    pub transports: Vec<Transport>,

    /// Default endpoint baked into generated clients
    #[serde(default)]
    pub client_url: Option<String>,
}

/// External formatters and package builds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    #[serde(default = "default_true")]
    pub format: bool,

    #[serde(default)]
    pub build: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (pretty, compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./generated")
}

fn default_languages() -> Vec<TargetLanguage> {
    TargetLanguage::ALL.to_vec()
}

fn default_transports() -> Vec<Transport> {
    vec![Transport::Http]
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            transports: default_transports(),
            client_url: None,
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            format: true,
            build: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Settings {
    /// Load settings from an optional file and the environment.
    ///
    /// An explicit `config_file` must exist; the default file is only read when present.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        let source = match config_file {
            Some(path) => {
                builder = builder.add_source(File::from(path).required(true));
                Some(path.to_path_buf())
            }
            None => {
                let path = std::env::var(CONFIG_FILE_ENV)
                    .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
                if Path::new(&path).exists() {
                    builder = builder.add_source(File::with_name(&path));
                    Some(PathBuf::from(path))
                } else {
                    None
                }
            }
        };

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__") // OCG__OUTPUT__DIR
                .list_separator(",")
                .with_list_parse_key("generate.languages")
                .with_list_parse_key("generate.transports")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;
        let mut settings: Settings = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        settings.source = source;

        settings.validate()?;
        Ok(settings)
    }

    /// Log where the settings came from; call once logging is initialised
    pub fn log_source(&self) {
        match &self.source {
            Some(path) => info!("Loaded configuration from {}", path.display()),
            None => debug!("No config file found, using defaults"),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.output.dir.as_os_str().is_empty() {
            anyhow::bail!("Output directory cannot be empty");
        }

        if self.generate.languages.is_empty() {
            anyhow::bail!("At least one target language must be configured");
        }

        if self.generate.transports.is_empty() {
            anyhow::bail!("At least one transport must be configured");
        }

        if let Some(url) = &self.generate.client_url {
            let schemes = ["http://", "https://", "ws://", "wss://"];
            if !schemes.iter().any(|scheme| url.starts_with(scheme)) {
                anyhow::bail!("Client URL '{}' must start with one of {:?}", url, schemes);
            }
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        let level_lower = self.logging.level.to_lowercase();
        if !self.logging.is_filter_directive() && !valid_levels.contains(&level_lower.as_str()) {
            anyhow::bail!(
                "Invalid log level '{}'. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            );
        }

        let valid_formats = ["pretty", "compact"];
        let format_lower = self.logging.format.to_lowercase();
        if !valid_formats.contains(&format_lower.as_str()) {
            anyhow::bail!(
                "Invalid log format '{}'. Must be one of: {:?}",
                self.logging.format,
                valid_formats
            );
        }

        Ok(())
    }
}

impl LoggingConfig {
    fn is_filter_directive(&self) -> bool {
        self.level.contains('=') || self.level.contains(',')
    }

    /// Get the log filter string for tracing
    pub fn filter(&self) -> String {
        if self.is_filter_directive() {
            self.level.clone()
        } else {
            format!(
                "openrpc_client_generator={level},openrpc_codegen={level},warn",
                level = self.level
            )
        }
    }
}

/// Install the global subscriber; `RUST_LOG` wins over the configured level.
///
/// Logs go to stderr so generated output and summaries stay on stdout.
pub fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(logging.filter()));
    let registry = tracing_subscriber::registry().with(filter);

    let result = if logging.format.eq_ignore_ascii_case("compact") {
        registry
            .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init()
    };

    if let Err(e) = result {
        debug!("Logging already initialised: {}", e);
    }
}
