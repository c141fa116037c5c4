/// Configuration management for the lineage engine
use crate::lineage::sink::{ConsoleSink, DiscardSink, FileSink, PathSink, Tee};
use crate::types::LineageNode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineageConfig {
    #[serde(default)]
    pub graph: GraphSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSettings {
    /// Reject edges that would give a node a second parent.
    #[serde(default)]
    pub strict_single_parent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// File each completed path is appended to.
    #[serde(default)]
    pub path_log: Option<PathBuf>,
    #[serde(default = "default_echo")]
    pub echo_to_console: bool,
    #[serde(default = "default_report_format")]
    pub report_format: String,
}

fn default_echo() -> bool {
    true
}

fn default_report_format() -> String {
    "text".to_string()
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            path_log: None,
            echo_to_console: default_echo(),
            report_format: default_report_format(),
        }
    }
}

const REPORT_FORMATS: [&str; 3] = ["text", "json", "markdown"];

impl OutputSettings {
    /// Build the sink described by these settings.
    ///
    /// Console and file output may both be enabled, in which case every path
    /// is printed and appended. With neither, paths are discarded.
    pub fn open_sink<N: LineageNode + 'static>(&self) -> Result<Box<dyn PathSink<N>>> {
        let file = match &self.path_log {
            Some(path) => Some(
                FileSink::open(path)
                    .with_context(|| format!("Failed to open path log: {:?}", path))?,
            ),
            None => None,
        };

        let sink: Box<dyn PathSink<N>> = match (self.echo_to_console, file) {
            (true, Some(file)) => Box::new(Tee::new(ConsoleSink, file)),
            (true, None) => Box::new(ConsoleSink),
            (false, Some(file)) => Box::new(file),
            (false, None) => Box::new(DiscardSink),
        };
        Ok(sink)
    }
}

impl LineageConfig {
    /// Load configuration from file
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: LineageConfig =
            serde_yaml::from_str(&content).with_context(|| "Failed to parse configuration file")?;
        info!("Loaded configuration from: {:?}", path);
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// Load configuration from environment variables
    pub fn load_from_env() -> Result<Self> {
        let mut config = LineageConfig::default();

        if let Ok(path_log) = std::env::var("LINEAGE_PATH_LOG") {
            config.output.path_log = Some(PathBuf::from(path_log));
        }

        if let Ok(echo) = std::env::var("LINEAGE_ECHO_PATHS") {
            config.output.echo_to_console = echo
                .parse()
                .with_context(|| format!("Invalid LINEAGE_ECHO_PATHS value: {}", echo))?;
        }

        if let Ok(strict) = std::env::var("LINEAGE_STRICT_SINGLE_PARENT") {
            config.graph.strict_single_parent = strict.parse().with_context(|| {
                format!("Invalid LINEAGE_STRICT_SINGLE_PARENT value: {}", strict)
            })?;
        }

        if let Ok(format) = std::env::var("LINEAGE_REPORT_FORMAT") {
            config.output.report_format = format;
        }

        Ok(config)
    }

    /// Merge with another configuration (other takes precedence)
    pub fn merge_with(&mut self, other: LineageConfig) {
        if other.graph.strict_single_parent {
            self.graph.strict_single_parent = true;
        }

        if other.output.path_log.is_some() {
            self.output.path_log = other.output.path_log;
        }
        if !other.output.echo_to_console {
            self.output.echo_to_console = false;
        }
        if other.output.report_format != default_report_format() {
            self.output.report_format = other.output.report_format;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let format = self.output.report_format.to_lowercase();
        if !REPORT_FORMATS.contains(&format.as_str()) {
            return Err(anyhow::anyhow!(
                "Unsupported report format '{}', expected one of {:?}",
                self.output.report_format,
                REPORT_FORMATS
            ));
        }

        if let Some(path) = &self.output.path_log {
            if path.as_os_str().is_empty() {
                return Err(anyhow::anyhow!("Path log location must not be empty"));
            }
            if path.is_dir() {
                return Err(anyhow::anyhow!("Path log location is a directory: {:?}", path));
            }
        }

        Ok(())
    }
}
