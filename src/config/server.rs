//! Server configuration read by the `pov_server` binary.
use crate::alignment::EngineKind;
use crate::error::{Error, Result};
use crate::pov::DEFAULT_WORK_WIDTH;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// `host:port` to listen on.
    pub listen: String,
    pub learning_settings: PathBuf,
    pub repository_dir: PathBuf,
    #[serde(default = "default_work_width")]
    pub work_width: usize,
    #[serde(default)]
    pub engine: EngineKind,
    /// When set, recognition frames are recorded here.
    #[serde(default)]
    pub demo_dir: Option<PathBuf>,
}

fn default_work_width() -> usize {
    DEFAULT_WORK_WIDTH
}

/// Load the server config; relative paths inside it are resolved against the
/// config file's directory.
pub fn load_config(path: &Path) -> Result<ServerConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config {}: {e}", path.display())))?;
    let mut config: ServerConfig = serde_json::from_str(&contents)
        .map_err(|e| Error::Config(format!("Failed to parse config {}: {e}", path.display())))?;
    if config.work_width == 0 {
        return Err(Error::Config("work_width must be positive".to_string()));
    }

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    config.learning_settings = base.join(&config.learning_settings);
    config.repository_dir = base.join(&config.repository_dir);
    config.demo_dir = config.demo_dir.map(|dir| base.join(dir));
    Ok(config)
}
