use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::crypto::KdfParams;

const APP_DIR: &str = "bienestar";
const ENV_PREFIX: &str = "BIENESTAR";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Load(#[from] ::config::ConfigError),
    #[error("no data directory available on this platform, set data_dir")]
    NoDataDir,
}

/// Process-level settings. User preferences live in the encrypted data file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    pub log_window_days: u32,
    pub kdf_memory_kib: u32,
    pub kdf_iterations: u32,
    pub kdf_parallelism: u32,
}

impl Default for Config {
    fn default() -> Self {
        let kdf = KdfParams::default();
        Self {
            data_dir: None,
            log_window_days: 180,
            kdf_memory_kib: kdf.memory_kib,
            kdf_iterations: kdf.iterations,
            kdf_parallelism: kdf.parallelism,
        }
    }
}

impl Config {
    /// Layer the optional TOML file under `BIENESTAR_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).or_else(default_config_path);

        let mut builder = ::config::Config::builder();
        if let Some(path) = &path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }
        let settings = builder
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let cfg: Config = settings.try_deserialize()?;
        tracing::debug!(?cfg, "configuration loaded");
        Ok(cfg)
    }

    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_local_dir()
                .map(|d| d.join(APP_DIR))
                .ok_or(ConfigError::NoDataDir),
        }
    }

    pub fn kdf(&self) -> KdfParams {
        KdfParams {
            memory_kib: self.kdf_memory_kib,
            iterations: self.kdf_iterations,
            parallelism: self.kdf_parallelism,
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    // tests touching BIENESTAR_* variables run one at a time
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[test]
    fn missing_file_uses_defaults() {
        let _env = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(cfg.log_window_days, 180);
        assert_eq!(cfg.kdf(), KdfParams::default());
    }

    #[test]
    fn reads_toml_file() {
        let _env = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "data_dir = \"/tmp/bienestar-test\"\nlog_window_days = 90\n",
        )
        .unwrap();

        let cfg = Config::load(Some(&path)).unwrap();
        assert_eq!(cfg.log_window_days, 90);
        assert_eq!(cfg.data_dir().unwrap(), PathBuf::from("/tmp/bienestar-test"));
        assert_eq!(cfg.kdf_iterations, 3);
    }

    #[test]
    fn environment_overrides_file() {
        let _env = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "log_window_days = 90\nkdf_iterations = 4\n").unwrap();

        std::env::set_var("BIENESTAR_LOG_WINDOW_DAYS", "30");
        let cfg = Config::load(Some(&path));
        std::env::remove_var("BIENESTAR_LOG_WINDOW_DAYS");

        let cfg = cfg.unwrap();
        assert_eq!(cfg.log_window_days, 30);
        assert_eq!(cfg.kdf_iterations, 4);
    }
}
