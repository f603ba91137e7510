use std::fs;
use std::path::{Path, PathBuf};

use crate::crypto::{self, KdfParams};
use crate::models::AppData;

const DATA_FILE: &str = "data.bienestar";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("crypto error: {0}")]
    Crypto(#[from] crypto::CryptoError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The encrypted data file inside a data directory.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
    kdf: KdfParams,
}

impl Storage {
    pub fn new(data_dir: &Path, kdf: KdfParams) -> Self {
        Self {
            path: data_dir.join(DATA_FILE),
            kdf,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if a data file exists (i.e., the tracker has been set up).
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Save app data encrypted with the given passphrase.
    /// Writes a sibling temp file first so a crash never leaves a torn file.
    pub fn save(&self, passphrase: &str, data: &AppData) -> Result<(), StorageError> {
        let json = zeroize::Zeroizing::new(serde_json::to_vec(data)?);
        let sealed = crypto::seal(passphrase, &json, &self.kdf)?;

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, sealed)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "saved data file");
        Ok(())
    }

    /// Load and decrypt app data with the given passphrase.
    pub fn load(&self, passphrase: &str) -> Result<AppData, StorageError> {
        let sealed = fs::read(&self.path)?;
        let json = crypto::open(passphrase, &sealed)?;
        let data: AppData = serde_json::from_slice(&json)?;
        tracing::debug!(logs = data.cycle_logs.len(), "loaded data file");
        Ok(data)
    }

    /// Delete all data permanently.
    pub fn wipe(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            tracing::info!(path = %self.path.display(), "wiped data file");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{CryptoError, TEST_KDF};

    #[test]
    fn save_load_wipe() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path(), TEST_KDF);
        assert!(!storage.exists());

        let mut data = AppData::default();
        data.settings.show_fertility = true;
        storage.save("pass", &data).unwrap();
        assert!(storage.exists());
        assert!(!storage.path().with_extension("tmp").exists());

        let loaded = storage.load("pass").unwrap();
        assert!(loaded.settings.show_fertility);

        storage.wipe().unwrap();
        assert!(!storage.exists());
    }

    #[test]
    fn wrong_passphrase_is_crypto_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path(), TEST_KDF);
        storage.save("right", &AppData::default()).unwrap();

        let err = storage.load("wrong").unwrap_err();
        assert!(matches!(err, StorageError::Crypto(CryptoError::Decryption)));
    }

    #[test]
    fn creates_missing_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = Storage::new(&nested, TEST_KDF);
        storage.save("pass", &AppData::default()).unwrap();
        assert!(nested.join(DATA_FILE).exists());
    }
}
