//! Store snapshot persistence layer

use crate::store::{MultisigStore, StoreSnapshot};
use std::fs;
use std::io::{self, BufReader, BufWriter};
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: std::path::PathBuf,
    pub store_file: String,
    pub backup_enabled: bool,
    pub max_backups: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: std::path::PathBuf::from(".multisig_data"),
            store_file: "multisig.json".to_string(),
            backup_enabled: true,
            max_backups: 5,
        }
    }
}

/// Multisig store persistence manager
pub struct Storage {
    config: StorageConfig,
}

impl Storage {
    /// Create a new storage manager
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.data_dir)?;
        Ok(Self { config })
    }

    /// Create with default configuration
    pub fn with_defaults() -> Result<Self, StorageError> {
        Self::new(StorageConfig::default())
    }

    /// Get the store file path
    fn store_path(&self) -> std::path::PathBuf {
        self.config.data_dir.join(&self.config.store_file)
    }

    /// Get a backup file path
    fn backup_path(&self, index: usize) -> std::path::PathBuf {
        self.config
            .data_dir
            .join(format!("{}.backup.{}", self.config.store_file, index))
    }

    /// Save a store snapshot to disk
    pub fn save(&self, store: &MultisigStore) -> Result<(), StorageError> {
        let path = self.store_path();

        // Create backup if enabled
        if self.config.backup_enabled && path.exists() {
            self.rotate_backups()?;
            fs::copy(&path, self.backup_path(0))?;
        }

        // Write to temporary file first
        let temp_path = self.config.data_dir.join("multisig.tmp");
        let file = fs::File::create(&temp_path)?;
        let writer = BufWriter::new(file);

        serde_json::to_writer_pretty(writer, &store.snapshot())?;

        // Atomic rename
        fs::rename(&temp_path, &path)?;

        Ok(())
    }

    /// Load the store from disk
    pub fn load(&self) -> Result<MultisigStore, StorageError> {
        let path = self.store_path();

        if !path.exists() {
            return Err(StorageError::InvalidData(
                "Store file not found".to_string(),
            ));
        }

        let file = fs::File::open(&path)?;
        let reader = BufReader::new(file);

        let snapshot: StoreSnapshot = serde_json::from_reader(reader)?;
        Ok(MultisigStore::from_snapshot(snapshot))
    }

    /// Check if a saved store exists
    pub fn exists(&self) -> bool {
        self.store_path().exists()
    }

    /// Delete the saved store
    pub fn delete(&self) -> Result<(), StorageError> {
        let path = self.store_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Rotate backup files
    fn rotate_backups(&self) -> Result<(), StorageError> {
        // Delete oldest backup
        let oldest = self.backup_path(self.config.max_backups - 1);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }

        // Shift existing backups
        for i in (0..self.config.max_backups - 1).rev() {
            let current = self.backup_path(i);
            if current.exists() {
                let next = self.backup_path(i + 1);
                fs::rename(&current, &next)?;
            }
        }

        Ok(())
    }

    /// List available backups
    pub fn list_backups(&self) -> Vec<usize> {
        let mut backups = Vec::new();

        for i in 0..self.config.max_backups {
            if self.backup_path(i).exists() {
                backups.push(i);
            }
        }

        backups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Member;
    use crate::crypto::KeyPair;
    use tempfile::TempDir;

    fn storage_in(dir: &TempDir) -> Storage {
        Storage::new(StorageConfig {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        })
        .unwrap()
    }

    fn store_with_one_multisig() -> (MultisigStore, String) {
        let keys: Vec<KeyPair> = (0..2).map(|_| KeyPair::generate()).collect();
        let members: Vec<Member> = keys
            .iter()
            .map(|k| Member::with_all_permissions(k.public_key_hex()))
            .collect();
        let store = MultisigStore::new();
        let config = store.create_multisig("ck", members, 2, None).unwrap();
        (store, config.address)
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        let (store, address) = store_with_one_multisig();

        assert!(!storage.exists());
        storage.save(&store).unwrap();
        assert!(storage.exists());

        let loaded = storage.load().unwrap();
        assert!(loaded.get_config(&address).is_ok());
    }

    #[test]
    fn test_load_missing_store() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        assert!(matches!(
            storage.load(),
            Err(StorageError::InvalidData(_))
        ));
    }

    #[test]
    fn test_backup_rotation() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        let (store, _) = store_with_one_multisig();

        // First save has nothing to back up
        storage.save(&store).unwrap();
        assert!(storage.list_backups().is_empty());

        storage.save(&store).unwrap();
        storage.save(&store).unwrap();
        assert_eq!(storage.list_backups(), vec![0, 1]);
    }

    #[test]
    fn test_delete() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        let (store, _) = store_with_one_multisig();

        storage.save(&store).unwrap();
        storage.delete().unwrap();
        assert!(!storage.exists());
    }
}
