use std::{
    fs::{self, OpenOptions, rename, write},
    path::{Path, PathBuf},
};

use fs2::FileExt;
use serde_json::to_string_pretty;
use uuid::Uuid;

use crate::{
    models::store::Store,
    storage::{Storage, StorageError},
};

pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn create_backup_dir(&self) -> Result<(), StorageError> {
        let backups_dir = self.get_backup_dir();
        fs::create_dir(&backups_dir).map_err(|e| StorageError::BackupFailed {
            path: backups_dir,
            source: e,
        })?;
        Ok(())
    }

    fn create_backup(&self) -> Result<u64, StorageError> {
        let file_exists = fs::exists(&self.path).map_err(|e| StorageError::BackupFailed {
            path: self.path.clone(),
            source: e,
        })?;
        if !file_exists {
            return Ok(0);
        }

        let backup_path = self.get_backup_path();
        let copy_result = fs::copy(&self.path, &backup_path);
        match copy_result {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.create_backup_dir()?;
                self.create_backup()
            }
            Err(e) => Err(StorageError::BackupFailed {
                path: backup_path,
                source: e,
            }),
            Ok(bytes) => Ok(bytes),
        }
    }

    fn cleanup_old_backups(&self) -> Result<(), StorageError> {
        let backup_dir = self.get_backup_dir();
        let backup_dir_exists =
            fs::exists(&backup_dir).map_err(|e| StorageError::CleanupFailed {
                dir: backup_dir.clone(),
                source: e,
            })?;
        if !backup_dir_exists {
            return Ok(());
        }

        let mut file_entries = fs::read_dir(&backup_dir)
            .map_err(|e| StorageError::CleanupFailed {
                dir: backup_dir.clone(),
                source: e,
            })?
            .flatten()
            .filter(|entry| entry.metadata().map(|m| m.is_file()).unwrap_or(false))
            .map(|entry| entry.path())
            .collect::<Vec<_>>();

        file_entries.sort();

        let number_of_files_to_delete = match file_entries.len() {
            x if x > 5 => x - 5,
            _ => 0,
        };

        if number_of_files_to_delete == 0 {
            return Ok(());
        }

        for file_path in &file_entries[0..number_of_files_to_delete] {
            fs::remove_file(file_path).map_err(|e| StorageError::CleanupFailed {
                dir: backup_dir.clone(),
                source: e,
            })?;
        }

        Ok(())
    }

    fn get_backup_dir(&self) -> PathBuf {
        let parent_store_path = self.path.parent().unwrap_or(Path::new("."));
        parent_store_path.join("backups")
    }

    fn get_backup_path(&self) -> PathBuf {
        let backups_dir = self.get_backup_dir();

        let timestamp = jiff::Timestamp::now().to_string();
        let filename = format!("{:?}-{}", self.path.file_name(), timestamp);

        backups_dir.join(filename)
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<Store, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str::<Store>(&content) {
                Ok(store) => Ok(store),
                // Corrupt content must not take the whole tool down: warn
                // and start over from the seed snapshot.
                Err(e) => {
                    eprintln!(
                        "Warning: could not parse '{}' ({}), starting fresh",
                        self.path.display(),
                        e
                    );
                    Ok(Store::default())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Store::default()),
            Err(e) => Err(StorageError::LoadFailed {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn save(&self, store: &Store) -> Result<(), StorageError> {
        let json =
            to_string_pretty(store).map_err(|e| StorageError::SerializeFailed { source: e })?;

        let unique_temp = format!("{}.tmp.{}", self.path.display(), Uuid::new_v4());
        let temp_path = PathBuf::from(&unique_temp);
        write(&temp_path, json).map_err(|e| StorageError::SaveFailed {
            path: temp_path.clone(),
            source: e,
        })?;

        let lock_file_path = self.path.with_extension("lock");
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .open(&lock_file_path)
            .map_err(|e| StorageError::SaveFailed {
                path: lock_file_path.clone(),
                source: e,
            })?;
        lock_file
            .lock_exclusive()
            .map_err(|e| StorageError::SaveFailed {
                path: lock_file_path,
                source: e,
            })?;

        self.create_backup()?;
        self.cleanup_old_backups()?;

        rename(&temp_path, &self.path).map_err(|e| StorageError::SaveFailed {
            path: self.path.clone(),
            source: e,
        })?;

        lock_file.unlock().map_err(|e| StorageError::SaveFailed {
            path: self.path.clone(),
            source: e,
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::models::{
        resolution::{Milestone, Priority, Resolution},
        store::{Command, Store},
    };

    fn sample_store() -> Store {
        Store::default().apply(Command::AddResolution(Resolution {
            id: 1712345678901,
            title: String::from("Read 12 books"),
            description: Some(String::from("One per month")),
            category_id: 3,
            deadline: Some(jiff::civil::date(2026, 12, 31)),
            priority: Priority::Medium,
            milestones: vec![Milestone {
                id: 1712345678902,
                title: String::from("Book 1"),
                completed: true,
                completed_date: Some("2026-02-01T12:00:00Z".parse().unwrap()),
                created_at: "2026-01-05T10:00:00Z".parse().unwrap(),
            }],
            created_at: "2026-01-05T10:00:00Z".parse().unwrap(),
        }))
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let test_dir = PathBuf::from("/tmp/nyr_round_trip_test");
        let _ = fs::remove_dir_all(&test_dir);
        fs::create_dir_all(&test_dir).unwrap();

        let store = sample_store();
        let storage = JsonFileStorage::new(test_dir.join("store.json"));

        storage.save(&store).unwrap();
        let loaded = storage.load().unwrap();

        assert_eq!(loaded, store);

        fs::remove_dir_all(&test_dir).unwrap();
    }

    #[test]
    fn test_missing_file_loads_seed_default() {
        let storage = JsonFileStorage::new(PathBuf::from("/tmp/nyr_does_not_exist.json"));
        let store = storage.load().unwrap();

        assert!(store.resolutions.is_empty());
        assert_eq!(store.categories.len(), 5);
    }

    #[test]
    fn test_corrupt_file_degrades_to_seed_default() {
        let path = PathBuf::from("/tmp/nyr_corrupt_store.json");
        std::fs::write(&path, "{ this is not valid json }").unwrap();

        let storage = JsonFileStorage::new(path);
        let store = storage.load().unwrap();

        assert!(store.resolutions.is_empty());
        assert_eq!(store.categories.len(), 5);
    }

    #[test]
    fn test_legacy_blob_loads() {
        // Blob as written by the original browser tracker.
        let path = PathBuf::from("/tmp/nyr_legacy_store.json");
        let legacy = r#"{
            "resolutions": [{
                "id": 1712345678901,
                "title": "Save an emergency fund",
                "description": "",
                "categoryId": 4,
                "deadline": "",
                "priority": "high",
                "milestones": [
                    { "id": 1712345678902, "title": "First 1000", "completed": true, "completedDate": "2026-03-01T09:30:00.000Z" },
                    { "id": 1712345678903, "title": "Second 1000", "completed": false, "completedDate": null }
                ],
                "createdAt": "2026-01-05T10:00:00.000Z",
                "progress": 50
            }],
            "categories": [
                { "id": 4, "name": "Finance", "color": "bg-emerald-500" }
            ]
        }"#;
        std::fs::write(&path, legacy).unwrap();

        let storage = JsonFileStorage::new(path);
        let store = storage.load().unwrap();

        assert_eq!(store.resolutions.len(), 1);
        let resolution = &store.resolutions[0];
        assert_eq!(resolution.category_id, 4);
        assert_eq!(resolution.deadline, None);
        assert_eq!(resolution.milestones.len(), 2);
        assert!(resolution.milestones[0].completed);
        assert!(resolution.milestones[0].completed_date.is_some());
        assert_eq!(resolution.milestones[1].completed_date, None);
        assert_eq!(store.categories.len(), 1);
    }

    #[test]
    fn test_saved_json_uses_legacy_field_names() {
        let test_dir = PathBuf::from("/tmp/nyr_field_names_test");
        let _ = fs::remove_dir_all(&test_dir);
        fs::create_dir_all(&test_dir).unwrap();

        let path = test_dir.join("store.json");
        let storage = JsonFileStorage::new(path.clone());
        storage.save(&sample_store()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let resolution = &raw["resolutions"][0];
        assert!(resolution.get("categoryId").is_some());
        assert!(resolution.get("createdAt").is_some());
        assert!(resolution["milestones"][0].get("completedDate").is_some());
        assert!(raw["categories"][0].get("color").is_some());
        // Progress is derived, never stored.
        assert!(resolution.get("progress").is_none());

        fs::remove_dir_all(&test_dir).unwrap();
    }

    #[test]
    fn test_backup_creation_and_cleanup() {
        let test_dir = PathBuf::from("/tmp/nyr_backup_test");
        let _ = fs::remove_dir_all(&test_dir);
        fs::create_dir_all(&test_dir).unwrap();

        let store_path = test_dir.join("store.json");
        let storage = JsonFileStorage::new(store_path.clone());

        for i in 1..=7usize {
            let mut store = Store::default();
            store.categories.truncate(i % 5);

            storage.save(&store).unwrap();

            std::thread::sleep(std::time::Duration::from_millis(10));
        }

        let backups_dir = test_dir.join("backups");
        let backup_count = fs::read_dir(&backups_dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.metadata().map(|m| m.is_file()).unwrap_or(false))
            .count();

        assert_eq!(backup_count, 5, "Should keep exactly 5 backups");

        fs::remove_dir_all(&test_dir).unwrap();
    }
}
