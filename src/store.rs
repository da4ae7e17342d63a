//! Local persistence for recordings and their transcripts.
//!
//! Metadata lives in a JSON index (`recordings.json`) under the data
//! directory; audio blobs are stored beside it as `recordings/<id>.wav`.
//! Entries are kept newest-first and capped.

use crate::config::{Mode, Tone};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use uuid::Uuid;

/// Maximum number of recordings retained; oldest entries (and their audio
/// blobs) are evicted past this.
const MAX_ENTRIES: usize = 500;

/// Metadata captured when a recording is saved.
#[derive(Debug, Clone, Default)]
pub struct RecordingMeta {
    pub mode: Mode,
    pub tone: Tone,
    /// Label of the provider that produced the final transcript.
    pub provider: Option<String>,
    pub duration_secs: f64,
}

/// A persisted recording with its transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub text: String,
    pub mode: Mode,
    pub tone: Tone,
    #[serde(default)]
    pub provider: Option<String>,
    pub duration_secs: f64,
}

/// Partial update for an existing entry; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct RecordingUpdate {
    pub text: Option<String>,
    pub provider: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct StoreIndex {
    entries: Vec<RecordingEntry>,
}

/// On-disk store for recordings and transcripts.
pub struct RecordingStore {
    data: RwLock<StoreIndex>,
    index_path: PathBuf,
    audio_dir: PathBuf,
}

impl RecordingStore {
    /// Open (or create) the store under `data_dir`.
    pub fn new(data_dir: PathBuf) -> Self {
        let index_path = data_dir.join("recordings.json");
        let audio_dir = data_dir.join("recordings");
        let _ = fs::create_dir_all(&audio_dir);

        let data = Self::load_from_file(&index_path).unwrap_or_default();

        Self {
            data: RwLock::new(data),
            index_path,
            audio_dir,
        }
    }

    fn load_from_file(path: &Path) -> Option<StoreIndex> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    fn save_index(&self) -> Result<(), String> {
        let data = self
            .data
            .read()
            .map_err(|e| format!("Failed to read index: {}", e))?;

        let content = serde_json::to_string_pretty(&*data)
            .map_err(|e| format!("Failed to serialize index: {}", e))?;

        fs::write(&self.index_path, content)
            .map_err(|e| format!("Failed to write index file: {}", e))
    }

    fn is_safe_id(id: &str) -> bool {
        // Ids are UUID-like strings. Keep this conservative to prevent
        // path traversal / weird filenames.
        !id.trim().is_empty()
            && id
                .bytes()
                .all(|b| matches!(b, b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_'))
    }

    fn wav_path(&self, id: &str) -> PathBuf {
        self.audio_dir.join(format!("{}.wav", id))
    }

    /// Persist a recording with its transcript; returns the new entry.
    pub fn save(
        &self,
        audio: &[u8],
        text: String,
        meta: RecordingMeta,
    ) -> Result<RecordingEntry, String> {
        if audio.is_empty() {
            return Err("Cannot save recording: empty audio".to_string());
        }

        let entry = RecordingEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            text,
            mode: meta.mode,
            tone: meta.tone,
            provider: meta.provider,
            duration_secs: meta.duration_secs,
        };

        let path = self.wav_path(&entry.id);
        fs::write(&path, audio)
            .map_err(|e| format!("Failed to write recording {}: {}", path.display(), e))?;

        {
            let mut data = self
                .data
                .write()
                .map_err(|e| format!("Failed to write index: {}", e))?;

            // Newest first
            data.entries.insert(0, entry.clone());

            if data.entries.len() > MAX_ENTRIES {
                for evicted in data.entries.split_off(MAX_ENTRIES) {
                    let _ = fs::remove_file(self.wav_path(&evicted.id));
                }
            }
        }
        self.save_index()?;

        Ok(entry)
    }

    /// All entries, newest first.
    pub fn list(&self) -> Result<Vec<RecordingEntry>, String> {
        let data = self
            .data
            .read()
            .map_err(|e| format!("Failed to read index: {}", e))?;
        Ok(data.entries.clone())
    }

    /// Look up one entry by id.
    pub fn get(&self, id: &str) -> Result<Option<RecordingEntry>, String> {
        let data = self
            .data
            .read()
            .map_err(|e| format!("Failed to read index: {}", e))?;
        Ok(data.entries.iter().find(|e| e.id == id).cloned())
    }

    /// Apply a partial update to an entry. Returns false when the id is
    /// unknown.
    pub fn update(&self, id: &str, update: RecordingUpdate) -> Result<bool, String> {
        let updated = {
            let mut data = self
                .data
                .write()
                .map_err(|e| format!("Failed to write index: {}", e))?;

            match data.entries.iter_mut().find(|e| e.id == id) {
                Some(entry) => {
                    if let Some(text) = update.text {
                        entry.text = text;
                    }
                    if let Some(provider) = update.provider {
                        entry.provider = Some(provider);
                    }
                    true
                }
                None => false,
            }
        };

        if updated {
            self.save_index()?;
        }

        Ok(updated)
    }

    /// Delete an entry and its audio blob. Returns false when the id is
    /// unknown.
    pub fn delete(&self, id: &str) -> Result<bool, String> {
        let deleted = {
            let mut data = self
                .data
                .write()
                .map_err(|e| format!("Failed to write index: {}", e))?;

            let initial_len = data.entries.len();
            data.entries.retain(|e| e.id != id);
            data.entries.len() < initial_len
        };

        if deleted {
            let _ = fs::remove_file(self.wav_path(id));
            self.save_index()?;
        }

        Ok(deleted)
    }

    /// Remove every entry and every audio blob.
    pub fn clear_all(&self) -> Result<(), String> {
        let ids: Vec<String> = {
            let mut data = self
                .data
                .write()
                .map_err(|e| format!("Failed to write index: {}", e))?;
            let ids = data.entries.iter().map(|e| e.id.clone()).collect();
            data.entries.clear();
            ids
        };

        for id in ids {
            let _ = fs::remove_file(self.wav_path(&id));
        }
        self.save_index()
    }

    /// Load the audio blob for an entry.
    pub fn load_audio(&self, id: &str) -> Result<Vec<u8>, String> {
        if !Self::is_safe_id(id) {
            return Err("Invalid recording id".to_string());
        }
        let path = self.wav_path(id);
        fs::read(&path).map_err(|e| format!("Failed to read recording {}: {}", path.display(), e))
    }

    /// Absolute WAV path for an id if the blob exists on disk. Intended
    /// for playback in the UI layer.
    pub fn audio_path_if_exists(&self, id: &str) -> Result<Option<PathBuf>, String> {
        if !Self::is_safe_id(id) {
            return Err("Invalid recording id".to_string());
        }
        let path = self.wav_path(id);
        if path.exists() {
            Ok(Some(path))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, RecordingStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordingStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    fn meta(provider: &str) -> RecordingMeta {
        RecordingMeta {
            mode: Mode::General,
            tone: Tone::Default,
            provider: Some(provider.to_string()),
            duration_secs: 2.5,
        }
    }

    #[test]
    fn test_save_and_get_round_trip() {
        let (_dir, store) = store();
        let entry = store
            .save(b"RIFFdata", "привет".to_string(), meta("Gemini"))
            .unwrap();

        let fetched = store.get(&entry.id).unwrap().unwrap();
        assert_eq!(fetched.text, "привет");
        assert_eq!(fetched.provider.as_deref(), Some("Gemini"));
        assert_eq!(store.load_audio(&entry.id).unwrap(), b"RIFFdata");
    }

    #[test]
    fn test_list_is_newest_first() {
        let (_dir, store) = store();
        let first = store.save(b"a", "first".to_string(), meta("Gemini")).unwrap();
        let second = store.save(b"b", "second".to_string(), meta("Gemini")).unwrap();

        let entries = store.list().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, second.id);
        assert_eq!(entries[1].id, first.id);
    }

    #[test]
    fn test_update_is_partial() {
        let (_dir, store) = store();
        let entry = store.save(b"a", "old".to_string(), meta("Gemini")).unwrap();

        let updated = store
            .update(
                &entry.id,
                RecordingUpdate {
                    text: Some("new".to_string()),
                    provider: None,
                },
            )
            .unwrap();
        assert!(updated);

        let fetched = store.get(&entry.id).unwrap().unwrap();
        assert_eq!(fetched.text, "new");
        // Untouched field survives.
        assert_eq!(fetched.provider.as_deref(), Some("Gemini"));
    }

    #[test]
    fn test_update_unknown_id_is_false() {
        let (_dir, store) = store();
        assert!(!store.update("missing", RecordingUpdate::default()).unwrap());
    }

    #[test]
    fn test_delete_removes_entry_and_blob() {
        let (_dir, store) = store();
        let entry = store.save(b"a", "text".to_string(), meta("Gemini")).unwrap();

        assert!(store.delete(&entry.id).unwrap());
        assert!(store.get(&entry.id).unwrap().is_none());
        assert!(store.audio_path_if_exists(&entry.id).unwrap().is_none());
    }

    #[test]
    fn test_clear_all_empties_the_store() {
        let (_dir, store) = store();
        let entry = store.save(b"a", "text".to_string(), meta("Gemini")).unwrap();
        store.save(b"b", "more".to_string(), meta("DeepSeek")).unwrap();

        store.clear_all().unwrap();
        assert!(store.list().unwrap().is_empty());
        assert!(store.audio_path_if_exists(&entry.id).unwrap().is_none());
    }

    #[test]
    fn test_empty_audio_is_rejected() {
        let (_dir, store) = store();
        assert!(store.save(b"", "text".to_string(), meta("Gemini")).is_err());
    }

    #[test]
    fn test_unsafe_id_is_rejected() {
        let (_dir, store) = store();
        assert!(store.load_audio("../../etc/passwd").is_err());
        assert!(store.audio_path_if_exists("a/b").is_err());
    }

    #[test]
    fn test_index_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let entry = {
            let store = RecordingStore::new(dir.path().to_path_buf());
            store.save(b"a", "persisted".to_string(), meta("Gemini")).unwrap()
        };

        let reopened = RecordingStore::new(dir.path().to_path_buf());
        let fetched = reopened.get(&entry.id).unwrap().unwrap();
        assert_eq!(fetched.text, "persisted");
    }
}
