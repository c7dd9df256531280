use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};
use crate::structs::UserSettings;

/// The whole settings document: email -> settings object.
pub type SettingsDocument = Map<String, Value>;

/// Reads the settings document. A missing file is `None`; an empty file is
/// an empty document.
pub fn read_document(path: &Path) -> StoreResult<Option<SettingsDocument>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("Settings file {} not found", path.display());
            return Ok(None);
        }
        Err(e) => return Err(StoreError::io(path, e)),
    };
    if contents.trim().is_empty() {
        return Ok(Some(SettingsDocument::new()));
    }
    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| StoreError::Json { path: path.to_path_buf(), source })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replaces the document on disk. The new contents go to a sibling temp
/// file first and are renamed over the original, so readers only ever see
/// the old or the new document.
pub fn write_document(path: &Path, document: &SettingsDocument) -> StoreResult<()> {
    let tmp = temp_path(path);
    let file = File::create(&tmp).map_err(|e| StoreError::io(&tmp, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, document)
        .map_err(|source| StoreError::Json { path: tmp.clone(), source })?;
    writer.flush().map_err(|e| StoreError::io(&tmp, e))?;
    writer.get_ref().sync_all().map_err(|e| StoreError::io(&tmp, e))?;
    drop(writer);

    fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))?;
    debug!("Wrote settings document {}", path.display());
    Ok(())
}

pub fn load(path: &Path, email: &str) -> StoreResult<Option<UserSettings>> {
    let Some(document) = read_document(path)? else {
        return Ok(None);
    };
    match document.get(email) {
        Some(entry) => match serde_json::from_value::<UserSettings>(entry.clone()) {
            Ok(settings) => Ok(Some(settings)),
            Err(e) => {
                warn!("Ignoring unreadable settings for {}: {}", email, e);
                Ok(None)
            }
        },
        None => Ok(None),
    }
}

/// Read-modify-write of one user's entry; other entries are carried over untouched.
pub fn upsert(path: &Path, email: &str, settings: &UserSettings) -> StoreResult<()> {
    let mut document = read_document(path)?.unwrap_or_default();
    let entry = serde_json::to_value(settings)
        .map_err(|source| StoreError::Json { path: path.to_path_buf(), source })?;
    document.insert(String::from(email), entry);
    write_document(path, &document)?;
    info!("Saved settings for {}", email);
    Ok(())
}
