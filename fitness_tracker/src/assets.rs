use log::{debug, warn};
use std::fs;
use std::path::Path;

/// Reads an optional text asset (banner art and the like).
///
/// Missing or unreadable assets are logged and come back as `None`; callers
/// render without them.
pub fn load_optional(path: &Path) -> Option<String> {
    if path.as_os_str().is_empty() {
        debug!("No asset configured");
        return None;
    }
    match fs::read_to_string(path) {
        Ok(contents) => Some(contents),
        Err(e) => {
            warn!("Error loading asset {}: {}", path.display(), e);
            None
        }
    }
}
