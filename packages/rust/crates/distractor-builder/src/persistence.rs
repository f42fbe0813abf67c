//! Whole-file replacement for the JSON label log.

use std::io::{self, Write};
use std::path::Path;

/// Replace `path` with `content` through a sibling temp file.
///
/// The temp file is fsynced before the rename and removed when any step
/// fails, so readers see either the old or the new log.
pub(crate) fn atomic_write_text(path: &Path, content: &str) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("annotations.json");
    let temp_path = parent.join(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4()));

    let written = std::fs::File::create(&temp_path).and_then(|mut file| {
        file.write_all(content.as_bytes())?;
        file.sync_all()
    });
    let result = written.and_then(|()| std::fs::rename(&temp_path, path));
    if result.is_err()
        && temp_path.exists()
        && let Err(error) = std::fs::remove_file(&temp_path)
    {
        tracing::warn!(path = %temp_path.display(), error = %error, "failed to remove temp file");
    }
    result
}
