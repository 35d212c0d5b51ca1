//! Change detection by content fingerprint.

use std::io;
use std::path::Path;

/// Lowercase hex BLAKE3 digest of `text`.
pub fn fingerprint(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}

/// Read the last stored fingerprint. A missing file means no prior run.
///
/// Content that is not a fingerprint is logged and treated as absent, so the
/// next run regenerates and overwrites it.
pub fn read_fingerprint(path: &Path) -> io::Result<Option<String>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    let stored = content.trim();
    if stored.len() != 64 || !stored.bytes().all(|b| b.is_ascii_hexdigit()) {
        tracing::warn!(path = %path.display(), "ignoring unreadable fingerprint file");
        return Ok(None);
    }
    Ok(Some(stored.to_ascii_lowercase()))
}

/// Store a fingerprint, creating parent directories.
pub fn write_fingerprint(path: &Path, fingerprint: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, fingerprint)
}
