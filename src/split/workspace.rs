//! Request Workspace
//!
//! Each split request owns a directory `<upload_root>/<uuid>/` holding the
//! saved upload, an `output/` directory for extracted artifacts and, when
//! needed, the archive. The directory is removed when the request ends:
//! `release()` on the normal path, `Drop` if the request unwinds or its future
//! is dropped before reaching `release()`.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::types::{SplitError, ARCHIVE_FILE_NAME, FALLBACK_UPLOAD_NAME, OUTPUT_DIR_NAME};

/// Longest stored upload basename, in bytes (well under the 255-byte NAME_MAX)
pub const MAX_UPLOAD_NAME_LEN: usize = 128;

/// Extensions longer than this are treated as part of the stem when truncating
const MAX_EXTENSION_LEN: usize = 16;

/// Request-scoped directory tree
#[derive(Debug)]
pub struct Workspace {
    id: Uuid,
    root: PathBuf,
    output_dir: PathBuf,
    released: bool,
}

impl Workspace {
    /// Create a fresh workspace under `base`.
    ///
    /// `base` must already exist. The request root is created with
    /// `create_dir`, so an id collision fails instead of sharing a directory.
    pub async fn acquire(base: &Path) -> Result<Self, SplitError> {
        let id = Uuid::new_v4();
        let root = base.join(id.to_string());
        tokio::fs::create_dir(&root).await?;

        let workspace = Self {
            id,
            output_dir: root.join(OUTPUT_DIR_NAME),
            root,
            released: false,
        };

        // On failure the guard's Drop removes the half-built root
        tokio::fs::create_dir(&workspace.output_dir).await?;

        tracing::debug!(workspace = %workspace.id, root = %workspace.root.display(), "Workspace acquired");
        Ok(workspace)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory receiving extracted artifacts
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Where the upload is saved, confined to the workspace root
    pub fn upload_path(&self, client_filename: &str) -> PathBuf {
        self.root.join(safe_basename(client_filename))
    }

    /// Where the archive is built when more than one artifact is produced
    pub fn archive_path(&self) -> PathBuf {
        self.root.join(ARCHIVE_FILE_NAME)
    }

    /// Save the uploaded bytes and return the saved path
    pub async fn save_upload(&self, client_filename: &str, data: &[u8]) -> Result<PathBuf, SplitError> {
        let path = self.upload_path(client_filename);
        tokio::fs::write(&path, data).await?;
        tracing::debug!(workspace = %self.id, path = %path.display(), bytes = data.len(), "Upload saved");
        Ok(path)
    }

    /// Remove the whole workspace tree.
    ///
    /// Failures are logged, never returned: the response has already been
    /// decided by the time cleanup runs.
    pub async fn release(mut self) {
        self.released = true;
        match tokio::fs::remove_dir_all(&self.root).await {
            Ok(()) => tracing::debug!(workspace = %self.id, "Workspace released"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::error!(
                workspace = %self.id,
                root = %self.root.display(),
                "Failed to remove workspace: {}",
                e
            ),
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        tracing::warn!(workspace = %self.id, "Workspace dropped without release, removing");
        let id = self.id;
        let root = std::mem::take(&mut self.root);

        // Off the async worker when a runtime is around, inline otherwise
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || remove_tree(id, &root));
            }
            Err(_) => remove_tree(id, &root),
        }
    }
}

fn remove_tree(id: Uuid, root: &Path) {
    if let Err(e) = std::fs::remove_dir_all(root) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::error!(workspace = %id, "Failed to remove workspace: {}", e);
        }
    }
}

/// Last path component of a client filename with unsafe characters replaced,
/// capped at `MAX_UPLOAD_NAME_LEN` bytes with the extension kept.
///
/// Never returns `output` or the archive name for names that pass upload
/// validation, since those always end in `.pdf`. Other callers get the same
/// guarantee from the `upload_` prefix below.
pub fn safe_basename(filename: &str) -> String {
    let last = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    // Names made only of dots ("." / "..") would resolve outside the file slot
    if cleaned.trim_matches('.').is_empty() {
        return FALLBACK_UPLOAD_NAME.to_string();
    }

    // Never collide with the fixed names inside the workspace
    if cleaned == OUTPUT_DIR_NAME || cleaned == ARCHIVE_FILE_NAME {
        return format!("upload_{}", cleaned);
    }

    truncate_name(cleaned)
}

/// `name` is ASCII here, so byte offsets are char boundaries
fn truncate_name(name: String) -> String {
    if name.len() <= MAX_UPLOAD_NAME_LEN {
        return name;
    }

    let ext = match name.rfind('.') {
        Some(dot) if dot > 0 && name.len() - dot <= MAX_EXTENSION_LEN => &name[dot..],
        _ => "",
    };
    let stem = &name[..MAX_UPLOAD_NAME_LEN - ext.len()];
    format!("{}{}", stem, ext)
}
