//! Path utilities for locating packs on disk.
//!
//! Every pack lives in exactly one directory directly below a root, so a
//! pack name must never be able to address anything else.

use crate::error::{PackError, PackResult};
use std::path::{Component, Path, PathBuf};

/// Check if a relative path stays inside its base (no traversal)
pub fn is_safe_path(path: &Path) -> bool {
    // Check for absolute paths
    if path.is_absolute() {
        return false;
    }

    let mut depth = 0i32;

    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            },
            Component::Normal(_) => {
                depth += 1;
            },
            _ => {
                // Prefix and RootDir are never safe in relative paths
                return false;
            },
        }
    }

    true
}

/// Check that a pack name is one plain directory name
pub fn is_valid_pack_name(name: &str) -> bool {
    let path = Path::new(name);
    !name.is_empty()
        && !name.contains(['/', '\\'])
        && is_safe_path(path)
        && matches!(path.components().collect::<Vec<_>>().as_slice(), [Component::Normal(_)])
}

/// Directory of `name` below `root`
pub fn pack_dir(root: &Path, name: &str) -> PackResult<PathBuf> {
    if !is_valid_pack_name(name) {
        return Err(PackError::InvalidPackName {
            name: name.to_string(),
        });
    }
    Ok(root.join(name))
}
