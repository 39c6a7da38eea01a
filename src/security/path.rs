//! Containment checks for manifest-declared file paths
//!
//! `entry_point` and `frontend_scripts` are author-supplied strings. A path
//! only counts as resolvable when it names an existing file that stays inside
//! the directory it is declared relative to.

use std::path::{Component, Path, PathBuf};

/// Resolves `relative` against `base` and returns the normalized path if it
/// is an existing regular file inside `base`.
///
/// `relative` is used exactly as written, surrounding whitespace included.
/// Returns `None` for empty or absolute paths, `..` segments (plain or
/// percent-encoded), paths that normalize (or symlink) outside `base`,
/// directories and missing files.
///
/// ```
/// use plugin_market::security::resolve_in_dir;
///
/// assert!(resolve_in_dir("/srv/plugins/demo".as_ref(), "../other/main.go").is_none());
/// ```
pub fn resolve_in_dir(base: &Path, relative: &str) -> Option<PathBuf> {
    if relative.is_empty() || contains_traversal_segment(relative) {
        return None;
    }

    let target = Path::new(relative);
    if target.is_absolute() || target.has_root() {
        return None;
    }

    let normalized = normalize_path(&base.join(target));
    let canonical_base = base
        .canonicalize()
        .unwrap_or_else(|_| normalize_path(base));

    if !normalized.starts_with(&canonical_base) || !normalized.is_file() {
        return None;
    }

    Some(normalized)
}

/// Normalizes a path by resolving `.` and `..` components, returning the
/// canonical path when it exists on disk.
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                normalized.pop();
            }
            Component::CurDir => {}
            _ => normalized.push(component),
        }
    }

    normalized.canonicalize().unwrap_or(normalized)
}

/// Checks a raw path string for a parent-directory segment.
///
/// Both separators and their percent-encoded forms split segments, so
/// `main..go` is a plain file name while `..%2fsecret` is not.
fn contains_traversal_segment(path: &str) -> bool {
    const PARENT_SEGMENTS: [&str; 3] = ["..", "%2e%2e", "%252e%252e"];

    let lower_path = path
        .to_lowercase()
        .replace("%252f", "/")
        .replace("%255c", "/")
        .replace("%2f", "/")
        .replace("%5c", "/");

    lower_path
        .split(['/', '\\'])
        .any(|segment| PARENT_SEGMENTS.contains(&segment))
}
