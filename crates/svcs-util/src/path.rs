//! Path utilities.

use std::path::{Component, Path, PathBuf};

/// Normalize a path by removing `.` and `..` components.
///
/// Unlike `canonicalize`, this doesn't require the path to exist. A `..` that
/// would climb above the first component is kept, so callers can still tell
/// that the path escapes its base.
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                let popped = matches!(result.components().next_back(), Some(Component::Normal(_)))
                    && result.pop();
                if !popped && !path.has_root() {
                    result.push("..");
                }
            }
            Component::CurDir => {}
            _ => result.push(component),
        }
    }

    result
}

/// Whether a relative path stays inside whatever base it is joined to.
pub fn is_contained(relative: &Path) -> bool {
    relative.is_relative()
        && !relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
}

/// Make `path` relative to `base`, normalizing both first.
///
/// Relative inputs are interpreted against `base`. Returns `None` if the
/// result would be outside `base` or would be empty.
pub fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    let base = normalize(base);
    let joined = if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    };

    let relative = joined.strip_prefix(&base).ok()?.to_path_buf();
    if relative.as_os_str().is_empty() || !is_contained(&relative) {
        return None;
    }
    Some(relative)
}

/// Join a path safely, preventing path traversal.
///
/// Returns `None` if the resulting path would be outside the base.
pub fn safe_join(base: &Path, path: &Path) -> Option<PathBuf> {
    let normalized = normalize(path);
    if normalized.as_os_str().is_empty() || !is_contained(&normalized) {
        return None;
    }
    Some(base.join(normalized))
}

/// Render a path with forward slashes, the form used in on-disk text files.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        let path = Path::new("/home/user/./project/../project/src");
        assert_eq!(normalize(path), PathBuf::from("/home/user/project/src"));
    }

    #[test]
    fn test_normalize_keeps_leading_parent() {
        assert_eq!(normalize(Path::new("../a/./b")), PathBuf::from("../a/b"));
        assert_eq!(normalize(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[test]
    fn test_relative_to() {
        let base = Path::new("/home/user/project");
        assert_eq!(
            relative_to(Path::new("/home/user/project/src/main.rs"), base),
            Some(PathBuf::from("src/main.rs"))
        );
        assert_eq!(
            relative_to(Path::new("./src/../lib.rs"), base),
            Some(PathBuf::from("lib.rs"))
        );
        assert_eq!(relative_to(Path::new("/etc/passwd"), base), None);
        assert_eq!(relative_to(Path::new("../other/file"), base), None);
        assert_eq!(relative_to(Path::new("."), base), None);
    }

    #[test]
    fn test_safe_join() {
        let base = PathBuf::from("/home/user/project");

        let result = safe_join(&base, Path::new("src/main.rs"));
        assert_eq!(result, Some(PathBuf::from("/home/user/project/src/main.rs")));

        let result = safe_join(&base, Path::new("../../../etc/passwd"));
        assert!(result.is_none());

        let result = safe_join(&base, Path::new("/etc/passwd"));
        assert!(result.is_none());
    }

    #[test]
    fn test_to_slash() {
        assert_eq!(to_slash(Path::new("src/bin/main.rs")), "src/bin/main.rs");
    }
}
