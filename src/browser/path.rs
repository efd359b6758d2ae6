/// Provider-specific spelling of the disk root, used in `path` fields of listings.
pub const DISK_ROOT: &str = "disk:/";
pub const ROOT: &str = "/";

pub fn is_root(path: &str) -> bool {
    matches!(path, ROOT | DISK_ROOT | "disk:" | "")
}

/// Parent of `path` with the last `/` segment stripped, or `None` when
/// `path` is already a root (or has no parent segment at all).
///
/// The root spelling is preserved: the parent of `disk:/Docs` is `disk:/`.
pub fn parent_path(path: &str) -> Option<String> {
    if is_root(path) {
        return None;
    }

    let trimmed = path.trim_end_matches('/');
    let (parent, _) = trimmed.rsplit_once('/')?;

    let parent = match parent {
        "" => ROOT.to_string(),
        "disk:" => DISK_ROOT.to_string(),
        p if p.starts_with("disk:") && !p.starts_with(DISK_ROOT) => DISK_ROOT.to_string(),
        p => p.to_string(),
    };
    Some(parent)
}

/// Remote path of `name` created inside `dir`.
pub fn join_remote(dir: &str, name: &str) -> String {
    let name = name.trim_matches('/');
    if dir.ends_with('/') {
        format!("{}{}", dir, name)
    } else {
        format!("{}/{}", dir, name)
    }
}
