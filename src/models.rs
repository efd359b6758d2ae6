use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    #[serde(rename = "dir")]
    Directory,
    #[serde(rename = "file")]
    File,
}

/// One row of a directory listing, as the server reported it at fetch time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub modified: Option<String>,
}

impl RemoteEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == ResourceKind::Directory
    }

    /// `modified` as local `YYYY-MM-DD HH:MM`, or the raw value if it does not parse.
    pub fn modified_display(&self) -> String {
        match &self.modified {
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .map(|dt| {
                    dt.with_timezone(&chrono::Local)
                        .format("%Y-%m-%d %H:%M")
                        .to_string()
                })
                .unwrap_or_else(|_| raw.clone()),
            None => String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryListing {
    pub path: String,
    pub items: Vec<RemoteEntry>,
    pub total: Option<u64>,
    pub limit: u32,
    pub offset: u32,
}

impl DirectoryListing {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DiskUser {
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub user: Option<DiskUser>,
    #[serde(default)]
    pub total_space: u64,
    #[serde(default)]
    pub used_space: u64,
    #[serde(default)]
    pub trash_size: u64,
}

impl UserInfo {
    pub fn display_name(&self) -> &str {
        let user = match &self.user {
            Some(user) => user,
            None => return "user",
        };
        user.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(user.login.as_deref())
            .unwrap_or("user")
    }
}

/// One file to fetch in a download batch.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadTask {
    pub remote_path: String,
    pub local_path: PathBuf,
    pub decompress: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_entry_without_size_defaults_to_zero() {
        let entry: RemoteEntry = serde_json::from_value(serde_json::json!({
            "name": "Photos",
            "path": "disk:/Photos",
            "type": "dir",
            "modified": "2024-03-01T10:00:00+00:00"
        }))
        .unwrap();
        assert!(entry.is_dir());
        assert_eq!(entry.size, 0);
    }

    #[test]
    fn unparseable_modified_is_shown_verbatim() {
        let entry = RemoteEntry {
            name: "a".into(),
            path: "disk:/a".into(),
            kind: ResourceKind::File,
            size: 1,
            modified: Some("yesterday".into()),
        };
        assert_eq!(entry.modified_display(), "yesterday");
    }

    #[test]
    fn display_name_falls_back_to_login_then_placeholder() {
        let info: UserInfo = serde_json::from_value(serde_json::json!({
            "user": { "login": "ivan", "display_name": "" },
            "total_space": 10,
            "used_space": 5
        }))
        .unwrap();
        assert_eq!(info.display_name(), "ivan");
        assert_eq!(UserInfo::default().display_name(), "user");
    }
}
