use jpdict_types::{ManifestEntry, Version};

use crate::error::DownloadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Full,
    Patch,
}

impl FileType {
    pub fn as_url_segment(self) -> &'static str {
        match self {
            FileType::Full => "full",
            FileType::Patch => "patch",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileRequest {
    pub patch: u32,
    pub file_type: FileType,
}

/// Snapshot-vs-patch planning (spec.md §4.2 step 4). Returns the ordered
/// list of files to fetch; empty means the local copy is already current.
pub fn plan_files(
    current: Option<&Version>,
    entry: &ManifestEntry,
) -> Result<Vec<FileRequest>, DownloadError> {
    if let Some(current) = current {
        if (current.major, current.minor, current.patch) > (entry.major, entry.minor, entry.patch)
        {
            return Err(DownloadError::DatabaseTooOld);
        }
    }

    let needs_full = match current {
        None => true,
        Some(current) => current.minor != entry.minor,
    };

    let mut files = Vec::new();
    if needs_full {
        files.push(FileRequest {
            patch: entry.snapshot,
            file_type: FileType::Full,
        });
        for p in (entry.snapshot + 1)..=entry.patch {
            files.push(FileRequest {
                patch: p,
                file_type: FileType::Patch,
            });
        }
    } else {
        let current_patch = current.map(|c| c.patch).unwrap_or(entry.snapshot);
        for p in (current_patch + 1)..=entry.patch {
            files.push(FileRequest {
                patch: p,
                file_type: FileType::Patch,
            });
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(minor: u32, patch: u32, snapshot: u32) -> ManifestEntry {
        ManifestEntry {
            major: 3,
            minor,
            patch,
            snapshot,
            database_version: None,
            date_of_creation: "2024-01-01".into(),
        }
    }

    fn version(minor: u32, patch: u32) -> Version {
        Version {
            major: 3,
            minor,
            patch,
            snapshot: None,
            database_version: None,
            date_of_creation: "2024-01-01".into(),
            lang: "en".into(),
        }
    }

    #[test]
    fn fresh_install_fetches_full_then_trailing_patches() {
        let files = plan_files(None, &entry(0, 2, 0)).unwrap();
        assert_eq!(
            files,
            vec![
                FileRequest { patch: 0, file_type: FileType::Full },
                FileRequest { patch: 1, file_type: FileType::Patch },
                FileRequest { patch: 2, file_type: FileType::Patch },
            ]
        );
    }

    #[test]
    fn same_minor_fetches_only_trailing_patches() {
        let current = version(0, 0);
        let files = plan_files(Some(&current), &entry(0, 2, 0)).unwrap();
        assert_eq!(
            files,
            vec![
                FileRequest { patch: 1, file_type: FileType::Patch },
                FileRequest { patch: 2, file_type: FileType::Patch },
            ]
        );
    }

    #[test]
    fn already_current_plans_no_files() {
        let current = version(0, 2);
        let files = plan_files(Some(&current), &entry(0, 2, 0)).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn differing_minor_triggers_a_fresh_full_snapshot() {
        let current = version(0, 5);
        let files = plan_files(Some(&current), &entry(1, 0, 0)).unwrap();
        assert_eq!(files[0].file_type, FileType::Full);
    }

    #[test]
    fn local_newer_than_upstream_is_database_too_old() {
        let current = version(5, 0);
        let err = plan_files(Some(&current), &entry(0, 0, 0)).unwrap_err();
        assert!(matches!(err, DownloadError::DatabaseTooOld));
    }
}
