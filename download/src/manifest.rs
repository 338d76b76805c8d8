use std::collections::HashMap;

use jpdict_types::{ManifestEntry, Series};

use crate::error::DownloadError;

/// `GET {baseUrl}jpdict-rc-{lang}-version.json` (spec.md §6.1): top-level keys
/// are series names, mapping to major-version integer -> entry.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Manifest(HashMap<String, HashMap<u32, ManifestEntry>>);

impl Manifest {
    pub fn locate(&self, series: Series, major: u32) -> Result<&ManifestEntry, DownloadError> {
        let by_major = self
            .0
            .get(series.name())
            .ok_or(DownloadError::MajorVersionNotFound {
                series: series.name(),
                major,
            })?;
        let entry = by_major
            .get(&major)
            .ok_or(DownloadError::MajorVersionNotFound {
                series: series.name(),
                major,
            })?;
        validate(entry)?;
        Ok(entry)
    }
}

fn validate(entry: &ManifestEntry) -> Result<(), DownloadError> {
    if entry.major < 1 {
        return Err(DownloadError::ManifestInvalid(
            "major version must be >= 1".into(),
        ));
    }
    if entry.date_of_creation.is_empty() {
        return Err(DownloadError::ManifestInvalid(
            "dateOfCreation must not be empty".into(),
        ));
    }
    Ok(())
}

pub async fn fetch(
    client: &reqwest::Client,
    base_url: &str,
    lang: &str,
) -> Result<Manifest, DownloadError> {
    let url = format!("{base_url}jpdict-rc-{lang}-version.json");
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| DownloadError::ManifestNotAccessible(e.to_string()))?;

    if response.status() == reqwest::StatusCode::NOT_FOUND {
        return Err(DownloadError::ManifestNotFound);
    }
    if !response.status().is_success() {
        return Err(DownloadError::ManifestNotAccessible(format!(
            "status {}",
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| DownloadError::ManifestNotAccessible(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| DownloadError::ManifestInvalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(major: u32, minor: u32, patch: u32, snapshot: u32) -> ManifestEntry {
        ManifestEntry {
            major,
            minor,
            patch,
            snapshot,
            database_version: None,
            date_of_creation: "2024-01-01".into(),
        }
    }

    #[test]
    fn locate_finds_the_requested_major_version() {
        let mut kanji = HashMap::new();
        kanji.insert(3, entry(3, 0, 0, 0));
        let mut top = HashMap::new();
        top.insert("kanji".to_string(), kanji);
        let manifest = Manifest(top);
        let found = manifest.locate(Series::Kanji, 3).unwrap();
        assert_eq!(found.minor, 0);
    }

    #[test]
    fn missing_major_version_is_a_fatal_error() {
        let manifest = Manifest(HashMap::new());
        assert!(matches!(
            manifest.locate(Series::Kanji, 3),
            Err(DownloadError::MajorVersionNotFound { .. })
        ));
    }
}
