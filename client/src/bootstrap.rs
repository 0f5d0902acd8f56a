use crate::versioning::add_version_to_path;
use leptos::{document, spawn_local, SignalSet, WriteSignal};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Fixed relative path of the startup manifest, resolved against the
/// document's own uri.
pub const MANIFEST_PATH: &str = "app.yaml";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AppManifest {
    pub title: String,
    #[serde(default)]
    pub tagline: Option<String>,
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("document has no usable base uri")]
    BaseUri,
    #[error("request failed: {0}")]
    Http(#[from] reqwasm::Error),
    #[error("manifest parse failed: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub fn parse_manifest(raw: &str) -> Result<AppManifest, serde_yaml::Error> {
    serde_yaml::from_str(raw)
}

pub fn manifest_url() -> Option<String> {
    let base_uri = document().document_uri().ok()?;
    let full = Url::parse(&base_uri).ok()?.join(MANIFEST_PATH).ok()?;
    Some(add_version_to_path(full.as_str()))
}

pub async fn load_manifest() -> Result<AppManifest, ManifestError> {
    let url = manifest_url().ok_or(ManifestError::BaseUri)?;
    let response = reqwasm::http::Request::get(&url).send().await?;
    let raw = response.text().await?;
    Ok(parse_manifest(&raw)?)
}

/// Fire-and-forget startup fetch. A failure is logged and the rest of the
/// page keeps going without a manifest; no retry, no timeout.
pub fn init_app(set_manifest: WriteSignal<Option<AppManifest>>) {
    spawn_local(async move {
        match load_manifest().await {
            Ok(manifest) => set_manifest.set(Some(manifest)),
            Err(err) => log::error!("App Init : {err}"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_manifest() {
        let manifest = parse_manifest("title: Volume\ntagline: Keep it down\n").unwrap();
        assert_eq!(
            manifest,
            AppManifest {
                title: "Volume".to_owned(),
                tagline: Some("Keep it down".to_owned()),
            }
        );
    }

    #[test]
    fn test_parse_manifest_without_tagline() {
        let manifest = parse_manifest("title: Volume\n").unwrap();
        assert_eq!(manifest.tagline, None);
    }

    #[test]
    fn test_parse_manifest_rejects_garbage() {
        assert!(parse_manifest("- not\n- a\n- manifest\n").is_err());
    }
}
