//! Endpoint configuration for the HTTP collaborators.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_COLLECTION_API: &str =
    "https://collectionapi.metmuseum.org/public/collection/v1/objects";
pub const DEFAULT_SPARQL_ENDPOINT: &str = "https://query.wikidata.org/bigdata/namespace/wdq/sparql";
pub const DEFAULT_WIKI_API: &str = "https://www.wikidata.org/w/api.php";
pub const DEFAULT_CROSSWALK_PAGE: &str =
    "Wikidata:GLAM/Metropolitan_Museum_of_Art/glamingest/objectName";
pub const DEFAULT_ARTIST_API: &str = "https://tools.wmflabs.org/openrefine-wikidata/en/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("glamingest/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub collection_api: String,
    pub sparql_endpoint: String,
    pub wiki_api: String,
    pub crosswalk_page: String,
    pub artist_api: String,
    pub user_agent: String,
    /// `0` disables the timeout.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            collection_api: DEFAULT_COLLECTION_API.to_string(),
            sparql_endpoint: DEFAULT_SPARQL_ENDPOINT.to_string(),
            wiki_api: DEFAULT_WIKI_API.to_string(),
            crosswalk_page: DEFAULT_CROSSWALK_PAGE.to_string(),
            artist_api: DEFAULT_ARTIST_API.to_string(),
            user_agent: USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `GLAMINGEST_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env(|key| std::env::var(key).ok())
    }

    /// Read a JSON config file; missing keys keep their defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read client config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse client config {}", path.display()))
    }

    fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let set = |key: &str, slot: &mut String| {
            if let Some(v) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *slot = v.trim().to_string();
            }
        };
        set("GLAMINGEST_COLLECTION_API", &mut self.collection_api);
        set("GLAMINGEST_SPARQL_ENDPOINT", &mut self.sparql_endpoint);
        set("GLAMINGEST_WIKI_API", &mut self.wiki_api);
        set("GLAMINGEST_CROSSWALK_PAGE", &mut self.crosswalk_page);
        set("GLAMINGEST_ARTIST_API", &mut self.artist_api);
        set("GLAMINGEST_USER_AGENT", &mut self.user_agent);

        if let Some(v) = lookup("GLAMINGEST_TIMEOUT_SECS") {
            let v = v.trim();
            if !v.is_empty() {
                self.timeout_secs = v.parse().map_err(|_| {
                    anyhow!("invalid GLAMINGEST_TIMEOUT_SECS={v:?} (expected integer seconds; 0 disables)")
                })?;
            }
        }
        Ok(self)
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_overrides_defaults() {
        let cfg = ClientConfig::default()
            .with_env(env(&[
                ("GLAMINGEST_SPARQL_ENDPOINT", "http://localhost:9999/sparql"),
                ("GLAMINGEST_TIMEOUT_SECS", "0"),
                ("GLAMINGEST_WIKI_API", "  "),
            ]))
            .unwrap();
        assert_eq!(cfg.sparql_endpoint, "http://localhost:9999/sparql");
        assert_eq!(cfg.wiki_api, DEFAULT_WIKI_API);
        assert_eq!(cfg.timeout(), None);
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = ClientConfig::default()
            .with_env(env(&[("GLAMINGEST_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("GLAMINGEST_TIMEOUT_SECS"));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: ClientConfig = serde_json::from_str(r#"{"timeout_secs": 5}"#).unwrap();
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(cfg.collection_api, DEFAULT_COLLECTION_API);
    }
}
