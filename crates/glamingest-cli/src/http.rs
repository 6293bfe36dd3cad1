//! Blocking HTTP implementations of the engine's collaborator traits.

use crate::config::ClientConfig;
use anyhow::{anyhow, Result};
use glamingest_core::vocab::ENTITY_URI_PREFIX;
use glamingest_core::wikitable::parse_tables;
use glamingest_core::{
    ArtistLookup, CrosswalkRow, CrosswalkSource, GraphLookup, PortError, RecordSource,
};
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::Value;
use url::{form_urlencoded, Url};

/// One shared client for every endpoint in [`ClientConfig`].
pub struct HttpPorts {
    client: Client,
    config: ClientConfig,
}

impl HttpPorts {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| anyhow!("failed to build http client: {e}"))?;
        Ok(Self { client, config })
    }

    pub fn crosswalk_page(&self) -> &str {
        &self.config.crosswalk_page
    }

    fn get_json(&self, url: Url) -> Result<Value, PortError> {
        let resp = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| PortError::Transport(format!("failed to fetch {url}: {e}")))?;
        read_json(resp)
    }

    /// Fetch the crosswalk page as raw wikitext.
    pub fn fetch_wikitext(&self, title: &str) -> Result<String, PortError> {
        let mut url = parse_url(&self.config.wiki_api)?;
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("prop", "revisions")
            .append_pair("rvprop", "content")
            .append_pair("format", "json")
            .append_pair("titles", title);
        let body = self.get_json(url)?;
        page_wikitext(&body, title)
    }

    /// Fetch and parse the crosswalk rows from `title`.
    pub fn fetch_crosswalk(&self, title: &str) -> Result<Vec<CrosswalkRow>, PortError> {
        let wikitext = self.fetch_wikitext(title)?;
        let tables = parse_tables(&wikitext);
        let table = tables
            .first()
            .ok_or_else(|| PortError::Malformed(format!("no table on page {title}")))?;
        CrosswalkRow::from_table(table)
    }
}

impl RecordSource for HttpPorts {
    fn fetch_record(&self, object_id: &str) -> Result<Value, PortError> {
        let base = self.config.collection_api.trim_end_matches('/');
        let url = parse_url(&format!("{base}/{object_id}"))?;
        tracing::debug!(%url, "fetching object record");
        self.get_json(url)
    }
}

impl GraphLookup for HttpPorts {
    fn query_matches(&self, object_id: &str) -> Result<Vec<String>, PortError> {
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("query", &match_query(object_id))
            .append_pair("format", "json")
            .finish();
        let resp = self
            .client
            .post(&self.config.sparql_endpoint)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(ACCEPT, "application/sparql-results+json")
            .body(body)
            .send()
            .map_err(|e| {
                PortError::Transport(format!(
                    "failed to reach {}: {e}",
                    self.config.sparql_endpoint
                ))
            })?;
        let json = read_json(resp)?;
        let ids = binding_item_ids(&json)?;
        tracing::debug!(object_id, matches = ids.len(), "graph query answered");
        Ok(ids)
    }
}

impl CrosswalkSource for HttpPorts {
    fn fetch_rows(&self) -> Result<Vec<CrosswalkRow>, PortError> {
        self.fetch_crosswalk(&self.config.crosswalk_page)
    }
}

impl ArtistLookup for HttpPorts {
    fn lookup_artist(&self, name: &str) -> Result<String, PortError> {
        let mut url = parse_url(&self.config.artist_api)?;
        url.query_pairs_mut().append_pair("query", name);
        let body = self.get_json(url)?;
        Ok(summarize_candidates(&body))
    }
}

fn parse_url(raw: &str) -> Result<Url, PortError> {
    Url::parse(raw).map_err(|e| PortError::Transport(format!("invalid url {raw}: {e}")))
}

fn read_json(resp: Response) -> Result<Value, PortError> {
    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
        let message = resp
            .json::<Value>()
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| status.to_string());
        return Err(PortError::NotFound(message));
    }
    if !status.is_success() {
        return Err(PortError::Transport(format!("http status {status}")));
    }
    resp.json::<Value>()
        .map_err(|e| PortError::Malformed(format!("response is not JSON: {e}")))
}

/// SPARQL for items that carry `object_id` as their external object id.
pub fn match_query(object_id: &str) -> String {
    let escaped = object_id.replace('\\', "\\\\").replace('"', "\\\"");
    format!("SELECT DISTINCT ?item WHERE {{ ?item wdt:P3634 \"{escaped}\" }}")
}

/// Item ids from a SPARQL JSON result, entity prefix stripped.
pub fn binding_item_ids(json: &Value) -> Result<Vec<String>, PortError> {
    let bindings = json
        .pointer("/results/bindings")
        .and_then(Value::as_array)
        .ok_or_else(|| PortError::Malformed("sparql result has no bindings".into()))?;
    Ok(bindings
        .iter()
        .filter_map(|b| b.pointer("/item/value").and_then(Value::as_str))
        .map(|uri| uri.strip_prefix(ENTITY_URI_PREFIX).unwrap_or(uri).to_string())
        .collect())
}

/// Wikitext of the single page in a `prop=revisions` response.
pub fn page_wikitext(json: &Value, title: &str) -> Result<String, PortError> {
    let pages = json
        .pointer("/query/pages")
        .and_then(Value::as_object)
        .ok_or_else(|| PortError::Malformed("wiki response has no pages".into()))?;
    let (page_id, page) = pages
        .iter()
        .next()
        .ok_or_else(|| PortError::Malformed("wiki response has no pages".into()))?;
    if page_id == "-1" || page.get("missing").is_some() {
        return Err(PortError::NotFound(format!("page {title}")));
    }
    page.pointer("/revisions/0/*")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| PortError::Malformed(format!("page {title} has no revision content")))
}

/// One-line summary of reconciliation candidates: best match first.
pub fn summarize_candidates(json: &Value) -> String {
    let candidates = json
        .get("result")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let Some(best) = candidates.first() else {
        return "no candidates".to_string();
    };
    let id = best.get("id").and_then(Value::as_str).unwrap_or("?");
    let name = best.get("name").and_then(Value::as_str).unwrap_or("?");
    let mut summary = format!("{id} ({name})");
    if let Some(score) = best.get("score").and_then(Value::as_f64) {
        summary.push_str(&format!(", score {score}"));
    }
    if candidates.len() > 1 {
        summary.push_str(&format!(", {} candidates", candidates.len()));
    }
    summary
}
