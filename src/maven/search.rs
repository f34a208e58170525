use crate::error::{GenError, Result};
use crate::repository::{Coordinate, RepositoryClient};
use crate::utils::verbose;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const MAVEN_CENTRAL_SEARCH: &str = "https://search.maven.org/solrsearch/select";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(1);
const MAX_RESPONSE_BYTES: usize = 1024 * 1024;

/// Client for the Maven Central search API.
pub struct MavenSearchClient {
    client: Client,
    endpoint: Url,
}

impl MavenSearchClient {
    pub fn new() -> Result<Self> {
        let endpoint = Url::parse(MAVEN_CENTRAL_SEARCH)
            .map_err(|e| GenError::Http(format!("Invalid search endpoint: {e}")))?;
        Self::with_endpoint(endpoint)
    }

    pub fn with_endpoint(endpoint: Url) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent("gvcgen")
            .build()
            .map_err(|e| GenError::Http(e.to_string()))?;

        Ok(Self { client, endpoint })
    }

    /// `q=g:<group> AND a:<artifact>&rows=5&core=gav&wt=json`
    pub fn search_url(&self, coordinate: &Coordinate) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair(
                "q",
                &format!("g:{} AND a:{}", coordinate.group, coordinate.artifact),
            )
            .append_pair("rows", "5")
            .append_pair("core", "gav")
            .append_pair("wt", "json");
        url
    }
}

impl RepositoryClient for MavenSearchClient {
    fn fetch_latest_version(&self, coordinate: &Coordinate) -> Result<Option<String>> {
        let url = self.search_url(coordinate);
        verbose!("Fetching: {}", url);

        let response = self
            .client
            .get(url.as_str())
            .send()
            .map_err(|e| GenError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GenError::Http(format!("HTTP {}: {}", response.status(), url)));
        }

        let text = response
            .text()
            .map_err(|e| GenError::Http(e.to_string()))?;

        if text.len() > MAX_RESPONSE_BYTES {
            return Err(GenError::Http(
                "Search response exceeded 1MB limit".to_string(),
            ));
        }

        parse_search_response(&text)
    }
}

/// Picks the first document of a search response as the latest version.
pub fn parse_search_response(body: &str) -> Result<Option<String>> {
    let parsed: SearchResponse = serde_json::from_str(body)?;
    if parsed.response.num_found == 0 {
        return Ok(None);
    }
    Ok(parsed
        .response
        .docs
        .into_iter()
        .next()
        .map(|doc| doc.version))
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    response: SearchResult,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(rename = "numFound")]
    num_found: u64,
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    #[serde(rename = "v")]
    version: String,
}
