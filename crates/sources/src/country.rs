//! Country reference data from the REST Countries API.
//!
//! REST Countries API: https://restcountries.com/#endpoints-name

use crate::adapter::SourceAdapter;
use crate::error::SourceError;
use crate::result::SourceResult;
use datagate_core::{AppError, AppResult, SourceKey};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One element of the API's response array. Only the fields we surface.
#[derive(Debug, Deserialize)]
struct CountryRecord {
    name: Option<CountryName>,
    capital: Option<Vec<String>>,
    region: Option<String>,
    population: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct CountryName {
    common: Option<String>,
}

/// Serialized payload of an `API_COUNTRY` line. Field order is fixed.
#[derive(Debug, Serialize)]
struct CountryContext {
    name: Option<String>,
    capital: String,
    region: Option<String>,
    population: Option<u64>,
}

impl From<CountryRecord> for CountryContext {
    fn from(record: CountryRecord) -> Self {
        Self {
            name: record.name.and_then(|n| n.common),
            capital: record
                .capital
                .and_then(|c| c.into_iter().next())
                .unwrap_or_else(|| "N/A".to_string()),
            region: record.region,
            population: record.population,
        }
    }
}

/// Exact-name country lookup. Returns at most one record.
#[derive(Debug, Clone)]
pub struct CountrySource {
    base_url: String,
    client: reqwest::Client,
}

impl CountrySource {
    /// Create a lookup against `base_url` (e.g. `https://restcountries.com/v3.1/name/`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Source(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// `<base>/<name>?fullText=true`, with the name percent-encoded as one segment.
    fn lookup_url(&self, name: &str) -> Result<Url, SourceError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            SourceError::Connection(format!("invalid base URL {}: {}", self.base_url, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                SourceError::Connection(format!("base URL cannot take a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .push(name.trim());
        url.query_pairs_mut().append_pair("fullText", "true");

        Ok(url)
    }

    async fn lookup(&self, name: &str) -> Result<Vec<String>, SourceError> {
        let url = self.lookup_url(name)?;
        tracing::debug!("Requesting {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::Connection(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(SourceError::Query(format!("API returned {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Connection(format!("failed to read response: {}", e)))?;

        parse_countries(&body)
    }
}

/// Turn a response body into at most one `API_COUNTRY` line.
fn parse_countries(body: &str) -> Result<Vec<String>, SourceError> {
    let records: Vec<CountryRecord> = serde_json::from_str(body)
        .map_err(|e| SourceError::Query(format!("unexpected response body: {}", e)))?;

    let Some(first) = records.into_iter().next() else {
        return Ok(Vec::new());
    };

    let json = serde_json::to_string(&CountryContext::from(first))
        .map_err(|e| SourceError::Query(format!("failed to serialize country: {}", e)))?;

    Ok(vec![format!(
        "{}: {}",
        SourceKey::ExternalCountry.tag().record,
        json
    )])
}

#[async_trait::async_trait]
impl SourceAdapter for CountrySource {
    fn key(&self) -> SourceKey {
        SourceKey::ExternalCountry
    }

    /// Look up `term` as an exact country name.
    ///
    /// The term must be a bare name such as `Germany`. A full sentence is
    /// sent as-is and matches no country, which renders the empty sentinel.
    async fn fetch(&self, term: &str, _limit: usize) -> SourceResult {
        let outcome = self.lookup(term).await;

        if let Err(ref e) = outcome {
            tracing::warn!("{} lookup failed: {}", self.key(), e);
        }

        SourceResult::from_outcome(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datagate_core::config::DEFAULT_COUNTRY_URL;

    const GERMANY: &str = r#"[{
        "name": {"common": "Germany", "official": "Federal Republic of Germany"},
        "capital": ["Berlin"],
        "region": "Europe",
        "subregion": "Western Europe",
        "population": 83240525
    }]"#;

    fn source(base: &str) -> CountrySource {
        CountrySource::new(base, Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn test_lookup_url() {
        let url = source(DEFAULT_COUNTRY_URL).lookup_url("Germany").unwrap();
        assert_eq!(
            url.as_str(),
            "https://restcountries.com/v3.1/name/Germany?fullText=true"
        );
    }

    #[test]
    fn test_lookup_url_encodes_name() {
        let url = source("https://example.test/v3.1/name")
            .lookup_url("United States/x")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.test/v3.1/name/United%20States%2Fx?fullText=true"
        );
    }

    #[test]
    fn test_parse_first_record() {
        let lines = parse_countries(GERMANY).unwrap();
        assert_eq!(
            lines,
            vec![
                r#"API_COUNTRY: {"name":"Germany","capital":"Berlin","region":"Europe","population":83240525}"#
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_parse_missing_capital() {
        let lines =
            parse_countries(r#"[{"name": {"common": "Antarctica"}, "region": "Antarctic"}]"#)
                .unwrap();
        assert_eq!(
            lines[0],
            r#"API_COUNTRY: {"name":"Antarctica","capital":"N/A","region":"Antarctic","population":null}"#
        );
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_countries("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_unexpected_body() {
        let err = parse_countries(r#"{"status": 404}"#).unwrap_err();
        assert!(matches!(err, SourceError::Query(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_failure() {
        let source = source("http://127.0.0.1:9/v3.1/name/");
        let result = source.fetch("Germany", 3).await;

        assert!(result.is_failure());
        assert!(result
            .render(source.key())
            .starts_with("API_ERROR: Could not retrieve country data. Error: connection failed"));
    }

    #[tokio::test]
    async fn test_invalid_base_url_is_failure() {
        let result = source("not a url").fetch("Germany", 3).await;
        assert!(result.is_failure());
    }
}
