//! Project documents stored as a JSON-lines collection.
//!
//! The term is applied as a case-insensitive regular expression to the
//! `name` and `description` string fields, the way a document-store `$regex`
//! filter with the `i` option behaves. The collection file is opened per call
//! and closed when the lookup returns.

use crate::adapter::{clamp_limit, SourceAdapter};
use crate::error::SourceError;
use crate::result::SourceResult;
use datagate_core::SourceKey;
use regex::{Regex, RegexBuilder};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Fields the term is matched against.
const MATCH_FIELDS: [&str; 2] = ["name", "description"];

/// Store-assigned identifier, never shown downstream.
const ID_FIELD: &str = "_id";

/// Project documents matched on name or description.
#[derive(Debug, Clone)]
pub struct ProjectSource {
    collection: PathBuf,
}

impl ProjectSource {
    pub fn new(collection: impl Into<PathBuf>) -> Self {
        Self {
            collection: collection.into(),
        }
    }
}

fn field_matches(doc: &Map<String, Value>, field: &str, pattern: &Regex) -> bool {
    doc.get(field)
        .and_then(Value::as_str)
        .is_some_and(|text| pattern.is_match(text))
}

fn query_projects(
    collection: &Path,
    term: &str,
    limit: usize,
) -> Result<Vec<String>, SourceError> {
    let pattern = RegexBuilder::new(term)
        .case_insensitive(true)
        .build()
        .map_err(|e| SourceError::Query(format!("invalid pattern: {}", e)))?;

    let file = File::open(collection)
        .map_err(|e| SourceError::Connection(format!("{:?}: {}", collection, e)))?;
    let reader = BufReader::new(file);
    let tag = SourceKey::DocumentProject.tag().record;

    let mut lines = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        if lines.len() >= limit {
            break;
        }

        let line = line.map_err(|e| {
            SourceError::Query(format!("failed to read line {}: {}", line_num + 1, e))
        })?;

        if line.trim().is_empty() {
            continue;
        }

        let mut doc: Map<String, Value> = serde_json::from_str(&line).map_err(|e| {
            SourceError::Query(format!("malformed document on line {}: {}", line_num + 1, e))
        })?;

        if !MATCH_FIELDS
            .iter()
            .any(|field| field_matches(&doc, field, &pattern))
        {
            continue;
        }

        doc.shift_remove(ID_FIELD);

        let json = serde_json::to_string(&doc)
            .map_err(|e| SourceError::Query(format!("failed to serialize document: {}", e)))?;
        lines.push(format!("{}: {}", tag, json));
    }

    Ok(lines)
}

#[async_trait::async_trait]
impl SourceAdapter for ProjectSource {
    fn key(&self) -> SourceKey {
        SourceKey::DocumentProject
    }

    async fn fetch(&self, term: &str, limit: usize) -> SourceResult {
        let collection = self.collection.clone();
        let term = term.to_string();
        let limit = clamp_limit(limit);

        let outcome =
            tokio::task::spawn_blocking(move || query_projects(&collection, &term, limit))
                .await
                .unwrap_or_else(|e| {
                    Err(SourceError::Query(format!("lookup task failed: {}", e)))
                });

        match &outcome {
            Ok(lines) => tracing::debug!("{} returned {} documents", self.key(), lines.len()),
            Err(e) => tracing::warn!("{} lookup failed: {}", self.key(), e),
        }

        SourceResult::from_outcome(outcome)
    }
}
