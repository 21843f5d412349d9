//! Segment query engine: tenant scoping, cheap size preview and paginated
//! member-id retrieval via a composite aggregation.

use serde_json::{json, Value};

use loglytics_core::segment::SegmentPage;

use crate::error::SearchError;
use crate::{cursor, decode};

/// Estimates above this are approximate and impractical to page through.
pub const PREVIEW_HAS_MORE_THRESHOLD: u64 = 10_000;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Scope `base` to one instance by appending a term filter to its
/// `bool.must` array, creating the array — or the whole `bool` wrapper —
/// as needed. Copy-on-write: the input is never mutated.
pub fn with_instance_filter(base: &Value, instance_id: Option<i64>) -> Value {
    let Some(id) = instance_id else {
        return base.clone();
    };
    let term = json!({ "term": { "instance.id": id } });

    let mut scoped = base.clone();
    let Some(bool_clause) = scoped.get_mut("bool").and_then(Value::as_object_mut) else {
        return json!({ "bool": { "must": [base.clone(), term] } });
    };
    let must = bool_clause
        .entry("must")
        .or_insert_with(|| Value::Array(Vec::new()));
    if !must.is_array() {
        *must = Value::Array(Vec::new());
    }
    if let Some(clauses) = must.as_array_mut() {
        clauses.push(term);
    }
    scoped
}

/// Distinct-member estimate: one cardinality aggregation, no hits.
pub fn preview_body(query: &Value) -> Value {
    json!({
        "query": query,
        "size": 0,
        "aggs": {
            "unique_members": { "cardinality": { "field": "device.id" } }
        }
    })
}

pub fn decode_preview_count(resp: &Value) -> u64 {
    decode::agg_u64(resp, &["unique_members"])
}

/// One page of member ids: a composite terms aggregation with a single
/// source on the unique-identity field. `after` is the decoded cursor key,
/// fed to the engine verbatim.
pub fn results_body(query: &Value, size: usize, after: Option<&Value>) -> Value {
    let mut composite = json!({
        "size": size,
        "sources": [
            { "device_id": { "terms": { "field": "device.id" } } }
        ]
    });
    if let Some(after_key) = after {
        composite["after"] = after_key.clone();
    }
    json!({
        "query": query,
        "size": 0,
        "aggs": { "results": { "composite": composite } }
    })
}

/// `total` counts this page's buckets, not the whole segment — a documented
/// quirk callers rely on. A next cursor is only emitted for a full page.
pub fn decode_results(
    segment_id: i64,
    size: usize,
    resp: &Value,
) -> Result<SegmentPage, SearchError> {
    let page = decode::buckets(resp, &["results"]);
    let ids: Vec<String> = page
        .iter()
        .map(|bucket| {
            bucket
                .get("key")
                .and_then(|key| key.get("device_id"))
                .map(|id| match id {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_default()
        })
        .collect();

    let after_key = if ids.len() == size {
        resp.pointer("/aggregations/results/after_key")
            .map(cursor::encode_after_key)
            .transpose()?
    } else {
        None
    };

    Ok(SegmentPage {
        segment_id,
        total: ids.len(),
        ids,
        after_key,
    })
}

/// The physical index currently receiving writes for `alias`, resolved from
/// the engine's alias table.
pub fn resolve_write_index(alias: &str, alias_response: &Value) -> Result<String, SearchError> {
    alias_response
        .as_object()
        .and_then(|indices| {
            indices.iter().find(|(_, info)| {
                info.get("aliases")
                    .and_then(|aliases| aliases.get(alias))
                    .and_then(|entry| entry.get("is_write_index"))
                    .and_then(Value::as_bool)
                    == Some(true)
            })
        })
        .map(|(index, _)| index.clone())
        .ok_or_else(|| SearchError::MappingNotFound(alias.to_string()))
}

/// Raw property map of `index` from a `_mapping` response.
pub fn extract_properties(index: &str, mapping_response: &Value) -> Option<Value> {
    mapping_response
        .get(index)
        .and_then(|entry| entry.get("mappings"))
        .and_then(|mappings| mappings.get("properties"))
        .cloned()
}
