//! Turns raw engine responses into [`SearchResult`]s.

use std::{collections::BTreeMap, rc::Rc};

use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    document::{Document, Highlight, Suggestion},
    engine::EngineSettings,
    error::SearchError,
    model::{Model, ModelRegistry},
    request::SearchRequest,
    result::SearchResult,
    snapshot::{HitSnapshot, SearchResultSnapshot},
};

/// Builds a result from a raw response to `request`.
pub fn build_result<M: Model>(
    response: Value,
    request: &SearchRequest,
    settings: &EngineSettings,
    registry: Rc<ModelRegistry<M>>,
) -> Result<SearchResult<M>, SearchError> {
    let Value::Object(mut response) = response else {
        return Err(SearchError::malformed("response is not an object"));
    };

    let Some(Value::Object(mut hits)) = response.remove("hits") else {
        return Err(SearchError::malformed("missing `hits` object"));
    };
    let total = parse_total(hits.get("total"))?;
    let Some(Value::Array(raw_hits)) = hits.remove("hits") else {
        return Err(SearchError::malformed("missing `hits.hits` array"));
    };

    let parsed = raw_hits
        .into_iter()
        .map(|hit| parse_hit(hit, request, settings))
        .collect::<Result<Vec<_>, SearchError>>()?;

    let aggregations = match response.remove("aggregations") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(aggregations)) => aggregations,
        Some(_) => return Err(SearchError::malformed("`aggregations` is not an object")),
    };
    let suggestions = parse_suggestions(response.remove("suggest"))?;

    debug!(hits = parsed.len(), total = ?total, "built search result");

    let snapshot = SearchResultSnapshot {
        hits: parsed,
        total,
        aggregations,
        suggestions,
        relations: request.relations.clone(),
    };
    Ok(snapshot.into_result(registry))
}

/// Parses `hits.total`, which is a plain number or `{ "value": n, "relation": ... }`.
fn parse_total(total: Option<&Value>) -> Result<Option<u64>, SearchError> {
    match total {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| SearchError::malformed("`hits.total` is not a count")),
        Some(Value::Object(total)) => total
            .get("value")
            .and_then(Value::as_u64)
            .map(Some)
            .ok_or_else(|| SearchError::malformed("`hits.total.value` is not a count")),
        Some(_) => Err(SearchError::malformed("`hits.total` has an unexpected shape")),
    }
}

/// Parses one entry of `hits.hits`.
fn parse_hit(
    hit: Value,
    request: &SearchRequest,
    settings: &EngineSettings,
) -> Result<HitSnapshot, SearchError> {
    let Value::Object(mut hit) = hit else {
        return Err(SearchError::malformed("hit is not an object"));
    };

    let Some(Value::String(index_name)) = hit.remove("_index") else {
        return Err(SearchError::malformed("hit without `_index`"));
    };
    let domain_type = settings
        .domain_type_of(&index_name, request.domain_types())
        .ok_or_else(|| SearchError::UnknownIndex {
            index: index_name.clone(),
        })?
        .to_string();

    let id = match hit.remove("_id") {
        Some(Value::String(id)) => id,
        Some(Value::Number(id)) => id.to_string(),
        _ => return Err(SearchError::malformed("hit without `_id`")),
    };
    let content = match hit.remove("_source") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(source)) => source,
        Some(_) => return Err(SearchError::malformed("`_source` is not an object")),
    };
    let score = hit.get("_score").and_then(Value::as_f64);
    let highlight = match hit.remove("highlight") {
        None | Some(Value::Null) => None,
        Some(Value::Object(raw)) => Some(Highlight::new(raw)),
        Some(_) => return Err(SearchError::malformed("`highlight` is not an object")),
    };

    Ok(HitSnapshot {
        domain_type,
        index_name,
        document: Document::new(id, content),
        score,
        highlight,
    })
}

/// Parses the top-level `suggest` object.
fn parse_suggestions(
    suggest: Option<Value>,
) -> Result<BTreeMap<String, Vec<Suggestion>>, SearchError> {
    match suggest {
        None | Some(Value::Null) => Ok(BTreeMap::new()),
        Some(Value::Object(suggest)) => suggest
            .into_iter()
            .map(|(name, entries)| {
                serde_json::from_value::<Vec<Suggestion>>(entries)
                    .map(|entries| (name, entries))
                    .map_err(|e| SearchError::malformed(format!("suggestion entries: {e}")))
            })
            .collect(),
        Some(_) => Err(SearchError::malformed("`suggest` is not an object")),
    }
}
