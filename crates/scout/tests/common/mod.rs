//! An in-memory search engine and record stores over a small library dataset.
//!
//! The engine understands the subset of the query DSL the tests send: `match_all`, `ids`,
//! `term`, `terms`, `match` and `bool` queries, sorting, `min_score`, `indices_boost`,
//! `post_filter`, `min`/`max`/`terms` aggregations, `collapse`, `_source` filtering, total hit
//! tracking, highlighting and term suggestions.

use std::{
    cell::RefCell,
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
    rc::Rc,
};

use scout::{BoxError, Config, Model, ModelRegistry, RecordStore, SearchEngine, SearchTransport};
use serde_json::{Map, Value, json};

/// Books: id, title, author id, year published, price, genre.
const BOOKS: &[(u32, &str, u32, u32, f64, &str)] = &[
    (1, "Dune", 1, 1965, 9.99, "scifi"),
    (2, "Dune Messiah", 1, 1969, 10.99, "scifi"),
    (3, "Children of Dune", 1, 1976, 11.99, "scifi"),
    (4, "A Wizard of Earthsea", 2, 1968, 8.99, "fantasy"),
    (5, "The Left Hand of Darkness", 2, 1969, 12.5, "scifi"),
    (6, "The Dispossessed", 2, 1974, 13.0, "scifi"),
    (7, "The Tombs of Atuan", 2, 1971, 9.5, "fantasy"),
    (8, "Foundation", 3, 1951, 7.5, "scifi"),
    (9, "Foundation and Empire", 3, 1952, 7.99, "scifi"),
    (10, "Second Foundation", 3, 1953, 8.5, "scifi"),
    (11, "The Farthest Shore", 2, 1972, 9.75, "fantasy"),
];

/// Authors: id, name.
const AUTHORS: &[(u32, &str)] = &[
    (1, "Frank Herbert"),
    (2, "Ursula K. Le Guin"),
    (3, "Isaac Asimov"),
];

/// Hits returned when a request has no `size`.
const DEFAULT_SIZE: usize = 10;

/// A book record.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    /// Primary key.
    pub id: u32,
    /// Title.
    pub title: String,
    /// Author primary key.
    pub author_id: u32,
    /// Relations eager loaded with the record.
    pub loaded: Vec<String>,
}

/// An author record.
#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    /// Primary key.
    pub id: u32,
    /// Full name.
    pub name: String,
    /// Relations eager loaded with the record.
    pub loaded: Vec<String>,
}

/// Any record the library stores.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// A book.
    Book(Book),
    /// An author.
    Author(Author),
}

impl Record {
    /// Primary key of the record.
    pub fn id(&self) -> u32 {
        match self {
            Self::Book(book) => book.id,
            Self::Author(author) => author.id,
        }
    }

    /// Relations eager loaded with the record.
    pub fn loaded(&self) -> &[String] {
        match self {
            Self::Book(book) => &book.loaded,
            Self::Author(author) => &author.loaded,
        }
    }

    /// Title of a book record.
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Book(book) => Some(&book.title),
            Self::Author(_) => None,
        }
    }

    /// Copy of the record with `relations` marked as loaded.
    fn with_loaded(&self, relations: &[String]) -> Self {
        let mut record = self.clone();
        match &mut record {
            Self::Book(book) => book.loaded = relations.to_vec(),
            Self::Author(author) => author.loaded = relations.to_vec(),
        }
        record
    }
}

impl Model for Record {
    fn search_key(&self) -> String {
        self.id().to_string()
    }
}

/// Returns the primary keys of records, in order.
pub fn ids(records: &[&Record]) -> Vec<u32> {
    records.iter().map(|record| record.id()).collect()
}

/// One `find_many` call received by a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    /// Requested keys.
    pub ids: Vec<String>,
    /// Requested relations.
    pub relations: Vec<String>,
}

/// Lookups received by a store, shared with the test.
pub type CallLog = Rc<RefCell<Vec<Lookup>>>;

/// A table of records keyed by primary key; rows come back in key order.
struct RecordTable {
    /// Rows by primary key.
    rows: BTreeMap<u32, Record>,
    /// Lookups received so far.
    calls: CallLog,
}

impl RecordStore<Record> for RecordTable {
    fn find_many(&self, ids: &[String], relations: &[String]) -> Result<Vec<Record>, BoxError> {
        self.calls.borrow_mut().push(Lookup {
            ids: ids.to_vec(),
            relations: relations.to_vec(),
        });
        let wanted = ids
            .iter()
            .map(|id| id.parse::<u32>())
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(self
            .rows
            .iter()
            .filter(|(id, _)| wanted.contains(id))
            .map(|(_, record)| record.with_loaded(relations))
            .collect())
    }
}

/// A request the engine received.
#[derive(Debug, Clone, PartialEq)]
pub struct SentRequest {
    /// Index names searched.
    pub indices: Vec<String>,
    /// Request body.
    pub body: Value,
}

/// A document stored in an index.
#[derive(Debug, Clone)]
struct StoredDoc {
    /// Document id.
    id: String,
    /// Stored fields.
    source: Map<String, Value>,
}

/// A search engine fake holding every document in memory.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    /// Documents by index name, in insertion order.
    indices: BTreeMap<String, Vec<StoredDoc>>,
    /// Requests received so far.
    requests: RefCell<Vec<SentRequest>>,
}

/// A document matched by the current request.
struct Hit<'a> {
    /// Index the document lives in.
    index: &'a str,
    /// The document.
    doc: &'a StoredDoc,
    /// Relevance score.
    score: f64,
}

impl InMemoryIndex {
    /// Stores a document.
    pub fn insert(&mut self, index: &str, id: u32, source: Value) {
        let Value::Object(source) = source else {
            panic!("documents must be objects");
        };
        self.indices
            .entry(index.to_string())
            .or_default()
            .push(StoredDoc {
                id: id.to_string(),
                source,
            });
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<SentRequest> {
        self.requests.borrow().clone()
    }

    /// Runs a request against the stored documents.
    fn execute(&self, indices: &[String], body: &Value) -> Result<Value, BoxError> {
        let match_all = json!({"match_all": {}});
        let query = body.get("query").unwrap_or(&match_all);
        let boosts = index_boosts(body);

        let mut hits = Vec::new();
        for index in indices {
            let docs = self
                .indices
                .get(index)
                .ok_or_else(|| format!("no such index [{index}]"))?;
            for doc in docs {
                if let Some(score) = score(query, doc)? {
                    let boost = boosts.get(index.as_str()).copied().unwrap_or(1.0);
                    hits.push(Hit {
                        index: index.as_str(),
                        doc,
                        score: score * boost,
                    });
                }
            }
        }

        if let Some(min_score) = body.get("min_score").and_then(Value::as_f64) {
            hits.retain(|hit| hit.score >= min_score);
        }
        let sorted = sort_hits(&mut hits, body.get("sort"));
        let aggregations = aggregate(&hits, body.get("aggs"))?;

        if let Some(filter) = body.get("post_filter") {
            let mut kept = Vec::new();
            for hit in hits {
                if score(filter, hit.doc)?.is_some() {
                    kept.push(hit);
                }
            }
            hits = kept;
        }
        let total = hits.len() as u64;

        if let Some(field) = body.pointer("/collapse/field").and_then(Value::as_str) {
            let mut seen = BTreeSet::new();
            hits.retain(|hit| seen.insert(hit.doc.source.get(field).map(Value::to_string)));
        }

        let from = body.get("from").and_then(Value::as_u64).unwrap_or(0);
        let size = body
            .get("size")
            .and_then(Value::as_u64)
            .map_or(DEFAULT_SIZE, |size| size as usize);
        let track_scores = body.get("track_scores") == Some(&Value::Bool(true));
        let highlight_words = query_words(query);

        let rendered: Vec<Value> = hits
            .iter()
            .skip(from as usize)
            .take(size)
            .map(|hit| {
                let mut out = Map::new();
                out.insert("_index".into(), json!(hit.index));
                out.insert("_id".into(), json!(hit.doc.id));
                let score = if sorted && !track_scores {
                    Value::Null
                } else {
                    json!(hit.score)
                };
                out.insert("_score".into(), score);
                if let Some(source) = filter_source(&hit.doc.source, body.get("_source")) {
                    out.insert("_source".into(), Value::Object(source));
                }
                if let Some(highlight) =
                    highlight(hit.doc, body.get("highlight"), &highlight_words)
                {
                    out.insert("highlight".into(), Value::Object(highlight));
                }
                Value::Object(out)
            })
            .collect();

        let mut hits_out = Map::new();
        if let Some(total) = total_hits(total, body.get("track_total_hits")) {
            hits_out.insert("total".into(), total);
        }
        hits_out.insert("hits".into(), Value::Array(rendered));

        let mut response = Map::new();
        response.insert("took".into(), json!(1));
        response.insert("hits".into(), Value::Object(hits_out));
        if let Some(aggregations) = aggregations {
            response.insert("aggregations".into(), Value::Object(aggregations));
        }
        if let Some(suggesters) = body.get("suggest").and_then(Value::as_object) {
            response.insert("suggest".into(), self.suggest(indices, suggesters)?);
        }
        Ok(Value::Object(response))
    }

    /// Answers `term` suggesters with words within two edits of each input word.
    fn suggest(
        &self,
        indices: &[String],
        suggesters: &Map<String, Value>,
    ) -> Result<Value, BoxError> {
        let mut out = Map::new();
        for (name, suggester) in suggesters {
            let text = suggester
                .get("text")
                .and_then(Value::as_str)
                .ok_or("suggester without text")?;
            let field = suggester
                .pointer("/term/field")
                .and_then(Value::as_str)
                .ok_or("only term suggesters are supported")?;

            let vocabulary: BTreeSet<String> = indices
                .iter()
                .filter_map(|index| self.indices.get(index))
                .flatten()
                .filter_map(|doc| doc.source.get(field).and_then(Value::as_str))
                .flat_map(words)
                .collect();

            let mut entries = Vec::new();
            let mut offset = 0;
            for word in text.split(' ') {
                let lower = word.to_lowercase();
                let mut options: Vec<(usize, &String)> = if vocabulary.contains(&lower) {
                    Vec::new()
                } else {
                    vocabulary
                        .iter()
                        .map(|candidate| (edit_distance(&lower, candidate), candidate))
                        .filter(|(distance, _)| *distance <= 2)
                        .collect()
                };
                options.sort();
                let length = lower.len().max(1) as f64;
                let options: Vec<Value> = options
                    .into_iter()
                    .map(|(distance, candidate)| {
                        let score = 1.0 - distance as f64 / length;
                        json!({"text": candidate, "score": score})
                    })
                    .collect();
                entries.push(json!({
                    "text": word,
                    "offset": offset,
                    "length": word.len(),
                    "options": options,
                }));
                offset += word.len() + 1;
            }
            out.insert(name.clone(), Value::Array(entries));
        }
        Ok(Value::Object(out))
    }
}

impl SearchTransport for InMemoryIndex {
    fn search(&self, indices: &[String], body: &Value) -> Result<Value, BoxError> {
        self.requests.borrow_mut().push(SentRequest {
            indices: indices.to_vec(),
            body: body.clone(),
        });
        self.execute(indices, body)
    }
}

/// Scores a document against a query; `None` when it does not match.
fn score(query: &Value, doc: &StoredDoc) -> Result<Option<f64>, BoxError> {
    let (kind, params) = query
        .as_object()
        .and_then(|query| query.iter().next())
        .ok_or("query must be a single-key object")?;

    let score = match kind.as_str() {
        "match_all" => Some(1.0),
        "ids" => {
            let values = params
                .get("values")
                .and_then(Value::as_array)
                .ok_or("ids query without values")?;
            values
                .iter()
                .any(|value| value.as_str() == Some(doc.id.as_str()))
                .then_some(1.0)
        }
        "term" => {
            let (field, clause) = single_field(params)?;
            let value = clause.get("value").unwrap_or(clause);
            field_has(doc, field, value).then_some(1.0)
        }
        "terms" => {
            let (field, values) = params
                .as_object()
                .and_then(|params| params.iter().find(|(key, _)| *key != "boost"))
                .ok_or("terms query without a field")?;
            let values = values.as_array().ok_or("terms must be a list")?;
            values
                .iter()
                .any(|value| field_has(doc, field, value))
                .then_some(1.0)
        }
        "match" => {
            let (field, clause) = single_field(params)?;
            let text = clause
                .get("query")
                .unwrap_or(clause)
                .as_str()
                .ok_or("match query must be text")?;
            let stored: BTreeSet<String> = doc
                .source
                .get(field)
                .and_then(Value::as_str)
                .map(|value| words(value).collect())
                .unwrap_or_default();
            let matched = words(text).filter(|word| stored.contains(word)).count();
            (matched > 0).then_some(matched as f64)
        }
        "bool" => bool_score(params, doc)?,
        other => return Err(format!("unsupported query [{other}]").into()),
    };
    Ok(score)
}

/// Scores a `bool` query: every `must` and `filter` clause matches and no `must_not` does.
fn bool_score(params: &Value, doc: &StoredDoc) -> Result<Option<f64>, BoxError> {
    let clauses = |occur: &str| {
        params
            .get(occur)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    };

    let mut total = 0.0;
    for clause in clauses("must") {
        match score(&clause, doc)? {
            Some(score) => total += score,
            None => return Ok(None),
        }
    }
    for clause in clauses("filter") {
        if score(&clause, doc)?.is_none() {
            return Ok(None);
        }
    }
    for clause in clauses("must_not") {
        if score(&clause, doc)?.is_some() {
            return Ok(None);
        }
    }
    Ok(Some(total.max(1.0)))
}

/// Splits `{ "field": clause }`.
fn single_field(params: &Value) -> Result<(&String, &Value), BoxError> {
    params
        .as_object()
        .and_then(|params| params.iter().next())
        .ok_or_else(|| "query needs a field".into())
}

/// Whether a stored field equals `value` or, for arrays, contains it.
fn field_has(doc: &StoredDoc, field: &str, value: &Value) -> bool {
    match doc.source.get(field) {
        Some(Value::Array(items)) => items.contains(value),
        Some(stored) => stored == value,
        None => false,
    }
}

/// Lowercased alphanumeric words of a text.
fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
}

/// Words of every `match` clause in a query, for highlighting.
fn query_words(query: &Value) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    if let Some(params) = query.get("match").and_then(Value::as_object) {
        for clause in params.values() {
            if let Some(text) = clause.get("query").unwrap_or(clause).as_str() {
                found.extend(words(text));
            }
        }
    }
    if let Some(clauses) = query.get("bool").and_then(Value::as_object) {
        for clause in clauses.values().filter_map(Value::as_array).flatten() {
            found.extend(query_words(clause));
        }
    }
    found
}

/// Boost factors by index name from `indices_boost`.
fn index_boosts(body: &Value) -> BTreeMap<&str, f64> {
    body.get("indices_boost")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .flatten()
        .filter_map(|(index, boost)| Some((index.as_str(), boost.as_f64()?)))
        .collect()
}

/// Sorts hits by the `sort` entries, or by descending score; returns whether a sort was given.
fn sort_hits(hits: &mut [Hit<'_>], sort: Option<&Value>) -> bool {
    let Some(entries) = sort.and_then(Value::as_array) else {
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        return false;
    };

    let keys: Vec<(String, bool)> = entries
        .iter()
        .filter_map(|entry| match entry {
            Value::String(field) => Some((field.clone(), false)),
            Value::Object(entry) => entry.iter().next().map(|(field, order)| {
                let descending = order.get("order").and_then(Value::as_str) == Some("desc")
                    || order.as_str() == Some("desc");
                (field.clone(), descending)
            }),
            _ => None,
        })
        .collect();

    hits.sort_by(|a, b| {
        keys.iter()
            .map(|(field, descending)| {
                let ordering = compare_values(a.doc.source.get(field), b.doc.source.get(field));
                if *descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });
    true
}

/// Orders numbers and strings; missing values sort last.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .unwrap_or_default()
            .total_cmp(&b.as_f64().unwrap_or_default()),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Computes `min`, `max` and `terms` aggregations over the hits.
fn aggregate(
    hits: &[Hit<'_>],
    aggs: Option<&Value>,
) -> Result<Option<Map<String, Value>>, BoxError> {
    let Some(aggs) = aggs.and_then(Value::as_object) else {
        return Ok(None);
    };

    let mut out = Map::new();
    for (name, clause) in aggs {
        let (kind, params) = clause
            .as_object()
            .and_then(|clause| clause.iter().next())
            .ok_or("aggregation must be a single-key object")?;
        let field = params
            .get("field")
            .and_then(Value::as_str)
            .ok_or("aggregation without field")?;
        let values = hits.iter().filter_map(|hit| hit.doc.source.get(field));

        let result = match kind.as_str() {
            "min" => json!({"value": values.filter_map(Value::as_f64).reduce(f64::min)}),
            "max" => json!({"value": values.filter_map(Value::as_f64).reduce(f64::max)}),
            "terms" => {
                let mut counts: BTreeMap<String, u64> = BTreeMap::new();
                for value in values {
                    let key = value.as_str().map_or_else(|| value.to_string(), str::to_string);
                    *counts.entry(key).or_default() += 1;
                }
                let mut buckets: Vec<(String, u64)> = counts.into_iter().collect();
                buckets.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
                json!({"buckets": buckets
                    .into_iter()
                    .map(|(key, doc_count)| json!({"key": key, "doc_count": doc_count}))
                    .collect::<Vec<_>>()})
            }
            other => return Err(format!("unsupported aggregation [{other}]").into()),
        };
        out.insert(name.clone(), result);
    }
    Ok(Some(out))
}

/// Applies `_source`: `false` drops it, a non-empty field list keeps only those fields.
///
/// An empty field list filters nothing, like a real engine's empty `includes`.
fn filter_source(
    source: &Map<String, Value>,
    clause: Option<&Value>,
) -> Option<Map<String, Value>> {
    match clause {
        Some(Value::Bool(false)) => None,
        Some(Value::Array(fields)) if !fields.is_empty() => Some(
            source
                .iter()
                .filter(|(key, _)| {
                    fields
                        .iter()
                        .any(|field| field.as_str() == Some(key.as_str()))
                })
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        ),
        _ => Some(source.clone()),
    }
}

/// Wraps matched words of the highlighted fields in `<em>` tags.
fn highlight(
    doc: &StoredDoc,
    clause: Option<&Value>,
    query_words: &BTreeSet<String>,
) -> Option<Map<String, Value>> {
    let fields = clause?.get("fields")?.as_object()?;
    let mut out = Map::new();
    for field in fields.keys() {
        let Some(text) = doc.source.get(field).and_then(Value::as_str) else {
            continue;
        };
        let mut marked = false;
        let snippet: Vec<String> = text
            .split(' ')
            .map(|word| {
                if query_words.contains(&word.to_lowercase()) {
                    marked = true;
                    format!("<em>{word}</em>")
                } else {
                    word.to_string()
                }
            })
            .collect();
        if marked {
            out.insert(field.clone(), json!([snippet.join(" ")]));
        }
    }
    (!out.is_empty()).then_some(out)
}

/// Renders `hits.total` according to `track_total_hits`.
fn total_hits(total: u64, track: Option<&Value>) -> Option<Value> {
    match track {
        Some(Value::Bool(false)) => None,
        Some(Value::Number(limit)) => {
            let limit = limit.as_u64().unwrap_or(u64::MAX);
            let relation = if total > limit { "gte" } else { "eq" };
            Some(json!({"value": total.min(limit), "relation": relation}))
        }
        _ => Some(json!({"value": total, "relation": "eq"})),
    }
}

/// Levenshtein distance between two words.
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut current = vec![i + 1];
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current.push(substitution.min(previous[j + 1] + 1).min(current[j] + 1));
        }
        previous = current;
    }
    previous[b.len()]
}

/// The library: an engine over books and authors plus the lookups its stores received.
pub struct Library {
    /// Engine over the `books` and `authors` domain types.
    pub engine: SearchEngine<InMemoryIndex, Record>,
    /// Lookups received by the book store.
    pub books: CallLog,
    /// Lookups received by the author store.
    pub authors: CallLog,
}

impl Default for Library {
    fn default() -> Self {
        Self::build(&Config::default(), &[])
    }
}

impl Library {
    /// A library whose indices are named by `config`.
    pub fn with_config(config: &Config) -> Self {
        Self::build(config, &[])
    }

    /// A library whose book store no longer has some indexed books.
    pub fn with_deleted_books(deleted: &[u32]) -> Self {
        Self::build(&Config::default(), deleted)
    }

    /// Requests the engine received.
    pub fn requests(&self) -> Vec<SentRequest> {
        self.engine.transport().requests()
    }

    /// Indexes the dataset and registers the stores.
    fn build(config: &Config, deleted: &[u32]) -> Self {
        let mut index = InMemoryIndex::default();
        let mut book_rows = BTreeMap::new();
        for &(id, title, author_id, published, price, genre) in BOOKS {
            index.insert(
                &config.index_name("books"),
                id,
                json!({
                    "title": title,
                    "author_id": author_id,
                    "published": published,
                    "price": price,
                    "genre": genre,
                }),
            );
            if !deleted.contains(&id) {
                book_rows.insert(
                    id,
                    Record::Book(Book {
                        id,
                        title: title.to_string(),
                        author_id,
                        loaded: Vec::new(),
                    }),
                );
            }
        }

        let mut author_rows = BTreeMap::new();
        for &(id, name) in AUTHORS {
            index.insert(&config.index_name("authors"), id, json!({"name": name}));
            author_rows.insert(
                id,
                Record::Author(Author {
                    id,
                    name: name.to_string(),
                    loaded: Vec::new(),
                }),
            );
        }

        let books = CallLog::default();
        let authors = CallLog::default();
        let registry = ModelRegistry::new()
            .register(
                "books",
                RecordTable {
                    rows: book_rows,
                    calls: Rc::clone(&books),
                },
            )
            .register(
                "authors",
                RecordTable {
                    rows: author_rows,
                    calls: Rc::clone(&authors),
                },
            );

        Self {
            engine: SearchEngine::new(index, registry).with_config(config),
            books,
            authors,
        }
    }
}
