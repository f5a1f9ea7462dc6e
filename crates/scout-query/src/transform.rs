//! Parameter transformers.
//!
//! A transformer is a pure function from the current contents of a [`ParameterCollection`]
//! to the structure the query DSL expects for one query type.

use serde_json::{Map, Value};

use crate::parameter::ParameterCollection;

/// Strategy for converting a parameter collection into a query DSL structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transformer {
    /// Emits `{name: value, ...}` in insertion order.
    Flat,
    /// Emits `{<value of key>: {name: value, ...}}` with the key parameter removed from the
    /// inner object. Used by field-level queries such as `term` and `match`.
    ///
    /// Falls back to the flat shape if the key parameter is absent.
    GroupedBy(&'static str),
}

impl Transformer {
    /// Transforms the collection.
    pub fn transform(&self, parameters: &ParameterCollection) -> Value {
        match self {
            Self::Flat => Value::Object(flatten(parameters, None)),
            Self::GroupedBy(key) => {
                let Some(group) = parameters.get(key) else {
                    return Value::Object(flatten(parameters, None));
                };
                let group = match group {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };

                let mut grouped = Map::new();
                grouped.insert(group, Value::Object(flatten(parameters, Some(key))));
                Value::Object(grouped)
            }
        }
    }
}

/// Collects parameters into a map, optionally skipping one name.
fn flatten(parameters: &ParameterCollection, skip: Option<&str>) -> Map<String, Value> {
    parameters
        .iter()
        .filter(|p| Some(p.name()) != skip)
        .map(|p| (p.name().to_string(), p.value().clone()))
        .collect()
}
