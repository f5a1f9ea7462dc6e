//! Query parameters and the ordered collection that holds them.

use serde_json::Value;

use crate::{error::QueryError, transform::Transformer, validate::Validator};

/// A scalar parameter value.
///
/// Setters that the query DSL restricts to single values (a term, a regexp pattern, a range
/// bound) take `impl Into<Scalar>`, so structured values are rejected at compile time.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// A string value.
    String(String),
    /// A signed integer value.
    Integer(i64),
    /// A floating point value.
    Float(f64),
    /// A boolean value.
    Bool(bool),
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::String(s) => Self::String(s),
            Scalar::Integer(i) => Self::from(i),
            Scalar::Float(f) => Self::from(f),
            Scalar::Bool(b) => Self::Bool(b),
        }
    }
}

/// A named query parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParameter {
    /// Parameter name as it appears in the query DSL.
    name: String,
    /// Parameter value.
    value: Value,
}

impl QueryParameter {
    /// Creates a new parameter.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns the parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameter value.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// An ordered collection of query parameters for one query type.
///
/// The collection owns the [`Validator`] and [`Transformer`] chosen for its query type.
/// Insertion order is preserved so that the produced query fragment is reproducible: adding
/// a name that is already present replaces the value in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterCollection {
    /// Parameters in first-seen order.
    parameters: Vec<QueryParameter>,
    /// Checks required parameters before transformation.
    validator: Validator,
    /// Converts the parameters into a query DSL structure.
    transformer: Transformer,
}

impl ParameterCollection {
    /// Creates an empty collection with the given validation and transformation strategy.
    pub fn new(validator: Validator, transformer: Transformer) -> Self {
        Self {
            parameters: Vec::new(),
            validator,
            transformer,
        }
    }

    /// Adds a parameter, replacing the value of an existing parameter with the same name.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let parameter = QueryParameter::new(name, value);
        match self.parameters.iter_mut().find(|p| p.name == parameter.name) {
            Some(existing) => existing.value = parameter.value,
            None => self.parameters.push(parameter),
        }
        self
    }

    /// Removes a parameter, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.parameters.iter().position(|p| p.name == name)?;
        Some(self.parameters.remove(index).value)
    }

    /// Returns the value of a parameter.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(QueryParameter::value)
    }

    /// Returns true if a parameter with this name has been added.
    pub fn contains(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p.name == name)
    }

    /// Returns parameter names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(QueryParameter::name)
    }

    /// Iterates over the parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &QueryParameter> {
        self.parameters.iter()
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Returns true if no parameters have been added.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Returns the validator assigned to this collection.
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Returns the transformer assigned to this collection.
    pub fn transformer(&self) -> &Transformer {
        &self.transformer
    }

    /// Validates the collection and transforms it into a query DSL structure.
    ///
    /// Transformation only runs once validation has passed.
    pub fn to_value(&self) -> Result<Value, QueryError> {
        self.validator.validate(self)?;
        Ok(self.transformer.transform(self))
    }
}
