//! Parameter validators.
//!
//! Validators are stateless predicates over the names present in a
//! [`ParameterCollection`]. Each query type picks one when it creates its collection.

use crate::{error::QueryError, parameter::ParameterCollection};

/// Strategy for checking that required parameters are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validator {
    /// No constraint.
    Null,
    /// Every listed parameter is required.
    AllOf(&'static [&'static str]),
    /// At least one of the listed parameters is required.
    OneOf(&'static [&'static str]),
    /// Every inner validator must pass; the first failure is reported.
    Compound(Vec<Self>),
}

impl Validator {
    /// Checks the collection, naming the missing parameters on failure.
    pub fn validate(&self, parameters: &ParameterCollection) -> Result<(), QueryError> {
        match self {
            Self::Null => Ok(()),
            Self::AllOf(required) => {
                let missing: Vec<&str> = required
                    .iter()
                    .copied()
                    .filter(|name| !parameters.contains(name))
                    .collect();
                if missing.is_empty() {
                    Ok(())
                } else {
                    Err(QueryError::missing_parameters(missing))
                }
            }
            Self::OneOf(alternatives) => {
                if alternatives.iter().any(|name| parameters.contains(name)) {
                    Ok(())
                } else {
                    Err(QueryError::missing_any_of(alternatives.iter().copied()))
                }
            }
            Self::Compound(validators) => validators
                .iter()
                .try_for_each(|validator| validator.validate(parameters)),
        }
    }
}
