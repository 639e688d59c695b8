//! Defines the `Error` type for the rvnet library

use std::io;
use std::result;

use thiserror::Error;

pub type Result<T> = result::Result<T, BayesError>;

#[derive(Debug, Error)]
pub enum BayesError {

    /// A `RandomVariable` was declared with no values
    #[error("variable `{0}` has an empty domain")]
    EmptyDomain(String),

    /// A value was listed more than once in the domain of a `RandomVariable`
    #[error("variable `{variable}` lists the value {value} more than once")]
    DuplicateValue { variable: String, value: String },

    /// Represents a variable that was present multiple times in a situation where it should only
    /// have been present once
    #[error("variable `{0}` was encountered twice")]
    DuplicateVariable(String),

    /// Represents an error where there was a parent variable expected, but not found before the
    /// child in the topological order
    #[error("parent `{parent}` of `{variable}` has not been declared before it")]
    MissingParent { variable: String, parent: String },

    /// A parent was declared with a domain that differs from the network's node of that name
    #[error("parent `{parent}` of `{variable}` does not match the network's `{parent}`")]
    ParentMismatch { variable: String, parent: String },

    /// Training was requested with no examples
    #[error("variable `{0}` cannot be trained on an empty example set")]
    EmptyTrainingSet(String),

    /// A row did not contain the expected number of values
    #[error("expected a row of {expected} values, got {got}")]
    RowLength { expected: usize, got: usize },

    /// A value is not a member of the domain of the named variable
    #[error("value {value} is not in the domain of `{variable}`")]
    UnknownValue { variable: String, value: String },

    /// The parent values passed to `sample` do not form a conditioning context
    #[error("{values} is not a conditioning context of `{variable}`")]
    InvalidContext { variable: String, values: String },

    /// Sampling was requested from a variable that has never been trained
    #[error("variable `{0}` has not been trained")]
    Untrained(String),

    /// A name did not resolve to a variable in the network
    #[error("no variable named `{0}`")]
    UnknownVariable(String),

    /// Rejection sampling accepted none of the drawn samples
    #[error("none of the {0} samples drawn agreed with the evidence")]
    NoConsistentSamples(usize),

    /// A field of the training data could not be parsed
    #[error("line {line}: could not parse field `{field}`")]
    Parse { line: usize, field: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl BayesError {

    /// `true` for every error caused by a caller breaking the contract of the network API, as
    /// opposed to a failure reading training data.
    pub fn is_contract_violation(&self) -> bool {
        match self {
            BayesError::Parse { .. } | BayesError::Io(_) => false,
            _ => true
        }
    }

}

/// Formats a value for inclusion in a `BayesError`
pub(crate) fn show<T: std::fmt::Debug>(value: T) -> String {
    format!("{:?}", value)
}
