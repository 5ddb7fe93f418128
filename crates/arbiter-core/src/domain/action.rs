//! Action set: the fixed, ordered list of named actions the engine selects
//! among.
//!
//! The set is validated once at construction and never changes afterwards;
//! indices `0..len` address actions for the whole lifetime of the engine.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::errors::ArbiterError;

/// Ordered, de-duplicated set of action names, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSet {
    names: Vec<String>,
}

impl ActionSet {
    /// Validate and build the action set.
    ///
    /// Fails with [`ArbiterError::Configuration`] when the list is empty or
    /// contains duplicate names. Order is preserved.
    pub fn new<I, S>(names: I) -> Result<Self, ArbiterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(ArbiterError::Configuration(
                "action set must be non-empty".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(ArbiterError::Configuration(format!(
                    "action names must be unique, found duplicate '{name}'"
                )));
            }
        }
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Action name at `index`, or `None` when out of range.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Index of `name`, or `None` when the action does not exist.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}
