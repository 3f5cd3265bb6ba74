use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::DerivationInput;
use crate::data::FieldValue;
use crate::errors::DerivationError;

/// A pure row-to-value transform.
pub type DeriveFn =
    dyn Fn(&DerivationInput<'_>) -> Result<FieldValue, DerivationError> + Send + Sync;

/// Named derivation functions supplied by the embedding program.
#[derive(Clone, Default)]
pub struct DerivationRegistry {
    functions: HashMap<String, Arc<DeriveFn>>,
}

impl DerivationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn register<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&DerivationInput<'_>) -> Result<FieldValue, DerivationError> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&DeriveFn> {
        self.functions.get(name).map(Arc::as_ref)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for DerivationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivationRegistry")
            .field("functions", &self.names())
            .finish()
    }
}
