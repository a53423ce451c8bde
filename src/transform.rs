use crate::error::{Error, Result};
use serde_json::{json, Value};
use std::collections::HashMap;

/// A response transformation adapter.
///
/// Mirrors the transformer classes the annotation tags name: given a model
/// value, produce the serializable representation a real response would
/// carry. Implementations must be deterministic and side-effect-free for a
/// given model; the documentation output is compared byte-for-byte across
/// runs.
pub trait Transformer: Send + Sync {
    fn transform(&self, model: &Value) -> Value;
}

impl<F> Transformer for F
where
    F: Fn(&Value) -> Value + Send + Sync,
{
    fn transform(&self, model: &Value) -> Value {
        self(model)
    }
}

/// Factory producing the representative sample instance of a model.
///
/// Factories must use fixed field values, never random or time-based data.
pub type SampleFactory = Box<dyn Fn() -> Value + Send + Sync>;

/// Registry of model sample factories, keyed by model name
#[derive(Default)]
pub struct ModelRegistry {
    factories: HashMap<String, SampleFactory>,
}

impl ModelRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sample factory under a model name
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Build the representative sample of a named model
    pub fn sample(&self, name: &str) -> Result<Value> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| Error::UnknownModel(name.to_string()))?;
        Ok(factory())
    }

    /// Whether a model name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

struct TransformerEntry {
    transformer: Box<dyn Transformer>,
    default_model: Option<String>,
}

/// Registry of transformation adapters, keyed by adapter name.
///
/// An entry may carry a default model name, used when a route's annotations
/// name the adapter but no model; the original resolves the same default
/// from the adapter's signature via reflection.
#[derive(Default)]
pub struct TransformerRegistry {
    entries: HashMap<String, TransformerEntry>,
}

impl TransformerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter with no default model
    pub fn register<T>(&mut self, name: impl Into<String>, transformer: T)
    where
        T: Transformer + 'static,
    {
        self.entries.insert(
            name.into(),
            TransformerEntry {
                transformer: Box::new(transformer),
                default_model: None,
            },
        );
    }

    /// Register an adapter together with its default model name
    pub fn register_with_model<T>(
        &mut self,
        name: impl Into<String>,
        default_model: impl Into<String>,
        transformer: T,
    ) where
        T: Transformer + 'static,
    {
        self.entries.insert(
            name.into(),
            TransformerEntry {
                transformer: Box::new(transformer),
                default_model: Some(default_model.into()),
            },
        );
    }

    /// Look up an adapter and its default model name
    pub fn get(&self, name: &str) -> Option<(&dyn Transformer, Option<&str>)> {
        self.entries.get(name).map(|entry| {
            (
                entry.transformer.as_ref(),
                entry.default_model.as_deref(),
            )
        })
    }
}

/// Wrap a transformed value as a single-item response envelope
pub fn wrap_item(transformed: Value) -> Value {
    json!({ "data": transformed })
}

/// Wrap a transformed value as a two-element collection envelope
pub fn wrap_collection(transformed: Value) -> Value {
    json!({ "data": [transformed.clone(), transformed] })
}
