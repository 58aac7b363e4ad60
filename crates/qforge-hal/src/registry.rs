//! Backend registry for managing available backends.
//!
//! The [`BackendRegistry`] is the central point for discovering and
//! creating backend instances by name. It holds factories, which build a
//! fresh backend per configuration, and shared instances.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::backend::{Backend, BackendConfig, BackendFactory};
use crate::error::{HalError, HalResult};

/// Factory function type for registered backends.
type Factory = Box<dyn Fn(BackendConfig) -> HalResult<Arc<dyn Backend>> + Send + Sync>;

/// Central registry for backends.
pub struct BackendRegistry {
    /// Backend factories keyed by name.
    factories: FxHashMap<String, Factory>,
    /// Shared, already-constructed backends keyed by name.
    instances: FxHashMap<String, Arc<dyn Backend>>,
}

impl BackendRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            factories: FxHashMap::default(),
            instances: FxHashMap::default(),
        }
    }

    /// Register a backend type through its [`BackendFactory`] impl.
    pub fn register<B>(&mut self, name: impl Into<String>)
    where
        B: BackendFactory + 'static,
    {
        let name = name.into();
        debug!("Registering backend factory: {}", name);
        self.factories.insert(
            name,
            Box::new(|config| {
                let backend = B::from_config(config)?;
                Ok(Arc::new(backend))
            }),
        );
    }

    /// Register a backend factory with a custom constructor.
    pub fn register_factory(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn(BackendConfig) -> HalResult<Arc<dyn Backend>> + Send + Sync + 'static,
    ) {
        let name = name.into();
        debug!("Registering custom backend factory: {}", name);
        self.factories.insert(name, Box::new(factory));
    }

    /// Register a shared backend instance.
    pub fn register_instance(&mut self, name: impl Into<String>, backend: Arc<dyn Backend>) {
        let name = name.into();
        debug!("Registering backend instance: {}", name);
        self.instances.insert(name, backend);
    }

    /// Get a shared instance, or build one with a default config.
    pub fn get(&self, name: &str) -> HalResult<Arc<dyn Backend>> {
        if let Some(backend) = self.instances.get(name) {
            return Ok(Arc::clone(backend));
        }
        self.create(name, BackendConfig::new(name))
    }

    /// Create a backend by name from `config`.
    pub fn create(&self, name: &str, config: BackendConfig) -> HalResult<Arc<dyn Backend>> {
        match self.factories.get(name) {
            Some(factory) => factory(config),
            None => Err(HalError::Configuration(format!(
                "No backend registered with name '{name}'"
            ))),
        }
    }

    /// List all available backend names.
    pub fn available_backends(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .factories
            .keys()
            .chain(self.instances.keys())
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Check if a backend is available by name.
    pub fn has_backend(&self, name: &str) -> bool {
        self.factories.contains_key(name) || self.instances.contains_key(name)
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}
