use std::collections::HashMap;

use async_trait::async_trait;

use super::repository::{EntryRepository, RepositoryError};

/// Backend-agnostic connection configuration.
///
/// `backend` must match the [`RepositoryFactory::backend_name`] of a
/// registered factory; `connection_string` is passed through to that
/// factory unchanged and its meaning is entirely backend-specific
/// (for `sqlite`: a file path or `:memory:`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub backend: String,
    pub connection_string: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection_string: ":memory:".to_string(),
        }
    }
}

/// One implementation per storage backend, registered with a
/// [`RepositoryRegistry`] at startup.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Open (or create) a connection and return a ready-to-use repository.
    /// Implementations are free to run migrations inside this method.
    async fn create(&self, config: &DbConfig)
    -> Result<Box<dyn EntryRepository>, RepositoryError>;
}

/// Registry of [`RepositoryFactory`] instances, keyed by backend name.
pub struct RepositoryRegistry {
    factories: HashMap<&'static str, Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registers a backend factory; a factory with the same name silently
    /// replaces any previous one.
    pub fn register(&mut self, factory: Box<dyn RepositoryFactory>) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatches to the factory matching `config.backend`.
    ///
    /// # Errors
    ///
    /// [`RepositoryError::Configuration`] if no factory is registered for
    /// the requested backend, plus any error the factory itself returns.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn EntryRepository>, RepositoryError> {
        let factory = self.factories.get(config.backend.as_str()).ok_or_else(|| {
            RepositoryError::Configuration(format!(
                "unknown backend '{}'; available: {:?}",
                config.backend,
                self.available_backends()
            ))
        })?;

        factory.create(config).await
    }
}

impl Default for RepositoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use crate::models::{Entry, NewEntry};

    use super::*;

    // A repository whose methods are never reached; the tests only verify
    // that the registry routes to the correct factory.
    struct StubRepository;

    #[async_trait]
    impl EntryRepository for StubRepository {
        async fn save_entry(&self, _entry: NewEntry) -> Result<Entry, RepositoryError> {
            unimplemented!()
        }
        async fn get_entry(&self, _id: i64) -> Result<Entry, RepositoryError> {
            unimplemented!()
        }
        async fn list_entries(&self) -> Result<Vec<Entry>, RepositoryError> {
            unimplemented!()
        }
        async fn delete_entry(&self, _id: i64) -> Result<(), RepositoryError> {
            unimplemented!()
        }
    }

    struct StubFactory {
        name: &'static str,
        called: Arc<AtomicBool>,
    }

    #[async_trait]
    impl RepositoryFactory for StubFactory {
        fn backend_name(&self) -> &'static str {
            self.name
        }
        async fn create(
            &self,
            _config: &DbConfig,
        ) -> Result<Box<dyn EntryRepository>, RepositoryError> {
            self.called.store(true, Ordering::SeqCst);
            Ok(Box::new(StubRepository))
        }
    }

    fn stub_factory(name: &'static str) -> (Box<dyn RepositoryFactory>, Arc<AtomicBool>) {
        let flag = Arc::new(AtomicBool::new(false));
        (
            Box::new(StubFactory {
                name,
                called: flag.clone(),
            }),
            flag,
        )
    }

    #[test]
    fn default_config_is_in_memory_sqlite() {
        let config = DbConfig::default();

        assert_eq!(config.backend, "sqlite");
        assert_eq!(config.connection_string, ":memory:");
    }

    #[test]
    fn available_backends_is_sorted() {
        let mut registry = RepositoryRegistry::new();
        let (sqlite, _) = stub_factory("sqlite");
        let (postgres, _) = stub_factory("postgres");
        registry.register(sqlite);
        registry.register(postgres);

        assert_eq!(registry.available_backends(), vec!["postgres", "sqlite"]);
    }

    #[tokio::test]
    async fn create_calls_the_matching_factory() {
        let mut registry = RepositoryRegistry::new();
        let (factory, called) = stub_factory("sqlite");
        registry.register(factory);

        let result = registry.create(&DbConfig::default()).await;

        assert!(result.is_ok());
        assert!(called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn unknown_backend_is_a_configuration_error() {
        let registry = RepositoryRegistry::new();
        let config = DbConfig {
            backend: "nope".to_string(),
            connection_string: "x".to_string(),
        };

        let error = registry
            .create(&config)
            .await
            .err()
            .expect("expected an error for an unknown backend");

        match error {
            RepositoryError::Configuration(message) => assert!(message.contains("nope")),
            other => panic!("expected Configuration error, got {other:?}"),
        }
    }
}
