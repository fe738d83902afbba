//! Command implementations.
//!
//! Every command runs against a [`Context`]: configuration from the
//! environment, state restored from the state directory, and the catalog
//! products are looked up in.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod lists;

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use yasira_core::{ProductId, ProductSnapshot};
use yasira_storefront::{
    Catalog, FileStorage, JsonCatalog, PersistenceAdapter, ShopState, StorageKey, StoreConfig,
    StoreError,
};

/// Errors surfaced to the terminal.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The storefront rejected the operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// JSON output could not be rendered.
    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

macro_rules! from_store_error {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for CommandError {
                fn from(err: $source) -> Self {
                    Self::Store(err.into())
                }
            }
        )*
    };
}

from_store_error!(
    yasira_storefront::CartError,
    yasira_storefront::CollectionError,
    yasira_storefront::CheckoutError,
    yasira_storefront::AuthError,
    yasira_storefront::CatalogError,
    yasira_storefront::ConfigError,
    yasira_storefront::PersistenceError,
);

/// Loaded configuration and state for one invocation.
pub struct Context {
    pub config: StoreConfig,
    pub state: ShopState,
    pub json: bool,
    adapter: PersistenceAdapter<FileStorage>,
    catalog: Option<JsonCatalog>,
}

impl Context {
    /// Read configuration and restore state from disk.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::Store` if the configuration is invalid.
    pub fn load(
        state_dir: Option<PathBuf>,
        catalog_path: Option<PathBuf>,
        json: bool,
    ) -> Result<Self, CommandError> {
        let mut config = StoreConfig::from_env()?;
        if let Some(dir) = state_dir {
            config.state_dir = dir;
        }
        if let Some(path) = catalog_path {
            config.catalog_path = path;
        }

        tracing::debug!(state_dir = %config.state_dir.display(), "Restoring state");
        let adapter = PersistenceAdapter::new(
            FileStorage::new(config.state_dir.clone()),
            config.namespace.clone(),
        );
        let state = ShopState::restore(adapter.clone(), &config);

        Ok(Self {
            config,
            state,
            json,
            adapter,
            catalog: None,
        })
    }

    /// The catalog, loaded on first use.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Catalog` if the catalog cannot be loaded.
    pub fn catalog(&mut self) -> Result<&JsonCatalog, CommandError> {
        let catalog = match self.catalog.take() {
            Some(catalog) => catalog,
            None => JsonCatalog::from_path(&self.config.catalog_path)?,
        };
        Ok(self.catalog.insert(catalog))
    }

    /// Snapshot a product out of the catalog.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Catalog` if the catalog cannot be loaded and
    /// `StoreError::ProductNotFound` if the ID is unknown.
    pub fn product(&mut self, id: ProductId) -> Result<ProductSnapshot, CommandError> {
        self.catalog()?
            .product(id)
            .cloned()
            .ok_or_else(|| StoreError::ProductNotFound(id).into())
    }

    /// Delete every saved record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if a state file cannot be removed.
    pub fn reset(&self) -> Result<(), CommandError> {
        for slot in StorageKey::ALL {
            self.adapter.forget(slot)?;
        }
        tracing::info!(state_dir = %self.adapter.storage().dir().display(), "Cleared saved state");
        self.say("Saved state cleared");
        Ok(())
    }

    /// Print a confirmation line unless JSON output was requested.
    #[allow(clippy::print_stdout)]
    pub fn say(&self, message: &str) {
        if !self.json {
            println!("{message}");
        }
    }
}

/// Print `value` as pretty JSON.
///
/// # Errors
///
/// Returns `CommandError::Output` if serialization fails.
#[allow(clippy::print_stdout)]
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CommandError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
