//! The app context
//!
//! One `AppContext` is constructed at startup, owns the state stores and the
//! snapshot handle, and is threaded through to whatever drives the app. No
//! store is reachable as a global; the context is the single composition
//! point. Stores restore from the key-value layer on construction and save
//! at explicit checkpoints.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use storage::snapshots::{Result, SnapshotError};
use storage::{KvStore, SnapshotStore};

use crate::auth::AuthStore;
use crate::cart::CartStore;
use crate::settings::SettingsStore;

/// Storage key for the cart draft
const CART_KEY: &str = "campus-bites-cart";
/// Storage key for settings
const SETTINGS_KEY: &str = "campus-bites-settings";
/// Storage key for auth state
const AUTH_KEY: &str = "campus-bites-auth";

/// Current schema version of all persisted snapshots
const SCHEMA_VERSION: u32 = 1;

/// The application context
pub struct AppContext {
    /// The cart draft store
    pub cart: CartStore,
    /// The settings store
    pub settings: SettingsStore,
    /// The auth store
    pub auth: AuthStore,
    snapshots: SnapshotStore,
}

impl AppContext {
    /// Build a context over an opened key-value store, restoring any
    /// persisted snapshots
    ///
    /// Missing records start the store at its default. Corrupt or
    /// version-mismatched records are logged and discarded in favor of
    /// defaults; only hard storage failures propagate.
    pub fn restore(kv: Arc<KvStore>) -> Result<Self> {
        let snapshots = SnapshotStore::new(kv);

        let cart = CartStore::new();
        if let Some(draft) = load_or_default(&snapshots, CART_KEY)? {
            cart.restore(draft);
        }

        let settings = SettingsStore::new();
        if let Some(snapshot) = load_or_default(&snapshots, SETTINGS_KEY)? {
            settings.restore(snapshot);
        }

        let auth = AuthStore::new();
        if let Some(snapshot) = load_or_default(&snapshots, AUTH_KEY)? {
            auth.restore(snapshot);
        }

        Ok(Self { cart, settings, auth, snapshots })
    }

    /// Persist the cart draft
    pub fn save_cart(&self) -> Result<()> {
        self.snapshots
            .save(CART_KEY, SCHEMA_VERSION, &self.cart.snapshot())
    }

    /// Persist the settings
    pub fn save_settings(&self) -> Result<()> {
        self.snapshots
            .save(SETTINGS_KEY, SCHEMA_VERSION, &self.settings.snapshot())
    }

    /// Persist the auth state
    pub fn save_auth(&self) -> Result<()> {
        self.snapshots
            .save(AUTH_KEY, SCHEMA_VERSION, &self.auth.snapshot())
    }

    /// Persist every store and flush to disk
    ///
    /// Called at defined checkpoints: after checkout, on background, on
    /// shutdown.
    pub fn checkpoint(&self) -> Result<()> {
        self.save_cart()?;
        self.save_settings()?;
        self.save_auth()?;
        self.snapshots.flush()?;
        tracing::debug!("checkpointed app state");
        Ok(())
    }
}

/// Load a snapshot, treating bad records as absent
fn load_or_default<T>(snapshots: &SnapshotStore, key: &str) -> Result<Option<T>>
where
    T: Serialize + DeserializeOwned,
{
    match snapshots.load(key, SCHEMA_VERSION) {
        Ok(found) => Ok(found),
        Err(SnapshotError::Corruption(reason)) => {
            tracing::warn!(key, %reason, "discarding corrupt snapshot");
            Ok(None)
        }
        Err(SnapshotError::VersionMismatch { expected, found }) => {
            tracing::warn!(key, expected, found, "discarding snapshot from old schema version");
            Ok(None)
        }
        Err(other) => Err(other),
    }
}
