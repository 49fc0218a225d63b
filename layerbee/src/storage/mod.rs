//! Key/value persistence for learner progress, cart, orders and theme.
//!
//! Values are JSON strings stored under fixed keys, so a store can be
//! inspected by hand and the records keep the field names the web site
//! used.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::errors::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Key for learner progress.
pub const PROGRESS_KEY: &str = "layerbee_progress";
/// Key for the shopping cart.
pub const CART_KEY: &str = "layerbee_cart";
/// Key for submitted orders.
pub const ORDERS_KEY: &str = "layerbee_orders";
/// Key for the theme preference.
pub const THEME_KEY: &str = "layerbee_theme";

/// A string-to-string store.
pub trait KeyValueStore: Send + Sync {
    /// Reads a value.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes a value. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Reads and deserializes a JSON value.
///
/// # Errors
///
/// Fails if the store fails or the stored value is not valid JSON for `T`.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    store
        .get(key)?
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(Into::into)
}

/// Serializes and writes a JSON value.
///
/// # Errors
///
/// Fails if serialization or the store fails.
pub fn save_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}
