//! Application state for Campus Bites
//!
//! This crate holds the persisted state stores (cart draft, settings, auth)
//! and the app context that owns them. Stores are synchronous: every
//! mutation completes immediately under the store's lock, and persistence
//! happens at explicit checkpoints through the context.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod cart;
pub mod context;
pub mod settings;

pub use auth::{AuthSnapshot, AuthStore, User, UserPatch};
pub use cart::{
    AddOutcome, CartDraft, CartLine, CartStore, DeliveryAddress, NewCartLine, OrderType,
    RestaurantRef,
};
pub use context::AppContext;
pub use settings::{Settings, SettingsStore, ThemePreference};
