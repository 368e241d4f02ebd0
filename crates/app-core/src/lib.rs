//! Domain services for Campus Bites
//!
//! Catalog access (restaurants, menus, categories), checkout and order
//! records, and the order-status tracker. Services answer from the built-in
//! mock dataset unless an HTTP client is attached.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod orders;
pub mod tracking;

pub use catalog::{
    CatalogError, CatalogService, Category, Customization, CustomizationOption, MenuItem,
    Restaurant,
};
pub use orders::{checkout_summary, CheckoutSummary, Order, OrderError, OrderItem, OrderService};
pub use tracking::{OrderStatus, OrderTracker, StatusEvent, TrackingUpdate, ORDER_STATUS_SEQUENCE};
