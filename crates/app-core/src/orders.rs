//! Checkout and order records
//!
//! Turns a cart snapshot into a placed order: computes the price breakdown,
//! validates what the checkout screen validated, produces the immutable
//! `Order` record, and seeds a status tracker for it. Also serves the order
//! history (mock-seeded, plus anything placed this session).

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

use api_client::{ApiClient, ApiError};
use app_state::{CartDraft, DeliveryAddress, OrderType};
use chrono::{DateTime, Utc};

use crate::tracking::{OrderStatus, OrderTracker};

/// Flat delivery fee in whole currency units
const DELIVERY_FEE: u32 = 25;

/// Order error types
#[derive(Debug, Error)]
pub enum OrderError {
    /// The cart has no lines to place
    #[error("Cannot place an order from an empty cart")]
    EmptyCart,

    /// A delivery order needs a delivery address
    #[error("Delivery orders need a hostel block and room number")]
    MissingDeliveryAddress,

    /// Unknown order id
    #[error("Order not found: {0}")]
    NotFound(String),

    /// API error
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

/// Result type for order operations
pub type Result<T> = std::result::Result<T, OrderError>;

/// One line of a placed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Catalog item ordered
    pub menu_item_id: String,
    /// Item name at time of order
    pub name: String,
    /// Number of units
    pub quantity: u32,
    /// Price per unit at time of order
    pub unit_price: u32,
    /// Selected option labels
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub customizations: Vec<String>,
}

/// An immutable placed-order record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Opaque order id
    pub id: String,
    /// Restaurant the order was placed with
    pub restaurant_id: String,
    /// Restaurant display name
    pub restaurant_name: String,
    /// The ordered lines
    pub items: Vec<OrderItem>,
    /// Current lifecycle status
    pub status: OrderStatus,
    /// How the order is fulfilled
    pub order_type: OrderType,
    /// Delivery address, for delivery orders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<DeliveryAddress>,
    /// Table number, for dine-in orders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<String>,
    /// Sum of line totals
    pub subtotal: u32,
    /// Delivery fee charged
    pub delivery_fee: u32,
    /// Taxes charged
    pub taxes: u32,
    /// Grand total
    pub total: u32,
    /// When the order was placed (RFC 3339)
    pub created_at: String,
    /// Expected readiness window (display string)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
}

impl Order {
    /// Whether the order still counts as in progress
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Price breakdown shown at checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    /// Sum of line totals
    pub subtotal: u32,
    /// Delivery fee (flat, delivery orders only)
    pub delivery_fee: u32,
    /// 5% tax, rounded to the nearest whole unit
    pub taxes: u32,
    /// Grand total
    pub total: u32,
}

/// Compute the checkout price breakdown for a draft
pub fn checkout_summary(draft: &CartDraft) -> CheckoutSummary {
    let subtotal = draft.subtotal();
    let delivery_fee = match draft.order_type {
        OrderType::Delivery => DELIVERY_FEE,
        OrderType::DineIn | OrderType::Takeaway => 0,
    };
    let taxes = (subtotal * 5 + 50) / 100; // 5%, round half up
    CheckoutSummary {
        subtotal,
        delivery_fee,
        taxes,
        total: subtotal + delivery_fee + taxes,
    }
}

/// Order placement and history service
pub struct OrderService {
    client: Option<Arc<ApiClient>>,
    placed: RwLock<Vec<Order>>,
    next_order_id: AtomicU64,
}

impl OrderService {
    /// Create a service backed by the built-in mock history
    pub fn new() -> Self {
        Self {
            client: None,
            placed: RwLock::new(Vec::new()),
            next_order_id: AtomicU64::new(1001),
        }
    }

    /// Create a service backed by a configured backend
    pub fn with_client(client: Arc<ApiClient>) -> Self {
        Self {
            client: Some(client),
            placed: RwLock::new(Vec::new()),
            next_order_id: AtomicU64::new(1001),
        }
    }

    /// Place an order from a cart snapshot
    ///
    /// Validates what the checkout screen enforces (a non-empty cart, and an
    /// address for delivery orders), prices the draft, and returns the new
    /// order record. The caller clears the cart after a successful
    /// placement; the service never touches cart state.
    pub async fn place_order(&self, draft: &CartDraft, placed_at: DateTime<Utc>) -> Result<Order> {
        // A non-empty draft is always bound to a restaurant; treat an
        // unbound one the same as an empty one.
        let (restaurant_id, restaurant_name) =
            match (draft.restaurant_id.clone(), draft.restaurant_name.clone()) {
                (Some(id), Some(name)) if !draft.is_empty() => (id, name),
                _ => return Err(OrderError::EmptyCart),
            };

        if draft.order_type == OrderType::Delivery && draft.delivery_address.is_none() {
            return Err(OrderError::MissingDeliveryAddress);
        }

        let summary = checkout_summary(draft);
        let order = Order {
            id: self.next_order_id.fetch_add(1, Ordering::Relaxed).to_string(),
            restaurant_id,
            restaurant_name,
            items: draft
                .lines
                .iter()
                .map(|line| OrderItem {
                    menu_item_id: line.menu_item_id.clone(),
                    name: line.name.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    customizations: line.customizations.clone(),
                })
                .collect(),
            status: OrderStatus::Placed,
            order_type: draft.order_type,
            delivery_address: draft.delivery_address.clone(),
            table_number: None,
            subtotal: summary.subtotal,
            delivery_fee: summary.delivery_fee,
            taxes: summary.taxes,
            total: summary.total,
            created_at: placed_at.to_rfc3339(),
            estimated_time: Some("15-20 min".to_string()),
        };

        let order = match &self.client {
            Some(client) => client.post("/orders", &order).await?,
            None => order,
        };

        tracing::info!(order_id = %order.id, total = order.total, "order placed");
        self.placed.write().push(order.clone());
        Ok(order)
    }

    /// List all orders, newest placement first, then the seeded history
    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        if let Some(client) = &self.client {
            return Ok(client.get("/orders").await?);
        }

        let mut orders: Vec<Order> = self.placed.read().iter().rev().cloned().collect();
        orders.extend(mock::orders());
        Ok(orders)
    }

    /// Fetch one order by id
    pub async fn get_order(&self, id: &str) -> Result<Order> {
        if let Some(client) = &self.client {
            return Ok(client.get(&format!("/orders/{id}")).await?);
        }

        self.placed
            .read()
            .iter()
            .chain(mock::orders().iter())
            .find(|order| order.id == id)
            .cloned()
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    /// Orders still in progress
    pub async fn active_orders(&self) -> Result<Vec<Order>> {
        Ok(self
            .list_orders()
            .await?
            .into_iter()
            .filter(Order::is_active)
            .collect())
    }

    /// Delivered or cancelled orders
    pub async fn past_orders(&self) -> Result<Vec<Order>> {
        Ok(self
            .list_orders()
            .await?
            .into_iter()
            .filter(|order| !order.is_active())
            .collect())
    }

    /// Start a status tracker for a placed order
    pub fn tracker_for(&self, order: &Order) -> OrderTracker {
        OrderTracker::new(order.id.clone(), order.created_at.clone())
    }
}

impl Default for OrderService {
    fn default() -> Self {
        Self::new()
    }
}

/// The seeded order history
pub mod mock {
    use super::*;

    fn order_item(menu_item_id: &str, name: &str, quantity: u32, unit_price: u32) -> OrderItem {
        OrderItem {
            menu_item_id: menu_item_id.into(),
            name: name.into(),
            quantity,
            unit_price,
            customizations: Vec::new(),
        }
    }

    /// Past and in-flight orders the app starts with
    pub fn orders() -> Vec<Order> {
        vec![
            Order {
                id: "1".into(),
                restaurant_id: "1".into(),
                restaurant_name: "Pizza Paradise".into(),
                items: vec![
                    order_item("m1", "Margherita Pizza", 1, 299),
                    order_item("m3", "Garlic Bread", 1, 129),
                ],
                status: OrderStatus::Preparing,
                order_type: OrderType::Delivery,
                delivery_address: Some(DeliveryAddress {
                    hostel_block: "B".into(),
                    room_number: "214".into(),
                }),
                table_number: None,
                subtotal: 428,
                delivery_fee: 25,
                taxes: 21,
                total: 474,
                created_at: "2024-03-01T12:45:00Z".into(),
                estimated_time: Some("15-20 min".into()),
            },
            Order {
                id: "2".into(),
                restaurant_id: "2".into(),
                restaurant_name: "Burger Junction".into(),
                items: vec![
                    order_item("b1", "Double Cheese Burger", 1, 189),
                    order_item("b2", "Masala Fries", 1, 99),
                ],
                status: OrderStatus::Delivered,
                order_type: OrderType::Takeaway,
                delivery_address: None,
                table_number: None,
                subtotal: 288,
                delivery_fee: 0,
                taxes: 14,
                total: 302,
                created_at: "2024-02-29T20:30:00Z".into(),
                estimated_time: None,
            },
            Order {
                id: "3".into(),
                restaurant_id: "3".into(),
                restaurant_name: "Spice Garden".into(),
                items: vec![
                    order_item("s1", "Butter Chicken", 1, 320),
                    order_item("s2", "Garlic Naan", 2, 60),
                ],
                status: OrderStatus::Delivered,
                order_type: OrderType::Delivery,
                delivery_address: Some(DeliveryAddress {
                    hostel_block: "B".into(),
                    room_number: "214".into(),
                }),
                table_number: None,
                subtotal: 440,
                delivery_fee: 25,
                taxes: 22,
                total: 487,
                created_at: "2024-02-27T13:10:00Z".into(),
                estimated_time: None,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_state::{CartStore, NewCartLine, RestaurantRef};
    use chrono::TimeZone;

    fn placed_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn delivery_draft() -> CartDraft {
        let cart = CartStore::new();
        cart.add_item(
            NewCartLine::new("m1", "Margherita Pizza", 299, 1),
            &RestaurantRef::new("r1", "Pizza Paradise"),
        );
        cart.add_item(
            NewCartLine::new("m3", "Garlic Bread", 129, 2),
            &RestaurantRef::new("r1", "Pizza Paradise"),
        );
        cart.set_delivery_address(Some(DeliveryAddress {
            hostel_block: "B".into(),
            room_number: "214".into(),
        }));
        cart.snapshot()
    }

    #[test]
    fn test_checkout_summary_delivery() {
        let summary = checkout_summary(&delivery_draft());

        assert_eq!(summary.subtotal, 557);
        assert_eq!(summary.delivery_fee, 25);
        assert_eq!(summary.taxes, 28); // round(557 * 0.05) = round(27.85)
        assert_eq!(summary.total, 610);
    }

    #[test]
    fn test_checkout_summary_no_fee_off_delivery() {
        let cart = CartStore::new();
        cart.add_item(
            NewCartLine::new("m1", "Margherita Pizza", 299, 1),
            &RestaurantRef::new("r1", "Pizza Paradise"),
        );
        cart.set_order_type(OrderType::DineIn);

        let summary = checkout_summary(&cart.snapshot());
        assert_eq!(summary.delivery_fee, 0);
        assert_eq!(summary.total, 299 + 15); // round(14.95) = 15

        cart.set_order_type(OrderType::Takeaway);
        assert_eq!(checkout_summary(&cart.snapshot()).delivery_fee, 0);
    }

    #[test]
    fn test_checkout_summary_empty_draft() {
        let summary = checkout_summary(&CartDraft::default());
        assert_eq!(summary.subtotal, 0);
        assert_eq!(summary.taxes, 0);
        assert_eq!(summary.total, DELIVERY_FEE); // delivery is the default type
    }

    #[tokio::test]
    async fn test_place_order_builds_record() {
        let service = OrderService::new();
        let order = service.place_order(&delivery_draft(), placed_at()).await.unwrap();

        assert_eq!(order.status, OrderStatus::Placed);
        assert_eq!(order.restaurant_name, "Pizza Paradise");
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.subtotal, 557);
        assert_eq!(order.total, 610);
        assert_eq!(order.created_at, "2024-03-01T12:00:00+00:00");
        assert!(order.is_active());
    }

    #[tokio::test]
    async fn test_place_order_empty_cart() {
        let service = OrderService::new();
        let result = service.place_order(&CartDraft::default(), placed_at()).await;
        assert!(matches!(result, Err(OrderError::EmptyCart)));
    }

    #[tokio::test]
    async fn test_place_order_delivery_needs_address() {
        let service = OrderService::new();

        let mut draft = delivery_draft();
        draft.delivery_address = None;

        let result = service.place_order(&draft, placed_at()).await;
        assert!(matches!(result, Err(OrderError::MissingDeliveryAddress)));

        // Takeaway orders don't need one.
        draft.order_type = OrderType::Takeaway;
        assert!(service.place_order(&draft, placed_at()).await.is_ok());
    }

    #[tokio::test]
    async fn test_placed_orders_get_distinct_ids() {
        let service = OrderService::new();
        let draft = delivery_draft();

        let first = service.place_order(&draft, placed_at()).await.unwrap();
        let second = service.place_order(&draft, placed_at()).await.unwrap();

        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_list_orders_includes_placement_and_history() {
        let service = OrderService::new();
        let placed = service.place_order(&delivery_draft(), placed_at()).await.unwrap();

        let orders = service.list_orders().await.unwrap();
        assert_eq!(orders.len(), 4);
        // Newest placement first, then the seeded history.
        assert_eq!(orders[0].id, placed.id);
    }

    #[tokio::test]
    async fn test_get_order() {
        let service = OrderService::new();

        let seeded = service.get_order("2").await.unwrap();
        assert_eq!(seeded.restaurant_name, "Burger Junction");

        let missing = service.get_order("404").await;
        assert!(matches!(missing, Err(OrderError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_active_past_partition() {
        let service = OrderService::new();

        let active = service.active_orders().await.unwrap();
        let past = service.past_orders().await.unwrap();

        // Seeded history: one preparing, two delivered.
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].status, OrderStatus::Preparing);
        assert_eq!(past.len(), 2);
    }

    #[tokio::test]
    async fn test_tracker_seeded_from_order() {
        let service = OrderService::new();
        let order = service.place_order(&delivery_draft(), placed_at()).await.unwrap();

        let tracker = service.tracker_for(&order);
        assert_eq!(tracker.order_id(), order.id);
        assert_eq!(tracker.current_status(), OrderStatus::Placed);
        assert_eq!(tracker.updates()[0].timestamp, order.created_at);
    }

    #[test]
    fn test_order_serialization_shape() {
        let orders = mock::orders();
        let json = serde_json::to_value(&orders[0]).unwrap();

        assert_eq!(json["restaurantName"], "Pizza Paradise");
        assert_eq!(json["status"], "preparing");
        assert_eq!(json["orderType"], "delivery");
        assert_eq!(json["deliveryAddress"]["hostelBlock"], "B");
        assert_eq!(json["items"][0]["menuItemId"], "m1");
    }
}
