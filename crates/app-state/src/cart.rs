//! Shopping cart draft state
//!
//! This module owns the single in-progress order draft: its line items, the
//! restaurant the draft is bound to, and the order type/schedule/address the
//! user has picked. A cart only ever holds lines from one restaurant; adding
//! an item from a different restaurant replaces the draft outright, and the
//! replacement is reported back to the caller so a screen can surface it.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// How the order will be fulfilled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    /// Delivered to a hostel room
    #[default]
    Delivery,
    /// Eaten at the restaurant
    DineIn,
    /// Picked up at the counter
    Takeaway,
}

/// On-campus delivery address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    /// Hostel block name or number
    pub hostel_block: String,
    /// Room number within the block
    pub room_number: String,
}

/// One distinct orderable entry in the draft
///
/// `name` and `unit_price` are snapshots of catalog data at the time of the
/// add; they are not re-synced if the catalog changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Store-assigned line id, unique within the draft
    pub id: String,

    /// Catalog item this line orders (not owned by the cart)
    pub menu_item_id: String,

    /// Restaurant the item belongs to
    pub restaurant_id: String,

    /// Item name at time of add
    pub name: String,

    /// Price per unit at time of add, in whole currency units
    pub unit_price: u32,

    /// Number of units; at least 1 while the line exists
    pub quantity: u32,

    /// Item image URL, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Selected option labels, in selection order
    #[serde(default)]
    pub customizations: Vec<String>,

    /// Free-text instructions for the kitchen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

impl CartLine {
    /// Total price of this line (`unit_price * quantity`)
    pub fn line_total(&self) -> u32 {
        self.unit_price * self.quantity
    }
}

/// A candidate line, before the store assigns it an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartLine {
    /// Catalog item being ordered
    pub menu_item_id: String,
    /// Item name snapshot
    pub name: String,
    /// Price per unit snapshot, in whole currency units
    pub unit_price: u32,
    /// Number of units requested
    pub quantity: u32,
    /// Item image URL, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Selected option labels, in selection order
    #[serde(default)]
    pub customizations: Vec<String>,
    /// Free-text instructions for the kitchen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

impl NewCartLine {
    /// Create a plain candidate line with no customizations
    pub fn new(
        menu_item_id: impl Into<String>,
        name: impl Into<String>,
        unit_price: u32,
        quantity: u32,
    ) -> Self {
        Self {
            menu_item_id: menu_item_id.into(),
            name: name.into(),
            unit_price,
            quantity,
            image: None,
            customizations: Vec::new(),
            special_instructions: None,
        }
    }

    /// Set the selected customization labels
    pub fn customizations(mut self, labels: Vec<String>) -> Self {
        self.customizations = labels;
        self
    }

    /// Set special instructions
    pub fn special_instructions(mut self, text: impl Into<String>) -> Self {
        self.special_instructions = Some(text.into());
        self
    }
}

/// Restaurant identity captured when the cart binds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantRef {
    /// Restaurant id
    pub id: String,
    /// Restaurant display name
    pub name: String,
}

impl RestaurantRef {
    /// Create a restaurant reference
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// The serializable cart draft
///
/// This is the store's full state: what gets persisted, restored, and handed
/// to checkout. Derived totals are computed from it on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CartDraft {
    /// Lines in insertion order
    #[serde(default)]
    pub lines: Vec<CartLine>,

    /// Restaurant the draft is bound to; unset while the cart is empty
    pub restaurant_id: Option<String>,

    /// Display name of the bound restaurant
    pub restaurant_name: Option<String>,

    /// Fulfilment type; survives `clear`
    #[serde(default)]
    pub order_type: OrderType,

    /// Optional scheduled pickup/delivery slot; cleared with the cart
    pub scheduled_time: Option<String>,

    /// Delivery address, set at checkout confirmation; survives `clear`
    pub delivery_address: Option<DeliveryAddress>,
}

impl CartDraft {
    /// Whether the draft holds no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across all lines
    pub fn total_item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Sum of `unit_price * quantity` across all lines
    pub fn subtotal(&self) -> u32 {
        self.lines.iter().map(CartLine::line_total).sum()
    }
}

/// What an `add_item` call did to the draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended
    Added {
        /// Id of the new line
        line_id: String,
    },

    /// The quantity was merged into an existing identical line
    Merged {
        /// Id of the line that absorbed the quantity
        line_id: String,
        /// The line's quantity after the merge
        quantity: u32,
    },

    /// The draft held another restaurant's items; they were discarded and
    /// the cart rebound before the new line was inserted
    ReplacedCart {
        /// Id of the new line
        line_id: String,
        /// Name of the restaurant whose items were discarded
        previous_restaurant: String,
    },
}

impl AddOutcome {
    /// Id of the line the added quantity ended up on
    pub fn line_id(&self) -> &str {
        match self {
            AddOutcome::Added { line_id }
            | AddOutcome::Merged { line_id, .. }
            | AddOutcome::ReplacedCart { line_id, .. } => line_id,
        }
    }
}

/// The cart store
///
/// One instance per app context. Mutations are synchronous and atomic: each
/// takes the write lock once, and no partial update is observable.
pub struct CartStore {
    draft: RwLock<CartDraft>,
    next_line_id: AtomicU64,
}

impl CartStore {
    /// Create an empty cart store
    pub fn new() -> Self {
        Self {
            draft: RwLock::new(CartDraft::default()),
            next_line_id: AtomicU64::new(1),
        }
    }

    fn mint_line_id(&self) -> String {
        format!("line-{}", self.next_line_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Add a candidate line for `restaurant` to the draft
    ///
    /// Merges into an existing line when `menu_item_id` and the
    /// customization sequence match exactly; otherwise appends. If the draft
    /// is bound to a different restaurant, its lines are discarded first and
    /// the returned outcome names the displaced restaurant. Never fails.
    pub fn add_item(&self, line: NewCartLine, restaurant: &RestaurantRef) -> AddOutcome {
        let mut draft = self.draft.write();

        // A line always carries at least one unit.
        let quantity = line.quantity.max(1);

        let displaced = match draft.restaurant_id.as_deref() {
            Some(bound) if bound != restaurant.id => draft
                .restaurant_name
                .clone()
                .or_else(|| Some(bound.to_string())),
            _ => None,
        };

        if let Some(previous_restaurant) = displaced {
            tracing::info!(
                from = %previous_restaurant,
                to = %restaurant.name,
                "cart switched restaurants, discarding previous lines"
            );
            draft.lines.clear();
            draft.restaurant_id = Some(restaurant.id.clone());
            draft.restaurant_name = Some(restaurant.name.clone());

            let line_id = self.mint_line_id();
            draft.lines.push(CartLine {
                id: line_id.clone(),
                menu_item_id: line.menu_item_id,
                restaurant_id: restaurant.id.clone(),
                name: line.name,
                unit_price: line.unit_price,
                quantity,
                image: line.image,
                customizations: line.customizations,
                special_instructions: line.special_instructions,
            });
            return AddOutcome::ReplacedCart { line_id, previous_restaurant };
        }

        // Same restaurant (or empty cart): merge into an identical line if
        // one exists. Customizations compare by value, order-sensitive.
        if let Some(existing) = draft.lines.iter_mut().find(|existing| {
            existing.menu_item_id == line.menu_item_id
                && existing.customizations == line.customizations
        }) {
            existing.quantity += quantity;
            let merged = AddOutcome::Merged {
                line_id: existing.id.clone(),
                quantity: existing.quantity,
            };
            tracing::debug!(line_id = %existing.id, quantity = existing.quantity, "merged cart line");
            return merged;
        }

        if draft.restaurant_id.is_none() {
            draft.restaurant_id = Some(restaurant.id.clone());
            draft.restaurant_name = Some(restaurant.name.clone());
        }

        let line_id = self.mint_line_id();
        draft.lines.push(CartLine {
            id: line_id.clone(),
            menu_item_id: line.menu_item_id,
            restaurant_id: restaurant.id.clone(),
            name: line.name,
            unit_price: line.unit_price,
            quantity,
            image: line.image,
            customizations: line.customizations,
            special_instructions: line.special_instructions,
        });
        tracing::debug!(line_id = %line_id, "added cart line");
        AddOutcome::Added { line_id }
    }

    /// Delete the line with `line_id`; no-op if absent
    ///
    /// Removing the last line also clears the restaurant binding so the next
    /// `add_item` can bind freely.
    pub fn remove_item(&self, line_id: &str) {
        let mut draft = self.draft.write();
        draft.lines.retain(|line| line.id != line_id);
        if draft.lines.is_empty() {
            draft.restaurant_id = None;
            draft.restaurant_name = None;
        }
    }

    /// Replace the quantity of the line with `line_id`
    ///
    /// A quantity of 0 removes the line, exactly like `remove_item`. No-op
    /// if the id is unknown.
    pub fn update_quantity(&self, line_id: &str, quantity: u32) {
        if quantity == 0 {
            self.remove_item(line_id);
            return;
        }

        let mut draft = self.draft.write();
        if let Some(line) = draft.lines.iter_mut().find(|line| line.id == line_id) {
            line.quantity = quantity;
        }
    }

    /// Empty the draft
    ///
    /// Clears the lines, restaurant binding, and scheduled time. Order type
    /// and delivery address are user preferences that outlive a single order
    /// and are kept.
    pub fn clear(&self) {
        let mut draft = self.draft.write();
        draft.lines.clear();
        draft.restaurant_id = None;
        draft.restaurant_name = None;
        draft.scheduled_time = None;
    }

    /// Set the fulfilment type
    pub fn set_order_type(&self, order_type: OrderType) {
        self.draft.write().order_type = order_type;
    }

    /// Set or clear the scheduled pickup/delivery slot
    pub fn set_scheduled_time(&self, time: Option<String>) {
        self.draft.write().scheduled_time = time;
    }

    /// Set or clear the delivery address
    pub fn set_delivery_address(&self, address: Option<DeliveryAddress>) {
        self.draft.write().delivery_address = address;
    }

    /// Sum of quantities across all lines
    pub fn total_item_count(&self) -> u32 {
        self.draft.read().total_item_count()
    }

    /// Sum of `unit_price * quantity` across all lines
    pub fn subtotal(&self) -> u32 {
        self.draft.read().subtotal()
    }

    /// Whether the draft holds no lines
    pub fn is_empty(&self) -> bool {
        self.draft.read().is_empty()
    }

    /// Number of distinct lines
    pub fn line_count(&self) -> usize {
        self.draft.read().lines.len()
    }

    /// Clone of the full draft, for display or persistence
    pub fn snapshot(&self) -> CartDraft {
        self.draft.read().clone()
    }

    /// Replace the draft with a restored snapshot
    ///
    /// Reseeds the line-id counter past the highest restored suffix so new
    /// lines keep getting unique ids.
    pub fn restore(&self, snapshot: CartDraft) {
        let max_seen = snapshot
            .lines
            .iter()
            .filter_map(|line| line.id.strip_prefix("line-"))
            .filter_map(|suffix| suffix.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        self.next_line_id
            .fetch_max(max_seen + 1, Ordering::Relaxed);
        *self.draft.write() = snapshot;
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}
