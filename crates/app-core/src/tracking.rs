//! Order status tracking
//!
//! A placed order moves through a fixed six-stage sequence, one stage at a
//! time, never backwards. The tracker is a pure reducer: an external driver
//! (a server push channel, or a timer while the backend is mocked) decides
//! *when* to feed it events, the tracker only validates *that* a transition
//! is legal. Illegal events are idempotent no-ops, never errors; the tracker
//! mirrors externally reported state and favors availability.

use serde::{Deserialize, Serialize};

/// Lifecycle stage of a placed order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    /// Order received
    Placed,
    /// Restaurant accepted the order
    Confirmed,
    /// Food is being prepared
    Preparing,
    /// Ready for pickup / handoff
    Ready,
    /// Courier is on the way
    OutForDelivery,
    /// Order completed
    Delivered,
    /// Order cancelled; terminal, outside the main sequence
    Cancelled,
}

/// The fixed stage sequence, in order; `cancelled` sits outside it
pub const ORDER_STATUS_SEQUENCE: [OrderStatus; 6] = [
    OrderStatus::Placed,
    OrderStatus::Confirmed,
    OrderStatus::Preparing,
    OrderStatus::Ready,
    OrderStatus::OutForDelivery,
    OrderStatus::Delivered,
];

impl OrderStatus {
    /// Human-readable stage label, as shown on the tracking screen
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "Order Placed",
            OrderStatus::Confirmed => "Restaurant Confirmed",
            OrderStatus::Preparing => "Preparing your food",
            OrderStatus::Ready => "Ready for pickup",
            OrderStatus::OutForDelivery => "Out for delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Order Cancelled",
        }
    }

    /// Whether no further transition is possible from this status
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether an order with this status still counts as in progress
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }
}

/// One observed status transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingUpdate {
    /// The status entered
    pub status: OrderStatus,
    /// When the transition was observed (RFC 3339)
    pub timestamp: String,
    /// Human-readable message for the update feed
    pub message: String,
}

/// An event from the status-advancement driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEvent {
    /// Move forward one stage
    Advance,
    /// Cancel the order
    Cancel,
}

/// Tracks one placed order through the status sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTracker {
    order_id: String,
    current_index: usize,
    cancelled: bool,
    updates: Vec<TrackingUpdate>,
}

impl OrderTracker {
    /// Start tracking a freshly placed order
    pub fn new(order_id: impl Into<String>, placed_at: impl Into<String>) -> Self {
        let placed = OrderStatus::Placed;
        Self {
            order_id: order_id.into(),
            current_index: 0,
            cancelled: false,
            updates: vec![TrackingUpdate {
                status: placed,
                timestamp: placed_at.into(),
                message: placed.label().to_string(),
            }],
        }
    }

    /// The tracked order's id
    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    /// The current status
    pub fn current_status(&self) -> OrderStatus {
        if self.cancelled {
            OrderStatus::Cancelled
        } else {
            ORDER_STATUS_SEQUENCE[self.current_index]
        }
    }

    /// Index of the current stage within the main sequence
    ///
    /// Monotonically non-decreasing; stays where it was when the order is
    /// cancelled.
    pub fn current_status_index(&self) -> usize {
        self.current_index
    }

    /// Whether no further transition is possible
    pub fn is_terminal(&self) -> bool {
        self.current_status().is_terminal()
    }

    /// The observed transitions so far, oldest first
    pub fn updates(&self) -> &[TrackingUpdate] {
        &self.updates
    }

    /// Advance one stage
    ///
    /// Legal only while the order is neither delivered nor cancelled;
    /// anything else is a no-op. Returns whether the tracker moved.
    pub fn advance(&mut self, timestamp: impl Into<String>) -> bool {
        if self.cancelled || self.current_index >= ORDER_STATUS_SEQUENCE.len() - 1 {
            return false;
        }

        self.current_index += 1;
        let status = ORDER_STATUS_SEQUENCE[self.current_index];
        self.updates.push(TrackingUpdate {
            status,
            timestamp: timestamp.into(),
            message: status.label().to_string(),
        });
        tracing::debug!(order_id = %self.order_id, status = ?status, "order advanced");
        true
    }

    /// Cancel the order
    ///
    /// Legal from any state except delivered; cancelling twice, or after
    /// delivery, is a no-op. Returns whether the tracker moved.
    pub fn cancel(&mut self, timestamp: impl Into<String>) -> bool {
        if self.is_terminal() {
            return false;
        }

        self.cancelled = true;
        self.updates.push(TrackingUpdate {
            status: OrderStatus::Cancelled,
            timestamp: timestamp.into(),
            message: OrderStatus::Cancelled.label().to_string(),
        });
        tracing::info!(order_id = %self.order_id, "order cancelled");
        true
    }

    /// Apply an event from the external driver
    pub fn apply(&mut self, event: StatusEvent, timestamp: impl Into<String>) -> bool {
        match event {
            StatusEvent::Advance => self.advance(timestamp),
            StatusEvent::Cancel => self.cancel(timestamp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> OrderTracker {
        OrderTracker::new("1001", "2024-03-01T12:00:00Z")
    }

    #[test]
    fn test_starts_at_placed() {
        let tracker = tracker();
        assert_eq!(tracker.current_status(), OrderStatus::Placed);
        assert_eq!(tracker.current_status_index(), 0);
        assert_eq!(tracker.updates().len(), 1);
        assert_eq!(tracker.updates()[0].message, "Order Placed");
    }

    #[test]
    fn test_five_advances_reach_delivered() {
        let mut tracker = tracker();

        for _ in 0..5 {
            assert!(tracker.advance("2024-03-01T12:05:00Z"));
        }

        assert_eq!(tracker.current_status(), OrderStatus::Delivered);
        assert!(tracker.is_terminal());
        // One update per stage.
        assert_eq!(tracker.updates().len(), 6);
    }

    #[test]
    fn test_advance_past_delivered_is_noop() {
        let mut tracker = tracker();
        for _ in 0..5 {
            tracker.advance("2024-03-01T12:05:00Z");
        }

        assert!(!tracker.advance("2024-03-01T13:00:00Z"));
        assert_eq!(tracker.current_status(), OrderStatus::Delivered);
        assert_eq!(tracker.updates().len(), 6);
    }

    #[test]
    fn test_cancel_from_preparing() {
        let mut tracker = tracker();
        tracker.advance("2024-03-01T12:02:00Z"); // confirmed
        tracker.advance("2024-03-01T12:04:00Z"); // preparing
        assert_eq!(tracker.current_status(), OrderStatus::Preparing);

        assert!(tracker.cancel("2024-03-01T12:06:00Z"));
        assert_eq!(tracker.current_status(), OrderStatus::Cancelled);
        assert!(tracker.is_terminal());

        // Terminal: neither advancing nor cancelling again moves anything.
        assert!(!tracker.advance("2024-03-01T12:07:00Z"));
        assert!(!tracker.cancel("2024-03-01T12:07:00Z"));
        assert_eq!(tracker.current_status(), OrderStatus::Cancelled);
    }

    #[test]
    fn test_cancel_after_delivered_is_noop() {
        let mut tracker = tracker();
        for _ in 0..5 {
            tracker.advance("2024-03-01T12:05:00Z");
        }

        assert!(!tracker.cancel("2024-03-01T13:00:00Z"));
        assert_eq!(tracker.current_status(), OrderStatus::Delivered);
    }

    #[test]
    fn test_index_never_decreases() {
        let mut tracker = tracker();
        let mut last = tracker.current_status_index();

        let events = [
            StatusEvent::Advance,
            StatusEvent::Advance,
            StatusEvent::Cancel,
            StatusEvent::Advance,
            StatusEvent::Cancel,
        ];
        for event in events {
            tracker.apply(event, "2024-03-01T12:10:00Z");
            assert!(tracker.current_status_index() >= last);
            last = tracker.current_status_index();
        }
    }

    #[test]
    fn test_apply_dispatches() {
        let mut tracker = tracker();

        assert!(tracker.apply(StatusEvent::Advance, "2024-03-01T12:02:00Z"));
        assert_eq!(tracker.current_status(), OrderStatus::Confirmed);

        assert!(tracker.apply(StatusEvent::Cancel, "2024-03-01T12:03:00Z"));
        assert_eq!(tracker.current_status(), OrderStatus::Cancelled);
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_value(OrderStatus::OutForDelivery).unwrap(),
            "out-for-delivery"
        );
        assert_eq!(serde_json::to_value(OrderStatus::Placed).unwrap(), "placed");

        let parsed: OrderStatus = serde_json::from_value(serde_json::json!("cancelled")).unwrap();
        assert_eq!(parsed, OrderStatus::Cancelled);
    }

    #[test]
    fn test_active_statuses() {
        for status in ORDER_STATUS_SEQUENCE {
            if status == OrderStatus::Delivered {
                assert!(!status.is_active());
            } else {
                assert!(status.is_active());
            }
        }
        assert!(!OrderStatus::Cancelled.is_active());
    }
}
