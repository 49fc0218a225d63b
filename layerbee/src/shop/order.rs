//! Orders placed from the cart.

use super::cart::CartItem;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Characters used in order ids. `0/O` and `1/I/L` are left out so ids
/// read cleanly in a payment memo.
pub const ORDER_ID_ALPHABET: &[u8] = b"23456789ABCDEFGHJKMNPQRSTUVWXYZ";

/// Length of an order id.
pub const ORDER_ID_LEN: usize = 6;

/// Generates a random order id.
#[must_use]
pub fn generate_order_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ORDER_ID_LEN)
        .map(|_| char::from(ORDER_ID_ALPHABET[rng.gen_range(0..ORDER_ID_ALPHABET.len())]))
        .collect()
}

/// Where an order is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Waiting for a parent to pay.
    PendingPayment,
    /// Waiting for a parent to review.
    PendingReview,
    /// Any status written by another tool.
    #[serde(other)]
    Other,
}

impl OrderStatus {
    /// Returns true while the order still needs a parent.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::PendingPayment | Self::PendingReview)
    }
}

/// Who placed the order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    /// Customer name.
    pub name: String,
    /// Classroom or period for delivery.
    pub contact: String,
    /// Free-form note.
    pub note: String,
}

/// A submitted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Short id for payment memos.
    pub id: String,
    /// The cart lines at checkout.
    pub items: Vec<CartItem>,
    /// Total in cents.
    pub total_cents: u32,
    /// Customer name.
    pub customer_name: String,
    /// Classroom or period.
    pub customer_contact: String,
    /// Customer note.
    pub customer_note: String,
    /// Status.
    pub status: OrderStatus,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Creates a pending order from cart lines.
    #[must_use]
    pub fn new(items: Vec<CartItem>, customer: CustomerInfo) -> Self {
        let total_cents = items.iter().map(CartItem::total_cents).sum();
        Self {
            id: generate_order_id(),
            items,
            total_cents,
            customer_name: customer.name,
            customer_contact: customer.contact,
            customer_note: customer.note,
            status: OrderStatus::PendingPayment,
            created_at: Utc::now(),
        }
    }
}
