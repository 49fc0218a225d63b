//! Shopping cart.

use super::catalog::{Color, Product};
use crate::errors::{LayerbeeError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Most of one item a single cart line may hold.
pub const MAX_ITEM_QUANTITY: u32 = 10;

/// One line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product id.
    pub product_id: String,
    /// Product name at the time it was added.
    pub name: String,
    /// Base price in cents.
    pub base_price_cents: u32,
    /// Color name.
    pub color: String,
    /// Color upcharge in cents.
    pub color_upcharge_cents: u32,
    /// Number of items.
    pub quantity: u32,
    /// When the line was created.
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Line total in cents.
    #[must_use]
    pub const fn total_cents(&self) -> u32 {
        (self.base_price_cents + self.color_upcharge_cents) * self.quantity
    }
}

/// Ordered list of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Returns true if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds `quantity` of `product` in `color`. A line with the same product
    /// and color absorbs the quantity instead of adding a new line. A line
    /// never holds more than [`MAX_ITEM_QUANTITY`].
    pub fn add(&mut self, product: &Product, color: &Color, quantity: u32) {
        let quantity = quantity.min(MAX_ITEM_QUANTITY);
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product.id && i.color == color.name)
        {
            item.quantity = item.quantity.saturating_add(quantity).min(MAX_ITEM_QUANTITY);
            return;
        }
        self.items.push(CartItem {
            product_id: product.id.to_string(),
            name: product.name.to_string(),
            base_price_cents: product.price_cents,
            color: color.name.to_string(),
            color_upcharge_cents: color.upcharge_cents,
            quantity,
            added_at: Utc::now(),
        });
    }

    /// Removes the line at `index`.
    ///
    /// # Errors
    ///
    /// Fails if there is no such line.
    pub fn remove(&mut self, index: usize) -> Result<CartItem> {
        if index >= self.items.len() {
            return Err(LayerbeeError::NotFound(format!("cart item {index}")));
        }
        Ok(self.items.remove(index))
    }

    /// Sets the quantity of the line at `index`. Zero or less removes the
    /// line; more than [`MAX_ITEM_QUANTITY`] is capped.
    ///
    /// # Errors
    ///
    /// Fails if there is no such line.
    pub fn set_quantity(&mut self, index: usize, quantity: i64) -> Result<()> {
        if quantity <= 0 {
            return self.remove(index).map(|_| ());
        }
        let item = self
            .items
            .get_mut(index)
            .ok_or_else(|| LayerbeeError::NotFound(format!("cart item {index}")))?;
        item.quantity = u32::try_from(quantity)
            .unwrap_or(MAX_ITEM_QUANTITY)
            .min(MAX_ITEM_QUANTITY);
        Ok(())
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of line totals in cents.
    #[must_use]
    pub fn total_cents(&self) -> u32 {
        self.items.iter().map(CartItem::total_cents).sum()
    }

    /// Number of items across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Empties the cart and returns its lines.
    pub fn take(&mut self) -> Vec<CartItem> {
        std::mem::take(&mut self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shop::catalog::{color_by_name, product_by_id};
    use pretty_assertions::assert_eq;

    fn stand() -> &'static Product {
        product_by_id("phone-stand").unwrap()
    }

    fn color(name: &str) -> &'static Color {
        color_by_name(name).unwrap()
    }

    #[test]
    fn test_same_product_and_color_merges() {
        let mut cart = Cart::new();
        cart.add(stand(), color("Red"), 1);
        cart.add(stand(), color("Red"), 2);
        cart.add(stand(), color("Blue"), 1);

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_merged_line_stays_capped() {
        let mut cart = Cart::new();
        cart.add(stand(), color("Red"), MAX_ITEM_QUANTITY);
        cart.add(stand(), color("Red"), MAX_ITEM_QUANTITY);
        cart.add(stand(), color("Blue"), 25);

        assert_eq!(cart.items()[0].quantity, MAX_ITEM_QUANTITY);
        assert_eq!(cart.items()[1].quantity, MAX_ITEM_QUANTITY);
    }

    #[test]
    fn test_totals_include_upcharge() {
        let mut cart = Cart::new();
        cart.add(stand(), color("Rainbow Silk"), 2);
        cart.add(product_by_id("bookmark-set").unwrap(), color("Gray"), 1);

        assert_eq!(cart.items()[0].total_cents(), 1300);
        assert_eq!(cart.total_cents(), 1450);
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = Cart::new();
        cart.add(stand(), color("Gray"), 1);

        cart.set_quantity(0, 4).unwrap();
        assert_eq!(cart.items()[0].quantity, 4);

        cart.set_quantity(0, 25).unwrap();
        assert_eq!(cart.items()[0].quantity, MAX_ITEM_QUANTITY);

        cart.set_quantity(0, 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_negative_quantity_removes() {
        let mut cart = Cart::new();
        cart.add(stand(), color("Gray"), 1);
        cart.add(stand(), color("White"), 1);

        cart.set_quantity(0, -3).unwrap();
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].color, "White");
    }

    #[test]
    fn test_bad_index() {
        let mut cart = Cart::new();
        assert!(matches!(cart.remove(0), Err(LayerbeeError::NotFound(_))));
        assert!(cart.set_quantity(3, 1).is_err());
    }

    #[test]
    fn test_serializes_as_list() {
        let mut cart = Cart::new();
        cart.add(stand(), color("Gray"), 1);
        let json = serde_json::to_value(&cart).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["productId"], "phone-stand");
        assert_eq!(json[0]["basePriceCents"], 500);
    }
}
