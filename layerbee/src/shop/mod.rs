//! The student print shop: catalog, cart and orders.
//!
//! [`Shop`] keeps the cart and the order list in a [`KeyValueStore`] under
//! the same keys the web site used.

pub mod catalog;
mod cart;
mod order;

pub use cart::{Cart, CartItem, MAX_ITEM_QUANTITY};
pub use catalog::{
    categories, color_by_name, colors, default_color, format_price, popular_products,
    product_by_id, products, products_by_category, Category, Color, Difficulty, Product,
};
pub use order::{generate_order_id, CustomerInfo, Order, OrderStatus, ORDER_ID_ALPHABET};

use crate::errors::{LayerbeeError, Result};
use crate::filter::{self, FieldKind, Verdict};
use crate::storage::{load_json, save_json, KeyValueStore, CART_KEY, ORDERS_KEY};
use std::sync::Arc;
use tracing::info;

/// Cart and order operations over a store.
#[derive(Clone)]
pub struct Shop {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Shop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shop").finish_non_exhaustive()
    }
}

fn checked(value: &str, kind: FieldKind) -> Result<String> {
    match filter::validate_shop_input(value, kind) {
        Verdict::Allowed { sanitized } => Ok(sanitized),
        Verdict::Rejected { reason, .. } => Err(LayerbeeError::Validation(reason)),
    }
}

impl Shop {
    /// Creates a shop over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Reads the cart.
    ///
    /// # Errors
    ///
    /// Fails if the store fails or holds invalid JSON.
    pub fn cart(&self) -> Result<Cart> {
        Ok(load_json(self.store.as_ref(), CART_KEY)?.unwrap_or_default())
    }

    fn save_cart(&self, cart: &Cart) -> Result<()> {
        save_json(self.store.as_ref(), CART_KEY, cart)
    }

    fn update_cart<T>(&self, f: impl FnOnce(&mut Cart) -> Result<T>) -> Result<Cart> {
        let mut cart = self.cart()?;
        f(&mut cart)?;
        self.save_cart(&cart)?;
        Ok(cart)
    }

    /// Adds a product to the cart.
    ///
    /// # Errors
    ///
    /// Fails on an unknown product or color, or if the store fails.
    pub fn add_to_cart(&self, product_id: &str, color: &str, quantity: u32) -> Result<Cart> {
        let product = product_by_id(product_id)
            .ok_or_else(|| LayerbeeError::NotFound(format!("product '{product_id}'")))?;
        let color = color_by_name(color)
            .ok_or_else(|| LayerbeeError::NotFound(format!("color '{color}'")))?;
        if quantity == 0 {
            return Err(LayerbeeError::Validation("quantity must be at least 1".to_string()));
        }
        self.update_cart(|cart| {
            cart.add(product, color, quantity.min(MAX_ITEM_QUANTITY));
            Ok(())
        })
    }

    /// Removes the cart line at `index`.
    ///
    /// # Errors
    ///
    /// Fails if there is no such line or the store fails.
    pub fn remove_from_cart(&self, index: usize) -> Result<Cart> {
        self.update_cart(|cart| cart.remove(index))
    }

    /// Sets the quantity of a cart line. Zero or less removes it.
    ///
    /// # Errors
    ///
    /// Fails if there is no such line or the store fails.
    pub fn set_quantity(&self, index: usize, quantity: i64) -> Result<Cart> {
        self.update_cart(|cart| cart.set_quantity(index, quantity))
    }

    /// Empties the cart.
    ///
    /// # Errors
    ///
    /// Fails if the store fails.
    pub fn clear_cart(&self) -> Result<()> {
        self.save_cart(&Cart::new())
    }

    /// Turns the cart into an order and empties the cart. Returns `None` if
    /// the cart is empty.
    ///
    /// # Errors
    ///
    /// Fails if the name or contact is missing, a field fails the content
    /// filter, or the store fails.
    pub fn checkout(&self, customer: CustomerInfo) -> Result<Option<Order>> {
        let mut cart = self.cart()?;
        if cart.is_empty() {
            return Ok(None);
        }

        if customer.name.trim().is_empty() {
            return Err(LayerbeeError::Validation("Please enter your name".to_string()));
        }
        if customer.contact.trim().is_empty() {
            return Err(LayerbeeError::Validation(
                "Please enter your classroom/period for delivery".to_string(),
            ));
        }
        let customer = CustomerInfo {
            name: checked(&customer.name, FieldKind::Name)?,
            contact: checked(&customer.contact, FieldKind::Message)?,
            note: checked(&customer.note, FieldKind::Message)?,
        };

        let order = Order::new(cart.take(), customer);
        let mut orders = self.orders()?;
        orders.push(order.clone());
        save_json(self.store.as_ref(), ORDERS_KEY, &orders)?;
        self.save_cart(&cart)?;

        info!(order_id = %order.id, total_cents = order.total_cents, "Order submitted");
        Ok(Some(order))
    }

    /// All submitted orders, oldest first.
    ///
    /// # Errors
    ///
    /// Fails if the store fails or holds invalid JSON.
    pub fn orders(&self) -> Result<Vec<Order>> {
        Ok(load_json(self.store.as_ref(), ORDERS_KEY)?.unwrap_or_default())
    }

    /// Orders still waiting on a parent.
    ///
    /// # Errors
    ///
    /// Fails if the store fails or holds invalid JSON.
    pub fn pending_orders(&self) -> Result<Vec<Order>> {
        Ok(self
            .orders()?
            .into_iter()
            .filter(|o| o.status.is_pending())
            .collect())
    }
}
