//! Session shopping cart.
//!
//! The cart is a plain value: handlers load it from the session, mutate it and
//! write it back. Line items are kept ordered by product ID.

use serde::{Deserialize, Serialize};

use jungle_core::ProductId;

/// A product and the quantity selected for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Per-session product quantities.
///
/// ## Examples
///
/// ```
/// use jungle_core::ProductId;
/// use jungle_storefront::models::Cart;
///
/// let mut cart = Cart::default();
/// assert_eq!(cart.count(), 0);
///
/// cart.add(ProductId::new(7), 1);
/// cart.add(ProductId::new(7), 1);
/// assert_eq!(cart.count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Increase the quantity of `product_id` by `quantity`, adding the line if
    /// needed. Saturates at `u32::MAX`.
    ///
    /// Returns the new quantity for that product.
    pub fn add(&mut self, product_id: ProductId, quantity: u32) -> u32 {
        match self.position(product_id) {
            Ok(idx) => self.items.get_mut(idx).map_or(0, |line| {
                line.quantity = line.quantity.saturating_add(quantity);
                line.quantity
            }),
            Err(idx) => {
                if quantity == 0 {
                    return 0;
                }
                self.items.insert(
                    idx,
                    LineItem {
                        product_id,
                        quantity,
                    },
                );
                quantity
            }
        }
    }

    /// Set the quantity of a line. Zero removes it.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
            return;
        }
        match self.position(product_id) {
            Ok(idx) => {
                if let Some(line) = self.items.get_mut(idx) {
                    line.quantity = quantity;
                }
            }
            Err(idx) => self.items.insert(
                idx,
                LineItem {
                    product_id,
                    quantity,
                },
            ),
        }
    }

    /// Remove a line. Returns whether it was present.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        match self.position(product_id) {
            Ok(idx) => {
                self.items.remove(idx);
                true
            }
            Err(_) => false,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Quantity selected for one product (zero when absent).
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.position(product_id)
            .ok()
            .and_then(|idx| self.items.get(idx))
            .map_or(0, |line| line.quantity)
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Lines ordered by product ID.
    #[must_use]
    pub fn line_items(&self) -> &[LineItem] {
        &self.items
    }

    /// Product IDs of every line.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.items.iter().map(|line| line.product_id).collect()
    }

    fn position(&self, product_id: ProductId) -> Result<usize, usize> {
        self.items
            .binary_search_by_key(&product_id, |line| line.product_id)
    }
}
