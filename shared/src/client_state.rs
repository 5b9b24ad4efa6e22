//! Client-side session state
//!
//! Theme, locale and cart live in one explicit value that the client loads
//! at startup and saves when it changes. Nothing here is global.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::models::{DeliveryType, MAX_ITEM_QUANTITY, OrderItemInput};

#[derive(Debug, Error)]
pub enum ClientStateError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid state file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Cart belongs to company {current}, cannot add items of company {requested}")]
    CompanyMismatch { current: i64, requested: i64 },

    #[error("Cart quantity out of range: {0}")]
    InvalidQuantity(i64),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

/// One cart line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_name: String,
    pub unit_price: f64,
    pub quantity: i64,
    pub note: Option<String>,
}

/// Shopping cart; always scoped to a single company
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub company_id: Option<i64>,
    pub delivery_type: Option<DeliveryType>,
    pub coupon_code: Option<String>,
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Add a line; the same product (and note) merges quantities.
    ///
    /// A merged quantity above `MAX_ITEM_QUANTITY` is refused and the cart is
    /// left unchanged, so the cart never holds a line the server would reject.
    pub fn add(&mut self, company_id: i64, line: CartLine) -> Result<(), ClientStateError> {
        if let Some(current) = self.company_id
            && current != company_id
        {
            return Err(ClientStateError::CompanyMismatch {
                current,
                requested: company_id,
            });
        }

        let existing = self
            .lines
            .iter()
            .position(|l| l.product_name == line.product_name && l.note == line.note);
        let merged = existing.map_or(0, |i| self.lines[i].quantity) + line.quantity;
        if line.quantity < 1 || merged > MAX_ITEM_QUANTITY {
            return Err(ClientStateError::InvalidQuantity(merged));
        }

        self.company_id = Some(company_id);
        match existing {
            Some(i) => self.lines[i].quantity = merged,
            None => self.lines.push(line),
        }
        Ok(())
    }

    /// Remove a line by index; clearing the last line resets the company
    pub fn remove(&mut self, index: usize) -> Option<CartLine> {
        if index >= self.lines.len() {
            return None;
        }
        let removed = self.lines.remove(index);
        if self.lines.is_empty() {
            self.clear();
        }
        Some(removed)
    }

    pub fn clear(&mut self) {
        *self = Cart::default();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of `unit_price * quantity`, display only (the server recomputes)
    pub fn subtotal(&self) -> f64 {
        self.lines
            .iter()
            .map(|l| l.unit_price * l.quantity as f64)
            .sum()
    }

    /// Order item payload for `POST /api/orders`
    pub fn to_items(&self) -> Vec<OrderItemInput> {
        self.lines
            .iter()
            .map(|l| OrderItemInput {
                product_name: l.product_name.clone(),
                unit_price: l.unit_price,
                quantity: l.quantity,
                note: l.note.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientState {
    pub theme: Theme,
    pub locale: String,
    pub cart: Cart,
}

impl Default for ClientState {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            locale: "pt".to_string(),
            cart: Cart::default(),
        }
    }
}

impl ClientState {
    /// Load from a JSON file; a missing file yields the default state
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClientStateError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let bytes = std::fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Write to a JSON file (via a temp file + rename)
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ClientStateError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(self)?)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, price: f64, qty: i64) -> CartLine {
        CartLine {
            product_name: name.to_string(),
            unit_price: price,
            quantity: qty,
            note: None,
        }
    }

    #[test]
    fn test_cart_merges_same_product() {
        let mut cart = Cart::default();
        cart.add(1, line("Bifana", 450.0, 1)).unwrap();
        cart.add(1, line("Bifana", 450.0, 2)).unwrap();
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 3);
        assert_eq!(cart.subtotal(), 1350.0);
    }

    #[test]
    fn test_cart_rejects_other_company() {
        let mut cart = Cart::default();
        cart.add(1, line("Bifana", 450.0, 1)).unwrap();
        let err = cart.add(2, line("Prego", 500.0, 1)).unwrap_err();
        assert!(matches!(
            err,
            ClientStateError::CompanyMismatch { current: 1, requested: 2 }
        ));
    }

    #[test]
    fn test_cart_quantity_capped() {
        let mut cart = Cart::default();
        cart.add(1, line("Bifana", 450.0, MAX_ITEM_QUANTITY - 1)).unwrap();
        cart.add(1, line("Bifana", 450.0, 1)).unwrap();
        assert_eq!(cart.lines[0].quantity, MAX_ITEM_QUANTITY);

        let err = cart.add(1, line("Bifana", 450.0, 1)).unwrap_err();
        assert!(matches!(err, ClientStateError::InvalidQuantity(q) if q == MAX_ITEM_QUANTITY + 1));
        assert_eq!(cart.lines[0].quantity, MAX_ITEM_QUANTITY);

        assert!(matches!(
            cart.add(1, line("Prego", 500.0, 0)),
            Err(ClientStateError::InvalidQuantity(0))
        ));
        assert_eq!(cart.lines.len(), 1);
    }

    #[test]
    fn test_empty_cart_keeps_no_company_after_bad_add() {
        let mut cart = Cart::default();
        assert!(cart.add(3, line("Prego", 500.0, MAX_ITEM_QUANTITY + 1)).is_err());
        assert!(cart.company_id.is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_last_line_resets_company() {
        let mut cart = Cart::default();
        cart.add(1, line("Bifana", 450.0, 1)).unwrap();
        assert!(cart.remove(0).is_some());
        assert!(cart.company_id.is_none());
        assert!(cart.remove(0).is_none());
    }

    #[test]
    fn test_load_missing_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let state = ClientState::load(dir.path().join("state.json")).unwrap();
        assert_eq!(state, ClientState::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/state.json");

        let mut state = ClientState {
            theme: Theme::Dark,
            locale: "en".to_string(),
            ..Default::default()
        };
        state.cart.add(7, line("Sopa", 300.0, 2)).unwrap();
        state.save(&path).unwrap();

        let loaded = ClientState::load(&path).unwrap();
        assert_eq!(loaded, state);
        assert_eq!(loaded.cart.to_items().len(), 1);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"theme":"dark"}"#).unwrap();
        let state = ClientState::load(&path).unwrap();
        assert_eq!(state.theme, Theme::Dark);
        assert_eq!(state.locale, "pt");
        assert!(state.cart.is_empty());
    }
}
