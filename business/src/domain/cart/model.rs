use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_traits::Zero;

use crate::domain::shared::value_objects::{ProductId, normalize_external_id};

use super::errors::CartError;

/// Catalog fields handed to the cart by whatever renders the product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub contifico_external_id: Option<String>,
    pub name: String,
    pub price: BigDecimal,
}

impl ProductSnapshot {
    pub fn new(
        id: &str,
        name: String,
        price: BigDecimal,
        contifico_external_id: Option<String>,
    ) -> Result<Self, CartError> {
        let id = ProductId::parse(id).ok_or(CartError::IdEmpty)?;
        if name.trim().is_empty() {
            return Err(CartError::NameEmpty);
        }
        if price < BigDecimal::zero() {
            return Err(CartError::NegativePrice);
        }

        Ok(Self {
            id,
            contifico_external_id: normalize_external_id(contifico_external_id),
            name,
            price,
        })
    }
}

/// Parses a decimal price such as `"5.50"`.
pub fn parse_price(raw: &str) -> Result<BigDecimal, CartError> {
    BigDecimal::from_str(raw.trim()).map_err(|_| CartError::InvalidPrice)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartLineItem {
    pub id: ProductId,
    pub contifico_external_id: Option<String>,
    pub name: String,
    pub price: BigDecimal,
    pub quantity: u32,
}

impl CartLineItem {
    fn from_snapshot(product: ProductSnapshot, quantity: u32) -> Self {
        Self {
            id: product.id,
            contifico_external_id: product.contifico_external_id,
            name: product.name,
            price: product.price,
            quantity,
        }
    }

    /// Constructor for data already persisted in storage (no validation).
    pub fn from_repository(
        id: ProductId,
        contifico_external_id: Option<String>,
        name: String,
        price: BigDecimal,
        quantity: u32,
    ) -> Self {
        Self {
            id,
            contifico_external_id,
            name,
            price,
            quantity,
        }
    }

    pub fn line_total(&self) -> BigDecimal {
        &self.price * BigDecimal::from(self.quantity)
    }

    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id.clone(),
            contifico_external_id: self.contifico_external_id.clone(),
            name: self.name.clone(),
            price: self.price.clone(),
        }
    }
}

/// Ordered line items, unique by id, each with a quantity of at least one.
///
/// Fields are private so every change goes through the operations below.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    items: Vec<CartLineItem>,
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a cart from stored lines. Zero-quantity lines are dropped
    /// and duplicate ids are merged into the first occurrence.
    pub fn from_persisted(items: Vec<CartLineItem>) -> Self {
        let mut state = Self::new();
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            match state.position(&item.id) {
                Some(index) => {
                    let existing = &mut state.items[index];
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => state.items.push(item),
            }
        }
        state
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn get(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn quantity_of(&self, id: &ProductId) -> u32 {
        self.get(id).map(|item| item.quantity).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    pub fn total_price(&self) -> BigDecimal {
        self.items
            .iter()
            .fold(BigDecimal::zero(), |total, item| total + item.line_total())
    }

    /// Increments an existing line or appends a new one with quantity 1.
    /// Returns the resulting quantity. Stock is not validated here.
    pub fn add_item(&mut self, product: ProductSnapshot) -> u32 {
        match self.position(&product.id) {
            Some(index) => {
                let item = &mut self.items[index];
                item.quantity = item.quantity.saturating_add(1);
                item.quantity
            }
            None => {
                self.items.push(CartLineItem::from_snapshot(product, 1));
                1
            }
        }
    }

    /// Returns whether a line was removed.
    pub fn remove_item(&mut self, id: &ProductId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// A quantity below one removes the line. Returns whether anything changed.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) -> bool {
        if quantity < 1 {
            return self.remove_item(id);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.position(id) {
            Some(index) if self.items[index].quantity != quantity => {
                self.items[index].quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Returns whether the cart had any lines.
    pub fn clear(&mut self) -> bool {
        let had_items = !self.items.is_empty();
        self.items.clear();
        had_items
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }
}
