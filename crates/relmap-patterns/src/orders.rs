//! Proxy behavior as a plain function.
//!
//! The original modeled a tax-aware view over order items as a proxy class
//! with no storage of its own. Here that is just a function over the base
//! record's data.

use std::fmt;

use relmap_core::{EntityDef, Error, FieldDef, FieldType, Fields, ScalarType, Value};

use crate::{require_f64, require_i32, require_str};

/// Entity name.
pub const ORDER_ITEM: &str = "OrderItem";

/// Flat tax rate applied on top of the pre-tax total.
const TAX_RATE: f64 = 0.20;

/// Declare the OrderItem entity.
pub fn order_item_entity() -> EntityDef {
    EntityDef::new(ORDER_ITEM)
        .with_field(FieldDef::new(
            "product_or_service",
            FieldType::scalar(ScalarType::String),
        ))
        .with_field(FieldDef::new(
            "description",
            FieldType::scalar(ScalarType::Text),
        ))
        .with_field(FieldDef::new(
            "price",
            FieldType::scalar(ScalarType::Decimal {
                precision: 10,
                scale: 2,
            }),
        ))
        .with_field(FieldDef::new(
            "quantity",
            FieldType::scalar(ScalarType::Int32),
        ))
}

/// Total with tax for a unit price and quantity.
///
/// Bare formula: `price * quantity` plus the tax share. Negative or zero
/// inputs are not validated or clamped.
pub fn total_with_tax(price: f64, quantity: i32) -> f64 {
    let total = price * f64::from(quantity);
    total + total * TAX_RATE
}

/// An order item row.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub product_or_service: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
}

impl OrderItem {
    pub fn fields(&self) -> Fields {
        vec![
            (
                "product_or_service".into(),
                self.product_or_service.clone().into(),
            ),
            ("description".into(), self.description.clone().into()),
            ("price".into(), Value::Float64(self.price)),
            ("quantity".into(), self.quantity.into()),
        ]
    }

    pub fn from_fields(fields: &Fields) -> Result<Self, Error> {
        Ok(Self {
            product_or_service: require_str(fields, "product_or_service")?,
            description: require_str(fields, "description")?,
            price: require_f64(fields, "price")?,
            quantity: require_i32(fields, "quantity")?,
        })
    }

    /// Total with tax for this item.
    pub fn total_with_tax(&self) -> f64 {
        total_with_tax(self.price, self.quantity)
    }
}

impl fmt::Display for OrderItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.product_or_service, self.description)
    }
}
