//! Cart line item.

use serde::{Deserialize, Serialize};

use super::customization::Customization;
use super::id::{LineId, ProductId};
use super::price::Price;
use super::quantity::Quantity;

/// One entry in the cart: a product, its customization and a quantity.
///
/// This is also the persisted shape (camelCase JSON).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub id: LineId,
    pub product_id: ProductId,
    /// Product name at the time the line was added.
    #[serde(default)]
    pub name: String,
    /// Base price at the time the line was added.
    pub unit_price: Price,
    pub quantity: Quantity,
    #[serde(default)]
    pub includes_sides: bool,
    #[serde(default)]
    pub customization: Customization,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let line = CartLineItem {
            id: LineId::new("10-1a2b-1700000000000"),
            product_id: ProductId::new(10),
            name: "Classic".to_string(),
            unit_price: Price::from_cents(999),
            quantity: Quantity::new(2).unwrap(),
            includes_sides: true,
            customization: Customization::none().with_sauce("bbq"),
        };
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["productId"], 10);
        assert_eq!(json["unitPrice"], "9.99");
        assert_eq!(json["includesSides"], true);
        assert_eq!(json["customization"]["sauce"], "bbq");
    }

    #[test]
    fn test_legacy_line_without_optional_fields() {
        let line: CartLineItem = serde_json::from_value(serde_json::json!({
            "id": "3-x-1",
            "productId": 3,
            "unitPrice": 4.5,
            "quantity": 1
        }))
        .unwrap();
        assert!(line.name.is_empty());
        assert!(!line.includes_sides);
        assert_eq!(line.customization, Customization::none());
    }
}
