//! Menu shapes consumed from the backend.

use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::Price;

/// A product on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuProduct {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    /// Whether regular fries come with the product at no charge.
    #[serde(default)]
    pub includes_sides: bool,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default = "default_available")]
    pub available: bool,
}

const fn default_available() -> bool {
    true
}

/// A menu category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCategory {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub position: i32,
}

/// The localized menu.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    #[serde(default)]
    pub categories: Vec<MenuCategory>,
    #[serde(default)]
    pub products: Vec<MenuProduct>,
}

impl Menu {
    /// Find a product by ID.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&MenuProduct> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Products of one category, in menu order.
    pub fn products_in(&self, category: CategoryId) -> impl Iterator<Item = &MenuProduct> {
        self.products
            .iter()
            .filter(move |product| product.category_id == Some(category))
    }

    /// Categories sorted by their display position.
    #[must_use]
    pub fn sorted_categories(&self) -> Vec<&MenuCategory> {
        let mut categories: Vec<&MenuCategory> = self.categories.iter().collect();
        categories.sort_by_key(|category| category.position);
        categories
    }
}

/// Whether the restaurant currently takes orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAcceptance {
    pub accepting: bool,
    /// Optional notice shown to customers (e.g., "Kitchen closes at 22:00").
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn menu() -> Menu {
        serde_json::from_value(serde_json::json!({
            "categories": [
                {"id": 2, "name": "Drinks", "position": 2},
                {"id": 1, "name": "Burgers", "position": 1}
            ],
            "products": [
                {"id": 10, "name": "Classic", "price": "9.99", "includesSides": true, "categoryId": 1},
                {"id": 11, "name": "Cola", "price": 2.5, "categoryId": 2, "available": false}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_product_lookup() {
        let menu = menu();
        let classic = menu.product(ProductId::new(10)).unwrap();
        assert!(classic.includes_sides);
        assert!(classic.available);
        assert!(!menu.product(ProductId::new(11)).unwrap().available);
        assert!(menu.product(ProductId::new(99)).is_none());
    }

    #[test]
    fn test_sorted_categories() {
        let menu = menu();
        let names: Vec<_> = menu
            .sorted_categories()
            .into_iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["Burgers", "Drinks"]);
    }

    #[test]
    fn test_products_in_category() {
        let menu = menu();
        assert_eq!(menu.products_in(CategoryId::new(2)).count(), 1);
    }
}
