//! Text rendering of command outcomes in the active language.

use std::fmt::Write as _;

use bistro_core::{CartLineItem, CurrencyCode, Menu, MenuProduct, OptionSlug};
use bistro_storefront::Outcome;
use bistro_storefront::cart::{CartChange, CartUpdate};
use bistro_storefront::commands::{CartSummary, CheckoutReceipt};
use bistro_storefront::i18n::{I18n, LanguageUpdate, TranslationSource};
use bistro_storefront::storage::{KeyValueStore, Persistence};

/// Render any outcome.
pub fn outcome<S: KeyValueStore, T: TranslationSource>(
    outcome: &Outcome,
    i18n: &I18n<S, T>,
    currency: CurrencyCode,
) -> String {
    match outcome {
        Outcome::CartChanged(update) => cart_update(update, i18n),
        Outcome::Cart(summary) => cart_summary(summary, i18n),
        Outcome::LanguageChanged(update) => language_update(update, i18n),
        Outcome::Text(text) => text.clone(),
        Outcome::Menu { menu, .. } => menu_listing(menu, i18n, currency),
        Outcome::CheckedOut(receipt) => checkout_receipt(receipt, i18n, currency),
    }
}

/// The active language line for `lang show`.
pub fn current_language<S: KeyValueStore, T: TranslationSource>(i18n: &I18n<S, T>) -> String {
    let mut out = i18n.translate_with("language.current", &[("language", i18n.language().code())]);
    if i18n.is_degraded() {
        out.push(' ');
        out.push_str(&i18n.translate("language.unavailable"));
    }
    out
}

fn cart_update<S: KeyValueStore, T: TranslationSource>(
    update: &CartUpdate,
    i18n: &I18n<S, T>,
) -> String {
    let mut out = match &update.change {
        CartChange::Appended(line_id) => {
            i18n.translate_with("cart.added", &[("lineId", line_id.as_str())])
        }
        CartChange::Merged { line_id, quantity } | CartChange::QuantityChanged { line_id, quantity } => {
            i18n.translate_with(
                "cart.updated",
                &[("lineId", line_id.as_str()), ("quantity", &quantity.to_string())],
            )
        }
        CartChange::Removed(line_id) => {
            i18n.translate_with("cart.removed", &[("lineId", line_id.as_str())])
        }
        CartChange::Cleared => i18n.translate("cart.cleared"),
    };
    push_persistence(&mut out, &update.persistence, i18n);
    out
}

fn cart_summary<S: KeyValueStore, T: TranslationSource>(
    summary: &CartSummary,
    i18n: &I18n<S, T>,
) -> String {
    if summary.lines.is_empty() {
        return i18n.translate("cart.empty");
    }

    let mut out = i18n.translate("cart.title");
    out.push('\n');
    for line in &summary.lines {
        let _ = writeln!(
            out,
            "  {}  {} x {}  {}",
            line.item.id,
            line.item.quantity,
            line.item.name,
            line.total.display(summary.currency)
        );
        if let Some(details) = customization_details(&line.item, i18n) {
            let _ = writeln!(out, "      {details}");
        }
    }
    let count = summary.item_count.to_string();
    let subtotal = summary.subtotal.display(summary.currency);
    let _ = writeln!(out, "{}", i18n.translate_with("cart.items", &[("count", &count)]));
    out.push_str(&i18n.translate_with("cart.subtotal", &[("amount", &subtotal)]));
    out
}

fn customization_details<S: KeyValueStore, T: TranslationSource>(
    item: &CartLineItem,
    i18n: &I18n<S, T>,
) -> Option<String> {
    let c = &item.customization;
    let extras = (!c.extras.is_empty()).then(|| c.extras_key());
    let fields = [
        ("cart.details.sauce", c.sauce.as_ref().map(OptionSlug::as_str)),
        ("cart.details.fries", c.fries.as_ref().map(OptionSlug::as_str)),
        ("cart.details.extras", extras.as_deref()),
        ("cart.details.without", c.removal_notes.as_deref()),
        ("cart.details.note", c.special_instructions.as_deref()),
    ];

    let parts: Vec<String> = fields
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| i18n.translate_with(key, &[("value", value)])))
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

fn language_update<S: KeyValueStore, T: TranslationSource>(
    update: &LanguageUpdate,
    i18n: &I18n<S, T>,
) -> String {
    let mut out = i18n.translate_with("language.changed", &[("language", update.language.code())]);
    push_persistence(&mut out, &update.persistence, i18n);
    out
}

fn menu_listing<S: KeyValueStore, T: TranslationSource>(
    menu: &Menu,
    i18n: &I18n<S, T>,
    currency: CurrencyCode,
) -> String {
    let mut out = i18n.translate("menu.title");
    for category in menu.sorted_categories() {
        let _ = write!(out, "\n{}", category.name);
        for product in menu.products_in(category.id) {
            push_product(&mut out, product, i18n, currency);
        }
    }

    let mut uncategorized = menu.products.iter().filter(|p| p.category_id.is_none()).peekable();
    if uncategorized.peek().is_some() {
        out.push('\n');
        for product in uncategorized {
            push_product(&mut out, product, i18n, currency);
        }
    }
    out
}

fn push_product<S: KeyValueStore, T: TranslationSource>(
    out: &mut String,
    product: &MenuProduct,
    i18n: &I18n<S, T>,
    currency: CurrencyCode,
) {
    let _ = write!(
        out,
        "\n  #{}  {}  {}",
        product.id,
        product.name,
        product.price.display(currency)
    );
    if !product.available {
        let _ = write!(out, "  ({})", i18n.translate("menu.soldOut"));
    }
}

fn checkout_receipt<S: KeyValueStore, T: TranslationSource>(
    receipt: &CheckoutReceipt,
    i18n: &I18n<S, T>,
    currency: CurrencyCode,
) -> String {
    let order_id = receipt.confirmation.order_id.to_string();
    let total = receipt.subtotal.display(currency);
    let mut out = i18n.translate_with(
        "checkout.confirmed",
        &[("orderId", &order_id), ("amount", &total)],
    );
    if let Some(minutes) = receipt.confirmation.estimated_minutes {
        let minutes = minutes.to_string();
        out.push('\n');
        out.push_str(&i18n.translate_with("checkout.eta", &[("minutes", &minutes)]));
    }
    push_persistence(&mut out, &receipt.persistence, i18n);
    out
}

fn push_persistence<S: KeyValueStore, T: TranslationSource>(
    out: &mut String,
    persistence: &Persistence,
    i18n: &I18n<S, T>,
) {
    if let Persistence::Failed(reason) = persistence {
        out.push('\n');
        out.push_str(&i18n.translate_with("storage.failed", &[("reason", reason)]));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use bistro_core::{
        CategoryId, Customization, LanguageCode, LineId, MenuCategory, OrderConfirmation, OrderId,
        Price, ProductId, Quantity,
    };
    use bistro_storefront::commands::CartSummaryLine;
    use bistro_storefront::i18n::StaticSource;
    use bistro_storefront::storage::MemoryStore;

    use super::*;

    const EN: &str = r#"{
        "cart": {
            "title": "Your cart",
            "empty": "Your cart is empty",
            "items": "{{count}} items",
            "subtotal": "Subtotal: {{amount}}",
            "cleared": "Cart cleared",
            "updated": "{{lineId}} now x{{quantity}}",
            "details": {
                "sauce": "sauce: {{value}}",
                "extras": "extras: {{value}}",
                "without": "without: {{value}}"
            }
        },
        "checkout": {
            "confirmed": "Order {{orderId}} placed ({{amount}})",
            "eta": "Ready in about {{minutes}} minutes"
        },
        "menu": {"title": "Menu", "soldOut": "sold out"},
        "storage": {"failed": "Not saved: {{reason}}"}
    }"#;

    async fn i18n() -> I18n<Arc<MemoryStore>, StaticSource> {
        let store = Arc::new(MemoryStore::new());
        store.set("language-preference", "en").unwrap();
        let source = StaticSource::new().with_json(LanguageCode::En, EN).unwrap();
        let mut i18n = I18n::new(store, source);
        i18n.init().await;
        i18n
    }

    fn line(quantity: u32) -> CartLineItem {
        CartLineItem {
            id: LineId::new("5-abc-1"),
            product_id: ProductId::new(5),
            name: "Veggie".to_string(),
            unit_price: Price::from_cents(850),
            quantity: Quantity::new(quantity).unwrap(),
            includes_sides: false,
            customization: Customization::none().with_sauce("mayo"),
        }
    }

    #[tokio::test]
    async fn test_cart_summary() {
        let i18n = i18n().await;
        let summary = CartSummary {
            lines: vec![CartSummaryLine {
                item: line(2),
                total: Price::from_cents(1700),
            }],
            item_count: 2,
            subtotal: Price::from_cents(1700),
            currency: CurrencyCode::EUR,
        };

        let text = outcome(&Outcome::Cart(summary), &i18n, CurrencyCode::EUR);
        assert_eq!(
            text,
            "Your cart\n  5-abc-1  2 x Veggie  €17.00\n      sauce: mayo\n2 items\nSubtotal: €17.00"
        );
    }

    #[tokio::test]
    async fn test_customization_details_are_translated() {
        let i18n = i18n().await;
        let mut item = line(1);
        item.customization = Customization::none()
            .with_sauce("bbq")
            .with_extra("cheese")
            .with_extra("bacon")
            .with_removal_notes("onions");

        assert_eq!(
            customization_details(&item, &i18n).as_deref(),
            Some("sauce: bbq, extras: bacon,cheese, without: onions")
        );
        item.customization = Customization::none();
        assert!(customization_details(&item, &i18n).is_none());
    }

    #[tokio::test]
    async fn test_empty_cart() {
        let i18n = i18n().await;
        let summary = CartSummary {
            lines: vec![],
            item_count: 0,
            subtotal: Price::ZERO,
            currency: CurrencyCode::EUR,
        };
        assert_eq!(
            outcome(&Outcome::Cart(summary), &i18n, CurrencyCode::EUR),
            "Your cart is empty"
        );
    }

    #[tokio::test]
    async fn test_failed_persistence_is_shown() {
        let i18n = i18n().await;
        let update = CartUpdate {
            change: CartChange::Cleared,
            persistence: Persistence::Failed("disk full".to_string()),
        };
        assert_eq!(
            outcome(&Outcome::CartChanged(update), &i18n, CurrencyCode::EUR),
            "Cart cleared\nNot saved: disk full"
        );
    }

    #[tokio::test]
    async fn test_quantity_change() {
        let i18n = i18n().await;
        let update = CartUpdate {
            change: CartChange::QuantityChanged {
                line_id: LineId::new("5-abc-1"),
                quantity: Quantity::new(3).unwrap(),
            },
            persistence: Persistence::Saved,
        };
        assert_eq!(
            outcome(&Outcome::CartChanged(update), &i18n, CurrencyCode::EUR),
            "5-abc-1 now x3"
        );
    }

    #[tokio::test]
    async fn test_menu_listing() {
        let i18n = i18n().await;
        let menu = Menu {
            categories: vec![MenuCategory {
                id: CategoryId::new(1),
                name: "Burgers".to_string(),
                position: 1,
            }],
            products: vec![MenuProduct {
                id: ProductId::new(5),
                name: "Veggie".to_string(),
                description: None,
                price: Price::from_cents(850),
                includes_sides: false,
                category_id: Some(CategoryId::new(1)),
                available: false,
            }],
        };
        let text = outcome(
            &Outcome::Menu {
                language: LanguageCode::En,
                menu,
            },
            &i18n,
            CurrencyCode::USD,
        );
        assert_eq!(text, "Menu\nBurgers\n  #5  Veggie  $8.50  (sold out)");
    }

    #[tokio::test]
    async fn test_checkout_receipt() {
        let i18n = i18n().await;
        let receipt = CheckoutReceipt {
            confirmation: OrderConfirmation {
                order_id: OrderId::new(42),
                estimated_minutes: Some(20),
            },
            subtotal: Price::from_cents(1998),
            persistence: Persistence::Saved,
        };
        assert_eq!(
            outcome(&Outcome::CheckedOut(receipt), &i18n, CurrencyCode::EUR),
            "Order 42 placed (€19.98)\nReady in about 20 minutes"
        );
    }

    #[tokio::test]
    async fn test_degraded_language_line() {
        let mut i18n = I18n::new(Arc::new(MemoryStore::new()), StaticSource::new());
        i18n.init().await;
        assert!(i18n.is_degraded());
        assert_eq!(current_language(&i18n), "language.current language.unavailable");
    }

    #[tokio::test]
    async fn test_missing_keys_render_as_keys() {
        let i18n = i18n().await;
        assert_eq!(current_language(&i18n), "language.current");
    }
}
