//! Line and cart totals.

use bistro_core::{CartLineItem, CustomizationCatalog, INCLUDED_FRIES, NO_FRIES, Price};
use tracing::warn;

/// Flat surcharge per selected extra, in cents.
pub const EXTRA_SURCHARGE_CENTS: i64 = 30;

/// Add-on charged for the line's fries choice, per serving.
///
/// Free when no fries are chosen, when the sentinel `none` is chosen, or when
/// the product includes sides and the included regular fries are chosen.
/// A slug missing from the catalog (or without a price) costs nothing.
#[must_use]
pub fn fries_add_on(item: &CartLineItem, catalog: &CustomizationCatalog) -> Price {
    let Some(slug) = item.customization.fries.as_ref() else {
        return Price::ZERO;
    };

    if slug.as_str() == NO_FRIES || (item.includes_sides && slug.as_str() == INCLUDED_FRIES) {
        return Price::ZERO;
    }

    match catalog.fries_option(slug) {
        Some(option) => option.price.unwrap_or(Price::ZERO),
        None => {
            warn!(line_id = %item.id, fries = %slug, "Fries option not in catalog, no add-on applied");
            Price::ZERO
        }
    }
}

/// Surcharge for the line's extras, per serving.
#[must_use]
pub fn extras_surcharge(item: &CartLineItem) -> Price {
    let count = u32::try_from(item.customization.extras.len()).unwrap_or(u32::MAX);
    Price::from_cents(EXTRA_SURCHARGE_CENTS) * count
}

/// Price of one serving including add-ons.
#[must_use]
pub fn unit_total(item: &CartLineItem, catalog: &CustomizationCatalog) -> Price {
    item.unit_price + fries_add_on(item, catalog) + extras_surcharge(item)
}

/// Price of the whole line.
#[must_use]
pub fn item_total(item: &CartLineItem, catalog: &CustomizationCatalog) -> Price {
    unit_total(item, catalog) * item.quantity.get()
}

/// Sum of all line totals.
#[must_use]
pub fn subtotal<'a>(
    lines: impl IntoIterator<Item = &'a CartLineItem>,
    catalog: &CustomizationCatalog,
) -> Price {
    lines.into_iter().map(|line| item_total(line, catalog)).sum()
}
