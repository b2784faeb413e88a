//! Line identity generation.
//!
//! A line's identity is `productId-hash-timestamp`, where `hash` is a 32-bit
//! rolling hash (base 36) over the product, every customization field and
//! the insertion time in milliseconds. Because the timestamp is part of the
//! identity, identical selections added at different times become separate
//! lines; only adds within the same millisecond merge.

use std::sync::atomic::{AtomicI64, Ordering};

use bistro_core::{Customization, LineId, ProductId};

/// Source of wall-clock milliseconds.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
///
/// Used to make identity generation deterministic in tests and replays.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    /// Start at `millis`.
    #[must_use]
    pub const fn new(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
        }
    }

    /// Move forward by `millis`.
    pub fn advance(&self, millis: i64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

/// 32-bit rolling hash: `h = h * 31 + unit` over UTF-16 code units.
#[must_use]
pub fn fingerprint(input: &str) -> u32 {
    input.encode_utf16().fold(0u32, |hash, unit| {
        (hash << 5).wrapping_sub(hash).wrapping_add(u32::from(unit))
    })
}

/// Render a number in lowercase base 36.
#[must_use]
pub fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while value > 0 {
        let digit = (value % 36) as usize;
        out.push(DIGITS.get(digit).copied().unwrap_or(b'0'));
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// The string the fingerprint is computed over.
fn composite_key(product_id: ProductId, customization: &Customization, timestamp: i64) -> String {
    let slug = |value: Option<&bistro_core::OptionSlug>| {
        value.map(|s| s.as_str().to_owned()).unwrap_or_default()
    };

    format!(
        "{product_id}|{}|{}|{}|{}|{}|{timestamp}",
        slug(customization.sauce.as_ref()),
        slug(customization.fries.as_ref()),
        customization.extras_key(),
        customization.removal_notes.as_deref().unwrap_or_default(),
        customization.special_instructions.as_deref().unwrap_or_default(),
    )
}

/// Generate the identity of a line added at `timestamp`.
#[must_use]
pub fn line_id(product_id: ProductId, customization: &Customization, timestamp: i64) -> LineId {
    let hash = fingerprint(&composite_key(product_id, customization, timestamp));
    LineId::new(format!("{product_id}-{}-{timestamp}", to_base36(hash)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_known_values() {
        assert_eq!(fingerprint(""), 0);
        assert_eq!(fingerprint("a"), 97);
        assert_eq!(fingerprint("ab"), 97 * 31 + 98);
    }

    #[test]
    fn test_fingerprint_wraps() {
        // Long inputs overflow 32 bits and must wrap rather than panic.
        let long = "x".repeat(10_000);
        let _ = fingerprint(&long);
    }

    #[test]
    fn test_fingerprint_uses_utf16_units() {
        // U+00E9 is a single UTF-16 unit with value 0xE9.
        assert_eq!(fingerprint("é"), 0xE9);
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(3105), "2e9");
        assert_eq!(to_base36(u32::MAX), "1z141z3");
    }

    #[test]
    fn test_line_id_shape() {
        let id = line_id(ProductId::new(12), &Customization::none(), 1_700_000_000_000);
        let parts: Vec<&str> = id.as_str().split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts.first(), Some(&"12"));
        assert_eq!(parts.get(2), Some(&"1700000000000"));
    }

    #[test]
    fn test_line_id_depends_on_every_field() {
        let base = Customization::none().with_sauce("bbq");
        let ts = 1_700_000_000_000;
        let id = line_id(ProductId::new(1), &base, ts);

        assert_eq!(id, line_id(ProductId::new(1), &base.clone(), ts));
        assert_ne!(id, line_id(ProductId::new(2), &base, ts));
        assert_ne!(id, line_id(ProductId::new(1), &base.clone().with_extra("cheese"), ts));
        assert_ne!(
            id,
            line_id(ProductId::new(1), &base.clone().with_special_instructions("well done"), ts)
        );
        assert_ne!(id, line_id(ProductId::new(1), &base, ts + 1));
    }

    #[test]
    fn test_extra_order_does_not_matter() {
        let a = Customization::none().with_extra("bacon").with_extra("cheese");
        let b = Customization::none().with_extra("cheese").with_extra("bacon");
        assert_eq!(line_id(ProductId::new(1), &a, 5), line_id(ProductId::new(1), &b, 5));
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(100);
        assert_eq!(clock.now_millis(), 100);
        clock.advance(5);
        assert_eq!(clock.now_millis(), 105);
    }
}
