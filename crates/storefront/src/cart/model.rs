//! In-memory cart contents.

use bistro_core::{CartLineItem, LineId, Quantity};
use serde::{Deserialize, Serialize};

/// Result of inserting a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// A new line was appended.
    Appended,
    /// A line with the same identity existed; its quantity is now `quantity`.
    Merged { quantity: Quantity },
}

/// Result of applying a quantity delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Adjustment {
    /// The line now holds `quantity`.
    Changed { quantity: Quantity },
    /// The quantity dropped to zero or below and the line is gone.
    Removed,
}

/// Ordered cart lines, insertion order preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from already persisted lines.
    #[must_use]
    pub const fn from_lines(lines: Vec<CartLineItem>) -> Self {
        Self { lines }
    }

    /// All lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    /// Look up a line.
    #[must_use]
    pub fn get(&self, id: &LineId) -> Option<&CartLineItem> {
        self.lines.iter().find(|line| &line.id == id)
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total servings across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity.get()).sum()
    }

    /// Insert a line, merging into an existing line with the same identity.
    pub fn insert(&mut self, line: CartLineItem) -> Insertion {
        if let Some(existing) = self.lines.iter_mut().find(|l| l.id == line.id) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
            return Insertion::Merged {
                quantity: existing.quantity,
            };
        }

        self.lines.push(line);
        Insertion::Appended
    }

    /// Apply a quantity delta. Returns `None` if the line does not exist.
    pub fn adjust(&mut self, id: &LineId, delta: i64) -> Option<Adjustment> {
        let index = self.lines.iter().position(|line| &line.id == id)?;
        let line = self.lines.get_mut(index)?;

        let next = i64::from(line.quantity.get()).saturating_add(delta);
        if next <= 0 {
            self.lines.remove(index);
            return Some(Adjustment::Removed);
        }

        line.quantity = Quantity::clamped(next);
        Some(Adjustment::Changed {
            quantity: line.quantity,
        })
    }

    /// Remove a line. Returns the removed line, if any.
    pub fn remove(&mut self, id: &LineId) -> Option<CartLineItem> {
        let index = self.lines.iter().position(|line| &line.id == id)?;
        Some(self.lines.remove(index))
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Encode as the persisted JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if a line cannot be encoded.
    pub fn serialize(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.lines)
    }

    /// Decode the persisted JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not a valid list of lines.
    pub fn deserialize(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw).map(Self::from_lines)
    }
}
