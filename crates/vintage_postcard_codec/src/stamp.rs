// SPDX-License-Identifier: MIT OR Apache-2.0
//! Decorative stamps and the catalog they are chosen from.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A decorative postage stamp
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stamp {
    /// Catalog identifier
    pub id: u32,
    /// Emoji drawn on the stamp
    pub emoji: String,
    /// Display label
    pub label: String,
    /// Background color as a CSS hex string
    pub color: String,
}

impl Stamp {
    /// Create a stamp
    pub fn new(
        id: u32,
        emoji: impl Into<String>,
        label: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id,
            emoji: emoji.into(),
            label: label.into(),
            color: color.into(),
        }
    }
}

/// Ordered set of stamps offered by the builder
#[derive(Debug, Clone)]
pub struct StampCatalog {
    stamps: IndexMap<u32, Stamp>,
}

impl StampCatalog {
    /// The ten classic stamps, in display order
    pub fn classic() -> Self {
        let stamps = [
            Stamp::new(1, "\u{1F339}", "Rose", "#fec5bb"),
            Stamp::new(2, "\u{1F33B}", "Sunflower", "#ffd7ba"),
            Stamp::new(3, "\u{1F98B}", "Butterfly", "#d8e2dc"),
            Stamp::new(4, "\u{1F3D4}\u{FE0F}", "Mountain", "#e8e8e4"),
            Stamp::new(5, "\u{1F30A}", "Ocean", "#fcd5ce"),
            Stamp::new(6, "\u{1F319}", "Moon", "#ece4db"),
            Stamp::new(7, "\u{2600}\u{FE0F}", "Sun", "#ffe5d9"),
            Stamp::new(8, "\u{1F332}", "Pine", "#fae1dd"),
            Stamp::new(9, "\u{1F342}", "Autumn", "#fec89a"),
            Stamp::new(10, "\u{2764}\u{FE0F}", "Heart", "#f8edeb"),
        ];

        Self::from_stamps(stamps)
    }

    /// Build a catalog from stamps; later duplicates of an id replace earlier ones
    pub fn from_stamps(stamps: impl IntoIterator<Item = Stamp>) -> Self {
        Self {
            stamps: stamps.into_iter().map(|s| (s.id, s)).collect(),
        }
    }

    /// Get a stamp by id
    pub fn get(&self, id: u32) -> Option<&Stamp> {
        self.stamps.get(&id)
    }

    /// Whether this exact stamp is part of the catalog
    pub fn contains(&self, stamp: &Stamp) -> bool {
        self.stamps.get(&stamp.id) == Some(stamp)
    }

    /// Iterate stamps in display order
    pub fn iter(&self) -> impl Iterator<Item = &Stamp> {
        self.stamps.values()
    }

    /// Number of stamps
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }
}

impl Default for StampCatalog {
    fn default() -> Self {
        Self::classic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_catalog() {
        let catalog = StampCatalog::classic();
        assert_eq!(catalog.len(), 10);

        let ids: Vec<u32> = catalog.iter().map(|s| s.id).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());

        let rose = catalog.get(1).unwrap();
        assert_eq!(rose.label, "Rose");
        assert_eq!(rose.color, "#fec5bb");
        assert!(catalog.get(11).is_none());
    }

    #[test]
    fn test_contains_checks_every_field() {
        let catalog = StampCatalog::classic();
        let mut moon = catalog.get(6).cloned().unwrap();
        assert!(catalog.contains(&moon));

        moon.color = "#000000".to_string();
        assert!(!catalog.contains(&moon));
    }
}
