//! Deck statistics: totals, mana symbols, type breakdown and mana curve.
//!
//! Everything here is recomputed from scratch for each analysis; nothing is
//! cached between edits.

use crate::annotate::AnnotatedEntry;
use crate::card::{CardType, Color};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Curve buckets for mana values 0..=12 plus a final "13+" bucket.
pub const CURVE_BUCKETS: usize = 14;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DeckStats {
    pub total: u64,
    pub symbols: ColorCounts,
    pub types: TypeCounts,
    pub curve: [u64; CURVE_BUCKETS],
}

impl DeckStats {
    pub fn color(&self, color: Color) -> u64 {
        self.symbols.get(color)
    }

    pub fn card_type(&self, card_type: CardType) -> u64 {
        self.types.get(card_type)
    }

    /// Largest curve bucket, for scaling charts.
    pub fn curve_max(&self) -> u64 {
        self.curve.iter().copied().max().unwrap_or(0)
    }
}

/// Mana symbol occurrences per color, weighted by card count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorCounts([u64; 6]);

impl ColorCounts {
    pub fn get(&self, color: Color) -> u64 {
        self.0[color.index()]
    }

    pub fn sum(&self) -> u64 {
        self.0.iter().sum()
    }
}

impl Serialize for ColorCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Color::ALL.len()))?;
        for color in Color::ALL {
            map.serialize_entry(color.as_str(), &self.get(color))?;
        }
        map.end()
    }
}

/// Card counts per tracked card type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypeCounts([u64; 8]);

impl TypeCounts {
    pub fn get(&self, card_type: CardType) -> u64 {
        self.0[card_type.index()]
    }
}

impl Serialize for TypeCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(CardType::ALL.len()))?;
        for card_type in CardType::ALL {
            map.serialize_entry(card_type.as_str(), &self.get(card_type))?;
        }
        map.end()
    }
}

pub fn aggregate(entries: &[AnnotatedEntry<'_>]) -> DeckStats {
    let mut stats = DeckStats::default();

    for entry in entries {
        let count = u64::from(entry.count);
        stats.total += count;

        // Tags outside the tracked set are ignored.
        for card_type in entry.card.card_types() {
            stats.types.0[card_type.index()] += count;
        }

        // Color letters never overlap, so a per-character scan is enough.
        // Digits, braces and other symbols (X, /, S) fall through.
        if let Some(cost) = &entry.card.mana_cost {
            for color in cost.chars().filter_map(Color::from_letter) {
                stats.symbols.0[color.index()] += count;
            }
        }

        if let Some(mana_value) = entry.mana_value() {
            stats.curve[curve_bucket(mana_value)] += count;
        }
    }

    stats
}

pub fn curve_bucket(mana_value: u32) -> usize {
    (mana_value as usize).min(CURVE_BUCKETS - 1)
}

/// Order entries for display: mana value ascending (none first), then
/// multiverse id ascending (none first). Stable.
pub fn sort_for_display(entries: &mut [AnnotatedEntry<'_>]) {
    entries.sort_by_key(|e| (e.card.cmc, e.card.multiverse_id));
}
