//! Plain-text rendering of an analysis, used by the command line tool.

use crate::card::{CardType, Color};
use crate::measure::{display_width, pad_to};
use crate::session::{DeckView, Presenter};
use crate::stats::CURVE_BUCKETS;

// Symbol rows follow the editor page: blue, white, red, green, black, colorless.
const SYMBOL_ORDER: [Color; 6] = [
    Color::Blue,
    Color::White,
    Color::Red,
    Color::Green,
    Color::Black,
    Color::Colorless,
];

// Curve bars longer than this are cut off; the count is still printed.
const MAX_BAR: usize = 60;

#[derive(Debug, Default)]
pub struct TextReport {
    output: String,
}

impl TextReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.output
    }

    pub fn into_string(self) -> String {
        self.output
    }
}

impl Presenter for TextReport {
    fn present(&mut self, view: &DeckView<'_>) {
        self.output = render(view);
    }
}

pub fn render(view: &DeckView<'_>) -> String {
    let stats = view.stats;
    let mut out = String::new();

    out.push_str(&format!("Total: {}\n", stats.total));

    out.push_str("\nSymbols:\n");
    for color in SYMBOL_ORDER {
        out.push_str(&format!("  {}  {}\n", color.letter(), stats.color(color)));
    }

    out.push_str("\nTypes:\n");
    let type_width = CardType::ALL
        .iter()
        .map(|t| t.as_str().len())
        .max()
        .unwrap_or(0);
    for card_type in CardType::ALL {
        out.push_str(&format!(
            "  {}  {}\n",
            pad_to(card_type.as_str(), type_width),
            stats.card_type(card_type)
        ));
    }

    if view.show_curve {
        out.push_str("\nCurve:\n");
        for (mana, &count) in stats.curve.iter().enumerate() {
            let label = if mana == CURVE_BUCKETS - 1 {
                format!("{}+", mana)
            } else {
                mana.to_string()
            };
            if count == 0 {
                out.push_str(&format!("  {:>3} | 0\n", label));
            } else {
                let bar = "#".repeat((count as usize).min(MAX_BAR));
                out.push_str(&format!("  {:>3} | {} {}\n", label, bar, count));
            }
        }
    }

    out.push_str("\nCards:\n");
    let name_width = view
        .entries
        .iter()
        .map(|e| display_width(&e.name))
        .max()
        .unwrap_or(0);
    for entry in view.entries {
        let cost = entry.card.mana_cost.as_deref().unwrap_or("");
        let type_line = entry
            .card
            .type_line
            .clone()
            .unwrap_or_else(|| entry.card.types.join(" "));
        let line = format!(
            "  {:>3}  {}  {}  {}",
            entry.count,
            pad_to(&entry.name, name_width),
            cost,
            type_line
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}
