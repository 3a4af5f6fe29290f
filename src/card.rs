use serde::{Deserialize, Deserializer, Serialize};

/// One set document as published by the card data source: `{ "cards": [...] }`.
#[derive(Debug, Clone, Deserialize)]
pub struct CardDocument {
    pub cards: Vec<CardRecord>,
}

/// Dictionary entry for a single card name.
///
/// Only the fields the editor consumes are kept; everything else in the
/// source JSON is ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mana_cost: Option<String>,
    #[serde(default, deserialize_with = "de_mana_value", skip_serializing_if = "Option::is_none")]
    pub cmc: Option<u32>,
    #[serde(default)]
    pub types: Vec<String>,
    /// Full type line, e.g. "Creature — Elf Druid".
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "de_stat", skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,
    #[serde(default, deserialize_with = "de_stat", skip_serializing_if = "Option::is_none")]
    pub toughness: Option<String>,
    #[serde(default, deserialize_with = "de_stat", skip_serializing_if = "Option::is_none")]
    pub loyalty: Option<String>,
    #[serde(default, rename = "multiverseid", skip_serializing_if = "Option::is_none")]
    pub multiverse_id: Option<u64>,
}

impl CardRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_mana_cost(mut self, cost: impl Into<String>) -> Self {
        self.mana_cost = Some(cost.into());
        self
    }

    pub fn with_cmc(mut self, cmc: u32) -> Self {
        self.cmc = Some(cmc);
        self
    }

    pub fn with_types(mut self, types: &[&str]) -> Self {
        self.types = types.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_type_line(mut self, line: impl Into<String>) -> Self {
        self.type_line = Some(line.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_power_toughness(mut self, power: &str, toughness: &str) -> Self {
        self.power = Some(power.to_string());
        self.toughness = Some(toughness.to_string());
        self
    }

    pub fn with_loyalty(mut self, loyalty: &str) -> Self {
        self.loyalty = Some(loyalty.to_string());
        self
    }

    pub fn with_multiverse_id(mut self, id: u64) -> Self {
        self.multiverse_id = Some(id);
        self
    }

    /// Type tags that belong to the tracked set, in tag order.
    pub fn card_types(&self) -> impl Iterator<Item = CardType> + '_ {
        self.types.iter().filter_map(|t| CardType::from_str(t))
    }

    /// Mana cost split into its symbols: `{2}{G}{G}` -> `["2", "G", "G"]`.
    pub fn mana_symbols(&self) -> Vec<&str> {
        match &self.mana_cost {
            Some(cost) => cost
                .split(['{', '}'])
                .filter(|s| !s.is_empty())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Hover text: oracle text, followed by power/toughness or loyalty.
    pub fn annotation(&self) -> String {
        let mut out = self.text.clone().unwrap_or_default();
        if let Some(power) = &self.power {
            let toughness = self.toughness.as_deref().unwrap_or_default();
            out.push('\n');
            out.push_str(power);
            out.push('/');
            out.push_str(toughness);
        } else if let Some(loyalty) = &self.loyalty {
            out.push('\n');
            out.push_str(loyalty);
        }
        out
    }
}

/// Card types counted by the type breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CardType {
    Artifact,
    Creature,
    Enchantment,
    Instant,
    Land,
    Planeswalker,
    Sorcery,
    Tribal,
}

impl CardType {
    pub const ALL: [CardType; 8] = [
        Self::Artifact,
        Self::Creature,
        Self::Enchantment,
        Self::Instant,
        Self::Land,
        Self::Planeswalker,
        Self::Sorcery,
        Self::Tribal,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Artifact" => Some(Self::Artifact),
            "Creature" => Some(Self::Creature),
            "Enchantment" => Some(Self::Enchantment),
            "Instant" => Some(Self::Instant),
            "Land" => Some(Self::Land),
            "Planeswalker" => Some(Self::Planeswalker),
            "Sorcery" => Some(Self::Sorcery),
            "Tribal" => Some(Self::Tribal),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Artifact => "Artifact",
            Self::Creature => "Creature",
            Self::Enchantment => "Enchantment",
            Self::Instant => "Instant",
            Self::Land => "Land",
            Self::Planeswalker => "Planeswalker",
            Self::Sorcery => "Sorcery",
            Self::Tribal => "Tribal",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Mana symbol colors. Each color owns exactly one cost letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
    Colorless,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Self::White,
        Self::Blue,
        Self::Black,
        Self::Red,
        Self::Green,
        Self::Colorless,
    ];

    /// Lowercase letter used in mana cost strings.
    pub fn letter(self) -> char {
        match self {
            Self::White => 'w',
            Self::Blue => 'u',
            Self::Black => 'b',
            Self::Red => 'r',
            Self::Green => 'g',
            Self::Colorless => 'c',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::White => "w",
            Self::Blue => "u",
            Self::Black => "b",
            Self::Red => "r",
            Self::Green => "g",
            Self::Colorless => "c",
        }
    }

    /// Case-insensitive lookup from a cost letter.
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'w' => Some(Self::White),
            'u' => Some(Self::Blue),
            'b' => Some(Self::Black),
            'r' => Some(Self::Red),
            'g' => Some(Self::Green),
            'c' => Some(Self::Colorless),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

// Older set files carry `cmc` as a float (e.g. `3.0`, or `0.5` for half-cost cards).
fn de_mana_value<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<f64> = Option::deserialize(deserializer)?;
    Ok(value
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.trunc() as u32))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StatValue {
    Text(String),
    Number(serde_json::Number),
}

// Power, toughness and loyalty appear both as strings ("*", "1+*") and as numbers.
fn de_stat<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<StatValue> = Option::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        StatValue::Text(s) => s,
        StatValue::Number(n) => n.to_string(),
    }))
}
