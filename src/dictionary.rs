//! Card dictionary: every card name known to the editor, merged from one or
//! more set documents.

use crate::card::{CardDocument, CardRecord};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Set files loaded by the editor page when no sources are given.
pub const DEFAULT_SOURCES: [&str; 7] = [
    "./dict/DTK.json",
    "./dict/ORI.json",
    "./dict/BFZ.json",
    "./dict/OGW.json",
    "./dict/W16.json",
    "./dict/SOI.json",
    "./dict/EMN.json",
];

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to fetch {location}: {source}")]
    Fetch {
        location: String,
        #[source]
        source: io::Error,
    },
    #[error("Malformed card data in {location}: {source}")]
    Malformed {
        location: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Retrieves the raw text of a card data source.
pub trait SourceFetcher: Sync {
    fn fetch(&self, location: &str) -> io::Result<String>;
}

/// Reads sources from the filesystem, relative to `root`.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for FsFetcher {
    fn default() -> Self {
        Self::new(".")
    }
}

impl SourceFetcher for FsFetcher {
    fn fetch(&self, location: &str) -> io::Result<String> {
        fs::read_to_string(self.root.join(location))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    cards: HashMap<String, CardRecord>,
    // Lexicographic, rebuilt whenever the card set changes.
    names: Vec<String>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold documents into one dictionary. Later documents win on name collision.
    pub fn from_documents(documents: impl IntoIterator<Item = CardDocument>) -> Self {
        let mut cards = HashMap::new();
        for doc in documents {
            for card in doc.cards {
                cards.insert(card.name.clone(), card);
            }
        }
        Self::from_map(cards)
    }

    /// Parse `(location, json)` pairs that were already fetched, in source order.
    pub fn from_json_sources<'a>(
        sources: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, LoadError> {
        let documents = sources
            .into_iter()
            .map(|(location, json)| parse_document(location, json))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_documents(documents))
    }

    fn from_map(cards: HashMap<String, CardRecord>) -> Self {
        let mut names: Vec<String> = cards.keys().cloned().collect();
        names.sort();
        Self { cards, names }
    }

    /// Add or replace a single card.
    pub fn insert(&mut self, card: CardRecord) {
        if let Err(pos) = self.names.binary_search(&card.name) {
            self.names.insert(pos, card.name.clone());
        }
        self.cards.insert(card.name.clone(), card);
    }

    pub fn get(&self, name: &str) -> Option<&CardRecord> {
        self.cards.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cards.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// All card names, sorted lexicographically.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl FromIterator<CardRecord> for Dictionary {
    fn from_iter<I: IntoIterator<Item = CardRecord>>(iter: I) -> Self {
        let mut cards = HashMap::new();
        for card in iter {
            cards.insert(card.name.clone(), card);
        }
        Self::from_map(cards)
    }
}

/// Fetch and parse every source concurrently, then merge them in list order.
///
/// The first failing source aborts the whole load.
pub fn load<S: AsRef<str> + Sync>(
    sources: &[S],
    fetcher: &impl SourceFetcher,
) -> Result<Dictionary, LoadError> {
    let documents = sources
        .par_iter()
        .map(|location| -> Result<CardDocument, LoadError> {
            let location = location.as_ref();
            let json = fetcher.fetch(location).map_err(|source| LoadError::Fetch {
                location: location.to_string(),
                source,
            })?;
            let doc = parse_document(location, &json)?;
            tracing::debug!(location, cards = doc.cards.len(), "loaded card source");
            Ok(doc)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let dict = Dictionary::from_documents(documents);
    tracing::debug!(sources = sources.len(), cards = dict.len(), "dictionary ready");
    Ok(dict)
}

fn parse_document(location: &str, json: &str) -> Result<CardDocument, LoadError> {
    serde_json::from_str(json).map_err(|source| LoadError::Malformed {
        location: location.to_string(),
        source,
    })
}
