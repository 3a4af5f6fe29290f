use crate::card::CardRecord;
use crate::dictionary::Dictionary;
use crate::parser::DeckEntry;
use serde::Serialize;

/// A deck entry joined with its dictionary record.
///
/// Serializes as one flat object: the card's attributes plus the entry's
/// `count`, the cost split into `symbols` for icon rendering, and the hover
/// `annotation`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedEntry<'d> {
    pub count: u32,
    pub name: String,
    pub card: &'d CardRecord,
}

impl AnnotatedEntry<'_> {
    pub fn mana_value(&self) -> Option<u32> {
        self.card.cmc
    }
}

impl Serialize for AnnotatedEntry<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Flat<'a> {
            #[serde(flatten)]
            card: &'a CardRecord,
            count: u32,
            symbols: Vec<&'a str>,
            annotation: String,
        }

        // `name` comes from the record: lookup is exact, so it equals the entry's.
        Flat {
            card: self.card,
            count: self.count,
            symbols: self.card.mana_symbols(),
            annotation: self.card.annotation(),
        }
        .serialize(serializer)
    }
}

/// Join entries against the dictionary, dropping names it does not know.
///
/// Lookup is exact and case-sensitive; output keeps input order.
pub fn annotate<'d>(entries: &[DeckEntry], dictionary: &'d Dictionary) -> Vec<AnnotatedEntry<'d>> {
    entries
        .iter()
        .filter_map(|entry| {
            dictionary.get(&entry.name).map(|card| AnnotatedEntry {
                count: entry.count,
                name: entry.name.clone(),
                card,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use proptest::prelude::*;

    fn dictionary() -> Dictionary {
        [
            CardRecord::new("Island").with_types(&["Land"]),
            CardRecord::new("Llanowar Elves")
                .with_mana_cost("{G}")
                .with_cmc(1)
                .with_types(&["Creature"]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_annotate_drops_unknown() {
        let dict = dictionary();
        let entries = parse("4 Island\n2 Unknown Card\n4 llanowar elves\n4 Llanowar Elves");
        let annotated = annotate(&entries, &dict);

        let names: Vec<_> = annotated.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Island", "Llanowar Elves"]);
        assert_eq!(annotated[1].count, 4);
        assert_eq!(annotated[1].mana_value(), Some(1));
    }

    #[test]
    fn test_annotate_keeps_duplicate_lines() {
        let dict = dictionary();
        let entries = parse("2 Island\n3 Island");
        let annotated = annotate(&entries, &dict);

        assert_eq!(annotated.len(), 2);
        assert_eq!(annotated[0].count, 2);
        assert_eq!(annotated[1].count, 3);
    }

    #[test]
    fn test_serialize_flat() {
        let dict = dictionary();
        let entries = parse("4 Llanowar Elves");
        let annotated = annotate(&entries, &dict);
        let json = serde_json::to_value(&annotated[0]).unwrap();

        assert_eq!(json["count"], 4);
        assert_eq!(json["name"], "Llanowar Elves");
        assert_eq!(json["manaCost"], "{G}");
        assert_eq!(json["cmc"], 1);
        assert_eq!(json["types"][0], "Creature");
        assert_eq!(json["symbols"], serde_json::json!(["G"]));
    }

    proptest! {
        #[test]
        fn prop_annotate_is_ordered_filter(picks in prop::collection::vec((1u32..5, 0usize..3), 0..12)) {
            let dict = dictionary();
            let pool = ["Island", "Llanowar Elves", "Forest"];
            let entries: Vec<_> = picks
                .iter()
                .map(|&(count, i)| DeckEntry::new(count, pool[i]))
                .collect();

            let annotated = annotate(&entries, &dict);
            let expected: Vec<_> = entries
                .iter()
                .filter(|e| dict.contains(&e.name))
                .map(|e| (e.count, e.name.clone()))
                .collect();
            let actual: Vec<_> = annotated.iter().map(|e| (e.count, e.name.clone())).collect();

            prop_assert!(annotated.len() <= entries.len());
            prop_assert_eq!(actual, expected);
        }
    }
}
