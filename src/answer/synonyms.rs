//! Accepted alternative phrasings for canonical answers.

use serde::Serialize;
use std::collections::BTreeMap;

use super::sanitize::normalize;

/// Curated alternatives shipped with the engine.
const BUILTIN: &[(&str, &[&str])] = &[
    (
        "empire state building",
        &["esb", "empire state", "the empire state building"],
    ),
    (
        "statue of liberty",
        &["lady liberty", "liberty statue", "the statue of liberty"],
    ),
    ("brooklyn bridge", &["the brooklyn bridge"]),
    ("central park", &["the park", "central pk"]),
    ("times square", &["time square", "times sq", "time sq"]),
    (
        "grand central terminal",
        &["grand central", "grand central station", "gct"],
    ),
    (
        "one world trade center",
        &["freedom tower", "1 wtc", "one wtc", "world trade center"],
    ),
    (
        "flatiron building",
        &["flatiron", "flat iron building", "fuller building"],
    ),
    ("chrysler building", &["chrysler"]),
    (
        "metropolitan museum of art",
        &["the met", "met museum", "metropolitan museum"],
    ),
    (
        "new york public library",
        &["nypl", "public library", "stephen a. schwarzman building"],
    ),
    ("rockefeller center", &["rockefeller", "30 rock", "rock center"]),
    ("high line", &["the high line", "highline"]),
    ("wall street", &["wall st"]),
    ("one", &["1"]),
    ("two", &["2"]),
    ("three", &["3"]),
    ("four", &["4"]),
    ("five", &["5"]),
    ("six", &["6"]),
    ("seven", &["7"]),
    ("eight", &["8"]),
    ("nine", &["9"]),
    ("ten", &["10"]),
    ("twelve", &["12"]),
];

/// Immutable mapping from canonical lowercase answers to alternatives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SynonymTable {
    entries: BTreeMap<String, Vec<String>>,
}

impl SynonymTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The curated builtin table.
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN
                .iter()
                .map(|(key, values)| (key.to_string(), values.iter().map(|v| v.to_string()).collect())),
        )
    }

    /// Build from arbitrary entries. Keys and values are normalized; blank
    /// values are dropped and duplicates collapsed.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut table = Self::new();
        table.merge(entries);
        table
    }

    /// A copy of this table extended with `extra` entries.
    pub fn with_extra<I>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        self.merge(extra);
        self
    }

    fn merge<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        for (key, values) in entries {
            let key = normalize(&key);
            if key.is_empty() {
                continue;
            }
            let slot = self.entries.entry(key).or_default();
            for value in values {
                let value = normalize(&value);
                if !value.is_empty() && !slot.contains(&value) {
                    slot.push(value);
                }
            }
        }
    }

    /// Alternatives for an already-normalized canonical answer.
    pub fn synonyms_for(&self, canonical: &str) -> &[String] {
        self.entries
            .get(canonical)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let table = SynonymTable::builtin();
        assert!(table
            .synonyms_for("empire state building")
            .contains(&"esb".to_string()));
        assert!(table.synonyms_for("not a landmark").is_empty());
    }

    #[test]
    fn test_builtin_is_already_normalized() {
        let table = SynonymTable::builtin();
        assert_eq!(table.len(), BUILTIN.len());
        for (key, values) in BUILTIN {
            assert_eq!(normalize(key), *key);
            for value in *values {
                assert_eq!(normalize(value), *value);
            }
        }
    }

    #[test]
    fn test_entries_are_normalized() {
        let table = SynonymTable::from_entries(vec![(
            "  Lincoln Center ".to_string(),
            vec!["LINCOLN CTR".to_string(), "  ".to_string(), "lincoln ctr".to_string()],
        )]);
        assert_eq!(table.synonyms_for("lincoln center"), &["lincoln ctr".to_string()]);
    }

    #[test]
    fn test_extra_entries_extend_existing_keys() {
        let table = SynonymTable::builtin().with_extra(vec![(
            "brooklyn bridge".to_string(),
            vec!["bk bridge".to_string()],
        )]);
        let synonyms = table.synonyms_for("brooklyn bridge");
        assert!(synonyms.contains(&"the brooklyn bridge".to_string()));
        assert!(synonyms.contains(&"bk bridge".to_string()));
    }

    #[test]
    fn test_blank_keys_are_ignored() {
        let table = SynonymTable::from_entries(vec![(" ".to_string(), vec!["x".to_string()])]);
        assert!(table.is_empty());
    }
}
