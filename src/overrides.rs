//! User-supplied `Name=NN` code overrides.

use crate::domain::AttributeCode;
use crate::utils::normalize_name;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One parsed override line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideEntry {
    pub name: String,
    pub code: AttributeCode,
}

/// Name→code pairs that take precedence over the built-in dictionary.
///
/// Keys are stored in normalized form, so `"Azul Marinho"` and
/// `"AZUL  MARINHO"` address the same entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideMap {
    entries: BTreeMap<String, AttributeCode>,
}

impl OverrideMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses newline-separated `Name=NN` lines.
    ///
    /// Blank lines, lines without `=`, lines with an empty name and lines whose
    /// code is not exactly two digits are skipped. A repeated name keeps the
    /// last code.
    pub fn parse(text: &str) -> Self {
        let mut map = Self::new();
        for line in text.lines() {
            match parse_line(line) {
                Some(entry) => {
                    map.entries.insert(normalize_name(&entry.name), entry.code);
                }
                None if !line.trim().is_empty() => {
                    tracing::debug!(line = %line.trim(), "skipping malformed override line");
                }
                None => {}
            }
        }
        map
    }

    /// Inserts or replaces a mapping, returning the previous code.
    pub fn insert(&mut self, name: &str, code: AttributeCode) -> Option<AttributeCode> {
        self.entries.insert(normalize_name(name), code)
    }

    pub fn remove(&mut self, name: &str) -> Option<AttributeCode> {
        self.entries.remove(&normalize_name(name))
    }

    pub fn get(&self, name: &str) -> Option<&AttributeCode> {
        self.entries.get(&normalize_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by normalized name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeCode)> + '_ {
        self.entries.iter().map(|(name, code)| (name.as_str(), code))
    }

    /// Serializes back into `Name=NN` lines with normalized names.
    pub fn to_text(&self) -> String {
        self.iter()
            .map(|(name, code)| format!("{}={}", name, code))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn parse_line(line: &str) -> Option<OverrideEntry> {
    let (name, code) = line.trim().split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let code = AttributeCode::parse(code.trim()).ok()?;
    Some(OverrideEntry {
        name: name.to_string(),
        code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(raw: &str) -> AttributeCode {
        AttributeCode::parse(raw).unwrap()
    }

    #[test]
    fn parse_skips_blank_and_malformed_lines() {
        let map = OverrideMap::parse("Preto=50\n\n  \nsem igual\n=12\nAzul=7\nVerde=123\nRosa = 31 \r\n");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("PRETO"), Some(&code("50")));
        assert_eq!(map.get("rosa"), Some(&code("31")));
        assert!(!map.contains("azul"));
        assert!(!map.contains("verde"));
    }

    #[test]
    fn last_write_wins_on_normalized_names() {
        let map = OverrideMap::parse("Lilás=10\nLILAS=11\nlilas=12");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("Lilas"), Some(&code("12")));
    }

    #[test]
    fn text_round_trip_is_stable() {
        let map = OverrideMap::parse("Preto=50\nAzul Marinho=25");
        let again = OverrideMap::parse(&map.to_text());
        assert_eq!(again, map);
        assert_eq!(map.to_text(), "azul marinho=25\npreto=50");
    }

    #[test]
    fn insert_and_remove_use_normalized_keys() {
        let mut map = OverrideMap::new();
        assert!(map.is_empty());
        assert_eq!(map.insert("Verde Água", code("18")), None);
        assert_eq!(map.insert("verde agua", code("19")), Some(code("18")));
        assert_eq!(map.remove("VERDE AGUA"), Some(code("19")));
        assert!(map.is_empty());
    }
}
