// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

/// A string-to-string map that keeps its entries in insertion order.
///
/// Setting an existing key overwrites the value in place, so the key keeps
/// the position of its first occurrence but the last value wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderedMap {
    entries: Vec<(String, String)>,
}

/// Request headers, keyed by their normalized (title-case) name.
pub type HeaderMap = OrderedMap;

/// The parameters of the query string.
pub type QueryMap = OrderedMap;

impl OrderedMap {
    pub fn new() -> OrderedMap {
        OrderedMap::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn set(&mut self, key: String, value: String) {
        for (name, existing_value) in &mut self.entries {
            if *name == key {
                *existing_value = value;
                return;
            }
        }

        self.entries.push((key, value));
    }
}

impl<K, V> FromIterator<(K, V)> for OrderedMap
        where K: Into<String>,
              V: Into<String> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        for (key, value) in iter {
            map.set(key.into(), value.into());
        }
        map
    }
}
