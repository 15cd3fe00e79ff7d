//! Installed set - source packages known to the host package manager
//!
//! Maps a full source address (optionally `address@pin`) to the short name
//! the host manager knows the package by. Presence of a key means the
//! package is already built, installed and visible natively.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledSet {
    entries: BTreeMap<String, String>,
}

impl InstalledSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the flat `key: value` format. Lines without a `: ` separator
    /// are skipped; a later line for the same key wins.
    pub fn parse(content: &str) -> Self {
        let mut set = Self::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once(": ") {
                let (key, value) = (key.trim(), value.trim());
                if !key.is_empty() && !value.is_empty() {
                    set.entries.insert(key.to_string(), value.to_string());
                }
            }
        }
        set
    }

    /// Render one line in the persisted format
    pub fn format_line(key: &str, short_name: &str) -> String {
        format!("{}: {}\n", key, short_name)
    }

    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| Self::format_line(k, v))
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, short_name: impl Into<String>) {
        self.entries.insert(key.into(), short_name.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keys whose address part (before any `@pin`) equals `address`
    pub fn keys_for_address<'a>(&'a self, address: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries.keys().map(String::as_str).filter(move |k| {
            let base = k.split_once('@').map(|(a, _)| a).unwrap_or(k);
            base == address
        })
    }
}
