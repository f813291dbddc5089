//! Whole-word overrides with idiomatic spellings.
//!
//! Character-level rules produce "uttoroprante" for উত্তরপ্রান্তে; readers
//! expect "uttarprante". Entries here win over the mapper for an exact match
//! on the whole word, and their casing is used verbatim (proper nouns are
//! capitalised).

use super::normalize::normalize;
use crate::error::TranslitError;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

const BUILT_IN: &[(&str, &str)] = &[
    ("পথের", "pother"),
    ("পাঁচালী", "pachali"),
    ("নিশ্চিন্দিপুর", "Nishchindipur"),
    ("গ্রামের", "gramer"),
    ("একেবারে", "ekebare"),
    ("উত্তরপ্রান্তে", "uttarprante"),
    ("বাংলা", "bangla"),
    ("ভাষা", "bhasha"),
    ("সাহিত্য", "sahitya"),
    ("কবিতা", "kobita"),
    ("গল্প", "golpo"),
    ("উপন্যাস", "uponnyas"),
    ("লেখক", "lekhok"),
    ("কবি", "kobi"),
    ("রবীন্দ্রনাথ", "Rabindranath"),
    ("ঠাকুর", "Thakur"),
    ("বাংলাদেশ", "Bangladesh"),
    ("বিশ্বকবি", "bishwakobi"),
    ("অত্যন্ত", "otyonto"),
    ("সুন্দর", "sundor"),
];

/// Exact-match word → spelling table.
#[derive(Debug, Clone)]
pub struct ExceptionDictionary {
    entries: HashMap<String, String>,
}

impl Default for ExceptionDictionary {
    fn default() -> Self {
        Self::built_in()
    }
}

impl ExceptionDictionary {
    /// The built-in dictionary.
    pub fn built_in() -> Self {
        let mut dict = Self::empty();
        dict.extend(BUILT_IN.iter().copied());
        dict
    }

    /// An empty dictionary (pure rule-based output).
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Preferred spelling for `word`, if listed.
    pub fn lookup(&self, word: &str) -> Option<&str> {
        self.entries.get(word).map(String::as_str)
    }

    /// Add or replace one entry. The key is normalised the same way input
    /// text is, so decomposed spellings still match.
    pub fn insert(&mut self, word: impl Into<String>, spelling: impl Into<String>) {
        self.entries.insert(normalize(&word.into()), spelling.into());
    }

    /// Merge `other` into `self`; entries in `other` win.
    pub fn extend<I, K, V>(&mut self, other: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in other {
            self.insert(k, v);
        }
    }

    /// Parse a JSON object of `{"বাংলা word": "spelling"}` pairs.
    pub fn parse_json(json: &str) -> Result<HashMap<String, String>, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Merge entries from a JSON file on top of the current ones.
    pub fn load_json_file(&mut self, path: impl AsRef<Path>) -> Result<usize, TranslitError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| TranslitError::ExceptionsLoad {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        let parsed = Self::parse_json(&raw).map_err(|e| TranslitError::ExceptionsLoad {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        let n = parsed.len();
        self.extend(parsed);
        debug!("Loaded {} exception entries from {}", n, path.display());
        Ok(n)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
