use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateToken {
    pub value: String,
    pub source_index: usize,
}

impl CandidateToken {
    pub fn new(value: impl Into<String>, source_index: usize) -> Self {
        Self {
            value: value.into(),
            source_index,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizationMode {
    /// First word of the first non-empty line; the input for summarization.
    FirstWord,
    /// Every non-empty line shorter than `max_length` characters; the fan-out
    /// for registry lookups.
    ShortLines { max_length: usize },
}

/// De-duplicated tokens with the source indices that produced each of them.
///
/// The token set is the key set of the provenance map, so the two can never
/// disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenIndex {
    provenance: BTreeMap<String, BTreeSet<usize>>,
}

impl TokenIndex {
    pub fn insert(&mut self, token: CandidateToken) {
        self.provenance
            .entry(token.value)
            .or_default()
            .insert(token.source_index);
    }

    pub fn token_set(&self) -> BTreeSet<&str> {
        self.provenance.keys().map(String::as_str).collect()
    }

    pub fn provenance(&self) -> &BTreeMap<String, BTreeSet<usize>> {
        &self.provenance
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.provenance.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.provenance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.provenance.is_empty()
    }
}

impl Extend<CandidateToken> for TokenIndex {
    fn extend<I: IntoIterator<Item = CandidateToken>>(&mut self, tokens: I) {
        for token in tokens {
            self.insert(token);
        }
    }
}
