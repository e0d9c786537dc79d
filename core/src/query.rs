use crate::index::{InvertedIndex, Postings, Term};
use crate::tokenizer::Normalizer;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

pub const NO_ENTRIES: &str = "No entries found.";
pub const EXIT_SENTINEL: &str = "exit";

/// Outcome of looking up one query term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(Postings),
    NotFound,
}

impl Lookup {
    pub fn postings(&self) -> Option<&Postings> {
        match self {
            Lookup::Found(p) => Some(p),
            Lookup::NotFound => None,
        }
    }
}

impl Serialize for Lookup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Lookup::Found(postings) => postings.serialize(serializer),
            Lookup::NotFound => serializer.serialize_str(NO_ENTRIES),
        }
    }
}

/// One entry per distinct stemmed query term.
pub type QueryResults = BTreeMap<Term, Lookup>;

/// Answers term lookups against a built inverted index.
pub struct QueryEngine<'a> {
    index: &'a InvertedIndex,
    normalizer: &'a Normalizer,
}

impl<'a> QueryEngine<'a> {
    pub fn new(index: &'a InvertedIndex, normalizer: &'a Normalizer) -> Self {
        Self { index, normalizer }
    }

    pub fn search(&self, query: &str) -> QueryResults {
        let mut results = QueryResults::new();
        for term in self.normalizer.normalize_query(query) {
            let lookup = match self.index.get(&term) {
                Some(postings) => Lookup::Found(postings.clone()),
                None => Lookup::NotFound,
            };
            results.insert(term, lookup);
        }
        tracing::debug!(query, terms = results.len(), "query answered");
        results
    }
}

/// Whether an input line ends the interactive session.
pub fn is_exit(line: &str) -> bool {
    line.trim_end_matches(&['\r', '\n'][..]).eq_ignore_ascii_case(EXIT_SENTINEL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Stopwords;

    #[test]
    fn not_found_serializes_as_message() {
        let mut r = QueryResults::new();
        r.insert("xyz".into(), Lookup::NotFound);
        assert_eq!(serde_json::to_string(&r).unwrap(), r#"{"xyz":"No entries found."}"#);
    }

    #[test]
    fn empty_query_gives_empty_results() {
        let n = Normalizer::new(Stopwords::empty());
        let idx = InvertedIndex::default();
        assert!(QueryEngine::new(&idx, &n).search("  ?! 42 ").is_empty());
    }

    #[test]
    fn exit_sentinel_is_case_insensitive() {
        assert!(is_exit("exit"));
        assert!(is_exit("EXIT\n"));
        assert!(is_exit("exit\r\n"));
        assert!(!is_exit("exits"));
        assert!(!is_exit("  exit  "));
    }
}
