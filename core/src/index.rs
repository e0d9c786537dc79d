use std::collections::{BTreeMap, HashMap};

pub type DocId = String;
pub type Term = String;
pub type Frequency = u32;

/// Inner level of either index, always ordered by key.
pub type Postings = BTreeMap<String, Frequency>;

/// Two-level mapping shared by both indexes: outer key -> inner key -> frequency.
pub type Table = HashMap<String, Postings>;

/// Document -> term -> number of occurrences in that document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardIndex {
    docs: Table,
}

/// Term -> document -> number of occurrences in that document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvertedIndex {
    terms: Table,
}

impl ForwardIndex {
    pub fn from_table(docs: Table) -> Self {
        Self { docs }
    }

    pub fn table(&self) -> &Table {
        &self.docs
    }

    pub fn get(&self, doc_id: &str) -> Option<&Postings> {
        self.docs.get(doc_id)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DocId, &Postings)> {
        self.docs.iter()
    }

    /// Total number of indexed terms in a document, counting repeats.
    pub fn term_count(&self, doc_id: &str) -> Option<u64> {
        self.docs.get(doc_id).map(|terms| terms.values().map(|&f| f as u64).sum())
    }
}

impl InvertedIndex {
    pub fn from_table(terms: Table) -> Self {
        Self { terms }
    }

    pub fn table(&self) -> &Table {
        &self.terms
    }

    pub fn get(&self, term: &str) -> Option<&Postings> {
        self.terms.get(term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Term, &Postings)> {
        self.terms.iter()
    }

    /// Number of documents containing the term.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.terms.get(term).map_or(0, |p| p.len())
    }
}

/// Count each distinct term per document.
///
/// A document with no terms keeps an empty entry so it still shows up in the
/// persisted forward index.
pub fn build_forward_index(documents: &HashMap<DocId, Vec<Term>>) -> ForwardIndex {
    let mut docs = Table::with_capacity(documents.len());
    for (doc_id, terms) in documents {
        let mut counts = Postings::new();
        for term in terms {
            *counts.entry(term.clone()).or_insert(0) += 1;
        }
        docs.insert(doc_id.clone(), counts);
    }
    ForwardIndex { docs }
}

/// Transpose a forward index. Frequencies are copied per document, never summed.
pub fn build_inverted_index(forward: &ForwardIndex) -> InvertedIndex {
    let mut terms = Table::new();
    for (doc_id, counts) in forward.iter() {
        for (term, &freq) in counts {
            terms.entry(term.clone()).or_default().insert(doc_id.clone(), freq);
        }
    }
    InvertedIndex { terms }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(pairs: &[(&str, &[&str])]) -> HashMap<DocId, Vec<Term>> {
        pairs
            .iter()
            .map(|(id, terms)| (id.to_string(), terms.iter().map(|t| t.to_string()).collect()))
            .collect()
    }

    #[test]
    fn counts_are_exact_multisets() {
        let fwd = build_forward_index(&docs(&[("d1", &["cat", "sat", "cat", "cat"])]));
        let d1 = fwd.get("d1").unwrap();
        assert_eq!(d1.get("cat"), Some(&3));
        assert_eq!(d1.get("sat"), Some(&1));
        assert_eq!(d1.len(), 2);
        assert_eq!(fwd.term_count("d1"), Some(4));
    }

    #[test]
    fn empty_document_is_empty_mapping() {
        let fwd = build_forward_index(&docs(&[("blank", &[])]));
        assert_eq!(fwd.get("blank"), Some(&Postings::new()));
        assert_eq!(fwd.term_count("blank"), Some(0));
        assert!(build_inverted_index(&fwd).is_empty());
    }

    #[test]
    fn inversion_does_not_aggregate_across_documents() {
        let fwd = build_forward_index(&docs(&[("a", &["x", "x"]), ("b", &["x"])]));
        let inv = build_inverted_index(&fwd);
        let x = inv.get("x").unwrap();
        assert_eq!(x.get("a"), Some(&2));
        assert_eq!(x.get("b"), Some(&1));
        assert_eq!(inv.document_frequency("x"), 2);
        assert_eq!(inv.document_frequency("y"), 0);
    }

    #[test]
    fn empty_forward_gives_empty_inverted() {
        assert!(build_inverted_index(&ForwardIndex::default()).is_empty());
    }
}
