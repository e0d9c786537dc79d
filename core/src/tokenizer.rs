use crate::error::{IndexError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    // Words may be joined by internal hyphens, periods or apostrophes; anything else
    // that is not whitespace comes out as a punctuation token.
    static ref TOKEN_RE: Regex = Regex::new(r"(?u)\w+(?:[-.']\w+)*|[^\w\s]+").expect("valid regex");
}

const ENGLISH_STOPWORDS: &[&str] = &[
    "a","about","above","after","again","against","all","am","an","and","any","are","as","at",
    "be","because","been","before","being","below","between","both","but","by",
    "can","cannot","could",
    "did","do","does","doing","down","during",
    "each","few","for","from","further",
    "had","has","have","having","he","her","here","hers","herself","him","himself","his","how",
    "i","if","in","into","is","it","its","itself",
    "me","more","most","my","myself",
    "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
    "same","she","should","so","some","such",
    "than","that","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
    "under","until","up","very",
    "was","we","were","what","when","where","which","while","who","whom","why","with","would",
    "you","your","yours","yourself","yourselves",
];

/// Materialize the tokenizer resources ahead of first use.
///
/// Safe to call any number of times; the host calls it once at startup before
/// building a [`Normalizer`].
pub fn bootstrap() {
    lazy_static::initialize(&TOKEN_RE);
}

/// Split text into lowercase word and punctuation tokens, without filtering or stemming.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.nfkc().collect::<String>().to_lowercase();
    let mut tokens = Vec::new();
    for mat in TOKEN_RE.find_iter(&lowered) {
        split_clitic(mat.as_str(), &mut tokens);
    }
    tokens
}

// "don't" -> "do" + "n't", "cat's" -> "cat" + "'s". Hyphenated or dotted words are
// left whole, so they fail the alphabetic check later.
fn split_clitic(token: &str, out: &mut Vec<String>) {
    let simple = token.matches('\'').count() == 1 && !token.contains(&['-', '.'][..]);
    if !simple {
        out.push(token.to_string());
        return;
    }
    let cut = if token.len() > 3 && token.ends_with("n't") {
        token.len() - 3
    } else {
        token.find('\'').unwrap_or(token.len())
    };
    let (head, tail) = token.split_at(cut);
    if !head.is_empty() {
        out.push(head.to_string());
    }
    if !tail.is_empty() {
        out.push(tail.to_string());
    }
}

fn is_alphabetic(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphabetic)
}

/// Words excluded from document indexing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stopwords(HashSet<String>);

impl Stopwords {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in English list, used when no stopword file is configured.
    pub fn english() -> Self {
        ENGLISH_STOPWORDS.iter().copied().collect()
    }

    /// Read a whitespace-separated word list.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| IndexError::missing(path, e))?;
        let text = String::from_utf8(bytes).map_err(|e| IndexError::Encoding {
            path: path.to_path_buf(),
            offset: e.utf8_error().valid_up_to(),
        })?;
        let words: Self = text.split_whitespace().collect();
        tracing::debug!(path = %path.display(), count = words.len(), "loaded stopwords");
        Ok(words)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for Stopwords {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_string).collect())
    }
}

/// Turns raw text into index terms: lowercase, alphabetic-only, stemmed.
///
/// Documents are additionally filtered against the stopword set; queries are not.
pub struct Normalizer {
    stemmer: Stemmer,
    stopwords: Stopwords,
}

impl Normalizer {
    pub fn new(stopwords: Stopwords) -> Self {
        Self { stemmer: Stemmer::create(Algorithm::English), stopwords }
    }

    pub fn stopwords(&self) -> &Stopwords {
        &self.stopwords
    }

    pub fn stem(&self, word: &str) -> String {
        self.stemmer.stem(word).into_owned()
    }

    /// Terms for a document, in text order.
    pub fn normalize_document(&self, text: &str) -> Vec<String> {
        tokenize(text)
            .into_iter()
            .filter(|t| is_alphabetic(t) && !self.stopwords.contains(t))
            .map(|t| self.stem(&t))
            .collect()
    }

    /// Terms for a query. The stopword set is deliberately not applied here.
    pub fn normalize_query(&self, text: &str) -> Vec<String> {
        tokenize(text)
            .into_iter()
            .filter(|t| is_alphabetic(t))
            .map(|t| self.stem(&t))
            .collect()
    }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("stemmer", &"english")
            .field("stopwords", &self.stopwords.len())
            .finish()
    }
}
