//! Term indexing over a static document collection: normalization, forward and
//! inverted indexes, a sorted text persistence format and term lookups.

pub mod error;
pub mod index;
pub mod persist;
pub mod pipeline;
pub mod query;
pub mod source;
pub mod tokenizer;

pub use error::{IndexError, Result};
pub use index::*;
pub use pipeline::{build, BuildOptions, Indexes, SaveReport};
pub use query::{Lookup, QueryEngine, QueryResults};
pub use source::{DirectorySource, DocumentSource, EncodingPolicy, MemorySource};
pub use tokenizer::{Normalizer, Stopwords};
