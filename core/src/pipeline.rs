use crate::error::Result;
use crate::index::{build_forward_index, build_inverted_index, DocId, ForwardIndex, InvertedIndex, Term};
use crate::persist::{file_size_mib, save_table, IndexPaths};
use crate::source::DocumentSource;
use crate::tokenizer::Normalizer;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    /// Sort forward index lines by document id.
    pub sort_forward: bool,
    /// Sort inverted index lines by term.
    pub sort_inverted: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self { sort_forward: true, sort_inverted: true }
    }
}

/// Both indexes for one corpus, built together.
#[derive(Debug, Clone, Default)]
pub struct Indexes {
    pub forward: ForwardIndex,
    pub inverted: InvertedIndex,
}

#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: PathBuf,
    pub size_mib: f64,
}

#[derive(Debug, Clone)]
pub struct SaveReport {
    pub forward: Artifact,
    pub inverted: Artifact,
}

/// Normalize every document from `source`, then build the forward and inverted indexes.
///
/// Any failure to load the corpus aborts before indexing starts.
pub fn build<S: DocumentSource + ?Sized>(source: &S, normalizer: &Normalizer) -> Result<Indexes> {
    let raw = source.load()?;

    tracing::info!(num_docs = raw.len(), "normalizing documents");
    let documents: HashMap<DocId, Vec<Term>> = raw
        .into_iter()
        .map(|(doc_id, text)| {
            let terms = normalizer.normalize_document(&text);
            (doc_id, terms)
        })
        .collect();

    tracing::info!("building forward index");
    let forward = build_forward_index(&documents);
    tracing::info!("building inverted index");
    let inverted = build_inverted_index(&forward);
    tracing::info!(num_docs = forward.len(), num_terms = inverted.len(), "indexes built");
    Ok(Indexes { forward, inverted })
}

impl Indexes {
    /// Write both artifacts under `paths` and report their sizes.
    pub fn save(&self, paths: &IndexPaths, options: BuildOptions) -> Result<SaveReport> {
        let forward = paths.forward();
        tracing::info!(path = %forward.display(), "saving forward index");
        save_table(&forward, self.forward.table(), options.sort_forward)?;

        let inverted = paths.inverted();
        tracing::info!(path = %inverted.display(), "saving inverted index");
        save_table(&inverted, self.inverted.table(), options.sort_inverted)?;

        Ok(SaveReport {
            forward: Artifact { size_mib: file_size_mib(&forward)?, path: forward },
            inverted: Artifact { size_mib: file_size_mib(&inverted)?, path: inverted },
        })
    }
}
