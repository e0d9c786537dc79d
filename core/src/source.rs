use crate::error::{IndexError, Result};
use crate::index::DocId;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What to do with a document whose bytes are not valid UTF-8.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EncodingPolicy {
    /// Abort the run.
    #[default]
    Strict,
    /// Log a warning and leave the document out.
    Skip,
}

/// Supplies raw document text keyed by document id.
pub trait DocumentSource {
    fn load(&self) -> Result<BTreeMap<DocId, String>>;
}

/// Every regular file directly inside one directory; the file name is the document id.
pub struct DirectorySource {
    root: PathBuf,
    encoding: EncodingPolicy,
}

impl DirectorySource {
    pub fn new<P: AsRef<Path>>(root: P, encoding: EncodingPolicy) -> Self {
        Self { root: root.as_ref().to_path_buf(), encoding }
    }

    fn read_document(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).map_err(|e| IndexError::missing(path, e))?;
        String::from_utf8(bytes).map_err(|e| IndexError::Encoding {
            path: path.to_path_buf(),
            offset: e.utf8_error().valid_up_to(),
        })
    }
}

impl DocumentSource for DirectorySource {
    fn load(&self) -> Result<BTreeMap<DocId, String>> {
        // Checked up front so a missing directory is reported as such rather than
        // as an empty corpus.
        fs::read_dir(&self.root).map_err(|e| IndexError::missing(&self.root, e))?;

        let mut docs = BTreeMap::new();
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&self.root).to_path_buf();
                IndexError::missing(path, e.into())
            })?;
            if !entry.file_type().is_file() {
                tracing::debug!(path = %entry.path().display(), "skipping non-file entry");
                continue;
            }
            let doc_id = entry.file_name().to_string_lossy().into_owned();
            match self.read_document(entry.path()) {
                Ok(text) => {
                    // Non-UTF-8 file names are converted lossily and can collide.
                    if docs.contains_key(&doc_id) {
                        return Err(IndexError::DuplicateDocument(doc_id));
                    }
                    docs.insert(doc_id, text);
                }
                Err(err) if err.is_per_document() && self.encoding == EncodingPolicy::Skip => {
                    tracing::warn!(doc_id = %doc_id, error = %err, "skipping undecodable document");
                }
                Err(err) => return Err(err),
            }
        }
        tracing::info!(root = %self.root.display(), num_docs = docs.len(), "read documents");
        Ok(docs)
    }
}

/// Documents held in memory, in insertion order until loaded.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    docs: Vec<(DocId, String)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, doc_id: impl Into<DocId>, text: impl Into<String>) -> Self {
        self.docs.push((doc_id.into(), text.into()));
        self
    }
}

impl DocumentSource for MemorySource {
    fn load(&self) -> Result<BTreeMap<DocId, String>> {
        let mut docs = BTreeMap::new();
        for (doc_id, text) in &self.docs {
            if docs.insert(doc_id.clone(), text.clone()).is_some() {
                return Err(IndexError::DuplicateDocument(doc_id.clone()));
            }
        }
        Ok(docs)
    }
}
