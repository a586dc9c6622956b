//! On-disk snapshot of a built index.
//!
//! An index directory holds `vocabulary.bin`, the (token, id) pairs in id
//! order encoded with bincode, and `meta.json` describing the build.

use crate::vocabulary::{Vocabulary, VocabularyBuilder};
use crate::TermId;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMeta {
    pub num_docs: u32,
    pub vocabulary_size: u32,
    pub created_at: String,
    pub version: u32,
}

impl IndexMeta {
    pub const VERSION: u32 = 1;

    pub fn new(num_docs: u32, vocabulary_size: u32, created_at: String) -> Self {
        Self { num_docs, vocabulary_size, created_at, version: Self::VERSION }
    }
}

#[derive(Debug, Clone)]
pub struct IndexDir {
    root: PathBuf,
}

impl IndexDir {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn write_vocabulary(&self, vocabulary: &Vocabulary) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let terms: Vec<(&str, TermId)> = vocabulary.terms();
        fs::write(self.file("vocabulary.bin"), bincode::serialize(&terms)?)?;
        Ok(())
    }

    /// Rebuild the vocabulary into a table of `capacity` buckets. Tokens are
    /// re-inserted in id order, which reassigns the same ids.
    pub fn read_vocabulary(&self, capacity: usize) -> Result<Vocabulary> {
        let path = self.file("vocabulary.bin");
        let bytes = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
        let terms: Vec<(String, TermId)> = bincode::deserialize(&bytes)?;
        let mut builder = VocabularyBuilder::new(capacity)?;
        for (token, id) in &terms {
            let assigned = builder.add_token(token)?;
            if assigned != *id {
                bail!("corrupt vocabulary: {token:?} stored as {id}, rebuilt as {assigned}");
            }
        }
        Ok(builder.finish())
    }

    pub fn write_meta(&self, meta: &IndexMeta) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.file("meta.json"), serde_json::to_string_pretty(meta)?)?;
        Ok(())
    }

    pub fn read_meta(&self) -> Result<IndexMeta> {
        let path = self.file("meta.json");
        let raw = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let meta: IndexMeta = serde_json::from_str(&raw)?;
        if meta.version != IndexMeta::VERSION {
            bail!("unsupported index version {} (expected {})", meta.version, IndexMeta::VERSION);
        }
        Ok(meta)
    }
}
