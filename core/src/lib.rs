//! Sparse term-frequency retrieval.
//!
//! Tokens get dense vocabulary ids, documents become sparse term-frequency
//! vectors, and queries are ranked against documents by sparse dot product.
//! Every mapping is backed by [`HashTable`], a fixed-capacity string-keyed table
//! with per-bucket chains and a deterministic bucket layout.

pub mod config;
pub mod corpus;
pub mod error;
pub mod persist;
pub mod scoring;
pub mod table;
pub mod tokenizer;
pub mod vector;
pub mod vocabulary;

pub use config::EngineConfig;
pub use corpus::Corpus;
pub use error::{Error, Result};
pub use scoring::{dot, score_and_sort, Hits, ScoreRecord};
pub use table::{BucketIter, Entry, HashTable, MISS_FLOAT, MISS_INT};
pub use vector::DocumentVector;
pub use vocabulary::{Vocabulary, VocabularyBuilder};

pub type TermId = u32;
pub type DocId = usize;
