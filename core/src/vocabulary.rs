use crate::error::{Error, Result};
use crate::table::{HashTable, MISS_FLOAT};
use crate::TermId;

/// Assigns dense ids to tokens in first-occurrence order.
///
/// # Examples
/// ```
/// use termvec_core::VocabularyBuilder;
/// let mut builder = VocabularyBuilder::new(64).unwrap();
/// builder.add_tokens(["the", "cat", "the"]).unwrap();
/// let vocab = builder.finish();
/// assert_eq!(vocab.len(), 2);
/// assert_eq!(vocab.id("cat"), Some(1));
/// ```
#[derive(Debug)]
pub struct VocabularyBuilder {
    table: HashTable,
}

impl VocabularyBuilder {
    /// Builder over a fixed-capacity table.
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self { table: HashTable::new(capacity)? })
    }

    /// Builder over a caller-configured table, e.g. one with a rehash policy.
    pub fn with_table(table: HashTable) -> Self {
        Self { table }
    }

    /// Register a token; returns its id, new or existing.
    pub fn add_token(&mut self, token: &str) -> Result<TermId> {
        if let Some(entry) = self.table.get(token) {
            return Ok(entry.int_value as TermId);
        }
        let size = self.table.len();
        let id = i32::try_from(size).map_err(|_| Error::VocabularyOverflow(size))?;
        self.table.insert(token, id, MISS_FLOAT)?;
        Ok(id as TermId)
    }

    pub fn add_tokens<I, T>(&mut self, tokens: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for token in tokens {
            self.add_token(token.as_ref())?;
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Close the build phase; the result is read-only.
    pub fn finish(self) -> Vocabulary {
        let table = self.table;
        tracing::debug!(
            terms = table.len(),
            capacity = table.capacity(),
            longest_chain = table.longest_chain(),
            "vocabulary built"
        );
        if table.load_factor() > 1.0 {
            tracing::warn!(
                load_factor = table.load_factor(),
                "vocabulary table is over capacity, lookups walk long chains"
            );
        }
        Vocabulary { table }
    }
}

/// Read-only token to id mapping.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    table: HashTable,
}

impl Vocabulary {
    pub fn id(&self, token: &str) -> Option<TermId> {
        self.table.get(token).map(|e| e.int_value as TermId)
    }

    /// Id of `token`, or `-1` when it is not in the vocabulary.
    pub fn get_id(&self, token: &str) -> i32 {
        self.table.get_int(token)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.table.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn table(&self) -> &HashTable {
        &self.table
    }

    /// Tokens ordered by id.
    pub fn terms(&self) -> Vec<(&str, TermId)> {
        let mut terms: Vec<(&str, TermId)> = self
            .table
            .iter()
            .map(|e| (e.key(), e.int_value as TermId))
            .collect();
        terms.sort_by_key(|&(_, id)| id);
        terms
    }
}
