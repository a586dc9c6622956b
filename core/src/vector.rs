use crate::error::Result;
use crate::table::{Entry, HashTable};
use crate::vocabulary::Vocabulary;

/// Sparse term-frequency vector of one document or query.
///
/// Keys are tokens, `int_value` is the vocabulary id and `float_value` the
/// occurrence count. Tokens outside the vocabulary are never stored.
#[derive(Debug, Clone)]
pub struct DocumentVector {
    table: HashTable,
}

impl DocumentVector {
    /// Count the in-vocabulary tokens of one document.
    pub fn from_tokens<I, T>(tokens: I, vocabulary: &Vocabulary, capacity: usize) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut vector = Self { table: HashTable::new(capacity)? };
        vector.add_tokens(tokens, vocabulary)?;
        Ok(vector)
    }

    /// Wrap an empty, caller-configured table.
    pub fn with_table(table: HashTable) -> Self {
        Self { table }
    }

    pub fn add_tokens<I, T>(&mut self, tokens: I, vocabulary: &Vocabulary) -> Result<&mut Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for token in tokens {
            self.add_token(token.as_ref(), vocabulary)?;
        }
        Ok(self)
    }

    /// Returns `false` when the token was skipped as out of vocabulary.
    pub fn add_token(&mut self, token: &str, vocabulary: &Vocabulary) -> Result<bool> {
        let Some(id) = vocabulary.id(token) else {
            return Ok(false);
        };
        // counting starts from zero, not from the table's miss sentinel
        let count = self.table.get(token).map_or(0.0, |e| e.float_value);
        self.table.insert(token, id as i32, count + 1.0)?;
        Ok(true)
    }

    /// Occurrence count of `token`, 0.0 if absent.
    pub fn count(&self, token: &str) -> f32 {
        self.table.get(token).map_or(0.0, |e| e.float_value)
    }

    /// Number of distinct stored tokens.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> f32 {
        self.table.iter().map(|e| e.float_value).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.table.iter()
    }

    pub fn table(&self) -> &HashTable {
        &self.table
    }
}
