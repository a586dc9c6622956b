use crate::config::EngineConfig;
use crate::error::Result;
use crate::scoring::{score_and_sort, Hits};
use crate::tokenizer::tokenize;
use crate::vector::DocumentVector;
use crate::vocabulary::{Vocabulary, VocabularyBuilder};

/// A vocabulary plus one term-frequency vector per document.
///
/// Built in two passes: every document feeds the vocabulary first, then each
/// document is vectorized against the finished vocabulary.
#[derive(Debug)]
pub struct Corpus {
    config: EngineConfig,
    vocabulary: Vocabulary,
    documents: Vec<DocumentVector>,
}

impl Corpus {
    /// Build from pre-split documents.
    pub fn build<D, T>(documents: &[D], config: EngineConfig) -> Result<Self>
    where
        D: AsRef<[T]>,
        T: AsRef<str>,
    {
        config.validate()?;
        let mut builder = VocabularyBuilder::with_table(config.vocabulary_table()?);
        for doc in documents {
            builder.add_tokens(doc.as_ref())?;
        }
        Self::with_vocabulary(builder.finish(), documents, config)
    }

    /// Vectorize pre-split documents against an existing vocabulary, e.g. one
    /// loaded from disk. Tokens it does not know are skipped.
    pub fn with_vocabulary<D, T>(vocabulary: Vocabulary, documents: &[D], config: EngineConfig) -> Result<Self>
    where
        D: AsRef<[T]>,
        T: AsRef<str>,
    {
        config.validate()?;
        let mut vectors = Vec::with_capacity(documents.len());
        for doc in documents {
            let mut vector = DocumentVector::with_table(config.document_table()?);
            vector.add_tokens(doc.as_ref(), &vocabulary)?;
            vectors.push(vector);
        }
        tracing::info!(
            documents = vectors.len(),
            vocabulary = vocabulary.len(),
            "corpus built"
        );
        Ok(Self { config, vocabulary, documents: vectors })
    }

    /// One document per line, tokens split on whitespace. Blank lines are
    /// kept as empty documents so document indices match line numbers.
    pub fn from_lines(text: &str, config: EngineConfig) -> Result<Self> {
        let documents: Vec<Vec<&str>> = text.lines().map(|line| tokenize(line).collect()).collect();
        Self::build::<Vec<&str>, &str>(&documents, config)
    }

    /// Vectorize `tokens` against this corpus' vocabulary.
    pub fn vectorize<I, T>(&self, tokens: I) -> Result<DocumentVector>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut vector = DocumentVector::with_table(self.config.document_table()?);
        vector.add_tokens(tokens, &self.vocabulary)?;
        Ok(vector)
    }

    /// Rank every document against the query tokens.
    pub fn query<I, T>(&self, tokens: I) -> Result<Hits>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let query = self.vectorize(tokens)?;
        Ok(score_and_sort(&query, &self.documents))
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn documents(&self) -> &[DocumentVector] {
        &self.documents
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> EngineConfig {
        EngineConfig { vocabulary_capacity: 8, document_capacity: 4, max_load_factor: None }
    }

    #[test]
    fn lines_become_documents() {
        let corpus = Corpus::from_lines("the cat sat\n\nthe dog ran\n", small()).unwrap();
        assert_eq!(corpus.len(), 3);
        assert!(corpus.documents()[1].is_empty());
        assert_eq!(corpus.vocabulary().len(), 5);
    }

    #[test]
    fn query_ignores_unknown_tokens() {
        let corpus = Corpus::from_lines("a b\nb c", small()).unwrap();
        let query = corpus.vectorize(["zzz", "c"]).unwrap();
        assert_eq!(query.len(), 1);
        let hits = corpus.query(["zzz", "c"]).unwrap();
        assert_eq!(hits.top(1)[0].doc, 1);
        assert_eq!(hits.top(1)[0].score, 1.0);
    }

    #[test]
    fn existing_vocabulary_is_reused_as_is() {
        let mut b = VocabularyBuilder::new(8).unwrap();
        b.add_tokens(["dog", "cat"]).unwrap();
        let docs = vec![vec!["cat", "cat", "bird"], vec!["dog"]];
        let corpus = Corpus::with_vocabulary::<Vec<&str>, &str>(b.finish(), &docs, small()).unwrap();
        assert_eq!(corpus.vocabulary().len(), 2);
        assert_eq!(corpus.vocabulary().id("cat"), Some(1));
        assert_eq!(corpus.documents()[0].count("cat"), 2.0);
        assert_eq!(corpus.documents()[0].len(), 1);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = EngineConfig { vocabulary_capacity: 0, ..small() };
        assert!(Corpus::from_lines("a", cfg).is_err());
    }
}
