use std::cmp::Ordering;
use std::fmt::Debug;

use serde::Serialize;

use crate::vector::DocumentVector;
use crate::DocId;

/// Sparse dot product.
///
/// Walks `left` and looks each term up in `right`, so pass the sparser
/// vector (usually the query) as `left`. Only positive values found in `right` contribute.
pub fn dot(left: &DocumentVector, right: &DocumentVector) -> f32 {
    left.table()
        .iter()
        .filter_map(|entry| {
            right
                .table()
                .get(entry.key())
                .map(|other| other.float_value)
                .filter(|&value| value > 0.0)
                .map(|value| entry.float_value * value)
        })
        // `Sum for f32` starts from -0.0; scores with no shared terms must be +0.0
        .fold(0.0, |acc, x| acc + x)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub doc: DocId,
    pub score: f32,
}

/// Descending score, ascending document index on ties.
fn rank_order(a: &ScoreRecord, b: &ScoreRecord) -> Ordering {
    b.score.total_cmp(&a.score).then_with(|| a.doc.cmp(&b.doc))
}

/// Score `query` against every document and rank all of them.
pub fn score_and_sort(query: &DocumentVector, documents: &[DocumentVector]) -> Hits {
    let mut list: Vec<ScoreRecord> = documents
        .iter()
        .enumerate()
        .map(|(doc, vector)| ScoreRecord { doc, score: dot(query, vector) })
        .collect();
    list.sort_by(rank_order);
    tracing::debug!(
        documents = list.len(),
        best = list.first().map(|r| r.score),
        "scored query"
    );
    Hits { list }
}

/// Ranked results of one query.
#[derive(Clone, PartialEq, Default)]
pub struct Hits {
    list: Vec<ScoreRecord>,
}

impl Hits {
    /// The `k` best records.
    pub fn top(&self, k: usize) -> &[ScoreRecord] {
        &self.list[..k.min(self.list.len())]
    }

    /// Records with a strictly positive score.
    pub fn matching(&self) -> impl Iterator<Item = &ScoreRecord> {
        self.list.iter().filter(|r| r.score > 0.0)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoreRecord> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn into_vec(self) -> Vec<ScoreRecord> {
        self.list
    }
}

impl Debug for Hits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            writeln!(f, "Hits [")?;
            for r in &self.list {
                writeln!(f, "    {}: {:.6}", r.doc, r.score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

impl<'a> IntoIterator for &'a Hits {
    type Item = &'a ScoreRecord;
    type IntoIter = std::slice::Iter<'a, ScoreRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::HashTable;
    use crate::vocabulary::{Vocabulary, VocabularyBuilder};

    fn vocab() -> Vocabulary {
        let mut b = VocabularyBuilder::new(16).unwrap();
        b.add_tokens("a b c d e".split_whitespace()).unwrap();
        b.finish()
    }

    fn vector(v: &Vocabulary, text: &str) -> DocumentVector {
        DocumentVector::from_tokens(text.split_whitespace(), v, 4).unwrap()
    }

    #[test]
    fn self_dot_is_sum_of_squares() {
        let v = vocab();
        let doc = vector(&v, "a a a b c c");
        assert_eq!(dot(&doc, &doc), 9.0 + 1.0 + 4.0);
    }

    #[test]
    fn dot_commutes() {
        let v = vocab();
        let x = vector(&v, "a b b c");
        let y = vector(&v, "b c c c d e e");
        assert_eq!(dot(&x, &y), dot(&y, &x));
        assert_eq!(dot(&x, &y), 2.0 * 1.0 + 1.0 * 3.0);
    }

    #[test]
    fn disjoint_vectors_score_zero() {
        let v = vocab();
        assert_eq!(dot(&vector(&v, "a b"), &vector(&v, "d e")), 0.0);
        assert_eq!(dot(&vector(&v, ""), &vector(&v, "d e")), 0.0);
    }

    fn weighted(pairs: &[(&str, f32)]) -> DocumentVector {
        let mut t = HashTable::new(4).unwrap();
        for (i, &(key, w)) in pairs.iter().enumerate() {
            t.insert(key, i as i32, w).unwrap();
        }
        DocumentVector::with_table(t)
    }

    #[test]
    fn disjoint_score_is_positive_zero() {
        let v = vocab();
        let score = dot(&vector(&v, "a b"), &vector(&v, "d e"));
        assert!(score.is_sign_positive());
        assert_eq!(format!("{score:.4}"), "0.0000");
        assert!(dot(&vector(&v, ""), &vector(&v, "a")).is_sign_positive());
    }

    #[test]
    fn zero_scores_tie_by_index_whatever_their_origin() {
        let v = vocab();
        // a zero query weight on a shared term adds an explicit 0.0 product
        let query = weighted(&[("a", 0.0)]);
        let docs = vec![vector(&v, "b"), vector(&v, "a")];
        let hits = score_and_sort(&query, &docs);
        let order: Vec<DocId> = hits.iter().map(|r| r.doc).collect();
        assert_eq!(order, vec![0, 1]);
        assert!(hits.iter().all(|r| r.score.is_sign_positive()));
    }

    #[test]
    fn non_positive_right_values_do_not_contribute() {
        let left = weighted(&[("a", 3.0), ("b", 5.0), ("c", 2.0)]);
        let right = weighted(&[("a", 0.0), ("b", -2.0), ("c", 4.0)]);
        assert_eq!(dot(&left, &right), 8.0);
        // probing the other way round, the negative left weight is multiplied in
        assert_eq!(dot(&right, &left), -10.0 + 8.0);
        assert_ne!(dot(&left, &right), dot(&right, &left));
    }

    #[test]
    fn records_serialize_as_doc_and_score() {
        let record = ScoreRecord { doc: 3, score: 2.5 };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"doc":3,"score":2.5}"#);
    }

    #[test]
    fn close_scores_are_not_collapsed() {
        let v = vocab();
        let query = vector(&v, "a");
        let docs = vec![weighted(&[("a", 0.4)]), weighted(&[("a", 0.6)]), weighted(&[("a", 0.5)])];
        let hits = score_and_sort(&query, &docs);
        let order: Vec<DocId> = hits.iter().map(|r| r.doc).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn ties_break_by_document_index() {
        let v = vocab();
        let query = vector(&v, "a");
        let docs = vec![vector(&v, "b"), vector(&v, "a"), vector(&v, "c"), vector(&v, "a")];
        let hits = score_and_sort(&query, &docs);
        let order: Vec<(DocId, f32)> = hits.iter().map(|r| (r.doc, r.score)).collect();
        assert_eq!(order, vec![(1, 1.0), (3, 1.0), (0, 0.0), (2, 0.0)]);
        assert_eq!(hits.matching().count(), 2);
        assert_eq!(hits.top(2).len(), 2);
        assert_eq!(hits.top(10).len(), 4);
    }

    #[test]
    fn no_documents() {
        let v = vocab();
        let hits = score_and_sort(&vector(&v, "a"), &[]);
        assert!(hits.is_empty());
        assert!(hits.top(3).is_empty());
    }
}
