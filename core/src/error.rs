/// Errors raised by the retrieval core.
///
/// A missing key is never an error; lookups report it through `Option` or the
/// miss sentinels.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The bucket array or a chain slot could not be reserved.
    #[error("allocation failed while reserving {requested} {what}")]
    Allocation { what: &'static str, requested: usize },
    /// A table needs at least one bucket.
    #[error("invalid table capacity: {0}")]
    InvalidCapacity(usize),
    /// Rehash threshold must be finite and positive.
    #[error("invalid max load factor: {0}")]
    InvalidLoadFactor(f32),
    /// More distinct tokens than an `i32` id can address.
    #[error("vocabulary is full at {0} terms")]
    VocabularyOverflow(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
