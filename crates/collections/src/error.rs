/// Errors from collection operations.
///
/// These signal misuse by the caller rather than a recoverable runtime condition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    #[error("cannot extract from an empty rank index")]
    EmptyIndex,
}
