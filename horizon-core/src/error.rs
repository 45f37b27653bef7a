use thiserror::Error;

/// Failure taxonomy for moderation verbs.
///
/// Variants before any external mutation (`Validation`, `Forbidden`) abort
/// with no side effects. `Storage` can surface after an enforcement call
/// has already landed; the platform action is not rolled back in that case.
#[derive(Debug, Error)]
pub enum ModerationError {
    /// Bad caller input: malformed duration, out-of-range purge amount,
    /// unresolvable anchor reference.
    #[error("{0}")]
    Validation(String),

    /// The actor does not hold the required role (or is not the owner).
    #[error("you are not permitted to use this command")]
    Forbidden,

    /// The platform refused the privileged call.
    #[error("the platform rejected the action: {0}")]
    Enforcement(String),

    /// The ledger store failed; fatal to the enclosing operation.
    #[error("storage failure")]
    Storage(#[from] sqlx::Error),

    /// The referenced case does not exist. A normal outcome, not a fault.
    #[error("case not found")]
    NotFound,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
