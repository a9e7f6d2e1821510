use thiserror::Error;

/// Outcome of a failed registry operation
///
/// Both kinds are terminal for the call that produced them; retrying will
/// not change the answer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The token was never issued, was revoked, or has already been swept
    #[error("link not found")]
    NotFound,

    /// The token existed but its deadline has passed; it has been removed
    #[error("link expired")]
    Expired,
}
