//! Error types for the magic link client.

use thiserror::Error;

/// Errors that can occur when using the magic link client.
#[derive(Error, Debug)]
pub enum Error {
    /// The server URL could not be parsed
    #[error("Connection error: {0}")]
    Connection(String),

    /// The server could not be reached
    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// The token was never issued, was revoked, or was swept
    #[error("Link not found")]
    NotFound,

    /// The token's deadline has passed; the server has discarded it
    #[error("Link expired")]
    Expired,

    /// The admin secret was missing or did not match
    #[error("Invalid admin secret: {0}")]
    InvalidSecret(String),

    /// Any other gRPC status (e.g., invalid argument, unavailable)
    #[error("gRPC error: {0}")]
    Grpc(#[from] tonic::Status),
}

impl Error {
    /// Returns `true` for errors that mean the link can no longer be used.
    pub fn is_gone(&self) -> bool {
        matches!(self, Error::NotFound | Error::Expired)
    }

    /// Converts a tonic Status into the typed error kinds the server reports
    pub(crate) fn from_status(status: tonic::Status) -> Self {
        match status.code() {
            tonic::Code::NotFound => Error::NotFound,
            tonic::Code::FailedPrecondition => Error::Expired,
            tonic::Code::PermissionDenied | tonic::Code::Unauthenticated => {
                Error::InvalidSecret(status.message().to_string())
            }
            _ => Error::Grpc(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Status;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            Error::from_status(Status::not_found("x")),
            Error::NotFound
        ));
        assert!(matches!(
            Error::from_status(Status::failed_precondition("x")),
            Error::Expired
        ));
        assert!(matches!(
            Error::from_status(Status::permission_denied("Invalid admin secret")),
            Error::InvalidSecret(msg) if msg == "Invalid admin secret"
        ));
        assert!(matches!(
            Error::from_status(Status::invalid_argument("x")),
            Error::Grpc(_)
        ));
    }

    #[test]
    fn test_is_gone() {
        assert!(Error::NotFound.is_gone());
        assert!(Error::Expired.is_gone());
        assert!(!Error::InvalidSecret(String::new()).is_gone());
    }
}
