//! Admin secret interceptor
//!
//! Every `LinkAdmin` call must carry the shared secret in the
//! `x-admin-secret` metadata entry. Viewer calls are not intercepted.

use magiclink_proto::ADMIN_SECRET_HEADER;
use subtle::ConstantTimeEq;
use tonic::{Request, Status};

/// Performs a constant-time comparison of two strings to prevent timing attacks.
/// Returns true if the strings are equal.
fn constant_time_compare(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    // The secret's length is not treated as confidential
    if a_bytes.len() != b_bytes.len() {
        return false;
    }

    a_bytes.ct_eq(b_bytes).into()
}

/// Interceptor that rejects requests whose admin secret does not match
///
/// Rejections use `PERMISSION_DENIED` and never reach the registry.
pub fn admin_secret_interceptor(
    secret: String,
) -> impl Fn(Request<()>) -> Result<Request<()>, Status> + Clone {
    move |req: Request<()>| match req.metadata().get(ADMIN_SECRET_HEADER) {
        Some(provided) => {
            let provided = provided
                .to_str()
                .map_err(|_| Status::permission_denied("Invalid admin secret format"))?;

            if constant_time_compare(provided, &secret) {
                Ok(req)
            } else {
                tracing::warn!("Invalid admin secret provided");
                Err(Status::permission_denied("Invalid admin secret"))
            }
        }
        None => {
            tracing::warn!("Missing admin secret in request");
            Err(Status::permission_denied("Missing admin secret"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("secret123", "secret123"));
        assert!(!constant_time_compare("secret123", "secret124"));
        assert!(!constant_time_compare("secret123", "secret12"));
        assert!(!constant_time_compare("short", "muchlonger"));
        assert!(constant_time_compare("", ""));
    }

    #[test]
    fn test_valid_secret() {
        let interceptor = admin_secret_interceptor("secret123".to_string());
        let mut req = Request::new(());
        req.metadata_mut()
            .insert(ADMIN_SECRET_HEADER, "secret123".parse().unwrap());
        assert!(interceptor(req).is_ok());
    }

    #[test]
    fn test_invalid_secret() {
        let interceptor = admin_secret_interceptor("secret123".to_string());
        let mut req = Request::new(());
        req.metadata_mut()
            .insert(ADMIN_SECRET_HEADER, "wrong-secret".parse().unwrap());

        let status = interceptor(req).unwrap_err();
        assert_eq!(status.code(), tonic::Code::PermissionDenied);
        assert_eq!(status.message(), "Invalid admin secret");
    }

    #[test]
    fn test_missing_secret() {
        let interceptor = admin_secret_interceptor("secret123".to_string());
        let req = Request::new(());

        let status = interceptor(req).unwrap_err();
        assert_eq!(status.code(), tonic::Code::PermissionDenied);
        assert_eq!(status.message(), "Missing admin secret");
    }

    #[test]
    fn test_secret_is_case_sensitive() {
        let interceptor = admin_secret_interceptor("Secret".to_string());
        let mut req = Request::new(());
        req.metadata_mut()
            .insert(ADMIN_SECRET_HEADER, "secret".parse().unwrap());
        assert!(interceptor(req).is_err());
    }
}
