//! Client configuration options.

const DEFAULT_URL: &str = "http://127.0.0.1:50051";

/// Options for configuring the magic link client connection.
///
/// # Example
///
/// ```rust
/// use magiclink_client::MagicLinkClientOptions;
///
/// let options = MagicLinkClientOptions::new("http://localhost:50051")
///     .with_admin_secret("your-secret");
/// ```
#[derive(Clone, Debug)]
pub struct MagicLinkClientOptions {
    /// The server URL (e.g., "http://localhost:50051")
    pub url: String,

    /// Admin secret, required for create/list/revoke
    pub admin_secret: Option<String>,
}

impl MagicLinkClientOptions {
    /// Create new options with the given server URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            admin_secret: None,
        }
    }

    /// Set the admin secret sent on administrative calls.
    pub fn with_admin_secret(mut self, secret: impl Into<String>) -> Self {
        self.admin_secret = Some(secret.into());
        self
    }

    /// Create options from environment variables.
    ///
    /// Reads:
    /// - `MAGICLINK_SERVER_URL` - Server URL (defaults to "http://127.0.0.1:50051")
    /// - `MAGICLINK_ADMIN_SECRET` - Optional admin secret; empty counts as unset,
    ///   matching the server
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let url = lookup("MAGICLINK_SERVER_URL")
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_URL.to_string());
        let admin_secret = lookup("MAGICLINK_ADMIN_SECRET").filter(|s| !s.is_empty());

        Self { url, admin_secret }
    }
}

impl Default for MagicLinkClientOptions {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}
