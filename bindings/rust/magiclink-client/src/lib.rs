//! # Magic Link Client
//!
//! A high-level Rust client for the magic link service.
//!
//! Administrative calls (create, list, revoke) need the admin secret; viewing
//! a link only needs its token.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use magiclink_client::{MagicLinkClient, MagicLinkClientOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), magiclink_client::Error> {
//!     let options = MagicLinkClientOptions::new("http://localhost:50051")
//!         .with_admin_secret("your-secret");
//!     let client = MagicLinkClient::with_options(options).await?;
//!
//!     // Issue a link valid for 30 minutes
//!     let link = client.create_link(Some("Acme"), Some(30)).await?;
//!     println!("Share {}", link.url);
//!
//!     // What the recipient's page does
//!     let view = client.view_link(&link.token).await?;
//!     println!("{} minutes left", view.remaining_minutes);
//!
//!     client.revoke_link(&link.token).await?;
//!     Ok(())
//! }
//! ```

mod error;
mod options;

pub use error::Error;
pub use magiclink_proto::{CreateLinkResponse, LinkSummary, ViewLinkResponse};
pub use options::MagicLinkClientOptions;

use magiclink_proto::link_admin_client::LinkAdminClient;
use magiclink_proto::link_viewer_client::LinkViewerClient;
use magiclink_proto::{
    CreateLinkRequest, ListLinksRequest, RevokeLinkRequest, ViewLinkRequest, ADMIN_SECRET_HEADER,
};
use tonic::metadata::MetadataValue;
use tonic::service::interceptor::InterceptedService;
use tonic::service::Interceptor;
use tonic::transport::Channel;
use tonic::{Request, Status};

/// Adds the admin secret header to every administrative request
#[derive(Clone)]
struct AdminSecretInterceptor {
    secret: Option<String>,
}

impl Interceptor for AdminSecretInterceptor {
    fn call(&mut self, mut req: Request<()>) -> Result<Request<()>, Status> {
        if let Some(ref secret) = self.secret {
            let value = MetadataValue::try_from(secret)
                .map_err(|_| Status::internal("Invalid admin secret format"))?;
            req.metadata_mut().insert(ADMIN_SECRET_HEADER, value);
        }
        Ok(req)
    }
}

type AdminClient = LinkAdminClient<InterceptedService<Channel, AdminSecretInterceptor>>;

/// A client for the magic link service.
///
/// Cloning is cheap; clones share the underlying connection.
#[derive(Clone)]
pub struct MagicLinkClient {
    admin: AdminClient,
    viewer: LinkViewerClient<Channel>,
}

impl MagicLinkClient {
    /// Connect without an admin secret. Only [`view_link`](Self::view_link) will succeed.
    pub async fn connect(url: &str) -> Result<Self, Error> {
        Self::with_options(MagicLinkClientOptions::new(url)).await
    }

    /// Connect with custom options.
    ///
    /// A malformed URL is reported as [`Error::Connection`]; failing to reach
    /// the server is reported as [`Error::Transport`].
    pub async fn with_options(options: MagicLinkClientOptions) -> Result<Self, Error> {
        let endpoint = Channel::from_shared(options.url.clone())
            .map_err(|e| Error::Connection(e.to_string()))?;
        let channel = endpoint.connect().await?;

        let interceptor = AdminSecretInterceptor {
            secret: options.admin_secret,
        };

        Ok(Self {
            admin: LinkAdminClient::with_interceptor(channel.clone(), interceptor),
            viewer: LinkViewerClient::new(channel),
        })
    }

    /// Issue a new link.
    ///
    /// # Arguments
    /// * `label` - Who or what the link is for. `None` becomes "Unnamed".
    /// * `ttl_minutes` - Lifetime in minutes. `None` or non-positive uses the server default.
    pub async fn create_link(
        &self,
        label: Option<&str>,
        ttl_minutes: Option<i64>,
    ) -> Result<CreateLinkResponse, Error> {
        let response = self
            .admin
            .clone()
            .create_link(CreateLinkRequest {
                label: label.map(str::to_string),
                ttl_minutes,
            })
            .await
            .map_err(Error::from_status)?;
        Ok(response.into_inner())
    }

    /// List the links that have not yet expired.
    pub async fn list_links(&self) -> Result<Vec<LinkSummary>, Error> {
        let response = self
            .admin
            .clone()
            .list_links(ListLinksRequest {})
            .await
            .map_err(Error::from_status)?;
        Ok(response.into_inner().links)
    }

    /// Revoke a link.
    ///
    /// Returns [`Error::NotFound`] if the link was already revoked or never
    /// existed; callers that only care about the end state can treat that as
    /// success.
    pub async fn revoke_link(&self, token: impl Into<String>) -> Result<(), Error> {
        self.admin
            .clone()
            .revoke_link(RevokeLinkRequest {
                token: token.into(),
            })
            .await
            .map_err(Error::from_status)?;
        Ok(())
    }

    /// Open a link as a viewer. Each successful call counts as one access.
    pub async fn view_link(&self, token: impl Into<String>) -> Result<ViewLinkResponse, Error> {
        let response = self
            .viewer
            .clone()
            .view_link(ViewLinkRequest {
                token: token.into(),
            })
            .await
            .map_err(Error::from_status)?;
        Ok(response.into_inner())
    }
}
