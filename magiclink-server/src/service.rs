use chrono::{DateTime, SecondsFormat};
use magiclink_core::{round_to_minutes, LinkError, LinkView, Registry};
use magiclink_proto::link_admin_server::LinkAdmin;
use magiclink_proto::link_viewer_server::LinkViewer;
use magiclink_proto::{
    CreateLinkRequest, CreateLinkResponse, LinkSummary, ListLinksRequest, ListLinksResponse,
    RevokeLinkRequest, RevokeLinkResponse, ViewLinkRequest, ViewLinkResponse,
};
use tonic::{Request, Response, Status};

/// Maximum allowed label length (bytes)
const MAX_LABEL_LENGTH: usize = 256;

/// Maximum allowed token length; issued tokens are 36-character UUIDs
const MAX_TOKEN_LENGTH: usize = 64;

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Truncates a token for safe logging (the full token is a credential)
fn truncate_token_for_log(token: &str) -> String {
    const MAX_LOG_LEN: usize = 8;
    match token.char_indices().nth(MAX_LOG_LEN) {
        Some((idx, _)) => format!("{}...", &token[..idx]),
        None => token.to_string(),
    }
}

fn validate_token(token: &str) -> Result<(), Status> {
    if token.is_empty() {
        return Err(Status::invalid_argument("Token cannot be empty"));
    }
    if token.len() > MAX_TOKEN_LENGTH {
        return Err(Status::invalid_argument(format!(
            "Token exceeds maximum length of {} bytes",
            MAX_TOKEN_LENGTH
        )));
    }
    Ok(())
}

fn validate_label(label: Option<&str>) -> Result<(), Status> {
    match label {
        Some(l) if l.len() > MAX_LABEL_LENGTH => Err(Status::invalid_argument(format!(
            "Label exceeds maximum length of {} bytes",
            MAX_LABEL_LENGTH
        ))),
        _ => Ok(()),
    }
}

/// Converts a requested TTL in minutes to milliseconds
///
/// Non-positive values are passed through so the registry applies its default.
fn ttl_minutes_to_ms(ttl_minutes: Option<i64>) -> Option<i64> {
    ttl_minutes.map(|m| m.saturating_mul(MILLIS_PER_MINUTE))
}

/// Formats epoch milliseconds as RFC 3339 with millisecond precision,
/// e.g. `2024-05-01T12:00:00.000Z`
fn format_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

fn link_url(base_url: &str, token: &str) -> String {
    format!("{}/view/{}", base_url.trim_end_matches('/'), token)
}

/// Maps registry failures onto gRPC codes: `NOT_FOUND` and, for expired
/// links, `FAILED_PRECONDITION` (gRPC has no "gone")
fn link_status(err: LinkError) -> Status {
    match err {
        LinkError::NotFound => Status::not_found("Link not found"),
        LinkError::Expired => Status::failed_precondition("Link expired"),
    }
}

/// Secret-gated operator service
pub struct AdminService {
    registry: Registry,
    base_url: String,
}

impl AdminService {
    pub fn new(registry: Registry, base_url: impl Into<String>) -> Self {
        Self {
            registry,
            base_url: base_url.into(),
        }
    }

    fn summary(&self, view: &LinkView) -> LinkSummary {
        LinkSummary {
            token: view.token().to_string(),
            label: view.label().to_string(),
            url: link_url(&self.base_url, view.token()),
            created_at: format_timestamp(view.created_at()),
            expires_at: format_timestamp(view.expires_at()),
            access_count: view.access_count(),
            remaining_minutes: view.remaining_minutes(),
        }
    }
}

#[tonic::async_trait]
impl LinkAdmin for AdminService {
    async fn create_link(
        &self,
        request: Request<CreateLinkRequest>,
    ) -> Result<Response<CreateLinkResponse>, Status> {
        let req = request.get_ref();
        validate_label(req.label.as_deref())?;

        let created = self
            .registry
            .create(req.label.as_deref(), ttl_minutes_to_ms(req.ttl_minutes));
        let ttl_minutes = round_to_minutes(created.ttl_ms());

        tracing::info!(
            "CREATE {} label={:?} ttl={}m",
            truncate_token_for_log(&created.token),
            created.label,
            ttl_minutes
        );

        Ok(Response::new(CreateLinkResponse {
            url: link_url(&self.base_url, &created.token),
            expires_at: format_timestamp(created.expires_at),
            created_at: format_timestamp(created.created_at),
            ttl_minutes,
            label: created.label,
            token: created.token,
        }))
    }

    async fn list_links(
        &self,
        _request: Request<ListLinksRequest>,
    ) -> Result<Response<ListLinksResponse>, Status> {
        let links: Vec<LinkSummary> = self
            .registry
            .list_active()
            .iter()
            .map(|view| self.summary(view))
            .collect();
        tracing::debug!("LIST ({} active)", links.len());

        Ok(Response::new(ListLinksResponse { links }))
    }

    async fn revoke_link(
        &self,
        request: Request<RevokeLinkRequest>,
    ) -> Result<Response<RevokeLinkResponse>, Status> {
        let token = &request.get_ref().token;
        validate_token(token)?;

        match self.registry.revoke(token) {
            Ok(()) => {
                tracing::info!("REVOKE {}", truncate_token_for_log(token));
                Ok(Response::new(RevokeLinkResponse { revoked: true }))
            }
            Err(e) => {
                tracing::debug!("REVOKE {} failed: {}", truncate_token_for_log(token), e);
                Err(link_status(e))
            }
        }
    }
}

/// Ungated viewer service; possession of the token is the credential
pub struct ViewerService {
    registry: Registry,
}

impl ViewerService {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }
}

#[tonic::async_trait]
impl LinkViewer for ViewerService {
    async fn view_link(
        &self,
        request: Request<ViewLinkRequest>,
    ) -> Result<Response<ViewLinkResponse>, Status> {
        let token = &request.get_ref().token;
        validate_token(token)?;

        let view = self.registry.lookup(token).map_err(|e| {
            tracing::debug!("VIEW {} failed: {}", truncate_token_for_log(token), e);
            link_status(e)
        })?;
        tracing::debug!(
            "VIEW {} (access #{})",
            truncate_token_for_log(token),
            view.access_count()
        );

        Ok(Response::new(ViewLinkResponse {
            label: view.label().to_string(),
            created_at: format_timestamp(view.created_at()),
            expires_at: format_timestamp(view.expires_at()),
            remaining_ms: view.remaining_ms(),
            remaining_minutes: view.remaining_minutes(),
            access_count: view.access_count(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magiclink_core::{ManualClock, RegistryConfig};
    use std::sync::Arc;

    const BASE_URL: &str = "https://preview.example.com";
    // 2024-01-01T00:00:00Z
    const START: i64 = 1_704_067_200_000;

    fn create_test_services() -> (AdminService, ViewerService, ManualClock) {
        let clock = ManualClock::new(START);
        let registry = Registry::with_clock(RegistryConfig::default(), Arc::new(clock.clone()));
        (
            AdminService::new(registry.clone(), BASE_URL),
            ViewerService::new(registry),
            clock,
        )
    }

    async fn create(
        admin: &AdminService,
        label: Option<&str>,
        ttl_minutes: Option<i64>,
    ) -> CreateLinkResponse {
        admin
            .create_link(Request::new(CreateLinkRequest {
                label: label.map(str::to_string),
                ttl_minutes,
            }))
            .await
            .unwrap()
            .into_inner()
    }

    async fn view(viewer: &ViewerService, token: &str) -> Result<ViewLinkResponse, Status> {
        viewer
            .view_link(Request::new(ViewLinkRequest {
                token: token.to_string(),
            }))
            .await
            .map(Response::into_inner)
    }

    #[test]
    fn test_validate_token_empty() {
        let status = validate_token("").unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
        assert!(status.message().contains("empty"));
    }

    #[test]
    fn test_validate_token_too_long() {
        let status = validate_token(&"x".repeat(MAX_TOKEN_LENGTH + 1)).unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
        assert!(status.message().contains("maximum length"));
        assert!(validate_token(&"x".repeat(MAX_TOKEN_LENGTH)).is_ok());
    }

    #[test]
    fn test_validate_label() {
        assert!(validate_label(None).is_ok());
        assert!(validate_label(Some(&"x".repeat(MAX_LABEL_LENGTH))).is_ok());
        let status = validate_label(Some(&"x".repeat(MAX_LABEL_LENGTH + 1))).unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }

    #[test]
    fn test_truncate_token_for_log() {
        assert_eq!(truncate_token_for_log("short"), "short");
        assert_eq!(
            truncate_token_for_log("6f1c2a3b-0000-4000-8000-000000000000"),
            "6f1c2a3b..."
        );
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(START), "2024-01-01T00:00:00.000Z");
        assert_eq!(format_timestamp(START + 1_234), "2024-01-01T00:00:01.234Z");
    }

    #[test]
    fn test_link_url_trims_trailing_slash() {
        assert_eq!(link_url("https://x.test/", "abc"), "https://x.test/view/abc");
        assert_eq!(link_url("https://x.test", "abc"), "https://x.test/view/abc");
    }

    #[test]
    fn test_ttl_minutes_to_ms() {
        assert_eq!(ttl_minutes_to_ms(None), None);
        assert_eq!(ttl_minutes_to_ms(Some(1)), Some(60_000));
        assert_eq!(ttl_minutes_to_ms(Some(-3)), Some(-180_000));
        assert_eq!(ttl_minutes_to_ms(Some(i64::MAX)), Some(i64::MAX));
    }

    #[tokio::test]
    async fn test_create_link_response() {
        let (admin, _, _) = create_test_services();

        let created = create(&admin, Some("Acme"), Some(30)).await;

        assert_eq!(created.url, format!("{}/view/{}", BASE_URL, created.token));
        assert_eq!(created.label, "Acme");
        assert_eq!(created.ttl_minutes, 30);
        assert_eq!(created.created_at, "2024-01-01T00:00:00.000Z");
        assert_eq!(created.expires_at, "2024-01-01T00:30:00.000Z");
    }

    #[tokio::test]
    async fn test_create_link_defaults() {
        let (admin, _, _) = create_test_services();

        for ttl in [None, Some(0), Some(-10)] {
            let created = create(&admin, None, ttl).await;
            assert_eq!(created.ttl_minutes, 120);
            assert_eq!(created.label, "Unnamed");
            assert_eq!(created.expires_at, "2024-01-01T02:00:00.000Z");
        }
    }

    #[tokio::test]
    async fn test_create_link_rejects_long_label() {
        let (admin, _, _) = create_test_services();

        let result = admin
            .create_link(Request::new(CreateLinkRequest {
                label: Some("x".repeat(MAX_LABEL_LENGTH + 1)),
                ttl_minutes: None,
            }))
            .await;

        assert_eq!(result.unwrap_err().code(), tonic::Code::InvalidArgument);
        assert!(admin.registry.is_empty());
    }

    #[tokio::test]
    async fn test_view_link_counts_and_reports_remaining() {
        let (admin, viewer, clock) = create_test_services();
        let created = create(&admin, Some("Acme"), Some(10)).await;

        clock.advance(4 * 60_000);
        let first = view(&viewer, &created.token).await.unwrap();
        assert_eq!(first.access_count, 1);
        assert_eq!(first.label, "Acme");
        assert_eq!(first.remaining_ms, 6 * 60_000);
        assert_eq!(first.remaining_minutes, 6);
        assert_eq!(first.expires_at, created.expires_at);

        let second = view(&viewer, &created.token).await.unwrap();
        assert_eq!(second.access_count, 2);
    }

    #[tokio::test]
    async fn test_view_link_expired_then_not_found() {
        let (admin, viewer, clock) = create_test_services();
        let created = create(&admin, None, Some(1)).await;

        clock.advance(70_000);
        let status = view(&viewer, &created.token).await.unwrap_err();
        assert_eq!(status.code(), tonic::Code::FailedPrecondition);

        let status = view(&viewer, &created.token).await.unwrap_err();
        assert_eq!(status.code(), tonic::Code::NotFound);
    }

    #[tokio::test]
    async fn test_view_link_invalid_token() {
        let (_, viewer, _) = create_test_services();
        let status = view(&viewer, "").await.unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_list_links_skips_expired() {
        let (admin, viewer, clock) = create_test_services();
        let short = create(&admin, Some("short"), Some(1)).await;
        let long = create(&admin, Some("long"), Some(60)).await;
        view(&viewer, &long.token).await.unwrap();

        clock.advance(90_000);
        let links = admin
            .list_links(Request::new(ListLinksRequest {}))
            .await
            .unwrap()
            .into_inner()
            .links;

        assert_eq!(links.len(), 1);
        let link = &links[0];
        assert_eq!(link.token, long.token);
        assert_eq!(link.label, "long");
        assert_eq!(link.url, long.url);
        assert_eq!(link.access_count, 1);
        // 58.5 minutes left rounds up
        assert_eq!(link.remaining_minutes, 59);
        assert!(links.iter().all(|l| l.token != short.token));
    }

    #[tokio::test]
    async fn test_revoke_link() {
        let (admin, viewer, _) = create_test_services();
        let created = create(&admin, None, None).await;
        let revoke = || {
            admin.revoke_link(Request::new(RevokeLinkRequest {
                token: created.token.clone(),
            }))
        };

        let first = revoke().await.unwrap().into_inner();
        assert!(first.revoked);

        assert_eq!(revoke().await.unwrap_err().code(), tonic::Code::NotFound);
        assert_eq!(
            view(&viewer, &created.token).await.unwrap_err().code(),
            tonic::Code::NotFound
        );
    }
}
