//! Magic Link gRPC Protocol Definitions
//!
//! Message types for the `magiclink` package plus the generated
//! `LinkAdmin` and `LinkViewer` service stubs. The wire contract is also
//! written out in `proto/magiclink.proto` for non-Rust clients.

/// Metadata key carrying the admin secret on `LinkAdmin` calls
pub const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateLinkRequest {
    #[prost(string, optional, tag = "1")]
    pub label: ::core::option::Option<::prost::alloc::string::String>,
    /// Absent or non-positive uses the server default
    #[prost(int64, optional, tag = "2")]
    pub ttl_minutes: ::core::option::Option<i64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateLinkResponse {
    #[prost(string, tag = "1")]
    pub url: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub token: ::prost::alloc::string::String,
    /// RFC 3339, UTC
    #[prost(string, tag = "3")]
    pub expires_at: ::prost::alloc::string::String,
    #[prost(int64, tag = "4")]
    pub ttl_minutes: i64,
    #[prost(string, tag = "5")]
    pub label: ::prost::alloc::string::String,
    #[prost(string, tag = "6")]
    pub created_at: ::prost::alloc::string::String,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct ListLinksRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LinkSummary {
    #[prost(string, tag = "1")]
    pub token: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub label: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub url: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub created_at: ::prost::alloc::string::String,
    #[prost(string, tag = "5")]
    pub expires_at: ::prost::alloc::string::String,
    #[prost(uint64, tag = "6")]
    pub access_count: u64,
    #[prost(int64, tag = "7")]
    pub remaining_minutes: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListLinksResponse {
    #[prost(message, repeated, tag = "1")]
    pub links: ::prost::alloc::vec::Vec<LinkSummary>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RevokeLinkRequest {
    #[prost(string, tag = "1")]
    pub token: ::prost::alloc::string::String,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct RevokeLinkResponse {
    #[prost(bool, tag = "1")]
    pub revoked: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ViewLinkRequest {
    #[prost(string, tag = "1")]
    pub token: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ViewLinkResponse {
    #[prost(string, tag = "1")]
    pub label: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub created_at: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub expires_at: ::prost::alloc::string::String,
    #[prost(int64, tag = "4")]
    pub remaining_ms: i64,
    #[prost(int64, tag = "5")]
    pub remaining_minutes: i64,
    #[prost(uint64, tag = "6")]
    pub access_count: u64,
}

// Generated service stubs
include!(concat!(env!("OUT_DIR"), "/magiclink.LinkAdmin.rs"));
include!(concat!(env!("OUT_DIR"), "/magiclink.LinkViewer.rs"));
