use tonic_build::manual::{Builder, Method, Service};

const PACKAGE: &str = "magiclink";
const CODEC: &str = "tonic::codec::ProstCodec";

fn unary(name: &str, route_name: &str, input: &str, output: &str) -> Method {
    Method::builder()
        .name(name)
        .route_name(route_name)
        .input_type(format!("crate::{}", input))
        .output_type(format!("crate::{}", output))
        .codec_path(CODEC)
        .build()
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Services are described here rather than compiled from
    // proto/magiclink.proto so that building does not need `protoc`.
    // Keep both in sync.
    let admin = Service::builder()
        .name("LinkAdmin")
        .package(PACKAGE)
        .comment("Operator operations, gated by the admin secret")
        .method(unary(
            "create_link",
            "CreateLink",
            "CreateLinkRequest",
            "CreateLinkResponse",
        ))
        .method(unary(
            "list_links",
            "ListLinks",
            "ListLinksRequest",
            "ListLinksResponse",
        ))
        .method(unary(
            "revoke_link",
            "RevokeLink",
            "RevokeLinkRequest",
            "RevokeLinkResponse",
        ))
        .build();

    let viewer = Service::builder()
        .name("LinkViewer")
        .package(PACKAGE)
        .comment("Viewer operations; the token is the only credential")
        .method(unary(
            "view_link",
            "ViewLink",
            "ViewLinkRequest",
            "ViewLinkResponse",
        ))
        .build();

    Builder::new().compile(&[admin, viewer]);
}
