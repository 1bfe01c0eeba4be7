//! OpenAPI documentation and schema generation
//!
//! Served at `/openapi.json`, generated at compile time by utoipa.

use utoipa::OpenApi;

/// OpenAPI documentation for the page-bundler HTTP API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "page-bundler API",
        description = "Download a web page together with its stylesheets and scripts as a zip archive",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:3001", description = "Local development server")
    ),
    paths(
        crate::api::routes::download,
        crate::api::routes::root,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(
        schemas(crate::error::ApiError)
    ),
    tags(
        (name = "download", description = "Page bundling"),
        (name = "system", description = "Liveness and documentation")
    )
)]
pub struct ApiDoc;
