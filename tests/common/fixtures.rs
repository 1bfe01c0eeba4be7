//! Mock web sites and zip inspection helpers

use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Stylesheet body served by [`serve_asset`] callers in most tests
pub const TEST_CSS: &str = "body { color: red; }";

/// Script body served by [`serve_asset`] callers in most tests
pub const TEST_JS: &str = "console.log('hello');";

/// Minimal HTML page linking the given stylesheets and scripts
pub fn page(stylesheets: &[&str], scripts: &[&str]) -> String {
    let mut html = String::from("<!DOCTYPE html><html><head>");
    for href in stylesheets {
        html.push_str(&format!(r#"<link rel="stylesheet" href="{href}">"#));
    }
    html.push_str("</head><body><h1>fixture</h1>");
    for src in scripts {
        html.push_str(&format!(r#"<script src="{src}"></script>"#));
    }
    html.push_str("</body></html>");
    html
}

/// Serve `body` as an HTML document at `route`
pub async fn serve_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

/// Serve raw bytes at `route`
pub async fn serve_asset(server: &MockServer, route: &str, body: impl Into<Vec<u8>>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.into()))
        .mount(server)
        .await;
}

/// Answer `route` with the given status and an empty body
pub async fn serve_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Read every entry of a zip archive into memory, keyed by entry path
pub fn unzip(bytes: &[u8]) -> BTreeMap<String, Vec<u8>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip archive");
    let mut entries = BTreeMap::new();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i).expect("readable entry");
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).expect("entry contents");
        entries.insert(file.name().to_string(), contents);
    }

    entries
}
