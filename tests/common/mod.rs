//! Shared helpers for integration tests: a mock release index and fixtures.

#![allow(dead_code)]

mod fixtures;

pub use fixtures::*;

use sha2::Digest;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const REPO: &str = "zen-browser/desktop";

/// Serve `tag` as the latest release of [`REPO`], with one asset per name.
/// Asset URLs point back at the mock server under `/dl/`.
pub async fn mock_release(server: &MockServer, tag: &str, names: &[&str]) {
    let assets: Vec<serde_json::Value> = names
        .iter()
        .map(|name| {
            serde_json::json!({
                "name": name,
                "size": 0,
                "browser_download_url": format!("{}/dl/{}", server.uri(), name),
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path(format!("/repos/{}/releases/latest", REPO)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "tag_name": tag,
            "assets": assets,
        })))
        .mount(server)
        .await;
}

/// Serve `body` as the content of asset `name`.
pub async fn mock_asset(server: &MockServer, name: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(format!("/dl/{}", name)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

/// Make the release index answer with `status`.
pub async fn mock_release_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/{}/releases/latest", REPO)))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Reference digest in the form the tool writes.
pub fn expected_hash(body: &[u8]) -> String {
    format!("sha256:{}", hex::encode(sha2::Sha256::digest(body)))
}
