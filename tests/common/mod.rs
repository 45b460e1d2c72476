//! Shared helpers for integration tests

#![allow(dead_code)]

use canvas_bulkflow::canvas::CanvasClient;
use canvas_bulkflow::config::CanvasConfig;
use canvas_bulkflow::dataset::Dataset;
use std::path::Path;
use wiremock::{Match, MockServer, Request};

pub const TOKEN: &str = "test-token";
pub const BEARER: &str = "Bearer test-token";

pub fn client_for(server: &MockServer) -> CanvasClient {
    let config = CanvasConfig {
        base_url: server.uri(),
        token: TOKEN.to_string(),
        timeout_secs: 10,
    };
    CanvasClient::new(&config).expect("client")
}

pub fn dataset(csv: &str) -> Dataset {
    Dataset::from_reader(csv.as_bytes()).expect("dataset")
}

/// Names of the regular files directly inside `dir`, sorted.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter(|e| e.path().is_file())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

/// Matches requests that carry no `Authorization` header.
pub struct NoAuthorization;

impl Match for NoAuthorization {
    fn matches(&self, request: &Request) -> bool {
        !request.headers.contains_key("authorization")
    }
}
