//! Test helpers: build the router against a temporary public root.
//!
//! Run from workspace root: `cargo test -p vitrine-api --test upload_test`.

#![allow(dead_code)]

use axum_test::multipart::Part;
use axum_test::TestServer;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;
use vitrine_api::constants;
use vitrine_api::setup::{build_state, routes};
use vitrine_core::{BaseConfig, Config, UploadSettings};

pub const TEST_TOKEN: &str = "test-admin-token-0123456789abcdefghijklmnop";

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

pub fn images_path() -> String {
    api_path(constants::IMAGES_PATH)
}

/// Test application: server plus the public root it writes into.
pub struct TestApp {
    pub server: TestServer,
    pub public_root: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn root(&self) -> &Path {
        self.public_root.path()
    }
}

pub fn test_config(public_root: &Path) -> Config {
    Config {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            environment: "test".to_string(),
            admin_api_token: TEST_TOKEN.to_string(),
            http_concurrency_limit: 64,
        },
        upload: UploadSettings {
            public_root: public_root.to_path_buf(),
            max_concurrent_encodes: 2,
            ..UploadSettings::default()
        },
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

pub async fn setup_test_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    let public_root = TempDir::new().expect("Failed to create temp dir");
    let mut config = test_config(public_root.path());
    customize(&mut config);

    let state = build_state(config.clone())
        .await
        .expect("Failed to build state");
    let app = routes::setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp {
        server,
        public_root,
    }
}

pub fn create_test_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    }));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format)
        .expect("Failed to encode test image");
    buf
}

pub fn file_part(data: Vec<u8>, file_name: &str, mime: &str) -> Part {
    Part::bytes(bytes::Bytes::from(data))
        .file_name(file_name.to_string())
        .mime_type(mime.to_string())
}

/// Names of every regular file under `dir`, recursively
pub fn files_under(dir: &Path) -> Vec<String> {
    let mut found = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return found;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            found.extend(files_under(&path));
        } else {
            found.push(path.display().to_string());
        }
    }
    found
}
