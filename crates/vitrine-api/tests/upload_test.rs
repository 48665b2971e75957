//! Image upload API integration tests.
//!
//! Run with: `cargo test -p vitrine-api --test upload_test`

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::MultipartForm;
use helpers::{
    create_test_image, file_part, files_under, images_path, setup_test_app, setup_test_app_with,
    TEST_TOKEN,
};
use image::{GenericImageView, ImageFormat};

#[tokio::test]
async fn test_upload_requires_token() {
    let app = setup_test_app().await;
    let jpeg = create_test_image(32, 32, ImageFormat::Jpeg);

    let response = app
        .client()
        .post(&images_path())
        .multipart(MultipartForm::new().add_part("file", file_part(jpeg.clone(), "a.jpg", "image/jpeg")))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "UNAUTHORIZED");

    let response = app
        .client()
        .post(&images_path())
        .authorization_bearer("wrong-token")
        .multipart(MultipartForm::new().add_part("file", file_part(jpeg, "a.jpg", "image/jpeg")))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    assert!(files_under(app.root()).is_empty());
}

#[tokio::test]
async fn test_upload_image_success() {
    let app = setup_test_app_with(|config| {
        config.upload.max_width = 150;
        config.upload.max_height = 100;
    })
    .await;
    let jpeg = create_test_image(300, 200, ImageFormat::Jpeg);

    let form = MultipartForm::new()
        .add_part("file", file_part(jpeg.clone(), "IMG_0001.JPG", "image/jpeg"))
        .add_text("folder", "blog")
        .add_text("altText", "Vue de Tours au printemps");

    let response = app
        .client()
        .post(&images_path())
        .authorization_bearer(TEST_TOKEN)
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);

    let path = body["path"].as_str().expect("path");
    let file_name = body["fileName"].as_str().expect("fileName");
    assert!(path.starts_with("/blog/vue-de-tours-au-printemps-"));
    assert!(path.ends_with(".webp"));
    assert_eq!(path, format!("/blog/{}", file_name));
    assert_eq!(body["originalSize"], jpeg.len() as u64);

    let optimized_size = body["optimizedSize"].as_u64().expect("optimizedSize");
    let expected_ratio =
        ((1.0 - optimized_size as f64 / jpeg.len() as f64) * 100.0).round() as i64;
    assert_eq!(body["compressionRatio"], expected_ratio);
    assert!(expected_ratio > 0, "compression ratio {}", expected_ratio);

    // The returned path is directly servable
    let served = app.client().get(path).await;
    assert_eq!(served.status_code(), StatusCode::OK);
    let bytes = served.as_bytes();
    assert_eq!(bytes.len() as u64, optimized_size);

    let decoded = image::load_from_memory_with_format(bytes, ImageFormat::WebP).unwrap();
    assert_eq!(decoded.dimensions(), (150, 100));
}

#[tokio::test]
async fn test_upload_defaults_folder_and_uses_file_name() {
    let app = setup_test_app().await;
    let png = create_test_image(40, 30, ImageFormat::Png);

    let response = app
        .client()
        .post(&images_path())
        .authorization_bearer(TEST_TOKEN)
        .multipart(
            MultipartForm::new()
                .add_part("file", file_part(png, "IMG_0001.PNG", "image/png"))
                .add_text("altText", "   "),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    let path = body["path"].as_str().expect("path");
    assert!(path.starts_with("/uploads/img-0001-"), "unexpected path {}", path);
    assert!(app.root().join("uploads").join(body["fileName"].as_str().unwrap()).is_file());
}

#[tokio::test]
async fn test_upload_unsupported_type() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&images_path())
        .authorization_bearer(TEST_TOKEN)
        .multipart(MultipartForm::new().add_part(
            "file",
            file_part(b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>".to_vec(), "logo.svg", "image/svg+xml"),
        ))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "UNSUPPORTED_MEDIA_TYPE");
    assert!(body["error"].as_str().unwrap().contains("JPEG, PNG, WebP, GIF"));
    assert!(files_under(app.root()).is_empty());
}

#[tokio::test]
async fn test_upload_too_large() {
    let app = setup_test_app_with(|config| {
        config.upload.max_file_size_bytes = 64 * 1024;
    })
    .await;

    let response = app
        .client()
        .post(&images_path())
        .authorization_bearer(TEST_TOKEN)
        .multipart(
            MultipartForm::new().add_part("file", file_part(vec![0u8; 64 * 1024 + 1], "big.png", "image/png")),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    assert!(files_under(app.root()).is_empty());
}

#[tokio::test]
async fn test_body_over_route_limit_is_json_payload_too_large() {
    let app = setup_test_app_with(|config| {
        config.upload.max_file_size_bytes = 64 * 1024;
    })
    .await;

    // Past the route body limit, not only the file limit
    let response = app
        .client()
        .post(&images_path())
        .authorization_bearer(TEST_TOKEN)
        .multipart(
            MultipartForm::new()
                .add_part("file", file_part(vec![0u8; 512 * 1024], "huge.png", "image/png")),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("maximum allowed file size"));
    assert!(files_under(app.root()).is_empty());
}

#[tokio::test]
async fn test_corrupt_image_is_opaque_failure() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&images_path())
        .authorization_bearer(TEST_TOKEN)
        .multipart(MultipartForm::new().add_part(
            "file",
            file_part(b"\xFF\xD8\xFF\xE0 definitely not a jpeg".to_vec(), "broken.jpg", "image/jpeg"),
        ))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body, serde_json::json!({ "error": "Upload failed", "code": "UPLOAD_FAILED" }));
    assert!(files_under(app.root()).is_empty());
}

#[tokio::test]
async fn test_empty_file_rejected() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&images_path())
        .authorization_bearer(TEST_TOKEN)
        .multipart(MultipartForm::new().add_part("file", file_part(Vec::new(), "empty.png", "image/png")))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_malformed_forms_rejected() {
    let app = setup_test_app().await;
    let jpeg = create_test_image(16, 16, ImageFormat::Jpeg);

    // Missing file
    let response = app
        .client()
        .post(&images_path())
        .authorization_bearer(TEST_TOKEN)
        .multipart(MultipartForm::new().add_text("folder", "blog"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    // Unknown field
    let response = app
        .client()
        .post(&images_path())
        .authorization_bearer(TEST_TOKEN)
        .multipart(
            MultipartForm::new()
                .add_part("file", file_part(jpeg.clone(), "a.jpg", "image/jpeg"))
                .add_text("overwrite", "true"),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");

    // Two files
    let response = app
        .client()
        .post(&images_path())
        .authorization_bearer(TEST_TOKEN)
        .multipart(
            MultipartForm::new()
                .add_part("file", file_part(jpeg.clone(), "a.jpg", "image/jpeg"))
                .add_part("file", file_part(jpeg, "b.jpg", "image/jpeg")),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    assert!(files_under(app.root()).is_empty());
}

#[tokio::test]
async fn test_folder_traversal_rejected() {
    let app = setup_test_app().await;
    let jpeg = create_test_image(16, 16, ImageFormat::Jpeg);

    for folder in ["../outside", "/etc", "blog/../../x", "blog\\images"] {
        let response = app
            .client()
            .post(&images_path())
            .authorization_bearer(TEST_TOKEN)
            .multipart(
                MultipartForm::new()
                    .add_part("file", file_part(jpeg.clone(), "a.jpg", "image/jpeg"))
                    .add_text("folder", folder),
            )
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "folder {}", folder);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "INVALID_INPUT");
    }

    assert!(files_under(app.root()).is_empty());
    assert!(app
        .root()
        .parent()
        .map(|parent| !parent.join("outside").exists())
        .unwrap_or(true));
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "healthy");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert!(body["paths"]["/api/v0/images"]["post"].is_object());
}
