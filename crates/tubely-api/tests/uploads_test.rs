mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use helpers::fixtures::{trailing_index_mp4, PNG_1X1};
use helpers::{asset_path, issue_token, TestApp, TEST_BUCKET};
use serde_json::Value;
use tubely_core::{ObjectLocation, ThumbnailRef, ThumbnailStorageMode};
use uuid::Uuid;

fn thumbnail_form(bytes: &[u8], content_type: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "thumbnail",
        Part::bytes(bytes.to_vec())
            .file_name("thumb.png")
            .mime_type(content_type),
    )
}

fn video_form(bytes: Vec<u8>, content_type: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "video",
        Part::bytes(bytes)
            .file_name("clip.mp4")
            .mime_type(content_type),
    )
}

#[tokio::test]
async fn thumbnail_upload_stores_object_and_returns_signed_url() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner).await;

    let response = app
        .server
        .post(&format!("/api/videos/{}/thumbnail", video.id))
        .authorization_bearer(issue_token(owner))
        .multipart(thumbnail_form(PNG_1X1, "image/png"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    let url = body["thumbnail_url"].as_str().unwrap();
    assert!(url.starts_with(&format!(
        "http://localhost:8091/assets/{}/thumbnails/{}.png?",
        TEST_BUCKET, video.id
    )));
    assert!(body["video_url"].is_null());

    let expected = ObjectLocation::new(TEST_BUCKET, format!("thumbnails/{}.png", video.id));
    let stored = app.repository.stored(video.id).unwrap();
    assert_eq!(stored.thumbnail, Some(ThumbnailRef::Stored(expected.clone())));
    assert_eq!(std::fs::read(app.object_path(&expected)).unwrap(), PNG_1X1);

    // The signed URL resolves through the asset route
    let asset = app.server.get(&asset_path(url)).await;
    assert_eq!(asset.status_code(), StatusCode::OK);
    assert_eq!(asset.header("content-type"), "image/png");
    assert_eq!(asset.as_bytes().as_ref(), PNG_1X1);
}

#[tokio::test]
async fn thumbnail_inline_mode_returns_data_url() {
    let app = TestApp::builder()
        .thumbnail_mode(ThumbnailStorageMode::Inline)
        .build()
        .await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner).await;

    let response = app
        .server
        .post(&format!("/api/videos/{}/thumbnail", video.id))
        .authorization_bearer(issue_token(owner))
        .multipart(thumbnail_form(PNG_1X1, "image/png"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert!(body["thumbnail_url"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));

    match app.repository.stored(video.id).unwrap().thumbnail {
        Some(ThumbnailRef::Inline { content_type, data }) => {
            assert_eq!(content_type, "image/png");
            assert_eq!(data, PNG_1X1);
        }
        other => panic!("expected inline thumbnail, got {:?}", other),
    }
}

#[tokio::test]
async fn thumbnail_content_type_parameters_are_ignored() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner).await;

    let response = app
        .server
        .post(&format!("/api/videos/{}/thumbnail", video.id))
        .authorization_bearer(issue_token(owner))
        .multipart(thumbnail_form(b"\xff\xd8\xff\xe0jpeg", "IMAGE/JPEG; charset=binary"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let location = ObjectLocation::new(TEST_BUCKET, format!("thumbnails/{}.jpeg", video.id));
    assert!(app.object_path(&location).exists());
}

#[tokio::test]
async fn thumbnail_with_unsupported_type_is_rejected() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner).await;

    let response = app
        .server
        .post(&format!("/api/videos/{}/thumbnail", video.id))
        .authorization_bearer(issue_token(owner))
        .multipart(thumbnail_form(b"GIF89a", "image/gif"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_MEDIA_TYPE");
    assert!(app.repository.stored(video.id).unwrap().thumbnail.is_none());
}

#[tokio::test]
async fn thumbnail_missing_field_is_bad_request() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner).await;

    let form = MultipartForm::new().add_part(
        "image",
        Part::bytes(PNG_1X1.to_vec())
            .file_name("thumb.png")
            .mime_type("image/png"),
    );
    let response = app
        .server
        .post(&format!("/api/videos/{}/thumbnail", video.id))
        .authorization_bearer(issue_token(owner))
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(body["error"], "Missing form field 'thumbnail'");
}

#[tokio::test]
async fn thumbnail_over_limit_is_payload_too_large() {
    let app = TestApp::builder().max_thumbnail_bytes(1024).build().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner).await;

    let response = app
        .server
        .post(&format!("/api/videos/{}/thumbnail", video.id))
        .authorization_bearer(issue_token(owner))
        .multipart(thumbnail_form(&vec![0u8; 4096], "image/png"))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.repository.stored(video.id).unwrap().thumbnail.is_none());
}

#[tokio::test]
async fn empty_thumbnail_is_bad_request() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner).await;

    let response = app
        .server
        .post(&format!("/api/videos/{}/thumbnail", video.id))
        .authorization_bearer(issue_token(owner))
        .multipart(thumbnail_form(&[], "image/png"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn video_upload_remuxes_and_stores_under_orientation_prefix() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner).await;

    let response = app
        .server
        .post(&format!("/api/videos/{}/video", video.id))
        .authorization_bearer(issue_token(owner))
        .multipart(video_form(trailing_index_mp4(), "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    let url = body["video_url"].as_str().unwrap();
    assert!(url.contains("/assets/tubely/landscape/"));
    assert!(url.contains("expires=") && url.contains("signature="));

    let location = app.repository.stored(video.id).unwrap().video.unwrap();
    assert_eq!(location.bucket, TEST_BUCKET);
    let (prefix, file) = location.key.split_once('/').unwrap();
    assert_eq!(prefix, "landscape");
    let (token, ext) = file.rsplit_once('.').unwrap();
    assert_eq!(ext, "mp4");
    assert_eq!(token.len(), 43);

    // Stored bytes are the optimizer's output, not the upload
    let stored_path = app.object_path(&location);
    assert_eq!(
        tubely_processing::mp4::file_is_fast_start(&stored_path)
            .await
            .unwrap(),
        Some(true)
    );

    // The inspector saw the optimized file, and every temp file is gone
    let outputs = app.optimizer.outputs.lock().unwrap().clone();
    assert_eq!(*app.inspector.inspected.lock().unwrap(), outputs);
    for path in app.optimizer.seen_paths() {
        assert!(!path.exists(), "{} was not cleaned up", path.display());
    }

    let asset = app.server.get(&asset_path(url)).await;
    assert_eq!(asset.status_code(), StatusCode::OK);
    assert_eq!(asset.header("content-type"), "video/mp4");
    assert_eq!(
        asset.as_bytes().as_ref(),
        std::fs::read(&stored_path).unwrap().as_slice()
    );
}

#[tokio::test]
async fn portrait_and_other_geometry_pick_their_prefix() {
    for ((width, height), prefix) in [((1080, 1920), "portrait"), ((1000, 1000), "other")] {
        let app = TestApp::builder().inspector(width, height).build().await;
        let owner = Uuid::new_v4();
        let video = app.seed_video(owner).await;

        let response = app
            .server
            .post(&format!("/api/videos/{}/video", video.id))
            .authorization_bearer(issue_token(owner))
            .multipart(video_form(trailing_index_mp4(), "video/mp4"))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let location = app.repository.stored(video.id).unwrap().video.unwrap();
        assert!(location.key.starts_with(&format!("{}/", prefix)));
    }
}

#[tokio::test]
async fn reupload_overwrites_reference_with_fresh_key() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner).await;
    let path = format!("/api/videos/{}/video", video.id);

    for _ in 0..2 {
        let response = app
            .server
            .post(&path)
            .authorization_bearer(issue_token(owner))
            .multipart(video_form(trailing_index_mp4(), "video/mp4"))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    let outputs = app.optimizer.outputs.lock().unwrap().len();
    assert_eq!(outputs, 2);

    let current = app.repository.stored(video.id).unwrap().video.unwrap();
    let landscape_dir = app.storage_dir.path().join(TEST_BUCKET).join("landscape");
    let stored: Vec<_> = std::fs::read_dir(landscape_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    // The earlier object stays behind; only the newest is referenced
    assert_eq!(stored.len(), 2);
    assert!(stored.contains(&current.key.trim_start_matches("landscape/").to_string()));
}

#[tokio::test]
async fn video_with_wrong_type_is_rejected_before_processing() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner).await;

    let response = app
        .server
        .post(&format!("/api/videos/{}/video", video.id))
        .authorization_bearer(issue_token(owner))
        .multipart(video_form(b"not a video".to_vec(), "video/quicktime"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_MEDIA_TYPE");
    assert!(app.optimizer.inputs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn processing_failure_aborts_before_storage() {
    let app = TestApp::builder().failing_optimizer().build().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner).await;

    let response = app
        .server
        .post(&format!("/api/videos/{}/video", video.id))
        .authorization_bearer(issue_token(owner))
        .multipart(video_form(trailing_index_mp4(), "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "PROCESSING_ERROR");
    assert_eq!(body["error"], "Failed to process video");
    assert!(body.get("details").is_none());
    assert!(!response.text().contains("moov atom"));

    assert!(app.repository.stored(video.id).unwrap().video.is_none());
    assert!(!app.storage_dir.path().join(TEST_BUCKET).join("landscape").exists());
    for path in app.optimizer.seen_paths() {
        assert!(!path.exists(), "{} was not cleaned up", path.display());
    }
}

#[tokio::test]
async fn video_upload_keeps_thumbnail_saved_while_it_was_processing() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner).await;

    // A thumbnail upload lands after the video upload loaded the record
    let thumbnail = ThumbnailRef::Stored(ObjectLocation::new(
        TEST_BUCKET,
        format!("thumbnails/{}.png", video.id),
    ));
    let repository = app.repository.clone();
    let (video_id, saved) = (video.id, thumbnail.clone());
    app.optimizer.run_during_optimize(move || {
        let mut record = repository.stored(video_id).unwrap();
        record.thumbnail = Some(saved);
        repository.insert(record);
    });

    let response = app
        .server
        .post(&format!("/api/videos/{}/video", video.id))
        .authorization_bearer(issue_token(owner))
        .multipart(video_form(trailing_index_mp4(), "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let stored = app.repository.stored(video.id).unwrap();
    assert!(stored.video.is_some());
    assert_eq!(stored.thumbnail, Some(thumbnail));
}

#[tokio::test]
async fn persistence_failure_leaves_orphaned_object() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner).await;
    app.repository.fail_updates(true);

    let response = app
        .server
        .post(&format!("/api/videos/{}/video", video.id))
        .authorization_bearer(issue_token(owner))
        .multipart(video_form(trailing_index_mp4(), "video/mp4"))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "INTERNAL_ERROR");

    // The record is unchanged but the object was written
    assert!(app.repository.stored(video.id).unwrap().video.is_none());
    let landscape_dir = app.storage_dir.path().join(TEST_BUCKET).join("landscape");
    assert_eq!(std::fs::read_dir(landscape_dir).unwrap().count(), 1);
}

#[tokio::test]
async fn upload_by_non_owner_is_unauthorized_and_writes_nothing() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner).await;
    let stranger = issue_token(Uuid::new_v4());

    let thumb = app
        .server
        .post(&format!("/api/videos/{}/thumbnail", video.id))
        .authorization_bearer(&stranger)
        .multipart(thumbnail_form(PNG_1X1, "image/png"))
        .await;
    assert_eq!(thumb.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = thumb.json();
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(body["error"], "User is not the video owner");

    let upload = app
        .server
        .post(&format!("/api/videos/{}/video", video.id))
        .authorization_bearer(&stranger)
        .multipart(video_form(trailing_index_mp4(), "video/mp4"))
        .await;
    assert_eq!(upload.status_code(), StatusCode::UNAUTHORIZED);

    let stored = app.repository.stored(video.id).unwrap();
    assert!(stored.thumbnail.is_none());
    assert!(stored.video.is_none());
    assert!(app.optimizer.inputs.lock().unwrap().is_empty());
    assert!(!app.storage_dir.path().join(TEST_BUCKET).join("thumbnails").exists());
}

#[tokio::test]
async fn upload_without_credentials_is_unauthenticated() {
    let app = TestApp::new().await;
    let video = app.seed_video(Uuid::new_v4()).await;

    let response = app
        .server
        .post(&format!("/api/videos/{}/thumbnail", video.id))
        .multipart(thumbnail_form(PNG_1X1, "image/png"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["code"], "UNAUTHENTICATED");
    assert_eq!(body["error"], "Couldn't find JWT");
}

#[tokio::test]
async fn upload_to_unknown_or_malformed_id() {
    let app = TestApp::new().await;
    let token = issue_token(Uuid::new_v4());

    let unknown = app
        .server
        .post(&format!("/api/videos/{}/video", Uuid::new_v4()))
        .authorization_bearer(&token)
        .multipart(video_form(trailing_index_mp4(), "video/mp4"))
        .await;
    assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);

    // Malformed ids fail before authentication is consulted
    let malformed = app
        .server
        .post("/api/videos/not-a-uuid/thumbnail")
        .multipart(thumbnail_form(PNG_1X1, "image/png"))
        .await;
    assert_eq!(malformed.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = malformed.json();
    assert_eq!(body["error"], "Invalid video ID");
}

#[tokio::test]
async fn asset_route_rejects_tampered_and_serves_404_for_missing() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner).await;

    let response = app
        .server
        .post(&format!("/api/videos/{}/thumbnail", video.id))
        .authorization_bearer(issue_token(owner))
        .multipart(thumbnail_form(PNG_1X1, "image/png"))
        .await;
    let body: Value = response.json();
    let url = asset_path(body["thumbnail_url"].as_str().unwrap());

    let tampered = url.replace(".png?", ".jpeg?");
    assert_eq!(
        app.server.get(&tampered).await.status_code(),
        StatusCode::FORBIDDEN
    );

    let unsigned = url.split('?').next().unwrap().to_string();
    assert_eq!(
        app.server.get(&unsigned).await.status_code(),
        StatusCode::FORBIDDEN
    );

    let missing = ObjectLocation::new(TEST_BUCKET, "landscape/missing.mp4");
    let query = app
        .signer()
        .sign(&missing, std::time::Duration::from_secs(60))
        .unwrap();
    let path = format!(
        "/assets/{}/{}?{}",
        missing.bucket,
        missing.key,
        query.to_query_string()
    );
    assert_eq!(app.server.get(&path).await.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn consecutive_reads_mint_distinct_urls() {
    let app = TestApp::new().await;
    let owner = Uuid::new_v4();
    let video = app.seed_video(owner).await;

    app.server
        .post(&format!("/api/videos/{}/video", video.id))
        .authorization_bearer(issue_token(owner))
        .multipart(video_form(trailing_index_mp4(), "video/mp4"))
        .await
        .assert_status_ok();

    let first: Value = app.server.get(&format!("/api/videos/{}", video.id)).await.json();
    let second: Value = app.server.get(&format!("/api/videos/{}", video.id)).await.json();
    assert_ne!(first["video_url"], second["video_url"]);

    for body in [first, second] {
        let url = asset_path(body["video_url"].as_str().unwrap());
        assert_eq!(app.server.get(&url).await.status_code(), StatusCode::OK);
    }
}
