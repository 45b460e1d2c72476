mod common;

use canvas_bulkflow::config::UploadConfig;
use canvas_bulkflow::status::RowStatus;
use canvas_bulkflow::upload::Uploader;
use serde_json::json;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::tempdir;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{client_for, dataset, NoAuthorization, BEARER};

const OCRED: &[u8] = b"%PDF-1.7 searchable text layer";

fn upload_config(source: &Path) -> UploadConfig {
    UploadConfig {
        source_folder: source.to_path_buf(),
        ..Default::default()
    }
}

/// File 5 lives in folder 7 of course 42.
async fn mount_metadata(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/files/5"))
        .and(header("Authorization", BEARER))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "folder_id": 7,
            "display_name": "Lecture Notes.pdf",
            "size": 12
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/folders/7"))
        .and(header("Authorization", BEARER))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "context_id": 42,
            "context_type": "Course"
        })))
        .mount(server)
        .await;
}

async fn mount_initiation(server: &MockServer, response: serde_json::Value, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/api/v1/courses/42/files"))
        .and(header("Authorization", BEARER))
        .and(body_partial_json(json!({
            "name": "Lecture Notes.pdf",
            "parent_folder_id": 7,
            "on_duplicate": "overwrite",
            "size": OCRED.len(),
            "content_type": "application/pdf"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .expect(expected)
        .mount(server)
        .await;
}

fn ticket(server: &MockServer) -> serde_json::Value {
    json!({
        "upload_url": format!("{}/upload-target", server.uri()),
        "upload_params": { "key": "courses/42/ticket-abc", "filename": "Lecture Notes.pdf" }
    })
}

fn write_source(dir: &Path, name: &str) {
    std::fs::write(dir.join(name), OCRED).unwrap();
}

const ONE_ROW: &str = "Id,Name\n5,Lecture Notes.pdf\n";

#[tokio::test]
async fn direct_upload_replaces_the_file() {
    let server = MockServer::start().await;
    mount_metadata(&server).await;
    mount_initiation(&server, ticket(&server), 1).await;
    Mock::given(method("POST"))
        .and(path("/upload-target"))
        .and(NoAuthorization)
        .and(body_string_contains("courses/42/ticket-abc"))
        .and(body_string_contains("searchable text layer"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 5 })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_source(dir.path(), "Lecture Notes.pdf");
    let config = upload_config(dir.path());
    let client = client_for(&server);

    let summary = Uploader::new(&client, &config, Duration::ZERO)
        .run(&dataset(ONE_ROW))
        .await
        .unwrap();

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.total(), 1);
}

#[tokio::test]
async fn redirect_is_confirmed_with_follow_up_get() {
    let server = MockServer::start().await;
    mount_metadata(&server).await;
    mount_initiation(&server, ticket(&server), 1).await;
    Mock::given(method("POST"))
        .and(path("/upload-target"))
        .respond_with(ResponseTemplate::new(302).insert_header(
            "Location",
            format!("{}/api/v1/files/5/create_success", server.uri()).as_str(),
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/files/5/create_success"))
        .and(header("Authorization", BEARER))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 5 })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_source(dir.path(), "Lecture Notes.pdf");
    let config = upload_config(dir.path());
    let client = client_for(&server);

    let summary = Uploader::new(&client, &config, Duration::ZERO)
        .run(&dataset(ONE_ROW))
        .await
        .unwrap();

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.rows[0].status, RowStatus::Done);
}

#[tokio::test]
async fn redirect_with_failing_confirmation_fails_the_row() {
    let server = MockServer::start().await;
    mount_metadata(&server).await;
    mount_initiation(&server, ticket(&server), 1).await;
    Mock::given(method("POST"))
        .and(path("/upload-target"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", "/api/v1/files/5/create_success"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/files/5/create_success"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_source(dir.path(), "Lecture Notes.pdf");
    let config = upload_config(dir.path());
    let client = client_for(&server);

    let summary = Uploader::new(&client, &config, Duration::ZERO)
        .run(&dataset(ONE_ROW))
        .await
        .unwrap();

    assert_eq!(summary.succeeded, 0);
    assert_eq!(summary.failed, 1);
}

#[tokio::test]
async fn initiation_without_params_fails_before_transfer() {
    let server = MockServer::start().await;
    mount_metadata(&server).await;
    mount_initiation(
        &server,
        json!({ "upload_url": format!("{}/upload-target", server.uri()) }),
        1,
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/upload-target"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_source(dir.path(), "Lecture Notes.pdf");
    let config = upload_config(dir.path());
    let client = client_for(&server);

    let summary = Uploader::new(&client, &config, Duration::ZERO)
        .run(&dataset(ONE_ROW))
        .await
        .unwrap();

    assert_eq!(summary.failed, 1);
    assert!(summary.rows[0].detail.contains("upload_url"));
}

#[tokio::test]
async fn metadata_404_skips_without_upload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/files/5"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .expect(1)
        .mount(&server)
        .await;
    mount_initiation(&server, ticket(&server), 0).await;

    let dir = tempdir().unwrap();
    write_source(dir.path(), "Lecture Notes.pdf");
    let config = upload_config(dir.path());
    let client = client_for(&server);

    let summary = Uploader::new(&client, &config, Duration::ZERO)
        .run(&dataset(ONE_ROW))
        .await
        .unwrap();

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.failed, 0);
}

#[tokio::test]
async fn non_course_folder_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/files/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "folder_id": 8,
            "display_name": "Lecture Notes.pdf"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/folders/8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 8,
            "context_id": 1001,
            "context_type": "User"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_source(dir.path(), "Lecture Notes.pdf");
    let config = upload_config(dir.path());
    let client = client_for(&server);

    let summary = Uploader::new(&client, &config, Duration::ZERO)
        .run(&dataset(ONE_ROW))
        .await
        .unwrap();

    assert_eq!(summary.skipped, 1);
    assert!(summary.rows[0].detail.contains("User"));
}

#[tokio::test]
async fn rows_without_id_or_local_file_make_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_source(dir.path(), "Present.pdf");
    let config = upload_config(dir.path());
    let client = client_for(&server);
    let data = dataset(
        "Id,Name\n\
         ,Present.pdf\n\
         6,Absent.pdf\n\
         7,\n",
    );

    let summary = Uploader::new(&client, &config, Duration::ZERO)
        .run(&data)
        .await
        .unwrap();

    assert_eq!(summary.skipped, 3);
    assert_eq!(summary.total(), 3);
    assert!(summary
        .rows
        .iter()
        .all(|r| r.status == RowStatus::Skipped));
}

async fn mount_failing_initiation(server: &MockServer, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/api/v1/courses/42/files"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(expected)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/upload-target"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn initiation_error_status_fails_the_row() {
    let server = MockServer::start().await;
    mount_metadata(&server).await;
    mount_failing_initiation(&server, 1).await;

    let dir = tempdir().unwrap();
    write_source(dir.path(), "Lecture Notes.pdf");
    let config = upload_config(dir.path());
    let client = client_for(&server);

    let summary = Uploader::new(&client, &config, Duration::ZERO)
        .run(&dataset(ONE_ROW))
        .await
        .unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.succeeded, 0);
    assert_eq!(summary.rows[0].status, RowStatus::Failed);
    assert!(summary.rows[0].detail.contains("Upload initiation"));
    assert!(summary.rows[0].detail.contains("500"));
}

#[tokio::test]
async fn delay_follows_only_rows_that_sent_requests() {
    let server = MockServer::start().await;
    mount_metadata(&server).await;
    mount_failing_initiation(&server, 2).await;

    let dir = tempdir().unwrap();
    write_source(dir.path(), "Lecture Notes.pdf");
    let config = upload_config(dir.path());
    let client = client_for(&server);
    let data = dataset(
        "Id,Name\n\
         5,Lecture Notes.pdf\n\
         5,Lecture Notes.pdf\n\
         ,Lecture Notes.pdf\n",
    );
    let delay = Duration::from_millis(300);

    let started = Instant::now();
    let summary = Uploader::new(&client, &config, delay)
        .run(&data)
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(summary.failed, 2);
    assert_eq!(summary.skipped, 1);
    assert!(elapsed >= delay * 2, "elapsed {:?}", elapsed);
    assert!(elapsed < delay * 3, "elapsed {:?}", elapsed);
}
