use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use image_vault::{
    AppConfig, AppState, create_router,
    error::Error,
    models::{ImageRecord, ImageWithOwner, Role, User},
    repository::{ImageRepository, RepositoryState},
    storage::MockStorageService,
};
use std::sync::Arc;
use tower::util::ServiceExt;
use uuid::Uuid;

// Router-level upload tests: a hand-built multipart body is pushed through
// the full router with `oneshot`, so extractor wiring, the Env::Local auth
// bypass, validation, and the storage port are all exercised together.

struct StubRepository;

#[async_trait]
impl ImageRepository for StubRepository {
    async fn create_image(
        &self,
        owner_id: Uuid,
        title: String,
        description: Option<String>,
        location_ref: String,
    ) -> Result<ImageRecord, Error> {
        Ok(ImageRecord {
            id: Uuid::new_v4(),
            owner_id,
            location_ref,
            title,
            description,
            created_at: chrono::Utc::now(),
        })
    }

    async fn get_image(&self, _id: Uuid) -> Result<Option<ImageRecord>, Error> {
        Ok(None)
    }

    async fn get_images_by_owner(&self, _owner_id: Uuid) -> Result<Vec<ImageRecord>, Error> {
        Ok(vec![])
    }

    async fn get_all_images_with_owner(&self) -> Result<Vec<ImageWithOwner>, Error> {
        Ok(vec![])
    }

    async fn delete_image(&self, _id: Uuid) -> Result<bool, Error> {
        Ok(false)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, Error> {
        // Resolve any UUID to a regular user so the local bypass works.
        Ok(Some(User {
            id,
            name: "Test".to_string(),
            email: "test@test.com".to_string(),
            role: Role::Regular,
        }))
    }

    async fn get_user_by_email(&self, _email: &str) -> Result<Option<User>, Error> {
        Ok(None)
    }

    async fn create_user(&self, user: User) -> Result<User, Error> {
        Ok(user)
    }
}

fn app(mock_storage: MockStorageService) -> axum::Router {
    let repo = Arc::new(StubRepository) as RepositoryState;
    let storage = Arc::new(mock_storage);
    let config = AppConfig::default();

    let state = AppState {
        repo,
        storage,
        config,
    };
    create_router(state)
}

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

/// Assembles a multipart/form-data body by hand. `title: None` omits the
/// title part entirely; `with_file` controls the image part.
fn multipart_body(title: Option<&str>, with_file: bool) -> Vec<u8> {
    let mut body = Vec::new();

    if let Some(title) = title {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\n{title}\r\n"
            )
            .as_bytes(),
        );
    }

    if with_file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"photo.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a]);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(user_id: Option<Uuid>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/images")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );

    if let Some(user_id) = user_id {
        builder = builder.header("x-user-id", user_id.to_string());
    }

    builder.body(Body::from(body)).unwrap()
}

#[tokio::test]
async fn test_upload_success() {
    let app = app(MockStorageService::new());
    let user_id = Uuid::new_v4();

    let response = app
        .oneshot(upload_request(
            Some(user_id),
            multipart_body(Some("Holiday"), true),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let record: ImageRecord = serde_json::from_slice(&body_bytes).unwrap();

    assert_eq!(record.owner_id, user_id);
    assert_eq!(record.title, "Holiday");
    assert!(record.location_ref.starts_with("/uploads/"));
    assert!(record.location_ref.ends_with(".png"));
}

#[tokio::test]
async fn test_upload_missing_title_rejected() {
    let app = app(MockStorageService::new());

    let response = app
        .oneshot(upload_request(
            Some(Uuid::new_v4()),
            multipart_body(None, true),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_missing_file_rejected() {
    let app = app(MockStorageService::new());

    let response = app
        .oneshot(upload_request(
            Some(Uuid::new_v4()),
            multipart_body(Some("No File"), false),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_storage_failure_is_terminal() {
    let app = app(MockStorageService::new_failing());

    let response = app
        .oneshot(upload_request(
            Some(Uuid::new_v4()),
            multipart_body(Some("Doomed"), true),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_upload_without_identity_rejected() {
    let app = app(MockStorageService::new());

    let response = app
        .oneshot(upload_request(None, multipart_body(Some("Nobody"), true)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
