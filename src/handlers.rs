use crate::{
    AppState,
    auth::AuthUser,
    error::Error,
    models::{DeleteImageResponse, ImageRecord, ImageWithOwner, User},
};
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use uuid::Uuid;

/// upload_image
///
/// [Authenticated Route] Accepts a multipart form (`title`, optional
/// `description`, `image` file) and creates a new registry record owned by
/// the requesting user. Ownership is taken from the authenticated identity,
/// never from the payload.
///
/// The storage write runs first; only a usable location reference is ever
/// persisted. A storage failure is terminal for the request.
#[utoipa::path(
    post,
    path = "/images",
    responses(
        (status = 201, description = "Created", body = ImageRecord),
        (status = 400, description = "Missing title or image"),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn upload_image(
    AuthUser { id: owner_id, .. }: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ImageRecord>), Error> {
    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut upload: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::validation(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| Error::validation(format!("unreadable title field: {e}")))?,
                );
            }
            "description" => {
                description = Some(field.text().await.map_err(|e| {
                    Error::validation(format!("unreadable description field: {e}"))
                })?);
            }
            "image" => {
                let filename = field.file_name().unwrap_or("upload.bin").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| Error::validation(format!("unreadable image field: {e}")))?
                    .to_vec();
                upload = Some((filename, content_type, data));
            }
            // Unknown fields are ignored rather than rejected.
            _ => {}
        }
    }

    let title = title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::validation("title is required"))?;

    let (filename, content_type, data) =
        upload.ok_or_else(|| Error::validation("image file is required"))?;
    if data.is_empty() {
        return Err(Error::validation("image file is empty"));
    }

    let description = description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let location_ref = state
        .storage
        .store_object(data, &filename, &content_type)
        .await?;
    if location_ref.is_empty() {
        return Err(Error::Storage(
            "storage returned an empty location reference".to_string(),
        ));
    }

    let record = state
        .repo
        .create_image(owner_id, title, description, location_ref)
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// get_my_images
///
/// [Authenticated Route] Lists the images owned by the requesting user, and
/// only those. The owner id comes from the `AuthUser` extractor, so one
/// user can never scope into another's records.
#[utoipa::path(
    get,
    path = "/images/my-images",
    responses(
        (status = 200, description = "Own images", body = [ImageRecord]),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn get_my_images(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ImageRecord>>, Error> {
    let images = state.repo.get_images_by_owner(id).await?;
    Ok(Json(images))
}

/// get_all_images
///
/// [Admin Route] Lists every image in the registry regardless of owner,
/// each annotated with the owner's name and email.
///
/// *Authorization*: admin or super_admin. The role check runs before any
/// data is read.
#[utoipa::path(
    get,
    path = "/images/all",
    responses(
        (status = 200, description = "All images with owner summary", body = [ImageWithOwner]),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Insufficient role")
    )
)]
pub async fn get_all_images(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ImageWithOwner>>, Error> {
    if !role.can_view_all_images() {
        return Err(Error::Forbidden);
    }

    let images = state.repo.get_all_images_with_owner().await?;
    Ok(Json(images))
}

/// delete_image
///
/// [Admin Route] Removes a registry record by id.
///
/// *Authorization*: super_admin only — a stricter requirement than the
/// listing endpoint; plain admin receives 403 without learning whether the
/// record exists.
///
/// Existence is checked explicitly before the destructive statement so a
/// missing id reports `NotFound`, and a racing second delete observes
/// `NotFound` through the rows-affected result rather than a false success.
/// The stored bytes are left in place; only the registry row is removed.
#[utoipa::path(
    delete,
    path = "/images/{id}",
    params(("id" = Uuid, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Deleted", body = DeleteImageResponse),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Insufficient role"),
        (status = 404, description = "No such image")
    )
)]
pub async fn delete_image(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteImageResponse>, Error> {
    if !role.can_delete_images() {
        return Err(Error::Forbidden);
    }

    if state.repo.get_image(id).await?.is_none() {
        return Err(Error::NotFound { what: "image" });
    }

    if !state.repo.delete_image(id).await? {
        // Lost the race against a concurrent delete.
        return Err(Error::NotFound { what: "image" });
    }

    Ok(Json(DeleteImageResponse {
        message: "Image deleted successfully".to_string(),
    }))
}

/// get_me
///
/// [Authenticated Route] Returns the requesting user's identity record.
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Profile", body = User),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn get_me(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<User>, Error> {
    let user = state
        .repo
        .get_user(id)
        .await?
        .ok_or(Error::NotFound { what: "user" })?;

    Ok(Json(user))
}
