use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Authenticated Router Module
///
/// Defines the routes accessible to any user who has passed the
/// authentication layer, regardless of role: uploading images and reading
/// back one's own data.
///
/// Access Control Strategy:
/// Every handler here relies on the `AuthUser` extractor middleware layered
/// above this module, which guarantees a validated identity (id + role).
/// Ownership scoping (e.g. in `get_my_images`) always uses that identity,
/// never client-supplied ids.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // POST /images
        // Multipart image upload: stores the binary through the storage
        // port, then records the metadata owned by the requesting user.
        .route("/images", post(handlers::upload_image))
        // GET /images/my-images
        // Lists exactly the records owned by the authenticated user.
        .route("/images/my-images", get(handlers::get_my_images))
        // GET /me
        // Retrieves the authenticated user's identity record.
        .route("/me", get(handlers::get_me))
}
