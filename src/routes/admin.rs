use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get},
};

/// Admin Router Module
///
/// Defines the routes reserved for elevated roles. Both handlers perform
/// their role check before touching the repository, so a failed check can
/// never leak data — including whether a given record exists.
///
/// Note the asymmetry: listing requires admin OR super_admin, deletion
/// requires super_admin exactly.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /images/all
        // Lists every image in the registry with a minimal owner summary
        // (name, email). Requires the 'admin' or 'super_admin' role.
        .route("/images/all", get(handlers::get_all_images))
        // DELETE /images/{id}
        // Removes a registry record. Requires 'super_admin'; an existence
        // check precedes the destructive statement so callers get an
        // accurate NotFound.
        .route("/images/{id}", delete(handlers::delete_image))
}
