//! Idempotent default-user bootstrap.
//!
//! Creates the well-known development identities (one per role) so a fresh
//! environment has a caller at every privilege level. The routine takes the
//! target repository as a parameter and is only ever invoked explicitly
//! (`image-vault --seed`); nothing here runs as a side effect of normal
//! process startup. Passwords are not part of the identity record — session
//! issuance belongs to the external auth provider.

use crate::error::Error;
use crate::models::{Role, User};
use crate::repository::ImageRepository;
use uuid::Uuid;

/// The default identities, one per role.
fn default_users() -> Vec<User> {
    vec![
        User {
            id: Uuid::new_v4(),
            name: "Super Admin".to_string(),
            email: "superadmin@example.com".to_string(),
            role: Role::SuperAdmin,
        },
        User {
            id: Uuid::new_v4(),
            name: "Admin User".to_string(),
            email: "admin@example.com".to_string(),
            role: Role::Admin,
        },
        User {
            id: Uuid::new_v4(),
            name: "Regular User".to_string(),
            email: "user@example.com".to_string(),
            role: Role::Regular,
        },
    ]
}

/// seed_default_users
///
/// Inserts each default user unless an identity with the same email already
/// exists. Existing users are left untouched, so running the seed against a
/// populated store is a no-op. Returns the number of users created.
pub async fn seed_default_users(repo: &dyn ImageRepository) -> Result<u32, Error> {
    let mut created = 0;

    for user in default_users() {
        if repo.get_user_by_email(&user.email).await?.is_some() {
            tracing::debug!(email = %user.email, "default user already present, skipping");
            continue;
        }

        tracing::info!(email = %user.email, role = %user.role, "seeding default user");
        repo.create_user(user).await?;
        created += 1;
    }

    Ok(created)
}
