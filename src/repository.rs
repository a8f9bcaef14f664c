use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::error::Error;
use crate::models::{ImageRecord, ImageWithOwner, User};

/// ImageRepository Trait
///
/// The abstract contract for all persistence operations: the image registry
/// plus the identity lookups the auth layer and seeding need. Handlers only
/// ever see this trait, never a concrete store.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn ImageRepository>`) safely shareable across Axum's asynchronous
/// task boundaries.
#[async_trait]
pub trait ImageRepository: Send + Sync {
    // --- Image Registry ---

    /// Inserts a new registry record owned by `owner_id`. The id and
    /// creation timestamp are assigned here and immutable afterwards.
    async fn create_image(
        &self,
        owner_id: Uuid,
        title: String,
        description: Option<String>,
        location_ref: String,
    ) -> Result<ImageRecord, Error>;

    /// Fetches a single record by id.
    async fn get_image(&self, id: Uuid) -> Result<Option<ImageRecord>, Error>;

    /// Retrieves exactly the records owned by `owner_id`.
    async fn get_images_by_owner(&self, owner_id: Uuid) -> Result<Vec<ImageRecord>, Error>;

    /// Retrieves every record in the registry, each annotated with the
    /// owner's name and email.
    async fn get_all_images_with_owner(&self) -> Result<Vec<ImageWithOwner>, Error>;

    /// Removes a record by id. Returns whether a row was actually removed,
    /// which is what makes a lost delete race observable as absence.
    async fn delete_image(&self, id: Uuid) -> Result<bool, Error>;

    // --- Identity ---

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, Error>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, Error>;
    async fn create_user(&self, user: User) -> Result<User, Error>;
}

/// RepositoryState
///
/// The concrete type used to share persistence access across the
/// application state.
pub type RepositoryState = Arc<dyn ImageRepository>;

/// PostgresRepository
///
/// The production implementation of `ImageRepository`, backed by PostgreSQL.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageRepository for PostgresRepository {
    async fn create_image(
        &self,
        owner_id: Uuid,
        title: String,
        description: Option<String>,
        location_ref: String,
    ) -> Result<ImageRecord, Error> {
        let record = sqlx::query_as::<_, ImageRecord>(
            r#"
            INSERT INTO images (id, owner_id, location_ref, title, description, created_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING id, owner_id, location_ref, title, description, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(location_ref)
        .bind(title)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn get_image(&self, id: Uuid) -> Result<Option<ImageRecord>, Error> {
        let record = sqlx::query_as::<_, ImageRecord>(
            r#"
            SELECT id, owner_id, location_ref, title, description, created_at
            FROM images
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn get_images_by_owner(&self, owner_id: Uuid) -> Result<Vec<ImageRecord>, Error> {
        let records = sqlx::query_as::<_, ImageRecord>(
            r#"
            SELECT id, owner_id, location_ref, title, description, created_at
            FROM images
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Joins the registry against `users` so the admin listing carries the
    /// minimal owner summary without a second round trip.
    async fn get_all_images_with_owner(&self) -> Result<Vec<ImageWithOwner>, Error> {
        let records = sqlx::query_as::<_, ImageWithOwner>(
            r#"
            SELECT i.id, i.owner_id, i.location_ref, i.title, i.description, i.created_at,
                   u.name AS owner_name, u.email AS owner_email
            FROM images i
            JOIN users u ON i.owner_id = u.id
            ORDER BY i.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn delete_image(&self, id: Uuid) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, Error> {
        let user =
            sqlx::query_as::<_, User>("SELECT id, name, email, role FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        let user =
            sqlx::query_as::<_, User>("SELECT id, name, email, role FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        Ok(user)
    }

    async fn create_user(&self, user: User) -> Result<User, Error> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, role
            "#,
        )
        .bind(user.id)
        .bind(user.name)
        .bind(user.email)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }
}

/// InMemoryRepository
///
/// A Mutex-guarded map implementation of `ImageRepository` satisfying the
/// same contract as the Postgres store. Used by the integration tests (and
/// available for local experimentation) so the access-policy logic is
/// exercised without real database I/O.
#[derive(Default)]
pub struct InMemoryRepository {
    users: Mutex<HashMap<Uuid, User>>,
    images: Mutex<HashMap<Uuid, ImageRecord>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImageRepository for InMemoryRepository {
    async fn create_image(
        &self,
        owner_id: Uuid,
        title: String,
        description: Option<String>,
        location_ref: String,
    ) -> Result<ImageRecord, Error> {
        let record = ImageRecord {
            id: Uuid::new_v4(),
            owner_id,
            location_ref,
            title,
            description,
            created_at: chrono::Utc::now(),
        };

        self.images
            .lock()
            .expect("image map poisoned")
            .insert(record.id, record.clone());

        Ok(record)
    }

    async fn get_image(&self, id: Uuid) -> Result<Option<ImageRecord>, Error> {
        Ok(self
            .images
            .lock()
            .expect("image map poisoned")
            .get(&id)
            .cloned())
    }

    async fn get_images_by_owner(&self, owner_id: Uuid) -> Result<Vec<ImageRecord>, Error> {
        let mut records: Vec<ImageRecord> = self
            .images
            .lock()
            .expect("image map poisoned")
            .values()
            .filter(|record| record.owner_id == owner_id)
            .cloned()
            .collect();

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn get_all_images_with_owner(&self) -> Result<Vec<ImageWithOwner>, Error> {
        let users = self.users.lock().expect("user map poisoned");
        let mut records: Vec<ImageWithOwner> = self
            .images
            .lock()
            .expect("image map poisoned")
            .values()
            .map(|record| {
                let owner = users.get(&record.owner_id);
                ImageWithOwner {
                    id: record.id,
                    owner_id: record.owner_id,
                    location_ref: record.location_ref.clone(),
                    title: record.title.clone(),
                    description: record.description.clone(),
                    created_at: record.created_at,
                    owner_name: owner.map(|u| u.name.clone()).unwrap_or_default(),
                    owner_email: owner.map(|u| u.email.clone()).unwrap_or_default(),
                }
            })
            .collect();

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn delete_image(&self, id: Uuid) -> Result<bool, Error> {
        Ok(self
            .images
            .lock()
            .expect("image map poisoned")
            .remove(&id)
            .is_some())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, Error> {
        Ok(self
            .users
            .lock()
            .expect("user map poisoned")
            .get(&id)
            .cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        Ok(self
            .users
            .lock()
            .expect("user map poisoned")
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn create_user(&self, user: User) -> Result<User, Error> {
        self.users
            .lock()
            .expect("user map poisoned")
            .insert(user.id, user.clone());

        Ok(user)
    }
}
