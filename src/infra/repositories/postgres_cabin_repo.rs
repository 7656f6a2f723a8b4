use crate::domain::{models::cabin::Cabin, ports::CabinRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresCabinRepo {
    pool: PgPool,
}

impl PostgresCabinRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CabinRepository for PostgresCabinRepo {
    async fn create(&self, cabin: &Cabin) -> Result<Cabin, AppError> {
        sqlx::query_as::<_, Cabin>(
            "INSERT INTO cabins (id, name, description, capacity, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING *"
        )
            .bind(&cabin.id).bind(&cabin.name).bind(&cabin.description).bind(cabin.capacity).bind(cabin.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Cabin>, AppError> {
        sqlx::query_as::<_, Cabin>("SELECT * FROM cabins WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list(&self) -> Result<Vec<Cabin>, AppError> {
        sqlx::query_as::<_, Cabin>("SELECT * FROM cabins ORDER BY name ASC, created_at ASC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn update(&self, cabin: &Cabin) -> Result<Cabin, AppError> {
        sqlx::query_as::<_, Cabin>("UPDATE cabins SET name = $1, description = $2, capacity = $3 WHERE id = $4 RETURNING *")
            .bind(&cabin.name).bind(&cabin.description).bind(cabin.capacity).bind(&cabin.id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Cabin not found".into()))
    }
    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM cabins WHERE id = $1").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Cabin not found".into())); }
        Ok(())
    }
}
