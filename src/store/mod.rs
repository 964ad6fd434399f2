use crate::models::Spot;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::types::Json;
use std::str::FromStr;
use tracing::debug;

const CREATE_SPOTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS spots (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          VARCHAR(1000) NOT NULL UNIQUE,
    address       VARCHAR(255),
    city          VARCHAR(100),
    latitude      REAL,
    longitude     REAL,
    phone         VARCHAR(20),
    url           VARCHAR(500),
    rating        REAL,
    place_id      VARCHAR(255),
    opening_hours TEXT,
    description   TEXT,
    photo_url     VARCHAR(500),
    created_at    TIMESTAMP NOT NULL
)
"#;

/// Persistence for seeded spots
#[async_trait]
pub trait SpotStore: Send + Sync {
    /// Insert `spot` unless a spot with the same name already exists.
    ///
    /// Returns `true` when a row was written. Must be a single atomic
    /// statement, not a lookup followed by a write.
    async fn insert_if_absent(&self, spot: &Spot) -> Result<bool, sqlx::Error>;

    /// Total number of stored spots
    async fn count(&self) -> Result<u64, sqlx::Error>;
}

/// SQLite-backed spot store
pub struct SqliteSpotStore {
    pool: SqlitePool,
}

impl SqliteSpotStore {
    /// Open (creating if needed) the database at `database_url`
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // One long-lived connection: writes are sequential, and an in-memory
        // database only lives as long as its connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Create the `spots` table if it does not exist
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query(CREATE_SPOTS_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl SpotStore for SqliteSpotStore {
    async fn insert_if_absent(&self, spot: &Spot) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"INSERT OR IGNORE INTO spots
               (name, address, city, latitude, longitude, phone, url, rating,
                place_id, opening_hours, description, photo_url, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&spot.name)
        .bind(&spot.address)
        .bind(&spot.city)
        .bind(spot.latitude)
        .bind(spot.longitude)
        .bind(&spot.phone)
        .bind(&spot.url)
        .bind(spot.rating)
        .bind(&spot.place_id)
        .bind(spot.opening_hours.clone().map(Json))
        .bind(&spot.description)
        .bind(&spot.photo_url)
        .bind(spot.created_at)
        .execute(&self.pool)
        .await?;

        let inserted = result.rows_affected() > 0;
        debug!("insert_if_absent({}) -> {}", spot.name, inserted);
        Ok(inserted)
    }

    async fn count(&self) -> Result<u64, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM spots")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

#[cfg(test)]
impl SqliteSpotStore {
    /// Fresh, migrated in-memory store
    pub async fn in_memory() -> Self {
        let store = Self::connect("sqlite::memory:").await.unwrap();
        store.migrate().await.unwrap();
        store
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Spot>, sqlx::Error> {
        use sqlx::Row;

        let row = sqlx::query(
            r#"SELECT name, address, city, latitude, longitude, phone, url, rating,
                      place_id, opening_hours, description, photo_url, created_at
               FROM spots WHERE name = ?"#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| -> Result<Spot, sqlx::Error> {
            let opening_hours: Option<Json<Vec<String>>> = r.try_get("opening_hours")?;
            Ok(Spot {
                name: r.try_get("name")?,
                address: r.try_get("address")?,
                city: r.try_get("city")?,
                latitude: r.try_get("latitude")?,
                longitude: r.try_get("longitude")?,
                phone: r.try_get("phone")?,
                url: r.try_get("url")?,
                rating: r.try_get("rating")?,
                place_id: r.try_get("place_id")?,
                opening_hours: opening_hours.map(|Json(hours)| hours),
                description: r.try_get("description")?,
                photo_url: r.try_get("photo_url")?,
                created_at: r.try_get("created_at")?,
            })
        })
        .transpose()
    }
}
