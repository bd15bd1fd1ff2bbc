use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow},
    Row, Sqlite,
};
use std::{path::Path, str::FromStr};
use tracing::debug;
use uuid::Uuid;

use crate::{
    domain::{
        errors::{ListingError, ListingResult},
        models::{Listing, ListingDetails, ListingPatch, ListingStatus, NewListing, PropertyType},
        value_objects::{ImageRef, ListingId},
    },
    ports::repositories::ListingRepository,
};

/// How many times an update is retried when another writer got in between
const MAX_UPDATE_ATTEMPTS: u32 = 5;

const SELECT_LISTING: &str = r#"
    SELECT id, image_ref, price, beds, baths, sqft, address, features,
           year_built, property_type, listing_status, revision
    FROM listings
"#;

/// SQLite-backed implementation of ListingRepository.
///
/// Ids are random UUIDs generated on insert. Updates are a compare-and-swap
/// on the row's `revision`, so a concurrent delete or update is detected
/// instead of overwritten.
#[derive(Clone)]
pub struct SqlListingRepository {
    pool: SqlitePool,
}

impl SqlListingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect using a `sqlite:` URL, creating the database file if needed
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        Self::connect_with(SqlitePoolOptions::new(), options).await
    }

    /// Connect to a database file on disk
    pub async fn connect_file(path: impl AsRef<Path>) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        Self::connect_with(SqlitePoolOptions::new(), options).await
    }

    /// Private in-memory database, mostly for tests
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        // Each connection to :memory: is its own database, so pin the pool
        // to one connection that never expires.
        let pool_options = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        Self::connect_with(pool_options, options).await
    }

    async fn connect_with(
        pool_options: SqlitePoolOptions,
        options: SqliteConnectOptions,
    ) -> Result<Self, sqlx::Error> {
        let pool = pool_options.connect_with(options).await?;
        let repository = Self::new(pool);
        repository.migrate().await?;
        Ok(repository)
    }

    /// Initialize database tables
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS listings (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                image_ref TEXT NOT NULL,
                price TEXT NOT NULL,
                beds INTEGER NOT NULL CHECK (beds >= 0),
                baths INTEGER NOT NULL CHECK (baths >= 0),
                sqft INTEGER NOT NULL CHECK (sqft >= 0),
                address TEXT NOT NULL,
                features TEXT NOT NULL,
                year_built INTEGER NOT NULL,
                property_type TEXT NOT NULL,
                listing_status TEXT NOT NULL,
                revision INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn fetch_with_revision(
        &self,
        id: &ListingId,
    ) -> ListingResult<Option<(Listing, i64)>> {
        let sql = format!("{} WHERE id = ?1", SELECT_LISTING);
        let row = sqlx::query(&sql)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("retrieving listing"))?;

        match row {
            Some(row) => Ok(Some((
                listing_from_row(&row)?,
                column::<i64>(&row, "revision")?,
            ))),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ListingRepository for SqlListingRepository {
    fn parse_id(&self, raw: &str) -> Option<ListingId> {
        ListingId::parse_uuid(raw)
    }

    async fn create(&self, listing: NewListing) -> ListingResult<Listing> {
        let id = ListingId::from_uuid(Uuid::new_v4());
        let details = &listing.details;

        sqlx::query(
            r#"
            INSERT INTO listings (
                id, image_ref, price, beds, baths, sqft, address, features,
                year_built, property_type, listing_status
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(id.as_str())
        .bind(listing.image_ref.as_str())
        .bind(&details.price)
        .bind(i64::from(details.beds))
        .bind(i64::from(details.baths))
        .bind(i64::from(details.sqft))
        .bind(&details.address)
        .bind(encode_features(&details.features)?)
        .bind(details.year_built)
        .bind(details.property_type.as_str())
        .bind(details.listing_status.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error("storing listing"))?;

        Ok(listing.into_listing(id))
    }

    async fn get_all(&self) -> ListingResult<Vec<Listing>> {
        let sql = format!("{} ORDER BY seq", SELECT_LISTING);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("listing listings"))?;

        rows.iter().map(listing_from_row).collect()
    }

    async fn get_by_id(&self, id: &ListingId) -> ListingResult<Option<Listing>> {
        Ok(self
            .fetch_with_revision(id)
            .await?
            .map(|(listing, _)| listing))
    }

    async fn update(
        &self,
        id: &ListingId,
        patch: &ListingPatch,
    ) -> ListingResult<Option<Listing>> {
        for attempt in 1..=MAX_UPDATE_ATTEMPTS {
            let Some((mut listing, revision)) = self.fetch_with_revision(id).await? else {
                return Ok(None);
            };

            listing.details.apply(patch);
            let details = &listing.details;

            let result = sqlx::query(
                r#"
                UPDATE listings
                SET price = ?1, beds = ?2, baths = ?3, sqft = ?4, address = ?5,
                    features = ?6, year_built = ?7, property_type = ?8,
                    listing_status = ?9, revision = revision + 1
                WHERE id = ?10 AND revision = ?11
                "#,
            )
            .bind(&details.price)
            .bind(i64::from(details.beds))
            .bind(i64::from(details.baths))
            .bind(i64::from(details.sqft))
            .bind(&details.address)
            .bind(encode_features(&details.features)?)
            .bind(details.year_built)
            .bind(details.property_type.as_str())
            .bind(details.listing_status.as_str())
            .bind(id.as_str())
            .bind(revision)
            .execute(&self.pool)
            .await
            .map_err(db_error("updating listing"))?;

            if result.rows_affected() == 1 {
                return Ok(Some(listing));
            }

            debug!(id = %id, attempt, "Listing changed concurrently, retrying update");
        }

        Err(ListingError::Persistence {
            message: format!(
                "Gave up updating listing {} after {} conflicting attempts",
                id, MAX_UPDATE_ATTEMPTS
            ),
            cause: None,
        })
    }

    async fn delete(&self, id: &ListingId) -> ListingResult<bool> {
        let result = sqlx::query("DELETE FROM listings WHERE id = ?1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_error("deleting listing"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> ListingResult<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM listings")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("counting listings"))?;

        Ok(usize::try_from(count).unwrap_or_default())
    }
}

fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> ListingError {
    move |e: sqlx::Error| ListingError::persistence(format!("Database error {}: {}", context, e), &e)
}

fn corrupt_row(column: &str, reason: impl std::fmt::Display) -> ListingError {
    ListingError::persistence(format!("Corrupt value in column '{}'", column), reason)
}

fn column<'r, T>(row: &'r SqliteRow, name: &str) -> ListingResult<T>
where
    T: sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>,
{
    row.try_get(name).map_err(|e| corrupt_row(name, e))
}

fn count_column(row: &SqliteRow, name: &str) -> ListingResult<u32> {
    let value: i64 = column(row, name)?;
    u32::try_from(value).map_err(|e| corrupt_row(name, e))
}

fn encode_features(features: &[String]) -> ListingResult<String> {
    serde_json::to_string(features)
        .map_err(|e| ListingError::persistence("Failed to serialize features", e))
}

fn listing_from_row(row: &SqliteRow) -> ListingResult<Listing> {
    let id: String = column(row, "id")?;
    let image_ref: String = column(row, "image_ref")?;
    let features: String = column(row, "features")?;
    let property_type: String = column(row, "property_type")?;
    let listing_status: String = column(row, "listing_status")?;

    Ok(Listing {
        id: ListingId::parse_uuid(&id).ok_or_else(|| corrupt_row("id", &id))?,
        image_ref: ImageRef::new(image_ref),
        details: ListingDetails {
            price: column(row, "price")?,
            beds: count_column(row, "beds")?,
            baths: count_column(row, "baths")?,
            sqft: count_column(row, "sqft")?,
            address: column(row, "address")?,
            features: serde_json::from_str(&features)
                .map_err(|e| corrupt_row("features", e))?,
            year_built: column(row, "year_built")?,
            property_type: PropertyType::parse(&property_type)
                .ok_or_else(|| corrupt_row("property_type", &property_type))?,
            listing_status: ListingStatus::parse(&listing_status)
                .ok_or_else(|| corrupt_row("listing_status", &listing_status))?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_listing(address: &str) -> NewListing {
        NewListing {
            image_ref: ImageRef::new("images/house2.jpg"),
            details: ListingDetails {
                price: "$330,000".to_string(),
                beds: 2,
                baths: 2,
                sqft: 1750,
                address: address.to_string(),
                features: vec![
                    "New Roof".to_string(),
                    "Updated Kitchen".to_string(),
                    "New Roof".to_string(),
                ],
                year_built: 2012,
                property_type: PropertyType::Townhouse,
                listing_status: ListingStatus::ForSale,
            },
        }
    }

    #[tokio::test]
    async fn test_create_and_read_back() {
        let repo = SqlListingRepository::in_memory().await.unwrap();

        let created = repo.create(new_listing("9876 Spruce Ln")).await.unwrap();
        assert!(repo.parse_id(created.id.as_str()).is_some());

        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_all_in_insertion_order() {
        let repo = SqlListingRepository::in_memory().await.unwrap();
        for address in ["Z Rd", "M Rd", "A Rd"] {
            repo.create(new_listing(address)).await.unwrap();
        }

        let addresses: Vec<String> = repo
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.details.address)
            .collect();
        assert_eq!(addresses, vec!["Z Rd", "M Rd", "A Rd"]);
    }

    #[tokio::test]
    async fn test_update_bumps_revision_and_merges() {
        let repo = SqlListingRepository::in_memory().await.unwrap();
        let created = repo.create(new_listing("1 Elm St")).await.unwrap();

        let patch = ListingPatch {
            price: Some("$350,000".to_string()),
            address: Some("1 Elm St".to_string()),
            year_built: Some(1650),
            ..Default::default()
        };
        let updated = repo.update(&created.id, &patch).await.unwrap().unwrap();

        assert_eq!(updated.details.price, "$350,000");
        assert_eq!(updated.details.year_built, 1650);
        assert_eq!(updated.details.features, created.details.features);
        assert_eq!(updated.image_ref, created.image_ref);

        let (stored, revision) = repo
            .fetch_with_revision(&created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, updated);
        assert_eq!(revision, 1);
    }

    #[tokio::test]
    async fn test_delete_is_hard_and_reports_missing() {
        let repo = SqlListingRepository::in_memory().await.unwrap();
        let created = repo.create(new_listing("1 Elm St")).await.unwrap();

        assert!(repo.delete(&created.id).await.unwrap());
        assert!(!repo.delete(&created.id).await.unwrap());
        assert_eq!(repo.get_by_id(&created.id).await.unwrap(), None);
        assert_eq!(
            repo.update(&created.id, &ListingPatch::default())
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_listings_survive_reconnect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listings.db");

        let repo = SqlListingRepository::connect_file(&path).await.unwrap();
        let created = repo.create(new_listing("6789 Cedar Blvd")).await.unwrap();
        repo.close().await;

        let reopened = SqlListingRepository::connect_file(&path).await.unwrap();
        let fetched = reopened.get_by_id(&created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_parse_id_requires_uuid() {
        let repo = SqlListingRepository::in_memory().await.unwrap();

        assert!(repo.parse_id("1").is_none());
        assert!(repo.parse_id("not-a-uuid").is_none());
        assert!(repo
            .parse_id("67e55044-10b1-426f-9247-bb680e5fe0c8")
            .is_some());
    }
}
