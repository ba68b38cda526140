//! Shared test utilities for plate-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use crate::PlateDb;

    /// Create an in-memory database with the schema applied.
    pub async fn test_db() -> PlateDb {
        PlateDb::open_local(":memory:").await.unwrap()
    }

    /// Insert a household and return its ID.
    pub async fn insert_household(db: &PlateDb, name: &str) -> String {
        db.create_household(name).await.unwrap().id
    }

    /// Insert a kid profile and return its ID.
    pub async fn insert_kid(db: &PlateDb, household_id: &str, name: &str) -> String {
        crate::repos::profile::insert_kid_profile(
            db.conn(),
            household_id,
            None,
            &plate_core::entities::KidProfile {
                id: String::new(),
                name: name.to_string(),
                avatar_color: "#94a3b8".to_string(),
                avatar_animal: None,
            },
        )
        .await
        .unwrap()
    }
}
