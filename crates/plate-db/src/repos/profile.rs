//! Kid profile repository.

use plate_core::entities::KidProfile;
use plate_core::ids::PREFIX_KID;

use crate::error::DatabaseError;
use crate::helpers::get_opt_string;
use crate::{PlateDb, generate_id};

fn row_to_profile(row: &libsql::Row) -> Result<KidProfile, DatabaseError> {
    Ok(KidProfile {
        id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        avatar_color: row.get::<String>(2)?,
        avatar_animal: get_opt_string(row, 3)?,
    })
}

pub(crate) async fn insert_kid_profile(
    conn: &libsql::Connection,
    household_id: &str,
    legacy_id: Option<&str>,
    profile: &KidProfile,
) -> Result<String, DatabaseError> {
    let id = generate_id(conn, PREFIX_KID).await?;
    conn.execute(
        "INSERT INTO kid_profiles (id, household_id, legacy_id, name, avatar_color, avatar_animal)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        libsql::params![
            id.as_str(),
            household_id,
            legacy_id,
            profile.name.as_str(),
            profile.avatar_color.as_str(),
            profile.avatar_animal.as_deref()
        ],
    )
    .await?;
    Ok(id)
}

/// Current name of a kid in `household_id`, if the kid exists.
pub(crate) async fn lookup_kid_name(
    conn: &libsql::Connection,
    household_id: &str,
    kid_id: &str,
) -> Result<Option<String>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT name FROM kid_profiles WHERE id = ?1 AND household_id = ?2",
            [kid_id, household_id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row.get::<String>(0)?)),
        None => Ok(None),
    }
}

impl PlateDb {
    pub async fn create_kid_profile(
        &self,
        household_id: &str,
        profile: &KidProfile,
    ) -> Result<KidProfile, DatabaseError> {
        let id = insert_kid_profile(self.conn(), household_id, None, profile).await?;
        Ok(KidProfile {
            id,
            ..profile.clone()
        })
    }

    pub async fn get_kid_profile(&self, id: &str) -> Result<KidProfile, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id, name, avatar_color, avatar_animal FROM kid_profiles WHERE id = ?1",
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_profile(&row)
    }

    pub async fn list_kid_profiles(
        &self,
        household_id: &str,
    ) -> Result<Vec<KidProfile>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id, name, avatar_color, avatar_animal FROM kid_profiles
                 WHERE household_id = ?1 ORDER BY created_at, rowid",
                [household_id],
            )
            .await?;
        let mut profiles = Vec::new();
        while let Some(row) = rows.next().await? {
            profiles.push(row_to_profile(&row)?);
        }
        Ok(profiles)
    }

    /// Rename a kid. Meal history keeps the name it was logged with.
    ///
    /// # Errors
    ///
    /// `DatabaseError::NoResult` if the profile does not exist.
    pub async fn rename_kid_profile(&self, id: &str, name: &str) -> Result<(), DatabaseError> {
        let changed = self
            .conn()
            .execute(
                "UPDATE kid_profiles SET name = ?1 WHERE id = ?2",
                [name, id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }
}
