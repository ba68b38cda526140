//! Household repository. A plateful store holds one household in practice;
//! the oldest row is the default.

use plate_core::entities::Household;
use plate_core::ids::PREFIX_HOUSEHOLD;

use crate::error::DatabaseError;
use crate::helpers::get_opt_string;
use crate::{PlateDb, generate_id};

fn row_to_household(row: &libsql::Row) -> Result<Household, DatabaseError> {
    Ok(Household {
        id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        active_menu_id: get_opt_string(row, 2)?,
    })
}

pub(crate) async fn insert_household(
    conn: &libsql::Connection,
    name: &str,
) -> Result<String, DatabaseError> {
    let id = generate_id(conn, PREFIX_HOUSEHOLD).await?;
    conn.execute(
        "INSERT INTO households (id, name) VALUES (?1, ?2)",
        libsql::params![id.as_str(), name],
    )
    .await?;
    Ok(id)
}

pub(crate) async fn update_active_menu(
    conn: &libsql::Connection,
    household_id: &str,
    menu_id: Option<&str>,
) -> Result<u64, DatabaseError> {
    Ok(conn
        .execute(
            "UPDATE households SET active_menu_id = ?1 WHERE id = ?2",
            libsql::params![menu_id, household_id],
        )
        .await?)
}

impl PlateDb {
    /// The household every live operation belongs to.
    ///
    /// # Errors
    ///
    /// `DatabaseError::InvalidState` if no household exists yet.
    pub async fn default_household(&self) -> Result<Household, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id, name, active_menu_id FROM households
                 ORDER BY created_at, rowid LIMIT 1",
                (),
            )
            .await?;
        match rows.next().await? {
            Some(row) => row_to_household(&row),
            None => Err(DatabaseError::InvalidState(
                "no household found; run `plate migrate` first".to_string(),
            )),
        }
    }

    pub async fn create_household(&self, name: &str) -> Result<Household, DatabaseError> {
        let id = insert_household(self.conn(), name).await?;
        Ok(Household {
            id,
            name: name.to_string(),
            active_menu_id: None,
        })
    }

    /// Point the household at `menu_id`, or clear the pointer.
    ///
    /// # Errors
    ///
    /// `DatabaseError::NoResult` if the household does not exist.
    pub async fn set_active_menu(
        &self,
        household_id: &str,
        menu_id: Option<&str>,
    ) -> Result<(), DatabaseError> {
        match update_active_menu(self.conn(), household_id, menu_id).await? {
            0 => Err(DatabaseError::NoResult),
            _ => Ok(()),
        }
    }
}
