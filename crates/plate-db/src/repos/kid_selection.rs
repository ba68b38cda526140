//! Kid selection repository: the in-progress picks for the active menu,
//! at most one row per (household, kid).

use chrono::Utc;
use serde_json::Value;

use plate_core::entities::{KidSelection, SelectionMap};
use plate_core::ids::PREFIX_KID_SELECTION;
use plate_core::normalize::normalize_selection_map;

use crate::error::DatabaseError;
use crate::helpers::{parse_json_column, to_json_text};
use crate::{PlateDb, generate_id};

pub(crate) async fn insert_kid_selection(
    conn: &libsql::Connection,
    household_id: &str,
    kid_id: &str,
    legacy_id: Option<&str>,
    selections: &SelectionMap,
) -> Result<String, DatabaseError> {
    let id = generate_id(conn, PREFIX_KID_SELECTION).await?;
    conn.execute(
        "INSERT INTO kid_selections (id, household_id, kid_id, legacy_id, selections, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        libsql::params![
            id.as_str(),
            household_id,
            kid_id,
            legacy_id,
            to_json_text(selections)?,
            Utc::now().to_rfc3339()
        ],
    )
    .await?;
    Ok(id)
}

impl PlateDb {
    /// Replace a kid's selections, creating the row on first use.
    ///
    /// `raw` may be a canonical `{selections}` payload or a legacy
    /// `{mainId, sideIds}` one from an old browser cache.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the kid does not exist in the household's
    /// store or the write fails.
    pub async fn upsert_kid_selection(
        &self,
        household_id: &str,
        kid_id: &str,
        raw: &Value,
    ) -> Result<KidSelection, DatabaseError> {
        let selections = normalize_selection_map(raw);
        let id = self.generate_id(PREFIX_KID_SELECTION).await?;
        self.conn()
            .execute(
                "INSERT INTO kid_selections (id, household_id, kid_id, selections, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (household_id, kid_id)
                 DO UPDATE SET selections = excluded.selections, updated_at = excluded.updated_at",
                libsql::params![
                    id.as_str(),
                    household_id,
                    kid_id,
                    to_json_text(&selections)?,
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;
        Ok(KidSelection {
            kid_id: kid_id.to_string(),
            selections,
        })
    }

    pub async fn get_kid_selection(
        &self,
        household_id: &str,
        kid_id: &str,
    ) -> Result<Option<KidSelection>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT kid_id, selections FROM kid_selections
                 WHERE household_id = ?1 AND kid_id = ?2",
                [household_id, kid_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(KidSelection {
                kid_id: row.get::<String>(0)?,
                selections: parse_json_column(&row.get::<String>(1)?)?,
            })),
            None => Ok(None),
        }
    }

    /// Clear every kid's picks, e.g. after a meal is logged.
    pub async fn clear_kid_selections(&self, household_id: &str) -> Result<u64, DatabaseError> {
        Ok(self
            .conn()
            .execute(
                "DELETE FROM kid_selections WHERE household_id = ?1",
                [household_id],
            )
            .await?)
    }
}
