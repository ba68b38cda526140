//! Menu repository. Groups are stored as one JSON column.

use plate_core::entities::Menu;
use plate_core::ids::PREFIX_MENU;

use crate::error::DatabaseError;
use crate::helpers::{datetime_to_millis, millis_to_rfc3339, parse_json_column, to_json_text};
use crate::{PlateDb, generate_id};

fn row_to_menu(row: &libsql::Row) -> Result<Menu, DatabaseError> {
    Ok(Menu {
        id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        groups: parse_json_column(&row.get::<String>(2)?)?,
        preset_slot: row.get::<Option<i64>>(3)?,
        created_at: datetime_to_millis(&row.get::<String>(4)?)?,
        updated_at: datetime_to_millis(&row.get::<String>(5)?)?,
    })
}

/// Insert `menu` under a fresh ID. Food IDs in its groups are written as given.
pub(crate) async fn insert_menu(
    conn: &libsql::Connection,
    household_id: &str,
    legacy_id: Option<&str>,
    menu: &Menu,
) -> Result<String, DatabaseError> {
    let id = generate_id(conn, PREFIX_MENU).await?;
    conn.execute(
        "INSERT INTO menus (id, household_id, legacy_id, name, menu_groups, preset_slot, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        libsql::params![
            id.as_str(),
            household_id,
            legacy_id,
            menu.name.as_str(),
            to_json_text(&menu.groups)?,
            menu.preset_slot,
            millis_to_rfc3339(menu.created_at),
            millis_to_rfc3339(menu.updated_at)
        ],
    )
    .await?;
    Ok(id)
}

impl PlateDb {
    pub async fn create_menu(&self, household_id: &str, menu: &Menu) -> Result<Menu, DatabaseError> {
        let id = insert_menu(self.conn(), household_id, None, menu).await?;
        Ok(Menu {
            id,
            ..menu.clone()
        })
    }

    pub async fn get_menu(&self, id: &str) -> Result<Menu, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id, name, menu_groups, preset_slot, created_at, updated_at
                 FROM menus WHERE id = ?1",
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_menu(&row)
    }

    pub async fn list_menus(&self, household_id: &str) -> Result<Vec<Menu>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id, name, menu_groups, preset_slot, created_at, updated_at
                 FROM menus WHERE household_id = ?1 ORDER BY created_at, id",
                [household_id],
            )
            .await?;
        let mut menus = Vec::new();
        while let Some(row) = rows.next().await? {
            menus.push(row_to_menu(&row)?);
        }
        Ok(menus)
    }
}
