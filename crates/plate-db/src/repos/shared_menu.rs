//! Shared menu repository: public menus addressed by token, and the
//! responses people submit against them.

use chrono::Utc;

use plate_core::entities::{SelectionMap, SharedMenu, SharedMenuGroup, SharedMenuResponse};
use plate_core::ids::{PREFIX_SHARED_MENU, PREFIX_SHARED_RESPONSE};

use crate::error::{DatabaseError, TokenError};
use crate::helpers::{
    datetime_to_millis, get_opt_string, millis_to_rfc3339, parse_json_column, to_json_text,
};
use crate::token::{TokenIssuer, insert_outcome};
use crate::{PlateDb, generate_id};

const TOKEN_COLUMN: &str = "shared_menus.token";

/// A shared menu as submitted by a live caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSharedMenu {
    pub title: String,
    pub description: Option<String>,
    pub groups: Vec<SharedMenuGroup>,
}

fn row_to_shared_menu(row: &libsql::Row) -> Result<SharedMenu, DatabaseError> {
    Ok(SharedMenu {
        id: row.get::<String>(0)?,
        token: row.get::<String>(1)?,
        title: row.get::<String>(2)?,
        description: get_opt_string(row, 3)?,
        groups: parse_json_column(&row.get::<String>(4)?)?,
        is_active: row.get::<i64>(5)? != 0,
        created_at: datetime_to_millis(&row.get::<String>(6)?)?,
    })
}

fn row_to_response(row: &libsql::Row) -> Result<SharedMenuResponse, DatabaseError> {
    Ok(SharedMenuResponse {
        id: row.get::<String>(0)?,
        menu_id: row.get::<String>(1)?,
        respondent_name: row.get::<String>(2)?,
        selections: parse_json_column(&row.get::<String>(3)?)?,
        timestamp: datetime_to_millis(&row.get::<String>(4)?)?,
    })
}

/// Insert `menu` under a fresh ID with a unique token. `preferred_token` is
/// tried first. Returns the new ID and the token actually stored.
pub(crate) async fn insert_shared_menu(
    conn: &libsql::Connection,
    household_id: &str,
    legacy_id: Option<&str>,
    menu: &SharedMenu,
    preferred_token: Option<&str>,
) -> Result<(String, String), TokenError> {
    let id = generate_id(conn, PREFIX_SHARED_MENU).await?;
    let groups = to_json_text(&menu.groups)?;
    let created_at = millis_to_rfc3339(menu.created_at);
    let is_active = i64::from(menu.is_active);

    let (id_ref, groups, created_at) = (id.as_str(), groups.as_str(), created_at.as_str());
    let (token, ()) = TokenIssuer::new()
        .prefer(preferred_token)
        .issue(|candidate| async move {
            let result = conn
                .execute(
                    "INSERT INTO shared_menus (id, household_id, legacy_id, token, title, description, menu_groups, is_active, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    libsql::params![
                        id_ref,
                        household_id,
                        legacy_id,
                        candidate,
                        menu.title.as_str(),
                        menu.description.as_deref(),
                        groups,
                        is_active,
                        created_at
                    ],
                )
                .await;
            insert_outcome(result, TOKEN_COLUMN)
        })
        .await?;
    Ok((id, token))
}

pub(crate) async fn insert_shared_menu_response(
    conn: &libsql::Connection,
    menu_id: &str,
    legacy_id: Option<&str>,
    response: &SharedMenuResponse,
) -> Result<String, DatabaseError> {
    let id = generate_id(conn, PREFIX_SHARED_RESPONSE).await?;
    conn.execute(
        "INSERT INTO shared_menu_responses (id, menu_id, legacy_id, respondent_name, selections, submitted_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        libsql::params![
            id.as_str(),
            menu_id,
            legacy_id,
            response.respondent_name.as_str(),
            to_json_text(&response.selections)?,
            millis_to_rfc3339(response.timestamp)
        ],
    )
    .await?;
    Ok(id)
}

impl PlateDb {
    /// Publish a menu under a fresh public token.
    ///
    /// # Errors
    ///
    /// `TokenError::Exhausted` if no unique token was found, or the
    /// underlying insert error.
    pub async fn create_shared_menu(
        &self,
        household_id: &str,
        new: &NewSharedMenu,
    ) -> Result<SharedMenu, TokenError> {
        let mut menu = SharedMenu {
            id: String::new(),
            token: String::new(),
            title: new.title.clone(),
            description: new.description.clone(),
            groups: new.groups.clone(),
            is_active: true,
            created_at: Utc::now().timestamp_millis(),
        };
        let (id, token) = insert_shared_menu(self.conn(), household_id, None, &menu, None).await?;
        menu.id = id;
        menu.token = token;
        Ok(menu)
    }

    pub async fn get_shared_menu_by_token(&self, token: &str) -> Result<SharedMenu, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id, token, title, description, menu_groups, is_active, created_at
                 FROM shared_menus WHERE token = ?1",
                [token],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_shared_menu(&row)
    }

    /// Store a response against the menu published under `token`.
    ///
    /// # Errors
    ///
    /// `DatabaseError::NoResult` for an unknown token,
    /// `DatabaseError::InvalidState` if the menu no longer accepts responses.
    pub async fn record_shared_menu_response(
        &self,
        token: &str,
        respondent_name: &str,
        selections: SelectionMap,
    ) -> Result<SharedMenuResponse, DatabaseError> {
        let menu = self.get_shared_menu_by_token(token).await?;
        if !menu.is_active {
            return Err(DatabaseError::InvalidState(format!(
                "shared menu {} is closed",
                menu.id
            )));
        }

        let mut response = SharedMenuResponse {
            id: String::new(),
            menu_id: menu.id,
            respondent_name: respondent_name.to_string(),
            selections,
            timestamp: Utc::now().timestamp_millis(),
        };
        response.id =
            insert_shared_menu_response(self.conn(), &response.menu_id, None, &response).await?;
        Ok(response)
    }

    pub async fn list_shared_menu_responses(
        &self,
        menu_id: &str,
    ) -> Result<Vec<SharedMenuResponse>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id, menu_id, respondent_name, selections, submitted_at
                 FROM shared_menu_responses WHERE menu_id = ?1 ORDER BY submitted_at, rowid",
                [menu_id],
            )
            .await?;
        let mut responses = Vec::new();
        while let Some(row) = rows.next().await? {
            responses.push(row_to_response(&row)?);
        }
        Ok(responses)
    }

    /// Stop accepting responses for a shared menu.
    pub async fn close_shared_menu(&self, menu_id: &str) -> Result<(), DatabaseError> {
        let changed = self
            .conn()
            .execute(
                "UPDATE shared_menus SET is_active = 0 WHERE id = ?1",
                [menu_id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{insert_household, test_db};
    use plate_core::entities::SharedMenuOption;
    use plate_core::enums::SelectionPreset;
    use pretty_assertions::assert_eq;

    fn new_menu(title: &str) -> NewSharedMenu {
        NewSharedMenu {
            title: title.into(),
            description: Some("Saturday".into()),
            groups: vec![SharedMenuGroup {
                id: "g1".into(),
                label: "Drinks".into(),
                options: vec![SharedMenuOption {
                    id: "o1".into(),
                    text: "Juice".into(),
                    image_url: None,
                    order: 0,
                }],
                selection_preset: SelectionPreset::Pick1,
                order: 0,
            }],
        }
    }

    #[tokio::test]
    async fn tokens_are_unique_per_menu() {
        let db = test_db().await;
        let hh = insert_household(&db, "Home").await;
        let a = db.create_shared_menu(&hh, &new_menu("A")).await.unwrap();
        let b = db.create_shared_menu(&hh, &new_menu("B")).await.unwrap();
        assert_ne!(a.token, b.token);
        assert_eq!(a.token.len(), 12);

        let loaded = db.get_shared_menu_by_token(&a.token).await.unwrap();
        assert_eq!(loaded, a);
    }

    #[tokio::test]
    async fn responses_recorded_by_token() {
        let db = test_db().await;
        let hh = insert_household(&db, "Home").await;
        let menu = db.create_shared_menu(&hh, &new_menu("Party")).await.unwrap();

        let mut picks = SelectionMap::new();
        picks.insert("g1".into(), vec!["o1".into()]);
        let rsp = db
            .record_shared_menu_response(&menu.token, "Gran", picks)
            .await
            .unwrap();
        assert!(rsp.id.starts_with("rsp-"));

        let listed = db.list_shared_menu_responses(&menu.id).await.unwrap();
        assert_eq!(listed, vec![rsp]);
    }

    #[tokio::test]
    async fn closed_menu_rejects_responses() {
        let db = test_db().await;
        let hh = insert_household(&db, "Home").await;
        let menu = db.create_shared_menu(&hh, &new_menu("Party")).await.unwrap();
        db.close_shared_menu(&menu.id).await.unwrap();

        let err = db
            .record_shared_menu_response(&menu.token, "Gran", SelectionMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidState(_)));
    }

    #[tokio::test]
    async fn unknown_token() {
        let db = test_db().await;
        assert!(matches!(
            db.get_shared_menu_by_token("nope").await,
            Err(DatabaseError::NoResult)
        ));
    }
}
