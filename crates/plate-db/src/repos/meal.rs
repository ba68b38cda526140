//! Meal record repository.
//!
//! A meal is a parent row plus ordered selection and review children. Every
//! child carries a `kid_name` snapshot taken when the meal was written; later
//! profile renames never touch it.

use plate_core::entities::{MealRecord, MealReview, MealSelection};
use plate_core::ids::{PREFIX_MEAL, PREFIX_MEAL_REVIEW, PREFIX_MEAL_SELECTION};

use crate::error::DatabaseError;
use crate::helpers::{millis_to_rfc3339, to_json_text};
use crate::rehydrate::{HOUSEHOLD_MEALS_SQL, MEAL_BY_ID_SQL, fetch_join_rows, rehydrate_meals};
use crate::repos::profile::lookup_kid_name;
use crate::{PlateDb, generate_id};

/// A meal as submitted by a live caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewMealRecord {
    pub menu_id: Option<String>,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// Epoch milliseconds.
    pub completed_at: i64,
    pub selections: Vec<MealSelection>,
    pub reviews: Vec<MealReview>,
}

pub(crate) async fn insert_meal_record(
    conn: &libsql::Connection,
    household_id: &str,
    legacy_id: Option<&str>,
    menu_id: Option<&str>,
    date: &str,
    completed_at: i64,
) -> Result<String, DatabaseError> {
    let id = generate_id(conn, PREFIX_MEAL).await?;
    conn.execute(
        "INSERT INTO meal_records (id, household_id, legacy_id, menu_id, date, completed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        libsql::params![
            id.as_str(),
            household_id,
            legacy_id,
            menu_id,
            date,
            millis_to_rfc3339(completed_at)
        ],
    )
    .await?;
    Ok(id)
}

pub(crate) async fn insert_meal_selection(
    conn: &libsql::Connection,
    meal_id: &str,
    legacy_id: Option<&str>,
    position: i64,
    selection: &MealSelection,
) -> Result<String, DatabaseError> {
    let id = generate_id(conn, PREFIX_MEAL_SELECTION).await?;
    conn.execute(
        "INSERT INTO meal_selections (id, meal_id, legacy_id, position, kid_id, kid_name, selections)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        libsql::params![
            id.as_str(),
            meal_id,
            legacy_id,
            position,
            selection.kid_id.as_deref(),
            selection.kid_name.as_str(),
            to_json_text(&selection.selections)?
        ],
    )
    .await?;
    Ok(id)
}

pub(crate) async fn insert_meal_review(
    conn: &libsql::Connection,
    meal_id: &str,
    legacy_id: Option<&str>,
    position: i64,
    review: &MealReview,
) -> Result<String, DatabaseError> {
    let id = generate_id(conn, PREFIX_MEAL_REVIEW).await?;
    conn.execute(
        "INSERT INTO meal_reviews (id, meal_id, legacy_id, position, kid_id, kid_name, completions, earned_star)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        libsql::params![
            id.as_str(),
            meal_id,
            legacy_id,
            position,
            review.kid_id.as_deref(),
            review.kid_name.as_str(),
            to_json_text(&review.completions)?,
            i64::from(review.earned_star)
        ],
    )
    .await?;
    Ok(id)
}

/// The name to snapshot for a child row: the kid's current profile name,
/// or the submitted one when the kid is unknown.
async fn snapshot_name(
    conn: &libsql::Connection,
    household_id: &str,
    kid_id: Option<&str>,
    submitted: &str,
) -> Result<String, DatabaseError> {
    let current = match kid_id {
        Some(kid_id) => lookup_kid_name(conn, household_id, kid_id).await?,
        None => None,
    };
    Ok(current.unwrap_or_else(|| submitted.to_string()))
}

fn position(idx: usize) -> i64 {
    i64::try_from(idx).unwrap_or(i64::MAX)
}

async fn write_meal(
    conn: &libsql::Connection,
    household_id: &str,
    meal: &NewMealRecord,
) -> Result<MealRecord, DatabaseError> {
    let id = insert_meal_record(
        conn,
        household_id,
        None,
        meal.menu_id.as_deref(),
        &meal.date,
        meal.completed_at,
    )
    .await?;

    let mut selections = Vec::with_capacity(meal.selections.len());
    for (idx, sel) in meal.selections.iter().enumerate() {
        let sel = MealSelection {
            kid_name: snapshot_name(conn, household_id, sel.kid_id.as_deref(), &sel.kid_name)
                .await?,
            ..sel.clone()
        };
        insert_meal_selection(conn, &id, None, position(idx), &sel).await?;
        selections.push(sel);
    }

    let mut reviews = Vec::with_capacity(meal.reviews.len());
    for (idx, rev) in meal.reviews.iter().enumerate() {
        let rev = MealReview {
            kid_name: snapshot_name(conn, household_id, rev.kid_id.as_deref(), &rev.kid_name)
                .await?,
            ..rev.clone()
        };
        insert_meal_review(conn, &id, None, position(idx), &rev).await?;
        reviews.push(rev);
    }

    Ok(MealRecord {
        id,
        menu_id: meal.menu_id.clone(),
        date: meal.date.clone(),
        completed_at: meal.completed_at,
        selections,
        reviews,
    })
}

impl PlateDb {
    /// Log a meal with all its children in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any insert fails; nothing is written then.
    pub async fn create_meal_record(
        &self,
        household_id: &str,
        meal: &NewMealRecord,
    ) -> Result<MealRecord, DatabaseError> {
        let tx = self.conn().transaction().await?;
        match write_meal(&tx, household_id, meal).await {
            Ok(record) => {
                tx.commit().await?;
                tracing::debug!(
                    "meal {}: {} selections, {} reviews",
                    record.id,
                    record.selections.len(),
                    record.reviews.len()
                );
                Ok(record)
            }
            Err(e) => {
                if let Err(rb) = tx.rollback().await {
                    tracing::warn!("create_meal_record: rollback failed: {}", rb);
                }
                Err(e)
            }
        }
    }

    pub async fn get_meal(&self, id: &str) -> Result<MealRecord, DatabaseError> {
        let rows = fetch_join_rows(self.conn(), MEAL_BY_ID_SQL, [id]).await?;
        rehydrate_meals(&rows)?
            .into_iter()
            .next()
            .ok_or(DatabaseError::NoResult)
    }

    /// The `limit` most recently completed meals, newest first.
    pub async fn list_meals(
        &self,
        household_id: &str,
        limit: u32,
    ) -> Result<Vec<MealRecord>, DatabaseError> {
        let rows = fetch_join_rows(
            self.conn(),
            HOUSEHOLD_MEALS_SQL,
            libsql::params![household_id, i64::from(limit)],
        )
        .await?;
        rehydrate_meals(&rows)
    }
}
