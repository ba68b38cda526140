//! Meal aggregate reassembly.
//!
//! A meal is read with one query: the meal row LEFT JOINed to its selections
//! and to its reviews. With `s` selections and `r` reviews that yields
//! `max(1, s) * max(1, r)` rows per meal. Rehydration folds them back into
//! one `MealRecord` per meal, each child exactly once, in first-seen order.

use std::collections::{HashMap, HashSet};

use plate_core::entities::{MealRecord, MealReview, MealSelection};

use crate::error::DatabaseError;
use crate::helpers::{datetime_to_millis, get_opt_string, parse_json_column};

/// Builds the join query with the given WHERE clause. Rows come back grouped
/// by meal, newest first, children in stored position order.
macro_rules! meal_join_sql {
    ($where:literal) => {
        concat!(
            "SELECT m.id, m.menu_id, m.date, m.completed_at,
                    s.id, s.kid_id, s.kid_name, s.selections,
                    r.id, r.kid_id, r.kid_name, r.completions, r.earned_star
             FROM meal_records m
             LEFT JOIN meal_selections s ON s.meal_id = m.id
             LEFT JOIN meal_reviews r ON r.meal_id = m.id
             WHERE ",
            $where,
            " ORDER BY m.completed_at DESC, m.id, s.position, r.position"
        )
    };
}

/// The `limit` most recent meals of household `?1`, `?2` being the limit.
pub(crate) const HOUSEHOLD_MEALS_SQL: &str = meal_join_sql!(
    "m.id IN (SELECT id FROM meal_records WHERE household_id = ?1
              ORDER BY completed_at DESC, id LIMIT ?2)"
);

/// A single meal by ID.
pub(crate) const MEAL_BY_ID_SQL: &str = meal_join_sql!("m.id = ?1");

/// Selection columns of one join row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionColumns {
    pub id: String,
    pub kid_id: Option<String>,
    pub kid_name: String,
    /// JSON text.
    pub selections: String,
}

/// Review columns of one join row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewColumns {
    pub id: String,
    pub kid_id: Option<String>,
    pub kid_name: String,
    /// JSON text.
    pub completions: String,
    pub earned_star: bool,
}

/// One flat row of the meal join. Child columns are `None` when the LEFT
/// JOIN found nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealJoinRow {
    pub meal_id: String,
    pub menu_id: Option<String>,
    pub date: String,
    pub completed_at: String,
    pub selection: Option<SelectionColumns>,
    pub review: Option<ReviewColumns>,
}

fn row_to_join_row(row: &libsql::Row) -> Result<MealJoinRow, DatabaseError> {
    let selection = match get_opt_string(row, 4)? {
        Some(id) => Some(SelectionColumns {
            id,
            kid_id: get_opt_string(row, 5)?,
            kid_name: row.get::<String>(6)?,
            selections: row.get::<String>(7)?,
        }),
        None => None,
    };
    let review = match get_opt_string(row, 8)? {
        Some(id) => Some(ReviewColumns {
            id,
            kid_id: get_opt_string(row, 9)?,
            kid_name: row.get::<String>(10)?,
            completions: row.get::<String>(11)?,
            earned_star: row.get::<i64>(12)? != 0,
        }),
        None => None,
    };

    Ok(MealJoinRow {
        meal_id: row.get::<String>(0)?,
        menu_id: get_opt_string(row, 1)?,
        date: row.get::<String>(2)?,
        completed_at: row.get::<String>(3)?,
        selection,
        review,
    })
}

/// Run a meal join query and collect its flat rows.
pub(crate) async fn fetch_join_rows(
    conn: &libsql::Connection,
    sql: &str,
    params: impl libsql::params::IntoParams,
) -> Result<Vec<MealJoinRow>, DatabaseError> {
    let mut rows = conn.query(sql, params).await?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().await? {
        out.push(row_to_join_row(&row)?);
    }
    Ok(out)
}

/// Fold flat join rows into meal aggregates.
///
/// Meals keep the order in which their first row appears. A child ID seen
/// twice (the cross product repeats it) is emitted once. A meal whose rows
/// carry no child columns comes back with empty lists.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a timestamp or JSON column is malformed.
pub fn rehydrate_meals(rows: &[MealJoinRow]) -> Result<Vec<MealRecord>, DatabaseError> {
    let mut meals: Vec<MealRecord> = Vec::new();
    let mut by_id: HashMap<&str, usize> = HashMap::new();
    let mut seen_selections: HashSet<&str> = HashSet::new();
    let mut seen_reviews: HashSet<&str> = HashSet::new();

    for row in rows {
        let idx = if let Some(&idx) = by_id.get(row.meal_id.as_str()) {
            idx
        } else {
            meals.push(MealRecord {
                id: row.meal_id.clone(),
                menu_id: row.menu_id.clone(),
                date: row.date.clone(),
                completed_at: datetime_to_millis(&row.completed_at)?,
                selections: Vec::new(),
                reviews: Vec::new(),
            });
            by_id.insert(row.meal_id.as_str(), meals.len() - 1);
            meals.len() - 1
        };
        let meal = &mut meals[idx];

        if let Some(sel) = &row.selection {
            if seen_selections.insert(sel.id.as_str()) {
                meal.selections.push(MealSelection {
                    kid_id: sel.kid_id.clone(),
                    kid_name: sel.kid_name.clone(),
                    selections: parse_json_column(&sel.selections)?,
                });
            }
        }

        if let Some(rev) = &row.review {
            if seen_reviews.insert(rev.id.as_str()) {
                meal.reviews.push(MealReview {
                    kid_id: rev.kid_id.clone(),
                    kid_name: rev.kid_name.clone(),
                    completions: parse_json_column(&rev.completions)?,
                    earned_star: rev.earned_star,
                });
            }
        }
    }

    Ok(meals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plate_core::enums::Completion;
    use pretty_assertions::assert_eq;

    fn sel(id: &str, kid: &str) -> SelectionColumns {
        SelectionColumns {
            id: id.into(),
            kid_id: Some(format!("kid-{kid}")),
            kid_name: kid.into(),
            selections: r#"{"main-group":["fd-1"]}"#.into(),
        }
    }

    fn rev(id: &str, kid: &str) -> ReviewColumns {
        ReviewColumns {
            id: id.into(),
            kid_id: Some(format!("kid-{kid}")),
            kid_name: kid.into(),
            completions: r#"{"fd-1":"all","fd-2":null}"#.into(),
            earned_star: true,
        }
    }

    fn row(
        meal: &str,
        selection: Option<SelectionColumns>,
        review: Option<ReviewColumns>,
    ) -> MealJoinRow {
        MealJoinRow {
            meal_id: meal.into(),
            menu_id: Some("mnu-1".into()),
            date: "2024-01-02".into(),
            completed_at: "2024-01-02T03:04:05.000Z".into(),
            selection,
            review,
        }
    }

    #[test]
    fn two_selections_one_review() {
        let rows = vec![
            row("mea-1", Some(sel("s1", "Ada")), Some(rev("r1", "Ada"))),
            row("mea-1", Some(sel("s2", "Bo")), Some(rev("r1", "Ada"))),
        ];
        let meals = rehydrate_meals(&rows).unwrap();

        assert_eq!(meals.len(), 1);
        let meal = &meals[0];
        assert_eq!(meal.completed_at, 1_704_164_645_000);
        assert_eq!(meal.selections.len(), 2);
        assert_eq!(meal.reviews.len(), 1);
        assert_eq!(meal.reviews[0].completions["fd-1"], Some(Completion::All));
        assert_eq!(meal.reviews[0].completions["fd-2"], None);
    }

    #[test]
    fn cross_product_is_deduplicated_in_first_seen_order() {
        let rows = vec![
            row("mea-1", Some(sel("s1", "Ada")), Some(rev("r1", "Ada"))),
            row("mea-1", Some(sel("s1", "Ada")), Some(rev("r2", "Bo"))),
            row("mea-1", Some(sel("s2", "Bo")), Some(rev("r1", "Ada"))),
            row("mea-1", Some(sel("s2", "Bo")), Some(rev("r2", "Bo"))),
        ];
        let meals = rehydrate_meals(&rows).unwrap();

        let names: Vec<_> = meals[0].selections.iter().map(|s| s.kid_name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Bo"]);
        let names: Vec<_> = meals[0].reviews.iter().map(|r| r.kid_name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Bo"]);
    }

    #[test]
    fn meal_without_children_has_empty_lists() {
        let meals = rehydrate_meals(&[row("mea-1", None, None)]).unwrap();
        assert_eq!(meals.len(), 1);
        assert!(meals[0].selections.is_empty());
        assert!(meals[0].reviews.is_empty());
    }

    #[test]
    fn selections_without_reviews() {
        let rows = vec![
            row("mea-1", Some(sel("s1", "Ada")), None),
            row("mea-1", Some(sel("s2", "Bo")), None),
        ];
        let meals = rehydrate_meals(&rows).unwrap();
        assert_eq!(meals[0].selections.len(), 2);
        assert!(meals[0].reviews.is_empty());
    }

    #[test]
    fn meals_keep_row_order() {
        let rows = vec![
            row("mea-2", None, None),
            row("mea-1", Some(sel("s1", "Ada")), None),
            row("mea-3", None, Some(rev("r9", "Cy"))),
        ];
        let ids: Vec<_> = rehydrate_meals(&rows)
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["mea-2", "mea-1", "mea-3"]);
    }

    #[test]
    fn empty_input() {
        assert!(rehydrate_meals(&[]).unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let mut bad = sel("s1", "Ada");
        bad.selections = "{oops".into();
        assert!(rehydrate_meals(&[row("mea-1", Some(bad), None)]).is_err());
    }
}
