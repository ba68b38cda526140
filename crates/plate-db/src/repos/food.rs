//! Food item repository.

use plate_core::entities::FoodItem;
use plate_core::ids::PREFIX_FOOD;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_json_column, to_json_text};
use crate::{PlateDb, generate_id};

fn row_to_food(row: &libsql::Row) -> Result<FoodItem, DatabaseError> {
    Ok(FoodItem {
        id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        image_url: get_opt_string(row, 2)?,
        tags: parse_json_column(&row.get::<String>(3)?)?,
    })
}

/// Insert `food` under a fresh ID and return that ID. `food.id` is ignored.
pub(crate) async fn insert_food(
    conn: &libsql::Connection,
    household_id: &str,
    legacy_id: Option<&str>,
    food: &FoodItem,
) -> Result<String, DatabaseError> {
    let id = generate_id(conn, PREFIX_FOOD).await?;
    conn.execute(
        "INSERT INTO food_items (id, household_id, legacy_id, name, image_url, tags)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        libsql::params![
            id.as_str(),
            household_id,
            legacy_id,
            food.name.as_str(),
            food.image_url.as_deref(),
            to_json_text(&food.tags)?
        ],
    )
    .await?;
    Ok(id)
}

impl PlateDb {
    pub async fn create_food(
        &self,
        household_id: &str,
        food: &FoodItem,
    ) -> Result<FoodItem, DatabaseError> {
        let id = insert_food(self.conn(), household_id, None, food).await?;
        Ok(FoodItem { id, ..food.clone() })
    }

    pub async fn list_foods(&self, household_id: &str) -> Result<Vec<FoodItem>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id, name, image_url, tags FROM food_items
                 WHERE household_id = ?1 ORDER BY name, id",
                [household_id],
            )
            .await?;
        let mut foods = Vec::new();
        while let Some(row) = rows.next().await? {
            foods.push(row_to_food(&row)?);
        }
        Ok(foods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::test_db;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn create_and_list() {
        let db = test_db().await;
        let hh = db.create_household("Home").await.unwrap();
        let food = FoodItem {
            id: "ignored".into(),
            name: "Peas".into(),
            image_url: None,
            tags: vec!["Veggie".into()],
        };
        let created = db.create_food(&hh.id, &food).await.unwrap();
        assert!(created.id.starts_with("fd-"));

        let listed = db.list_foods(&hh.id).await.unwrap();
        assert_eq!(listed, vec![created]);
    }
}
