//! Live write paths running against a migrated store.
//!
//! - Meal logging snapshots kid names and never back-fills them
//! - Kid selection upserts stay one row per kid
//! - Shared menus created live get fresh unique tokens

use pretty_assertions::assert_eq;
use serde_json::json;

use plate_core::entities::{CompletionMap, MealReview, MealSelection, SelectionMap};
use plate_core::enums::{Completion, Table};
use plate_db::PlateDb;
use plate_db::migrate::{MigrateOptions, SourceSnapshot};
use plate_db::repos::meal::NewMealRecord;
use plate_db::repos::shared_menu::NewSharedMenu;

async fn migrated_db() -> PlateDb {
    let db = PlateDb::open_local(":memory:").await.unwrap();
    let snapshot = SourceSnapshot::from_value(&json!({
        "foods": [{"id": "f1", "name": "Pasta", "category": "main"}],
        "profiles": [{"id": "k1", "name": "Ada", "avatarColor": "#f87171"}],
        "kidSelections": {"k1": {"mainId": "f1"}},
        "meals": [{
            "id": "meal1",
            "date": "2024-01-01",
            "completedAt": 1_704_067_200_000_i64,
            "selections": [{"kidId": "k1", "kidName": "Ada", "mainId": "f1"}]
        }],
        "sharedMenus": [{"id": "s1", "token": "legacyTok123", "title": "Party"}]
    }));
    db.migrate(&snapshot, &MigrateOptions::default()).await.unwrap();
    db
}

async fn table_count(db: &PlateDb, table: Table) -> i64 {
    let mut rows = db
        .conn()
        .query(&format!("SELECT COUNT(*) FROM {table}"), ())
        .await
        .unwrap();
    rows.next().await.unwrap().unwrap().get(0).unwrap()
}

#[tokio::test]
async fn kid_name_snapshot_survives_rename() {
    let db = migrated_db().await;
    let hh = db.default_household().await.unwrap();
    let ada = db.list_kid_profiles(&hh.id).await.unwrap().remove(0);
    let pasta = db.list_foods(&hh.id).await.unwrap().remove(0);

    let mut picks = SelectionMap::new();
    picks.insert("main-group".into(), vec![pasta.id.clone()]);
    let mut completions = CompletionMap::new();
    completions.insert(pasta.id.clone(), Some(Completion::All));

    let meal = db
        .create_meal_record(
            &hh.id,
            &NewMealRecord {
                menu_id: hh.active_menu_id.clone(),
                date: "2024-02-01".into(),
                completed_at: 1_706_745_600_000,
                selections: vec![MealSelection {
                    kid_id: Some(ada.id.clone()),
                    kid_name: "whatever the browser had".into(),
                    selections: picks,
                }],
                reviews: vec![MealReview {
                    kid_id: Some(ada.id.clone()),
                    kid_name: String::new(),
                    completions,
                    earned_star: true,
                }],
            },
        )
        .await
        .unwrap();
    assert_eq!(meal.selections[0].kid_name, "Ada");
    assert_eq!(meal.reviews[0].kid_name, "Ada");

    db.rename_kid_profile(&ada.id, "Adelaide").await.unwrap();

    let meals = db.list_meals(&hh.id, 10).await.unwrap();
    assert_eq!(meals.len(), 2);
    for meal in &meals {
        for sel in &meal.selections {
            assert_eq!(sel.kid_name, "Ada");
        }
    }
    assert_eq!(db.get_meal(&meal.id).await.unwrap(), meal);
}

#[tokio::test]
async fn upsert_replaces_migrated_selection() {
    let db = migrated_db().await;
    let hh = db.default_household().await.unwrap();
    let ada = db.list_kid_profiles(&hh.id).await.unwrap().remove(0);
    assert_eq!(table_count(&db, Table::KidSelections).await, 1);

    db.upsert_kid_selection(&hh.id, &ada.id, &json!({"selections": {"g1": ["fd-x"]}}))
        .await
        .unwrap();

    assert_eq!(table_count(&db, Table::KidSelections).await, 1);
    let sel = db.get_kid_selection(&hh.id, &ada.id).await.unwrap().unwrap();
    assert_eq!(sel.selections.len(), 1);
    assert_eq!(sel.selections["g1"], vec!["fd-x"]);
}

#[tokio::test]
async fn live_shared_menu_gets_new_token() {
    let db = migrated_db().await;
    let hh = db.default_household().await.unwrap();

    let menu = db
        .create_shared_menu(
            &hh.id,
            &NewSharedMenu {
                title: "Picnic".into(),
                ..NewSharedMenu::default()
            },
        )
        .await
        .unwrap();
    assert_ne!(menu.token, "legacyTok123");
    assert_eq!(db.get_shared_menu_by_token(&menu.token).await.unwrap(), menu);
    assert_eq!(table_count(&db, Table::SharedMenus).await, 2);
}
