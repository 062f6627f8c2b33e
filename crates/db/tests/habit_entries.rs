//! Integration tests for the transactional habit stats recompute.

use chrono::NaiveDate;
use lockedin_core::roles::ROLE_END_USER;
use lockedin_db::models::habit::CreateHabit;
use lockedin_db::models::habit_entry::{CreateHabitEntry, UpdateHabitEntry};
use lockedin_db::models::user::CreateUser;
use lockedin_db::repositories::{HabitEntryRepo, HabitRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

async fn seed_habit(pool: &PgPool) -> (i64, i64) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: "Streaker".to_string(),
            email: "streak@example.com".to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role: ROLE_END_USER.to_string(),
        },
    )
    .await
    .unwrap();
    let habit = HabitRepo::create(
        pool,
        user.id,
        &CreateHabit {
            title: "Read".to_string(),
            description: None,
            frequency: None,
            target: None,
            unit: None,
            color: None,
            icon: None,
            is_active: None,
        },
    )
    .await
    .unwrap();
    (user.id, habit.id)
}

async fn log(pool: &PgPool, user_id: i64, habit_id: i64, date: &str, as_of: &str) -> i64 {
    let input = CreateHabitEntry {
        habit_id,
        date: d(date),
        completed: Some(true),
        value: None,
    };
    HabitEntryRepo::upsert(pool, user_id, &input, d(as_of))
        .await
        .unwrap()
        .expect("habit exists")
        .entry
        .id
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn consecutive_entries_update_stats(pool: PgPool) {
    let (user_id, habit_id) = seed_habit(&pool).await;
    for day in ["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04"] {
        log(&pool, user_id, habit_id, day, "2024-01-05").await;
    }
    let input = CreateHabitEntry {
        habit_id,
        date: d("2024-01-05"),
        completed: None,
        value: Some(30),
    };
    let write = HabitEntryRepo::upsert(&pool, user_id, &input, d("2024-01-05"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(write.change.previous_streak, 4);
    assert_eq!(write.change.habit.streak, 5);
    assert_eq!(write.change.habit.best_streak, 5);
    assert_eq!(write.change.habit.total_completions, 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn same_date_upserts_one_row(pool: PgPool) {
    let (user_id, habit_id) = seed_habit(&pool).await;
    let first = log(&pool, user_id, habit_id, "2024-01-05", "2024-01-05").await;
    let second = log(&pool, user_id, habit_id, "2024-01-05", "2024-01-05").await;
    assert_eq!(first, second);

    let rows = HabitEntryRepo::completions_for_habit(&pool, habit_id)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_entries_keeps_best_streak(pool: PgPool) {
    let (user_id, habit_id) = seed_habit(&pool).await;
    let mut ids = Vec::new();
    for day in ["2024-01-01", "2024-01-02", "2024-01-03"] {
        ids.push(log(&pool, user_id, habit_id, day, "2024-01-03").await);
    }

    let mut last = None;
    for id in ids {
        last = HabitEntryRepo::delete(&pool, id, d("2024-01-03"))
            .await
            .unwrap();
    }
    let habit = last.expect("entry existed").habit;
    assert_eq!(habit.streak, 0);
    assert_eq!(habit.total_completions, 0);
    assert_eq!(habit.best_streak, 3);

    let reset = HabitRepo::reset_stats(&pool, habit_id, d("2024-01-03"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reset.previous_best, 3);
    assert_eq!(reset.habit.best_streak, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn marking_entry_incomplete_breaks_streak(pool: PgPool) {
    let (user_id, habit_id) = seed_habit(&pool).await;
    log(&pool, user_id, habit_id, "2024-01-04", "2024-01-05").await;
    let today = log(&pool, user_id, habit_id, "2024-01-05", "2024-01-05").await;

    let update = UpdateHabitEntry {
        date: None,
        completed: Some(false),
        value: None,
    };
    let write = HabitEntryRepo::update(&pool, today, &update, d("2024-01-05"))
        .await
        .unwrap()
        .unwrap();
    assert!(!write.entry.completed);
    assert_eq!(write.change.habit.streak, 1, "yesterday still counts");
    assert_eq!(write.change.habit.best_streak, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn moving_entry_onto_taken_date_conflicts(pool: PgPool) {
    let (user_id, habit_id) = seed_habit(&pool).await;
    log(&pool, user_id, habit_id, "2024-01-04", "2024-01-05").await;
    let other = log(&pool, user_id, habit_id, "2024-01-05", "2024-01-05").await;

    let update = UpdateHabitEntry {
        date: Some(d("2024-01-04")),
        completed: None,
        value: None,
    };
    let err = HabitEntryRepo::update(&pool, other, &update, d("2024-01-05"))
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("uq_habit_entries_habit_date"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_habit_returns_none(pool: PgPool) {
    let (user_id, _) = seed_habit(&pool).await;
    let input = CreateHabitEntry {
        habit_id: 999_999,
        date: d("2024-01-05"),
        completed: Some(true),
        value: None,
    };
    let result = HabitEntryRepo::upsert(&pool, user_id, &input, d("2024-01-05"))
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_upserts_serialize_on_habit_lock(pool: PgPool) {
    const DAYS: i64 = 20;
    let (user_id, habit_id) = seed_habit(&pool).await;
    let start = d("2024-01-01");
    let as_of = start + chrono::Duration::days(DAYS - 1);

    let handles: Vec<_> = (0..DAYS)
        .map(|offset| {
            let pool = pool.clone();
            tokio::spawn(async move {
                let input = CreateHabitEntry {
                    habit_id,
                    date: start + chrono::Duration::days(offset),
                    completed: Some(true),
                    value: None,
                };
                HabitEntryRepo::upsert(&pool, user_id, &input, as_of)
                    .await
                    .unwrap()
                    .expect("habit exists");
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let habit = HabitRepo::find_by_id(&pool, habit_id)
        .await
        .unwrap()
        .unwrap();
    let expected = DAYS as i32;
    assert_eq!(
        (habit.streak, habit.best_streak, habit.total_completions),
        (expected, expected, expected)
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_value_keeps_or_clears(pool: PgPool) {
    let (user_id, habit_id) = seed_habit(&pool).await;
    let input = CreateHabitEntry {
        habit_id,
        date: d("2024-01-05"),
        completed: Some(true),
        value: Some(30),
    };
    let id = HabitEntryRepo::upsert(&pool, user_id, &input, d("2024-01-05"))
        .await
        .unwrap()
        .unwrap()
        .entry
        .id;

    let untouched: UpdateHabitEntry = serde_json::from_str(r#"{"completed": true}"#).unwrap();
    let write = HabitEntryRepo::update(&pool, id, &untouched, d("2024-01-05"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(write.entry.value, Some(30));

    let cleared: UpdateHabitEntry = serde_json::from_str(r#"{"value": null}"#).unwrap();
    let write = HabitEntryRepo::update(&pool, id, &cleared, d("2024-01-05"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(write.entry.value, None);
    assert!(write.entry.completed);

    let set = UpdateHabitEntry {
        value: Some(Some(45)),
        ..Default::default()
    };
    let write = HabitEntryRepo::update(&pool, id, &set, d("2024-01-05"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(write.entry.value, Some(45));
}
