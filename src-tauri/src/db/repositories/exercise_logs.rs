use anyhow::{bail, Result};
use chrono::Utc;
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::{
    connection::Database,
    helpers::{parse_date, parse_datetime, to_u32},
    models::{ExerciseLog, ExerciseLogInput},
};

fn row_to_exercise_log(row: &Row) -> Result<ExerciseLog> {
    let logged_on: String = row.get("logged_on")?;
    let created_at: String = row.get("created_at")?;

    Ok(ExerciseLog {
        id: row.get("id")?,
        exercise: row.get("exercise")?,
        logged_on: parse_date(&logged_on, "logged_on")?,
        duration_mins: to_u32(row.get("duration_mins")?, "duration_mins")?,
        completion_rate: row.get("completion_rate")?,
        performance_score: row.get("performance_score")?,
        notes: row.get("notes")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

fn validate(input: &ExerciseLogInput) -> Result<()> {
    if input.exercise.trim().is_empty() {
        bail!("exercise name is required");
    }
    if !(0.0..=1.0).contains(&input.completion_rate) {
        bail!("completion rate must be between 0 and 1");
    }
    if !(0.0..=1.0).contains(&input.performance_score) {
        bail!("performance score must be between 0 and 1");
    }
    Ok(())
}

impl Database {
    pub async fn insert_exercise_log(&self, input: ExerciseLogInput) -> Result<ExerciseLog> {
        validate(&input)?;

        let now = Utc::now();
        let log = ExerciseLog {
            id: Uuid::new_v4().to_string(),
            exercise: input.exercise.trim().to_string(),
            logged_on: input.logged_on.unwrap_or_else(|| now.date_naive()),
            duration_mins: input.duration_mins,
            completion_rate: input.completion_rate,
            performance_score: input.performance_score,
            notes: input.notes,
            created_at: now,
        };

        let record = log.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO exercise_logs (
                    id, exercise, logged_on, duration_mins, completion_rate, performance_score, notes, created_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    record.id,
                    record.exercise,
                    record.logged_on.format("%Y-%m-%d").to_string(),
                    record.duration_mins,
                    record.completion_rate,
                    record.performance_score,
                    record.notes,
                    record.created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await?;

        Ok(log)
    }

    /// All logged exercises in the order they were entered, whatever date
    /// each one is logged against.
    pub async fn list_exercise_logs(&self) -> Result<Vec<ExerciseLog>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, exercise, logged_on, duration_mins, completion_rate, performance_score, notes, created_at
                 FROM exercise_logs
                 ORDER BY rowid ASC",
            )?;

            let mut rows = stmt.query([])?;
            let mut logs = Vec::new();
            while let Some(row) = rows.next()? {
                logs.push(row_to_exercise_log(row)?);
            }
            Ok(logs)
        })
        .await
    }

    pub async fn delete_exercise_log(&self, log_id: &str) -> Result<()> {
        let log_id = log_id.to_string();
        self.execute(move |conn| {
            let rows_affected =
                conn.execute("DELETE FROM exercise_logs WHERE id = ?1", params![log_id])?;
            if rows_affected == 0 {
                bail!("exercise log not found");
            }
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn temp_db_path() -> PathBuf {
        std::env::temp_dir().join(format!("rehab-coach-test-{}.sqlite3", Uuid::new_v4()))
    }

    fn input(exercise: &str, day: u32, score: f64) -> ExerciseLogInput {
        ExerciseLogInput {
            exercise: exercise.into(),
            logged_on: NaiveDate::from_ymd_opt(2024, 3, day),
            duration_mins: 15,
            completion_rate: 0.9,
            performance_score: score,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_logs_are_listed_in_entry_order() {
        let path = temp_db_path();
        let db = Database::new(path.clone()).unwrap();
        db.insert_exercise_log(input("walking", 3, 0.5)).await.unwrap();
        db.insert_exercise_log(input("  squats ", 1, 0.4)).await.unwrap();

        let logs = db.list_exercise_logs().await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].exercise, "walking");
        assert_eq!(logs[1].exercise, "squats");
        assert_eq!(logs[1].logged_on, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        db.delete_exercise_log(&logs[1].id).await.unwrap();
        assert_eq!(db.list_exercise_logs().await.unwrap().len(), 1);
        assert!(db.delete_exercise_log(&logs[1].id).await.is_err());

        drop(db);
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected() {
        let path = temp_db_path();
        let db = Database::new(path.clone()).unwrap();
        assert!(db.insert_exercise_log(input(" ", 1, 0.5)).await.is_err());
        assert!(db.insert_exercise_log(input("walking", 1, 1.5)).await.is_err());
        assert!(db.list_exercise_logs().await.unwrap().is_empty());
        drop(db);
        let _ = std::fs::remove_file(path);
    }
}
