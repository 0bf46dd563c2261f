use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_optional_datetime, parse_status, to_i64, to_u32, to_u64},
    models::{AnalysisSession, AnalysisStatus},
};

const SELECT_COLUMNS: &str = "SELECT id, exercise, status, started_at, stopped_at, arm_raise_reps, leg_lift_reps,
        frames_processed, frames_skipped, average_form_score, created_at, updated_at
 FROM analysis_sessions";

fn row_to_analysis_session(row: &Row) -> Result<AnalysisSession> {
    let exercise: String = row.get("exercise")?;
    let status: String = row.get("status")?;
    let started_at: String = row.get("started_at")?;
    let stopped_at: Option<String> = row.get("stopped_at")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(AnalysisSession {
        id: row.get("id")?,
        exercise: exercise.parse()?,
        status: parse_status(&status)?,
        started_at: parse_datetime(&started_at, "started_at")?,
        stopped_at: parse_optional_datetime(stopped_at, "stopped_at")?,
        arm_raise_reps: to_u32(row.get("arm_raise_reps")?, "arm_raise_reps")?,
        leg_lift_reps: to_u32(row.get("leg_lift_reps")?, "leg_lift_reps")?,
        frames_processed: to_u64(row.get("frames_processed")?, "frames_processed")?,
        frames_skipped: to_u64(row.get("frames_skipped")?, "frames_skipped")?,
        average_form_score: row.get("average_form_score")?,
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

impl Database {
    pub async fn insert_analysis_session(&self, session: &AnalysisSession) -> Result<()> {
        let record = session.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO analysis_sessions (
                    id, exercise, status, started_at, stopped_at, arm_raise_reps, leg_lift_reps,
                    frames_processed, frames_skipped, average_form_score, created_at, updated_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    record.id,
                    record.exercise.as_str(),
                    record.status.as_str(),
                    record.started_at.to_rfc3339(),
                    record.stopped_at.as_ref().map(|dt| dt.to_rfc3339()),
                    record.arm_raise_reps,
                    record.leg_lift_reps,
                    to_i64(record.frames_processed)?,
                    to_i64(record.frames_skipped)?,
                    record.average_form_score,
                    record.created_at.to_rfc3339(),
                    record.updated_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    /// Writes the end-of-run totals and marks the session completed.
    pub async fn finalize_analysis_session(&self, session: &AnalysisSession) -> Result<()> {
        let record = session.clone();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "UPDATE analysis_sessions
                 SET status = ?1,
                     stopped_at = ?2,
                     arm_raise_reps = ?3,
                     leg_lift_reps = ?4,
                     frames_processed = ?5,
                     frames_skipped = ?6,
                     average_form_score = ?7,
                     updated_at = ?8
                 WHERE id = ?9",
                params![
                    record.status.as_str(),
                    record.stopped_at.as_ref().map(|dt| dt.to_rfc3339()),
                    record.arm_raise_reps,
                    record.leg_lift_reps,
                    to_i64(record.frames_processed)?,
                    to_i64(record.frames_skipped)?,
                    record.average_form_score,
                    record.updated_at.to_rfc3339(),
                    record.id,
                ],
            )?;

            if rows_affected == 0 {
                return Err(anyhow!("analysis session {} not found", record.id));
            }
            Ok(())
        })
        .await
    }

    pub async fn get_analysis_session(&self, session_id: &str) -> Result<Option<AnalysisSession>> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
            let mut rows = stmt.query(params![session_id])?;
            let session = match rows.next()? {
                Some(row) => Some(row_to_analysis_session(row)?),
                None => None,
            };
            Ok(session)
        })
        .await
    }

    pub async fn get_incomplete_analysis_sessions(&self) -> Result<Vec<AnalysisSession>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_COLUMNS} WHERE status = 'Running' ORDER BY started_at DESC"
            ))?;

            let mut rows = stmt.query([])?;
            let mut sessions = Vec::new();
            while let Some(row) = rows.next()? {
                sessions.push(row_to_analysis_session(row)?);
            }
            Ok(sessions)
        })
        .await
    }

    pub async fn mark_analysis_interrupted(
        &self,
        session_id: &str,
        stopped_at: DateTime<Utc>,
    ) -> Result<()> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            conn.execute(
                "UPDATE analysis_sessions
                 SET status = ?1,
                     stopped_at = ?2,
                     updated_at = ?3
                 WHERE id = ?4",
                params![
                    AnalysisStatus::Interrupted.as_str(),
                    stopped_at.to_rfc3339(),
                    stopped_at.to_rfc3339(),
                    session_id,
                ],
            )?;
            Ok(())
        })
        .await
    }

    /// Finished runs, newest first.
    pub async fn list_analysis_sessions(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<AnalysisSession>> {
        let limit = limit as i64;
        let offset = offset as i64;
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_COLUMNS}
                 WHERE status IN ('Completed', 'Interrupted')
                 ORDER BY started_at DESC
                 LIMIT ?1 OFFSET ?2"
            ))?;

            let mut rows = stmt.query(params![limit, offset])?;
            let mut sessions = Vec::new();
            while let Some(row) = rows.next()? {
                sessions.push(row_to_analysis_session(row)?);
            }
            Ok(sessions)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::ExerciseKind;
    use chrono::Duration;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn temp_db_path() -> PathBuf {
        std::env::temp_dir().join(format!("rehab-coach-test-{}.sqlite3", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_insert_then_finalize() {
        let path = temp_db_path();
        let db = Database::new(path.clone()).unwrap();
        let started_at = Utc::now();
        let mut session =
            AnalysisSession::started(Uuid::new_v4().to_string(), ExerciseKind::LegLift, started_at);
        db.insert_analysis_session(&session).await.unwrap();

        let incomplete = db.get_incomplete_analysis_sessions().await.unwrap();
        assert_eq!(incomplete.len(), 1);
        assert!(db.list_analysis_sessions(10, 0).await.unwrap().is_empty());

        session.status = AnalysisStatus::Completed;
        session.stopped_at = Some(started_at + Duration::seconds(30));
        session.leg_lift_reps = 7;
        session.frames_processed = 900;
        session.frames_skipped = 12;
        session.average_form_score = Some(82.5);
        session.updated_at = started_at + Duration::seconds(30);
        db.finalize_analysis_session(&session).await.unwrap();

        let stored = db.get_analysis_session(&session.id).await.unwrap().unwrap();
        assert_eq!(stored.status, AnalysisStatus::Completed);
        assert_eq!(stored.exercise, ExerciseKind::LegLift);
        assert_eq!(stored.leg_lift_reps, 7);
        assert_eq!(stored.total_reps(), 7);
        assert_eq!(stored.frames_processed, 900);
        assert_eq!(stored.average_form_score, Some(82.5));

        assert_eq!(db.list_analysis_sessions(10, 0).await.unwrap().len(), 1);
        assert!(db.get_incomplete_analysis_sessions().await.unwrap().is_empty());

        drop(db);
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_finalize_unknown_session_fails() {
        let path = temp_db_path();
        let db = Database::new(path.clone()).unwrap();
        let session =
            AnalysisSession::started("missing".into(), ExerciseKind::ArmRaise, Utc::now());
        assert!(db.finalize_analysis_session(&session).await.is_err());
        drop(db);
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_mark_interrupted() {
        let path = temp_db_path();
        let db = Database::new(path.clone()).unwrap();
        let session = AnalysisSession::started("crashed".into(), ExerciseKind::ArmRaise, Utc::now());
        db.insert_analysis_session(&session).await.unwrap();

        db.mark_analysis_interrupted("crashed", Utc::now()).await.unwrap();
        let stored = db.get_analysis_session("crashed").await.unwrap().unwrap();
        assert_eq!(stored.status, AnalysisStatus::Interrupted);
        assert!(stored.stopped_at.is_some());
        drop(db);
        let _ = std::fs::remove_file(path);
    }
}
