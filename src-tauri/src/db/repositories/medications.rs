use anyhow::{bail, Result};
use chrono::Utc;
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::{
    connection::Database,
    helpers::parse_datetime,
    models::{Medication, MedicationInput},
};

fn row_to_medication(row: &Row) -> Result<Medication> {
    let created_at: String = row.get("created_at")?;

    Ok(Medication {
        id: row.get("id")?,
        name: row.get("name")?,
        dosage: row.get("dosage")?,
        schedule: row.get("schedule")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    pub async fn insert_medication(&self, input: MedicationInput) -> Result<Medication> {
        let name = input.name.trim();
        if name.is_empty() {
            bail!("medication name is required");
        }

        let medication = Medication {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            dosage: input.dosage.trim().to_string(),
            schedule: input.schedule.trim().to_string(),
            created_at: Utc::now(),
        };

        let record = medication.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO medications (id, name, dosage, schedule, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.id,
                    record.name,
                    record.dosage,
                    record.schedule,
                    record.created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await?;

        Ok(medication)
    }

    pub async fn list_medications(&self) -> Result<Vec<Medication>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, dosage, schedule, created_at
                 FROM medications
                 ORDER BY rowid ASC",
            )?;

            let mut rows = stmt.query([])?;
            let mut medications = Vec::new();
            while let Some(row) = rows.next()? {
                medications.push(row_to_medication(row)?);
            }
            Ok(medications)
        })
        .await
    }

    pub async fn delete_medication(&self, medication_id: &str) -> Result<()> {
        let medication_id = medication_id.to_string();
        self.execute(move |conn| {
            let rows_affected =
                conn.execute("DELETE FROM medications WHERE id = ?1", params![medication_id])?;
            if rows_affected == 0 {
                bail!("medication not found");
            }
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_db_path() -> PathBuf {
        std::env::temp_dir().join(format!("rehab-coach-test-{}.sqlite3", Uuid::new_v4()))
    }

    fn input(name: &str, dosage: &str, schedule: &str) -> MedicationInput {
        MedicationInput {
            name: name.into(),
            dosage: dosage.into(),
            schedule: schedule.into(),
        }
    }

    #[tokio::test]
    async fn test_add_list_delete() {
        let path = temp_db_path();
        let db = Database::new(path.clone()).unwrap();

        let aspirin = db
            .insert_medication(input(" Aspirin ", "75 mg", "Morning"))
            .await
            .unwrap();
        assert_eq!(aspirin.name, "Aspirin");
        db.insert_medication(input("Atorvastatin", "20 mg", "Night"))
            .await
            .unwrap();

        let listed = db.list_medications().await.unwrap();
        let names: Vec<_> = listed.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Aspirin", "Atorvastatin"]);
        assert_eq!(listed[0], aspirin);

        db.delete_medication(&aspirin.id).await.unwrap();
        assert_eq!(db.list_medications().await.unwrap().len(), 1);
        assert!(db.delete_medication(&aspirin.id).await.is_err());

        drop(db);
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let path = temp_db_path();
        let db = Database::new(path.clone()).unwrap();
        assert!(db.insert_medication(input("  ", "5 mg", "")).await.is_err());
        assert!(db.list_medications().await.unwrap().is_empty());
        drop(db);
        let _ = std::fs::remove_file(path);
    }
}
