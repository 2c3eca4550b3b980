use chrono::{DateTime, Duration, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::models::{Prediction, RiskLevel, WorkoutSample};
use crate::routines::RoutineKind;

/// A stored scoring call: the raw input and what it produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRecord {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub sample: WorkoutSample,
    pub prediction: Prediction,
    pub session_load: f64,
    pub created_at: DateTime<Utc>,
}

/// Trailing load totals for a user as of a given day
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadHistory {
    pub last7_load: f64,
    pub last28_load: f64,
}

impl LoadHistory {
    /// Fill the history fields of a sample
    pub fn apply_to(&self, sample: &mut WorkoutSample) {
        sample.last7_load = self.last7_load;
        sample.last28_load = self.last28_load;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineRun {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub kind: RoutineKind,
    pub minutes: u32,
    pub completed_at: DateTime<Utc>,
}

/// Per-user SQLite store for scoring history, todos and routine runs
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Create or open a database at the specified path
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, DatabaseError> {
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(db_path)?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Open a throwaway in-memory database
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema with tables and indexes
    fn init_schema(&self) -> Result<(), DatabaseError> {
        // WAL is unavailable for in-memory databases; the pragma just reports "memory"
        self.conn
            .query_row("PRAGMA journal_mode=WAL", [], |row| row.get::<_, String>(0))?;
        self.conn.execute("PRAGMA synchronous=NORMAL", [])?;

        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS scoring_records (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                date TEXT NOT NULL,
                input_json TEXT NOT NULL,
                result_json TEXT NOT NULL,
                session_load REAL NOT NULL,
                fatigue_score INTEGER NOT NULL,
                risk TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                done INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS routine_runs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                kind TEXT NOT NULL,
                minutes INTEGER NOT NULL,
                completed_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_scoring_user_date ON scoring_records (user_id, date);
            CREATE INDEX IF NOT EXISTS idx_todos_user ON todos (user_id);
            CREATE INDEX IF NOT EXISTS idx_routine_runs_user ON routine_runs (user_id, completed_at);
            "#,
        )?;

        Ok(())
    }

    /// Store a scoring call for a user
    pub fn store_scoring(
        &self,
        user_id: &str,
        date: NaiveDate,
        sample: &WorkoutSample,
        prediction: &Prediction,
    ) -> Result<ScoringRecord, DatabaseError> {
        let record = ScoringRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            date,
            sample: sample.clone(),
            prediction: prediction.clone(),
            session_load: prediction.session_load,
            created_at: Utc::now(),
        };

        let input_json = to_json(&record.id, &record.sample)?;
        let result_json = to_json(&record.id, &record.prediction)?;

        self.conn.execute(
            r#"
            INSERT INTO scoring_records (
                id, user_id, date, input_json, result_json, session_load, fatigue_score, risk, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                record.id,
                record.user_id,
                record.date,
                input_json,
                result_json,
                record.session_load,
                record.prediction.fatigue_score,
                record.prediction.risk.to_string(),
                record.created_at,
            ],
        )?;

        tracing::debug!(
            user_id,
            record_id = %record.id,
            %date,
            fatigue = record.prediction.fatigue_score,
            "Scoring record stored"
        );

        Ok(record)
    }

    /// Most recent scoring records for a user, newest first
    pub fn list_scorings(&self, user_id: &str, limit: usize) -> Result<Vec<ScoringRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, user_id, date, input_json, result_json, session_load, created_at
            FROM scoring_records
            WHERE user_id = ?1
            ORDER BY date DESC, created_at DESC
            LIMIT ?2
            "#,
        )?;

        let rows = stmt.query_map(params![user_id, limit as i64], Self::raw_record_from_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.decode()?);
        }
        Ok(records)
    }

    /// Sum of stored session loads over the 7 and 28 days before `as_of`
    pub fn load_history(&self, user_id: &str, as_of: NaiveDate) -> Result<LoadHistory, DatabaseError> {
        let last7_load = self.load_between(user_id, as_of - Duration::days(7), as_of)?;
        let last28_load = self.load_between(user_id, as_of - Duration::days(28), as_of)?;
        Ok(LoadHistory {
            last7_load,
            last28_load,
        })
    }

    fn load_between(&self, user_id: &str, from: NaiveDate, until: NaiveDate) -> Result<f64, DatabaseError> {
        let total: Option<f64> = self.conn.query_row(
            r#"
            SELECT SUM(session_load) FROM scoring_records
            WHERE user_id = ?1 AND date >= ?2 AND date < ?3
            "#,
            params![user_id, from, until],
            |row| row.get(0),
        )?;
        Ok(total.unwrap_or(0.0))
    }

    pub fn add_todo(&self, user_id: &str, title: &str) -> Result<Todo, DatabaseError> {
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO todos (user_id, title, done, created_at) VALUES (?1, ?2, 0, ?3)",
            params![user_id, title, created_at],
        )?;

        Ok(Todo {
            id: self.conn.last_insert_rowid(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            done: false,
            created_at,
        })
    }

    pub fn list_todos(&self, user_id: &str) -> Result<Vec<Todo>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, done, created_at FROM todos WHERE user_id = ?1 ORDER BY id",
        )?;
        let todos = stmt
            .query_map(params![user_id], |row| {
                Ok(Todo {
                    id: row.get("id")?,
                    user_id: row.get("user_id")?,
                    title: row.get("title")?,
                    done: row.get("done")?,
                    created_at: row.get("created_at")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(todos)
    }

    /// Mark a todo done or not done; errors if the user has no such todo
    pub fn set_todo_done(&self, user_id: &str, todo_id: i64, done: bool) -> Result<(), DatabaseError> {
        let updated = self.conn.execute(
            "UPDATE todos SET done = ?1 WHERE id = ?2 AND user_id = ?3",
            params![done, todo_id, user_id],
        )?;
        Self::expect_one(updated, "todos", todo_id)
    }

    pub fn delete_todo(&self, user_id: &str, todo_id: i64) -> Result<(), DatabaseError> {
        let deleted = self.conn.execute(
            "DELETE FROM todos WHERE id = ?1 AND user_id = ?2",
            params![todo_id, user_id],
        )?;
        Self::expect_one(deleted, "todos", todo_id)
    }

    pub fn log_routine_run(
        &self,
        user_id: &str,
        title: &str,
        kind: RoutineKind,
        minutes: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<RoutineRun, DatabaseError> {
        self.conn.execute(
            "INSERT INTO routine_runs (user_id, title, kind, minutes, completed_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![user_id, title, kind.to_string(), minutes, completed_at],
        )?;

        Ok(RoutineRun {
            id: self.conn.last_insert_rowid(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            kind,
            minutes,
            completed_at,
        })
    }

    /// Most recent routine runs for a user, newest first
    pub fn list_routine_runs(&self, user_id: &str, limit: usize) -> Result<Vec<RoutineRun>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, user_id, title, kind, minutes, completed_at
            FROM routine_runs
            WHERE user_id = ?1
            ORDER BY completed_at DESC, id DESC
            LIMIT ?2
            "#,
        )?;

        let runs = stmt
            .query_map(params![user_id, limit as i64], |row| {
                let kind: String = row.get("kind")?;
                let kind = kind.parse::<RoutineKind>().map_err(|reason| {
                    rusqlite::Error::FromSqlConversionFailure(3, Type::Text, reason.into())
                })?;
                Ok(RoutineRun {
                    id: row.get("id")?,
                    user_id: row.get("user_id")?,
                    title: row.get("title")?,
                    kind,
                    minutes: row.get("minutes")?,
                    completed_at: row.get("completed_at")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(runs)
    }

    /// Risk label distribution of a user's stored scorings
    pub fn risk_counts(&self, user_id: &str) -> Result<Vec<(RiskLevel, usize)>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT risk, COUNT(*) FROM scoring_records WHERE user_id = ?1 GROUP BY risk",
        )?;
        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut counts = rows
            .into_iter()
            .map(|(risk, count)| {
                let level = risk.parse::<RiskLevel>().map_err(|reason| DatabaseError::CorruptRecord {
                    id: format!("risk:{}", risk),
                    reason,
                })?;
                Ok((level, count as usize))
            })
            .collect::<Result<Vec<_>, DatabaseError>>()?;
        counts.sort_by_key(|(level, _)| *level);
        Ok(counts)
    }

    fn expect_one(changed: usize, table: &str, id: i64) -> Result<(), DatabaseError> {
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    fn raw_record_from_row(row: &Row) -> rusqlite::Result<RawScoringRecord> {
        Ok(RawScoringRecord {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            input_json: row.get("input_json")?,
            result_json: row.get("result_json")?,
            session_load: row.get("session_load")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// Scoring row before its JSON columns are decoded
struct RawScoringRecord {
    id: String,
    user_id: String,
    date: NaiveDate,
    input_json: String,
    result_json: String,
    session_load: f64,
    created_at: DateTime<Utc>,
}

impl RawScoringRecord {
    fn decode(self) -> Result<ScoringRecord, DatabaseError> {
        let sample = from_json(&self.id, &self.input_json)?;
        let prediction = from_json(&self.id, &self.result_json)?;
        Ok(ScoringRecord {
            id: self.id,
            user_id: self.user_id,
            date: self.date,
            sample,
            prediction,
            session_load: self.session_load,
            created_at: self.created_at,
        })
    }
}

fn to_json<T: Serialize>(id: &str, value: &T) -> Result<String, DatabaseError> {
    serde_json::to_string(value).map_err(|e| DatabaseError::CorruptRecord {
        id: id.to_string(),
        reason: e.to_string(),
    })
}

fn from_json<T: for<'de> Deserialize<'de>>(id: &str, json: &str) -> Result<T, DatabaseError> {
    serde_json::from_str(json).map_err(|e| DatabaseError::CorruptRecord {
        id: id.to_string(),
        reason: e.to_string(),
    })
}
