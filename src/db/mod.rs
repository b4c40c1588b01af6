mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use uuid::Uuid;

use crate::models::*;
use crate::store::ProjectStore;

const PROJECT_COLUMNS: &str = "id, project_name, location, floor_area_hundredths, number_of_floors, material_type,
     additional_features, estimated_cost, base_cost, material_multiplier,
     additional_features_cost, created_at";

/// SQLite-backed project storage.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open the database in the platform data directory.
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "buildcost")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join("buildcost.db"))
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn()?;
        schema::run_migrations(&conn)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("database lock poisoned"))
    }
}

impl ProjectStore for Database {
    fn insert_project(&self, project: &Project) -> Result<()> {
        let conn = self.conn()?;
        let breakdown = &project.cost_breakdown;

        conn.execute(
            "INSERT INTO projects (id, project_name, location, floor_area_hundredths, number_of_floors, material_type,
                                   additional_features, estimated_cost, base_cost, material_multiplier,
                                   additional_features_cost, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            (
                project.id.to_string(),
                &project.project_name,
                &project.location,
                to_sql_int(project.floor_area.hundredths())?,
                project.number_of_floors,
                &project.material_type,
                serde_json::to_string(&project.additional_features)?,
                to_sql_int(project.estimated_cost)?,
                to_sql_int(breakdown.base_cost())?,
                to_sql_int(breakdown.material_multiplier())?,
                to_sql_int(breakdown.additional_features_cost())?,
                format_datetime(project.created_at),
            ),
        )
        .with_context(|| format!("Failed to insert project {}", project.id))?;

        tracing::debug!("Inserted project {}", project.id);
        Ok(())
    }

    fn list_projects(&self) -> Result<Vec<Project>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM projects ORDER BY created_at DESC, rowid DESC",
            PROJECT_COLUMNS
        ))?;

        let projects = stmt
            .query_map([], project_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(projects)
    }

    fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM projects WHERE id = ?",
            PROJECT_COLUMNS
        ))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(project_from_row(row)?))
        } else {
            Ok(None)
        }
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    let features_json: String = row.get(6)?;
    let additional_features: Vec<String> = serde_json::from_str(&features_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

    let cost_breakdown = CostBreakdown::new(get_u64(row, 8)?, get_u64(row, 9)?, get_u64(row, 10)?)
        .ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                10,
                Type::Integer,
                "stored cost breakdown out of range".into(),
            )
        })?;

    Ok(Project {
        id: parse_uuid(row, 0)?,
        project_name: row.get(1)?,
        location: row.get(2)?,
        floor_area: get_floor_area(row, 3)?,
        number_of_floors: row.get(4)?,
        material_type: row.get(5)?,
        additional_features,
        estimated_cost: get_u64(row, 7)?,
        cost_breakdown,
        created_at: parse_datetime(row, 11)?,
    })
}

fn to_sql_int(value: u64) -> Result<i64> {
    i64::try_from(value).with_context(|| format!("Value {} exceeds storage range", value))
}

fn get_u64(row: &Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    let value: i64 = row.get(idx)?;
    u64::try_from(value)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}

fn get_floor_area(row: &Row<'_>, idx: usize) -> rusqlite::Result<FloorArea> {
    FloorArea::from_hundredths(get_u64(row, idx)?).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Integer,
            "stored floor area out of range".into(),
        )
    })
}

fn parse_uuid(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let s: String = row.get(idx)?;
    Uuid::parse_str(&s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_datetime(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let s: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}
