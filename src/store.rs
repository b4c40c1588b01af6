//! Storage contract for projects and an in-memory backend.
//!
//! Any backend able to insert a record, scan all records newest first, and
//! fetch one by id can hold projects. The SQLite [`Database`](crate::db::Database)
//! is the durable implementation; [`MemoryStore`] keeps everything in process.

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use uuid::Uuid;

use crate::models::Project;

/// Repository interface for project records.
///
/// Implementations must make each call atomic with respect to their own
/// state. Records are immutable once inserted.
pub trait ProjectStore: Send + Sync {
    /// Persists a fully built project. Fails if the id is already taken.
    fn insert_project(&self, project: &Project) -> Result<()>;
    /// All projects ordered by `created_at` descending; ties go to the most
    /// recently inserted record.
    fn list_projects(&self) -> Result<Vec<Project>>;
    fn get_project(&self, id: Uuid) -> Result<Option<Project>>;
}

/// Process-local project storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    projects: Arc<Mutex<Vec<Project>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Project>>> {
        self.projects
            .lock()
            .map_err(|_| anyhow::anyhow!("project store lock poisoned"))
    }
}

impl ProjectStore for MemoryStore {
    fn insert_project(&self, project: &Project) -> Result<()> {
        let mut projects = self.lock()?;
        if projects.iter().any(|p| p.id == project.id) {
            anyhow::bail!("duplicate project id {}", project.id);
        }
        projects.push(project.clone());
        Ok(())
    }

    fn list_projects(&self) -> Result<Vec<Project>> {
        let projects = self.lock()?;
        // Reverse insertion order first so the stable sort keeps newer
        // inserts ahead on equal timestamps.
        let mut sorted: Vec<Project> = projects.iter().rev().cloned().collect();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sorted)
    }

    fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
        let projects = self.lock()?;
        Ok(projects.iter().find(|p| p.id == id).cloned())
    }
}

impl<T: ProjectStore + ?Sized> ProjectStore for Arc<T> {
    fn insert_project(&self, project: &Project) -> Result<()> {
        (**self).insert_project(project)
    }

    fn list_projects(&self) -> Result<Vec<Project>> {
        (**self).list_projects()
    }

    fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
        (**self).get_project(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CostBreakdown, FloorArea};
    use chrono::{Duration, Utc};

    fn project(name: &str, offset_secs: i64) -> Project {
        let breakdown = CostBreakdown::new(1_200_000, 1200, 0).unwrap();
        Project {
            id: Uuid::new_v4(),
            project_name: name.to_string(),
            location: "Nagpur".to_string(),
            floor_area: FloorArea::from_sq_ft(1000).unwrap(),
            number_of_floors: 1,
            material_type: "Standard".to_string(),
            additional_features: vec![],
            estimated_cost: breakdown.total_cost(),
            cost_breakdown: breakdown,
            created_at: Utc::now() + Duration::seconds(offset_secs),
        }
    }

    #[test]
    fn rejects_duplicate_ids() {
        let store = MemoryStore::new();
        let p = project("A", 0);
        store.insert_project(&p).unwrap();
        assert!(store.insert_project(&p).is_err());
        assert_eq!(store.list_projects().unwrap().len(), 1);
    }

    #[test]
    fn lists_by_timestamp_not_insertion_order() {
        let store = MemoryStore::new();
        store.insert_project(&project("later", 10)).unwrap();
        store.insert_project(&project("earlier", -10)).unwrap();

        let names: Vec<String> = store
            .list_projects()
            .unwrap()
            .into_iter()
            .map(|p| p.project_name)
            .collect();
        assert_eq!(names, vec!["later", "earlier"]);
    }

    #[test]
    fn equal_timestamps_list_latest_insert_first() {
        let store = MemoryStore::new();
        let first = project("first", 0);
        let mut second = project("second", 0);
        second.created_at = first.created_at;

        store.insert_project(&first).unwrap();
        store.insert_project(&second).unwrap();

        let listed = store.list_projects().unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[test]
    fn clones_share_state() {
        let store = MemoryStore::new();
        let handle = store.clone();
        let p = project("shared", 0);
        handle.insert_project(&p).unwrap();
        assert_eq!(store.get_project(p.id).unwrap(), Some(p));
    }
}
