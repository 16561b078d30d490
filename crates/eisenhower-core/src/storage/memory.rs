//! In-memory store for tests and embedding callers.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::{EventStore, TaskStore};
use crate::error::Result;
use crate::task::Task;
use crate::timeline::DailyEvent;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tasks: BTreeMap<String, Task>,
    events: BTreeMap<String, DailyEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut store = Self::new();
        store.tasks = tasks.into_iter().map(|t| (t.id.clone(), t)).collect();
        store
    }
}

impl TaskStore for MemoryStore {
    fn fetch_all(&self) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self.tasks.values().cloned().collect();
        tasks.sort_by(|a, b| b.last_modified_at.cmp(&a.last_modified_at));
        Ok(tasks)
    }

    fn get(&self, id: &str) -> Result<Option<Task>> {
        Ok(self.tasks.get(id).cloned())
    }

    fn save(&mut self, task: &Task) -> Result<()> {
        self.tasks.insert(task.id.clone(), task.clone());
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<bool> {
        Ok(self.tasks.remove(id).is_some())
    }
}

impl EventStore for MemoryStore {
    fn fetch_day(&self, day: NaiveDate) -> Result<Vec<DailyEvent>> {
        let mut events: Vec<DailyEvent> = self
            .events
            .values()
            .filter(|e| e.scheduled_day == day)
            .cloned()
            .collect();
        events.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id)));
        Ok(events)
    }

    fn get_event(&self, id: &str) -> Result<Option<DailyEvent>> {
        Ok(self.events.get(id).cloned())
    }

    fn save_event(&mut self, event: &DailyEvent) -> Result<()> {
        self.events.insert(event.id.clone(), event.clone());
        Ok(())
    }

    fn delete_event(&mut self, id: &str) -> Result<bool> {
        Ok(self.events.remove(id).is_some())
    }
}
