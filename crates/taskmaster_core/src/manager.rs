use crate::error::TaskError;
use crate::events::TaskEvents;
use crate::model::{Stats, Task};
use crate::storage::json_store::JsonStore;
use log::warn;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Outcome of a mutation that applied in memory.
///
/// `store_warning` is set when the write-through failed after the change
/// applied: the change survives in memory and may not survive a reload.
#[derive(Debug)]
pub struct Mutation<T> {
    pub value: T,
    pub store_warning: Option<TaskError>,
}

/// Authoritative owner of the task list.
///
/// Loads its state from the store exactly once at startup, mutates in memory
/// first, then writes through synchronously before each call returns.
pub struct TaskListManager {
    tasks: Vec<Task>,
    store: JsonStore,
    listeners: Vec<Box<dyn TaskEvents>>,
    load_dropped: usize,
    load_recovered: bool,
}

impl TaskListManager {
    pub fn open(store: JsonStore) -> Self {
        let outcome = store.load();
        if outcome.recovered {
            warn!("stored tasks were corrupted; starting from an empty list");
        }
        if outcome.dropped > 0 {
            warn!("ignored {} malformed stored task entries", outcome.dropped);
        }

        Self {
            tasks: outcome.tasks,
            store,
            listeners: Vec::new(),
            load_dropped: outcome.dropped,
            load_recovered: outcome.recovered,
        }
    }

    /// Stored entries dropped by the shape check during startup load.
    pub fn load_dropped(&self) -> usize {
        self.load_dropped
    }

    /// True when the stored value was unreadable at startup and was reset.
    pub fn load_recovered(&self) -> bool {
        self.load_recovered
    }

    pub fn subscribe(&mut self, listener: Box<dyn TaskEvents>) {
        self.listeners.push(listener);
    }

    pub fn add_task(&mut self, raw_text: &str) -> Result<Mutation<Task>, TaskError> {
        let text = raw_text.trim();
        if text.is_empty() {
            return Err(TaskError::EmptyText);
        }

        let created_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|err| TaskError::store(err.to_string()))?;

        let task = Task {
            id: self.next_id(),
            text: text.to_string(),
            completed: false,
            created_at,
        };

        self.tasks.push(task.clone());
        let store_warning = self.persist();
        for listener in &self.listeners {
            listener.on_task_added(&task);
        }
        self.emit_stats();

        Ok(Mutation {
            value: task,
            store_warning,
        })
    }

    /// Flips the completion flag of the task with the given id and returns
    /// the new value.
    pub fn toggle_completion(&mut self, id: &str) -> Result<Mutation<bool>, TaskError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| TaskError::not_found(id))?;

        task.completed = !task.completed;
        let completed = task.completed;

        let store_warning = self.persist();
        for listener in &self.listeners {
            listener.on_task_toggled(id, completed);
        }
        self.emit_stats();

        Ok(Mutation {
            value: completed,
            store_warning,
        })
    }

    /// Removes the task with the given id, preserving the order of the rest,
    /// and returns the removed task.
    pub fn delete_task(&mut self, id: &str) -> Result<Mutation<Task>, TaskError> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| TaskError::not_found(id))?;

        let removed = self.tasks.remove(index);

        let store_warning = self.persist();
        for listener in &self.listeners {
            listener.on_task_deleted(&removed.id);
        }
        self.emit_stats();

        Ok(Mutation {
            value: removed,
            store_warning,
        })
    }

    /// Number of tasks [`clear_completed`](Self::clear_completed) would
    /// remove. Callers show this count when asking the user to confirm.
    pub fn preview_clear_completed(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    /// Removes every completed task and returns how many were removed.
    ///
    /// Destructive and irreversible: callers must obtain user confirmation
    /// (see [`preview_clear_completed`](Self::preview_clear_completed))
    /// before invoking this. The manager itself never prompts.
    pub fn clear_completed(&mut self) -> Result<Mutation<usize>, TaskError> {
        let count = self.preview_clear_completed();
        if count == 0 {
            return Err(TaskError::NothingToClear);
        }

        self.tasks.retain(|task| !task.completed);

        let store_warning = self.persist();
        for listener in &self.listeners {
            listener.on_tasks_cleared(count);
        }
        self.emit_stats();

        Ok(Mutation {
            value: count,
            store_warning,
        })
    }

    /// Empties the list wholesale and clears the stored slot. Subject to the
    /// same confirmation contract as
    /// [`clear_completed`](Self::clear_completed).
    pub fn clear_all(&mut self) -> Mutation<usize> {
        let count = self.tasks.len();
        self.tasks.clear();
        self.store.clear();

        for listener in &self.listeners {
            listener.on_tasks_cleared(count);
        }
        self.emit_stats();

        Mutation {
            value: count,
            store_warning: None,
        }
    }

    /// Derived counts. No side effects.
    pub fn stats(&self) -> Stats {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|task| task.completed).count();
        Stats {
            total,
            completed,
            pending: total - completed,
        }
    }

    /// Read-only snapshot view of the list, in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn next_id(&self) -> String {
        let mut candidate = format!(
            "task-{}",
            OffsetDateTime::now_utc().unix_timestamp_nanos()
        );
        let mut bump = 0u32;
        while self.tasks.iter().any(|task| task.id == candidate) {
            bump += 1;
            candidate = format!(
                "task-{}-{bump}",
                OffsetDateTime::now_utc().unix_timestamp_nanos()
            );
        }
        candidate
    }

    fn persist(&self) -> Option<TaskError> {
        match self.store.save(&self.tasks) {
            Ok(()) => None,
            Err(err) => {
                warn!("failed to persist tasks: {err}");
                for listener in &self.listeners {
                    listener.on_store_warning(&err);
                }
                Some(err)
            }
        }
    }

    fn emit_stats(&self) {
        let stats = self.stats();
        for listener in &self.listeners {
            listener.on_stats_changed(&stats);
        }
    }
}
