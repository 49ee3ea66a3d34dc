use taskmaster_core::config::Palette;
use taskmaster_core::events::TaskEvents;
use taskmaster_core::model::{Stats, Task};

/// Prints a feedback banner after each mutation, plus a muted live stats
/// line, so the terminal mirrors what just changed.
pub struct ConsoleBanner {
    palette: Palette,
}

impl ConsoleBanner {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }
}

impl TaskEvents for ConsoleBanner {
    fn on_task_added(&self, task: &Task) {
        println!(
            "{}",
            self.palette
                .accentize(&format!("Task added: {} ({})", task.text, task.id))
        );
    }

    fn on_task_toggled(&self, _id: &str, completed: bool) {
        let message = if completed {
            "Task completed!"
        } else {
            "Task marked as pending"
        };
        println!("{}", self.palette.accentize(message));
    }

    fn on_task_deleted(&self, id: &str) {
        println!("{}", self.palette.accentize(&format!("Task deleted ({id})")));
    }

    fn on_tasks_cleared(&self, count: usize) {
        println!(
            "{}",
            self.palette.accentize(&format!("Cleared {count} task(s)"))
        );
    }

    fn on_stats_changed(&self, stats: &Stats) {
        println!(
            "{}",
            self.palette.mutedize(&format!(
                "total {} | completed {} | pending {}",
                stats.total, stats.completed, stats.pending
            ))
        );
    }
}
