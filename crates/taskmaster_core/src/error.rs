use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Task text was empty or whitespace-only after trimming.
    EmptyText,
    /// No task with the given id exists.
    NotFound(String),
    /// Clearing completed tasks was requested while none are completed.
    NothingToClear,
    /// The backing store rejected a write. In-memory state is unaffected.
    Store(String),
}

impl TaskError {
    pub fn not_found<I: Into<String>>(id: I) -> Self {
        Self::NotFound(id.into())
    }

    pub fn store<M: Into<String>>(message: M) -> Self {
        Self::Store(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyText => "empty_text",
            Self::NotFound(_) => "not_found",
            Self::NothingToClear => "nothing_to_clear",
            Self::Store(_) => "store_error",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::EmptyText => "task text is required".to_string(),
            Self::NotFound(id) => format!("no task with id {id}"),
            Self::NothingToClear => "no completed tasks to clear".to_string(),
            Self::Store(message) => message.clone(),
        }
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code(), self.message())
    }
}

impl std::error::Error for TaskError {}
