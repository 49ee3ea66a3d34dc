mod task;

pub use task::{Stats, Task};
