mod task;

pub use task::{Category, Task, TaskStatus};
