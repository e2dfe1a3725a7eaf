use crate::model::{Task, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusEntry {
    pub status: TaskStatus,
    pub value: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSplit {
    pub completed: usize,
    pub pending: usize,
}

impl StatusSplit {
    pub fn total(&self) -> usize {
        self.completed + self.pending
    }

    /// Completed first, then pending.
    pub fn entries(&self) -> [StatusEntry; 2] {
        [
            StatusEntry {
                status: TaskStatus::Completed,
                value: self.completed,
            },
            StatusEntry {
                status: TaskStatus::Pending,
                value: self.pending,
            },
        ]
    }
}

pub fn compute_status_split(records: &[Task]) -> StatusSplit {
    let completed = records.iter().filter(|task| task.completed).count();
    StatusSplit {
        completed,
        pending: records.len() - completed,
    }
}

#[cfg(test)]
mod tests {
    use super::compute_status_split;
    use crate::model::{Task, TaskStatus};
    use time::macros::datetime;

    #[test]
    fn split_orders_completed_before_pending() {
        let records: Vec<Task> = (0..5)
            .map(|index| Task {
                id: format!("task-{index}"),
                text: "demo".to_string(),
                completed: index % 2 == 0,
                created_at: datetime!(2024-01-01 00:00:00 UTC),
                category: None,
            })
            .collect();

        let split = compute_status_split(&records);
        let entries = split.entries();

        assert_eq!(entries[0].status, TaskStatus::Completed);
        assert_eq!(entries[0].value, 3);
        assert_eq!(entries[1].status, TaskStatus::Pending);
        assert_eq!(entries[1].value, 2);
        assert_eq!(split.total(), 5);
    }
}
