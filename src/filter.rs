use crate::task::{Priority, Task};
use std::collections::BTreeSet;

/// Search query and priority selection applied to the board.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub query: String,
    pub priorities: BTreeSet<Priority>,
}

impl FilterState {
    pub fn toggle_priority(&mut self, priority: Priority) {
        if !self.priorities.remove(&priority) {
            self.priorities.insert(priority);
        }
    }

    pub fn is_active(&self) -> bool {
        !self.query.is_empty() || !self.priorities.is_empty()
    }

    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        filter(tasks, &self.query, &self.priorities)
    }
}

/// Tasks whose name contains `query` (case-insensitive) and whose priority is
/// selected. An empty selection lets every priority through.
pub fn filter<'a>(tasks: &'a [Task], query: &str, priorities: &BTreeSet<Priority>) -> Vec<&'a Task> {
    let needle = query.to_lowercase();
    tasks
        .iter()
        .filter(|t| t.name.to_lowercase().contains(&needle))
        .filter(|t| priorities.is_empty() || priorities.contains(&t.priority))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Tag;
    use chrono::Utc;

    fn task(id: u64, name: &str, priority: Priority) -> Task {
        Task {
            id,
            name: name.to_string(),
            description: None,
            priority,
            tag: Tag::Todo,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task(1, "A", Priority::High),
            task(2, "Buy milk", Priority::Medium),
            task(3, "Call Alice", Priority::Low),
            task(4, "Deploy", Priority::High),
        ]
    }

    fn ids(tasks: &[&Task]) -> Vec<u64> {
        tasks.iter().map(|t| t.id).collect()
    }

    #[test]
    fn query_matches_case_insensitively() {
        let tasks = vec![task(1, "A", Priority::High)];
        let found = filter(&tasks, "a", &BTreeSet::new());
        assert_eq!(ids(&found), vec![1]);
    }

    #[test]
    fn empty_selection_passes_every_priority() {
        let tasks = sample();
        assert_eq!(ids(&filter(&tasks, "", &BTreeSet::new())), vec![1, 2, 3, 4]);
    }

    #[test]
    fn selected_priorities_exclude_the_rest() {
        let tasks = sample();
        let high = BTreeSet::from([Priority::High]);
        assert_eq!(ids(&filter(&tasks, "", &high)), vec![1, 4]);
    }

    #[test]
    fn query_and_priorities_combine() {
        let tasks = sample();
        let selected = BTreeSet::from([Priority::Low, Priority::Medium]);
        assert_eq!(ids(&filter(&tasks, "AL", &selected)), vec![3]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let tasks = sample();
        let selected = BTreeSet::from([Priority::High, Priority::Low]);
        let once: Vec<Task> = filter(&tasks, "a", &selected).into_iter().cloned().collect();
        let twice = filter(&once, "a", &selected);
        assert_eq!(ids(&twice), once.iter().map(|t| t.id).collect::<Vec<_>>());
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut state = FilterState::default();
        assert!(!state.is_active());
        state.toggle_priority(Priority::Medium);
        assert!(state.priorities.contains(&Priority::Medium));
        assert!(state.is_active());
        state.toggle_priority(Priority::Medium);
        assert!(state.priorities.is_empty());
    }
}
