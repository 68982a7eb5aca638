//! Dashboard figures derived from the cached task list.

use crate::task::{Priority, Tag, Task};
use chrono::{DateTime, Duration, Utc};

pub const WEEK_DAYS: i64 = 7;

/// Tasks whose last update falls within the trailing week, both ends inclusive.
pub fn tasks_this_week(tasks: &[Task], now: DateTime<Utc>) -> Vec<&Task> {
    let week_ago = now - Duration::days(WEEK_DAYS);
    tasks
        .iter()
        .filter(|t| t.updated_at >= week_ago && t.updated_at <= now)
        .collect()
}

/// Share (0-100) of all tasks that carry `tag` and were updated this week.
pub fn weekly_progress(tasks: &[Task], tag: Tag, now: DateTime<Utc>) -> f64 {
    let count = tasks_this_week(tasks, now)
        .into_iter()
        .filter(|t| t.tag == tag)
        .count();
    percentage(count, tasks.len())
}

/// Share (0-100) of all tasks with the given priority.
pub fn priority_distribution(tasks: &[Task], priority: Priority) -> f64 {
    percentage(count_by_priority(tasks, priority), tasks.len())
}

pub fn count_by_priority(tasks: &[Task], priority: Priority) -> usize {
    tasks.iter().filter(|t| t.priority == priority).count()
}

pub fn count_by_tag(tasks: &[Task], tag: Tag) -> usize {
    tasks.iter().filter(|t| t.tag == tag).count()
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagProgress {
    pub tag: Tag,
    pub this_week: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriorityShare {
    pub priority: Priority,
    pub count: usize,
    pub percent: f64,
}

/// Everything the dashboard panel shows, computed for one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub total: usize,
    pub progress: Vec<TagProgress>,
    pub priorities: Vec<PriorityShare>,
}

impl DashboardSummary {
    pub fn compute(tasks: &[Task], now: DateTime<Utc>) -> Self {
        let week = tasks_this_week(tasks, now);
        let progress = Tag::ALL
            .iter()
            .map(|&tag| TagProgress {
                tag,
                this_week: week.iter().filter(|t| t.tag == tag).count(),
                percent: weekly_progress(tasks, tag, now),
            })
            .collect();
        let priorities = Priority::ALL
            .iter()
            .map(|&priority| PriorityShare {
                priority,
                count: count_by_priority(tasks, priority),
                percent: priority_distribution(tasks, priority),
            })
            .collect();

        Self {
            total: tasks.len(),
            progress,
            priorities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn task(id: u64, priority: Priority, tag: Tag, updated_at: DateTime<Utc>) -> Task {
        Task {
            id,
            name: format!("task {id}"),
            description: None,
            priority,
            tag,
            created_at: updated_at,
            updated_at,
        }
    }

    #[test]
    fn empty_list_yields_zero() {
        assert_eq!(weekly_progress(&[], Tag::Done, now()), 0.0);
        assert_eq!(priority_distribution(&[], Priority::High), 0.0);
        let summary = DashboardSummary::compute(&[], now());
        assert_eq!(summary.total, 0);
        assert!(summary.progress.iter().all(|p| p.percent == 0.0));
        assert!(summary.priorities.iter().all(|p| p.percent == 0.0));
    }

    #[test]
    fn weekly_window_is_inclusive_and_relative_to_total() {
        let tasks = vec![
            task(1, Priority::High, Tag::Done, now()),
            task(2, Priority::Low, Tag::Done, now() - Duration::days(7)),
            task(3, Priority::Low, Tag::Done, now() - Duration::days(8)),
            task(4, Priority::Low, Tag::Todo, now() - Duration::hours(1)),
        ];
        assert_eq!(weekly_progress(&tasks, Tag::Done, now()), 50.0);
        assert_eq!(weekly_progress(&tasks, Tag::Todo, now()), 25.0);
        assert_eq!(weekly_progress(&tasks, Tag::InProgress, now()), 0.0);
    }

    #[test]
    fn future_updates_fall_outside_the_week() {
        let tasks = vec![task(1, Priority::High, Tag::Done, now() + Duration::seconds(1))];
        assert!(tasks_this_week(&tasks, now()).is_empty());
    }

    #[test]
    fn distribution_counts_matching_priority() {
        let tasks = vec![
            task(1, Priority::High, Tag::Todo, now()),
            task(2, Priority::High, Tag::Todo, now()),
            task(3, Priority::Medium, Tag::Todo, now()),
            task(4, Priority::Low, Tag::Todo, now()),
        ];
        assert_eq!(priority_distribution(&tasks, Priority::High), 50.0);
        assert_eq!(priority_distribution(&tasks, Priority::Medium), 25.0);

        let summary = DashboardSummary::compute(&tasks, now());
        assert_eq!(summary.total, 4);
        assert_eq!(summary.priorities[0].count, 2);
        assert_eq!(summary.progress[0].this_week, 4);
        assert_eq!(count_by_tag(&tasks, Tag::Done), 0);
    }
}
