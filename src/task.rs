use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type TaskId = u64;

/// Longest description the API accepts, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 191;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub priority: Priority,
    pub tag: Tag,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Next priority in display order, wrapping around.
    pub fn cycle(self, step: isize) -> Self {
        cycle_in(&Self::ALL, self, step)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow status of a task.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    #[serde(rename = "To do")]
    Todo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
}

impl Tag {
    pub const ALL: [Tag; 3] = [Tag::Todo, Tag::InProgress, Tag::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Todo => "To do",
            Tag::InProgress => "In Progress",
            Tag::Done => "Done",
        }
    }

    pub fn cycle(self, step: isize) -> Self {
        cycle_in(&Self::ALL, self, step)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(format!("unknown priority {:?} (expected High, Medium or Low)", s)),
        }
    }
}

impl FromStr for Tag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Tag::Todo),
            "inprogress" => Ok(Tag::InProgress),
            "done" => Ok(Tag::Done),
            _ => Err(format!("unknown tag {:?} (expected To do, In Progress or Done)", s)),
        }
    }
}

fn cycle_in<T: Copy + PartialEq>(all: &[T], current: T, step: isize) -> T {
    let len = all.len() as isize;
    let index = all.iter().position(|v| *v == current).unwrap_or(0) as isize;
    all[(index + step).rem_euclid(len) as usize]
}

/// Edit buffer for a task being created (`id == None`) or updated.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub id: Option<TaskId>,
    pub name: String,
    pub description: String,
    pub priority: Option<Priority>,
    pub tag: Option<Tag>,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            description: String::new(),
            priority: Some(Priority::Medium),
            tag: Some(Tag::Todo),
        }
    }
}

impl TaskDraft {
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        Self {
            id: Some(task.id),
            name: task.name.clone(),
            description: task.description.clone().unwrap_or_default(),
            priority: Some(task.priority),
            tag: Some(task.tag),
        }
    }
}

/// Body sent for both `POST /tasks` and `PATCH /tasks/{id}`.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct TaskPayload {
    pub name: String,
    pub description: String,
    pub priority: Priority,
    pub tag: Tag,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_uses_display_strings_on_the_wire() {
        assert_eq!(serde_json::to_string(&Tag::Todo).unwrap(), "\"To do\"");
        assert_eq!(
            serde_json::from_str::<Tag>("\"In Progress\"").unwrap(),
            Tag::InProgress
        );
    }

    #[test]
    fn task_reads_camel_case_timestamps() {
        let json = r#"{
            "id": 7,
            "name": "Write report",
            "priority": "Low",
            "tag": "Done",
            "createdAt": "2024-05-01T10:00:00.000Z",
            "updatedAt": "2024-05-02T10:00:00Z"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, 7);
        assert_eq!(task.description, None);
        assert_eq!(task.tag, Tag::Done);
        assert!(task.updated_at > task.created_at);
    }

    #[test]
    fn cycle_wraps_both_ways() {
        assert_eq!(Priority::Low.cycle(1), Priority::High);
        assert_eq!(Priority::High.cycle(-1), Priority::Low);
        assert_eq!(Tag::Todo.cycle(1), Tag::InProgress);
    }

    #[test]
    fn parses_loose_spellings() {
        assert_eq!("HIGH".parse::<Priority>(), Ok(Priority::High));
        assert_eq!("in-progress".parse::<Tag>(), Ok(Tag::InProgress));
        assert_eq!("To do".parse::<Tag>(), Ok(Tag::Todo));
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn draft_from_task_keeps_id() {
        let task: Task = serde_json::from_str(
            r#"{"id":3,"name":"A","description":"d","priority":"High","tag":"To do",
                "createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        let draft = TaskDraft::from(&task);
        assert_eq!(draft.id, Some(3));
        assert!(!draft.is_new());
        assert_eq!(draft.description, "d");
        assert!(TaskDraft::default().is_new());
    }
}
