use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::TaskApi;
use crate::error::{ApiError, BoardError, ValidationError};
use crate::filter::FilterState;
use crate::navigation::{Navigator, Route};
use crate::notify::{Notice, Notifier};
use crate::session::Session;
use crate::task::{Tag, Task, TaskDraft, TaskId, TaskPayload, MAX_DESCRIPTION_LEN};

/// Display gating for the board screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoardStatus {
    #[default]
    Idle,
    Loading,
    Editing,
    Error,
}

/// Check a draft and turn it into a request body.
pub fn validate(draft: &TaskDraft) -> Result<TaskPayload, ValidationError> {
    let (Some(priority), Some(tag)) = (draft.priority, draft.tag) else {
        return Err(ValidationError::MissingRequired);
    };
    if draft.name.is_empty() {
        return Err(ValidationError::MissingRequired);
    }
    let len = draft.description.chars().count();
    if len > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::description_too_long(len));
    }
    Ok(TaskPayload {
        name: draft.name.clone(),
        description: draft.description.clone(),
        priority,
        tag,
    })
}

/// Cached task list plus the view state of the board.
pub struct TaskBoard {
    api: Arc<dyn TaskApi>,
    session: Session,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    tasks: Vec<Task>,
    draft: Option<TaskDraft>,
    status: BoardStatus,
    pub filter: FilterState,
    pub selected_tag: usize,
    pub selected_task: usize,
}

impl TaskBoard {
    pub fn new(
        api: Arc<dyn TaskApi>,
        session: Session,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            session,
            navigator,
            notifier,
            tasks: Vec::new(),
            draft: None,
            status: BoardStatus::Idle,
            filter: FilterState::default(),
            selected_tag: 0,
            selected_task: 0,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn status(&self) -> BoardStatus {
        self.status
    }

    pub fn draft(&self) -> Option<&TaskDraft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut TaskDraft> {
        self.draft.as_mut()
    }

    /// The cached list narrowed by the current filter.
    pub fn visible(&self) -> Vec<&Task> {
        self.filter.apply(&self.tasks)
    }

    pub fn visible_by_tag(&self, tag: Tag) -> Vec<&Task> {
        self.visible().into_iter().filter(|t| t.tag == tag).collect()
    }

    pub fn selected_column(&self) -> Tag {
        Tag::ALL[self.selected_tag.min(Tag::ALL.len() - 1)]
    }

    pub fn selected(&self) -> Option<&Task> {
        self.visible_by_tag(self.selected_column())
            .get(self.selected_task)
            .copied()
    }

    pub fn move_column(&mut self, direction: isize) {
        self.selected_tag = (self.selected_tag as isize + direction)
            .clamp(0, Tag::ALL.len() as isize - 1) as usize;
        self.clamp_selection();
    }

    pub fn move_task(&mut self, direction: isize) {
        let max_tasks = self.visible_by_tag(self.selected_column()).len();
        if max_tasks == 0 {
            self.selected_task = 0;
            return;
        }
        self.selected_task =
            (self.selected_task as isize + direction).clamp(0, max_tasks as isize - 1) as usize;
    }

    pub fn clamp_selection(&mut self) {
        let max_tasks = self.visible_by_tag(self.selected_column()).len();
        self.selected_task = self.selected_task.min(max_tasks.saturating_sub(1));
    }

    pub fn begin_create(&mut self) {
        self.draft = Some(TaskDraft::default());
        self.status = BoardStatus::Editing;
    }

    /// Open the edit buffer on a cached task. Unknown ids leave the board as is.
    pub fn begin_edit(&mut self, id: TaskId) -> bool {
        let Some(task) = self.tasks.iter().find(|t| t.id == id) else {
            return false;
        };
        self.draft = Some(TaskDraft::from(task));
        self.status = BoardStatus::Editing;
        true
    }

    pub fn cancel_edit(&mut self) {
        self.draft = None;
        self.status = BoardStatus::Idle;
    }

    /// Fetch the full list and replace the cache.
    pub async fn load(&mut self) -> Result<(), BoardError> {
        self.status = BoardStatus::Loading;
        match self.api.list_tasks().await {
            Ok(tasks) => {
                debug!(count = tasks.len(), "loaded tasks");
                self.tasks = tasks;
                self.clamp_selection();
                self.settle();
                Ok(())
            }
            Err(err) => Err(self.fail(err, "Error fetching tasks.", BoardError::Fetch)),
        }
    }

    /// Validate and send a draft, creating or updating depending on its id.
    pub async fn save(&mut self, draft: &TaskDraft) -> Result<(), BoardError> {
        let payload = match validate(draft) {
            Ok(payload) => payload,
            Err(err) => {
                self.notifier.notify(Notice::error(err.to_string()));
                return Err(err.into());
            }
        };

        self.status = BoardStatus::Loading;
        let (result, success) = match draft.id {
            Some(id) => (self.api.update_task(id, &payload).await, "Task updated successfully!"),
            None => (self.api.create_task(&payload).await, "New task added!"),
        };

        match result {
            Ok(()) => {
                info!(id = ?draft.id, name = %payload.name, "saved task");
                self.notifier.notify(Notice::success(success));
                self.draft = None;
                self.reload().await;
                Ok(())
            }
            Err(err) => Err(self.fail(err, "Error saving the task.", BoardError::Save)),
        }
    }

    /// Save whatever is in the edit buffer.
    pub async fn save_draft(&mut self) -> Result<(), BoardError> {
        let draft = self.draft.clone().ok_or(BoardError::NotEditing)?;
        self.save(&draft).await
    }

    pub async fn remove(&mut self, id: TaskId) -> Result<(), BoardError> {
        self.status = BoardStatus::Loading;
        match self.api.delete_task(id).await {
            Ok(()) => {
                info!(id, "deleted task");
                self.notifier.notify(Notice::success("Task deleted successfully!"));
                self.reload().await;
                Ok(())
            }
            Err(err) => Err(self.fail(err, "Error deleting the task.", BoardError::Delete)),
        }
    }

    async fn reload(&mut self) {
        // the mutation stands, only the refresh failed
        if let Err(err) = self.load().await {
            warn!("reload after mutation failed: {}", err);
        }
    }

    fn settle(&mut self) {
        self.status = if self.draft.is_some() {
            BoardStatus::Editing
        } else {
            BoardStatus::Idle
        };
    }

    fn fail(
        &mut self,
        err: ApiError,
        message: &str,
        wrap: fn(ApiError) -> BoardError,
    ) -> BoardError {
        if err.is_unauthorized() {
            debug!("session rejected by the API");
            self.session.clear();
            self.navigator.navigate(Route::Login);
            self.notifier.notify(Notice::info("Session expired. Please log in again."));
            self.draft = None;
            self.status = BoardStatus::Idle;
            return BoardError::SessionExpired;
        }
        debug!("{} {}", message, err);
        self.notifier.notify(Notice::error(message));
        self.status = BoardStatus::Error;
        wrap(err)
    }
}
