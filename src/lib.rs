//! Terminal client for a remote task-management API: login and registration,
//! a kanban board with search and priority filters, and dashboard statistics.

pub mod api;
pub mod app;
pub mod auth;
pub mod board;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod navigation;
pub mod notify;
pub mod session;
pub mod stats;
pub mod task;
pub mod ui;

pub use api::{ApiClient, AuthApi, TaskApi};
pub use board::{BoardStatus, TaskBoard};
pub use error::{ApiError, AuthError, BoardError, ValidationError};
pub use filter::{filter, FilterState};
pub use session::Session;
pub use stats::{priority_distribution, weekly_progress};
pub use task::{Priority, Tag, Task, TaskDraft};
