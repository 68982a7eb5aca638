use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::api::ApiClient;
use crate::auth::Auth;
use crate::board::TaskBoard;
use crate::config::Config;
use crate::navigation::Router;
use crate::notify::{ConsoleNotifier, Notifier};
use crate::session::Session;
use crate::stats::DashboardSummary;
use crate::task::{Priority, Tag, TaskDraft, TaskId};

#[derive(Parser, Debug)]
#[command(name = "taskboard", version, about = "Terminal task board for a remote task API")]
pub struct Cli {
    /// Base URL of the task API (overrides config and TASKBOARD_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive board (default)
    Board,
    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        firstname: String,
        #[arg(long)]
        lastname: String,
    },
    /// Forget the stored session token
    Logout,
    /// List tasks grouped by tag
    List {
        /// Case-insensitive name filter
        #[arg(long, short)]
        query: Option<String>,
        /// Only show these priorities (repeatable)
        #[arg(long, short)]
        priority: Vec<Priority>,
    },
    /// Add a new task
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "Medium")]
        priority: Priority,
        #[arg(long, default_value = "To do")]
        tag: Tag,
    },
    /// Change fields of an existing task
    Edit {
        id: TaskId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        tag: Option<Tag>,
    },
    /// Delete a task
    Delete { id: TaskId },
    /// Show dashboard statistics
    Stats,
}

/// Collaborators shared by every command.
pub struct Services {
    pub session: Session,
    pub api: Arc<ApiClient>,
    pub router: Router,
    pub notifier: Arc<dyn Notifier>,
}

impl Services {
    pub fn new(config: &Config, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let session = Session::load(&config.session_path()?);
        let api = Arc::new(ApiClient::new(config, session.clone())?);
        Ok(Self {
            router: Router::new(session.clone()),
            session,
            api,
            notifier,
        })
    }

    pub fn console(config: &Config) -> Result<Self> {
        Self::new(config, Arc::new(ConsoleNotifier))
    }

    pub fn board(&self) -> TaskBoard {
        TaskBoard::new(
            self.api.clone(),
            self.session.clone(),
            Arc::new(self.router.clone()),
            self.notifier.clone(),
        )
    }

    pub fn auth(&self) -> Auth {
        Auth::new(
            self.api.clone(),
            self.session.clone(),
            Arc::new(self.router.clone()),
            self.notifier.clone(),
        )
    }

    fn require_session(&self) -> Result<()> {
        if !self.session.is_authenticated() {
            bail!("not logged in; run `taskboard login` first");
        }
        Ok(())
    }
}

pub async fn run(ctx: &Services, command: Commands) -> Result<()> {
    match command {
        Commands::Board => bail!("the board command needs a terminal"),
        Commands::Login { email, password } => {
            ctx.auth().login(&email, &password).await?;
            println!("Logged in as {}", email);
        }
        Commands::Register {
            email,
            password,
            firstname,
            lastname,
        } => {
            ctx.auth()
                .register(&email, &password, &firstname, &lastname)
                .await?;
        }
        Commands::Logout => {
            ctx.auth().logout();
            println!("Logged out");
        }
        Commands::List { query, priority } => {
            ctx.require_session()?;
            let mut board = ctx.board();
            board.load().await?;
            board.filter.query = query.unwrap_or_default();
            board.filter.priorities = priority.into_iter().collect();
            list_tasks(&board);
        }
        Commands::Add {
            name,
            description,
            priority,
            tag,
        } => {
            ctx.require_session()?;
            let draft = TaskDraft {
                id: None,
                name,
                description,
                priority: Some(priority),
                tag: Some(tag),
            };
            ctx.board().save(&draft).await?;
        }
        Commands::Edit {
            id,
            name,
            description,
            priority,
            tag,
        } => {
            ctx.require_session()?;
            let mut board = ctx.board();
            board.load().await?;
            if !board.begin_edit(id) {
                bail!("no task with id {}", id);
            }
            let draft = board.draft_mut().context("edit buffer missing")?;
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if priority.is_some() {
                draft.priority = priority;
            }
            if tag.is_some() {
                draft.tag = tag;
            }
            board.save_draft().await?;
        }
        Commands::Delete { id } => {
            ctx.require_session()?;
            ctx.board().remove(id).await?;
        }
        Commands::Stats => {
            ctx.require_session()?;
            let mut board = ctx.board();
            board.load().await?;
            show_stats(&DashboardSummary::compute(board.tasks(), chrono::Utc::now()));
        }
    }
    Ok(())
}

fn list_tasks(board: &TaskBoard) {
    for tag in Tag::ALL {
        println!("{}:", tag);
        for task in board.visible_by_tag(tag) {
            println!(
                "- [#{}] {} ({}, updated {})",
                task.id,
                task.name,
                task.priority,
                task.updated_at.with_timezone(&chrono::Local).format("%Y-%m-%d")
            );
            if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
                println!("    {}", description);
            }
        }
    }
}

fn show_stats(summary: &DashboardSummary) {
    println!("Total Tasks: {}", summary.total);
    for share in &summary.priorities {
        println!(
            "{} Priority: {} ({:.0}%)",
            share.priority, share.count, share.percent
        );
    }
    println!("This week:");
    for progress in &summary.progress {
        println!(
            "  {}: {} ({:.0}%)",
            progress.tag, progress.this_week, progress.percent
        );
    }
}
