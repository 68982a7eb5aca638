use crate::app::{App, EditorField, InputMode};
use crate::navigation::Route;
use crate::notify::Level;
use crate::stats::{count_by_tag, DashboardSummary};
use crate::task::{Priority, Tag, Task, TaskDraft};
use chrono::{Local, Utc};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(250);
const DESCRIPTION_PREVIEW: usize = 40;
const KEY_HELP: &str =
    "←→↑↓ move  /: search  1-3: filter  n: new  e: edit  d: delete  r: reload  L: logout  q: quit";

/// How a tag column is presented.
pub struct TagMeta {
    pub title: &'static str,
    pub icon: &'static str,
    pub color: Color,
}

pub fn tag_meta(tag: Tag) -> TagMeta {
    match tag {
        Tag::Todo => TagMeta { title: "To do", icon: "○", color: Color::Magenta },
        Tag::InProgress => TagMeta { title: "In Progress", icon: "↻", color: Color::Yellow },
        Tag::Done => TagMeta { title: "Done", icon: "✓", color: Color::Blue },
    }
}

pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

pub async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    app.start().await;
    loop {
        terminal.draw(|f| render(f, app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key).await;
                }
            }
        }
        if app.should_quit {
            return Ok(());
        }
    }
}

pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    match app.router.current() {
        Route::Login => render_login(f, app, chunks[0]),
        Route::Register => render_register(f, app, chunks[0]),
        Route::Board => {
            render_board(f, app, chunks[0]);
            if let Some(draft) = app.board.draft() {
                render_editor(f, draft, app.editor_field, chunks[0]);
            }
        }
    }
    render_status(f, app, chunks[1]);
}

fn render_login(f: &mut Frame, app: &App, area: Rect) {
    let form = &app.login;
    let masked = "*".repeat(form.password.chars().count());
    let lines = vec![
        field_line("Email", &form.email, form.field == 0),
        field_line("Password", &masked, form.field == 1),
        Line::raw(""),
        Line::styled(
            "Enter: login  Tab: next field  Ctrl-R: register  Esc: quit",
            Style::default().fg(Color::DarkGray),
        ),
    ];
    let block = Block::default().title("Login").borders(Borders::ALL);
    f.render_widget(Paragraph::new(lines).block(block), centered_rect(60, 6, area));
}

fn render_register(f: &mut Frame, app: &App, area: Rect) {
    let form = &app.register;
    let masked = "*".repeat(form.password.chars().count());
    let lines = vec![
        field_line("First Name", &form.firstname, form.field == 0),
        field_line("Last Name", &form.lastname, form.field == 1),
        field_line("Email", &form.email, form.field == 2),
        field_line("Password", &masked, form.field == 3),
        Line::raw(""),
        Line::styled(
            "Enter: register  Tab: next field  Ctrl-L: login  Esc: quit",
            Style::default().fg(Color::DarkGray),
        ),
    ];
    let block = Block::default().title("Register").borders(Borders::ALL);
    f.render_widget(Paragraph::new(lines).block(block), centered_rect(60, 8, area));
}

fn field_line<'a>(label: &'a str, value: &'a str, active: bool) -> Line<'a> {
    let style = if active {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(format!("{:<12}", label), style),
        Span::raw(value),
        Span::styled(if active { "_" } else { "" }, style),
    ])
}

fn render_board(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(11),
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    render_columns(f, app, chunks[1]);
    render_dashboard(f, app.board.tasks(), chunks[2]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let filter = &app.board.filter;
    let searching = app.mode == InputMode::Search;
    let mut spans = vec![
        Span::styled("Search: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("{}{}", filter.query, if searching { "_" } else { "" }),
            if searching {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            },
        ),
        Span::raw("   Filter: "),
    ];
    for (i, priority) in Priority::ALL.iter().enumerate() {
        let checked = filter.priorities.contains(priority);
        spans.push(Span::styled(
            format!("[{}] {}:{}  ", if checked { "x" } else { " " }, i + 1, priority),
            Style::default().fg(priority_color(*priority)),
        ));
    }

    let block = Block::default()
        .title("Tasks - All your tasks here!")
        .borders(Borders::ALL);
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_columns(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(area);

    for (i, tag) in Tag::ALL.iter().enumerate() {
        let meta = tag_meta(*tag);
        let tasks = app.board.visible_by_tag(*tag);
        let items: Vec<ListItem> = tasks.iter().map(|t| task_item(t, &meta)).collect();

        let focused = app.board.selected_tag == i;
        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!(
                        "{} ({})",
                        meta.title,
                        count_by_tag(app.board.tasks(), *tag)
                    ))
                    .borders(Borders::ALL)
                    .border_style(if focused {
                        Style::default().fg(Color::Cyan)
                    } else {
                        Style::default()
                    }),
            )
            .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));

        let mut state = ListState::default();
        if focused && !tasks.is_empty() {
            state.select(Some(app.board.selected_task));
        }
        f.render_stateful_widget(list, chunks[i], &mut state);
    }
}

fn task_item<'a>(task: &'a Task, meta: &TagMeta) -> ListItem<'a> {
    let description = task.description.as_deref().unwrap_or_default();
    let preview: String = if description.chars().count() > DESCRIPTION_PREVIEW {
        let cut: String = description.chars().take(DESCRIPTION_PREVIEW - 1).collect();
        format!("{}…", cut)
    } else {
        description.to_string()
    };

    ListItem::new(vec![
        Line::from(vec![
            Span::styled(format!("{} ", meta.icon), Style::default().fg(meta.color)),
            Span::styled(&task.name, Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::styled(preview, Style::default().fg(Color::Gray)),
        Line::from(vec![
            Span::styled(
                format!(" {} ", task.priority),
                Style::default().fg(Color::Black).bg(priority_color(task.priority)),
            ),
            Span::styled(
                format!(
                    "  {}",
                    task.updated_at.with_timezone(&Local).format("%Y-%m-%d")
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    ])
}

fn render_dashboard(f: &mut Frame, tasks: &[Task], area: Rect) {
    let summary = DashboardSummary::compute(tasks, Utc::now());
    let block = Block::default().title("Dashboard Statistics").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1), Constraint::Min(3)])
        .split(inner);

    let mut totals = vec![Span::styled(
        format!("Total Tasks: {}", summary.total),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for share in &summary.priorities {
        totals.push(Span::styled(
            format!("   {} Priority: {}", share.priority, share.count),
            Style::default().fg(priority_color(share.priority)),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(totals)), rows[0]);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let progress: Vec<(String, f64, Color)> = summary
        .progress
        .iter()
        .map(|p| {
            let meta = tag_meta(p.tag);
            (format!("{} {}", meta.title, p.this_week), p.percent, meta.color)
        })
        .collect();
    render_gauges(f, "Task Progress (this week)", &progress, halves[0]);

    let distribution: Vec<(String, f64, Color)> = summary
        .priorities
        .iter()
        .map(|s| {
            (
                format!("{} Priority {}", s.priority, s.count),
                s.percent,
                priority_color(s.priority),
            )
        })
        .collect();
    render_gauges(f, "Priority Distribution (all tasks)", &distribution, halves[1]);
}

fn render_gauges(f: &mut Frame, title: &str, rows: &[(String, f64, Color)], area: Rect) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1); rows.len()])
        .split(inner);

    for ((label, percent, color), chunk) in rows.iter().zip(chunks.iter()) {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(*color))
            .ratio((percent / 100.0).clamp(0.0, 1.0))
            .label(format!("{} ({:.0}%)", label, percent));
        f.render_widget(gauge, *chunk);
    }
}

fn render_editor(f: &mut Frame, draft: &TaskDraft, active: EditorField, area: Rect) {
    let title = if draft.is_new() { "New Task" } else { "Edit Task" };
    let priority = draft.priority.map(|p| p.to_string()).unwrap_or_default();
    let tag = draft.tag.map(|t| t.to_string()).unwrap_or_default();
    let lines = vec![
        field_line("Name", &draft.name, active == EditorField::Name),
        field_line("Description", &draft.description, active == EditorField::Description),
        field_line("Priority", &priority, active == EditorField::Priority),
        field_line("Tag", &tag, active == EditorField::Tag),
        Line::raw(""),
        Line::styled(
            format!(
                "{}/{}  Enter: {}  Tab: next  ←/→: change  Esc: cancel",
                draft.description.chars().count(),
                crate::task::MAX_DESCRIPTION_LEN,
                if draft.is_new() { "add" } else { "update" },
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    let rect = centered_rect(70, 8, area);
    f.render_widget(Clear, rect);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(Paragraph::new(lines).block(block), rect);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();
    if let Some(notice) = app.toasts.latest() {
        let color = match notice.level {
            Level::Success => Color::Green,
            Level::Info => Color::Cyan,
            Level::Error => Color::Red,
        };
        spans.push(Span::styled(notice.message, Style::default().fg(color)));
        spans.push(Span::raw("  "));
    }
    // the login and register forms carry their own key hints
    if app.router.current() == Route::Board {
        spans.push(Span::styled(KEY_HELP, Style::default().fg(Color::DarkGray)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
