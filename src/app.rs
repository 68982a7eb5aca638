//! Terminal UI state and key handling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::auth::Auth;
use crate::board::TaskBoard;
use crate::navigation::{Navigator, Route, Router};
use crate::notify::Toasts;
use crate::task::Priority;

#[derive(Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub field: usize,
}

impl LoginForm {
    pub const FIELDS: usize = 2;

    fn active(&mut self) -> &mut String {
        match self.field {
            0 => &mut self.email,
            _ => &mut self.password,
        }
    }
}

#[derive(Debug, Default)]
pub struct RegisterForm {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
    pub field: usize,
}

impl RegisterForm {
    pub const FIELDS: usize = 4;

    fn active(&mut self) -> &mut String {
        match self.field {
            0 => &mut self.firstname,
            1 => &mut self.lastname,
            2 => &mut self.email,
            _ => &mut self.password,
        }
    }
}

/// Field of the task editor that has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorField {
    #[default]
    Name,
    Description,
    Priority,
    Tag,
}

impl EditorField {
    const ORDER: [EditorField; 4] = [
        EditorField::Name,
        EditorField::Description,
        EditorField::Priority,
        EditorField::Tag,
    ];

    fn step(self, direction: isize) -> Self {
        let index = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0) as isize;
        Self::ORDER[(index + direction).rem_euclid(Self::ORDER.len() as isize) as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
}

pub struct App {
    pub router: Router,
    pub toasts: Toasts,
    pub board: TaskBoard,
    pub auth: Auth,
    pub login: LoginForm,
    pub register: RegisterForm,
    pub mode: InputMode,
    pub editor_field: EditorField,
    pub should_quit: bool,
}

impl App {
    pub fn new(board: TaskBoard, auth: Auth, router: Router, toasts: Toasts) -> Self {
        Self {
            router,
            toasts,
            board,
            auth,
            login: LoginForm::default(),
            register: RegisterForm::default(),
            mode: InputMode::Normal,
            editor_field: EditorField::Name,
            should_quit: false,
        }
    }

    /// Ask for the board; the guard decides whether we land there or on login.
    pub async fn start(&mut self) {
        self.router.navigate(Route::Board);
        self.enter_board().await;
    }

    async fn enter_board(&mut self) {
        if self.router.current() == Route::Board {
            // errors are surfaced as notices
            let _ = self.board.load().await;
        }
    }

    pub async fn handle_key(&mut self, key: KeyEvent) {
        match self.router.current() {
            Route::Login => self.handle_login_key(key).await,
            Route::Register => self.handle_register_key(key).await,
            Route::Board if self.board.draft().is_some() => self.handle_editor_key(key).await,
            Route::Board if self.mode == InputMode::Search => self.handle_search_key(key),
            Route::Board => self.handle_board_key(key).await,
        }
    }

    async fn handle_login_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('r') if ctrl => self.router.navigate(Route::Register),
            KeyCode::Tab | KeyCode::Down => {
                self.login.field = (self.login.field + 1) % LoginForm::FIELDS
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.login.field = (self.login.field + LoginForm::FIELDS - 1) % LoginForm::FIELDS
            }
            KeyCode::Enter => {
                let (email, password) = (self.login.email.clone(), self.login.password.clone());
                if self.auth.login(&email, &password).await.is_ok() {
                    self.login = LoginForm::default();
                    self.enter_board().await;
                }
            }
            code => edit_text(self.login.active(), code),
        }
    }

    async fn handle_register_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('l') if ctrl => self.router.navigate(Route::Login),
            KeyCode::Tab | KeyCode::Down => {
                self.register.field = (self.register.field + 1) % RegisterForm::FIELDS
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.register.field =
                    (self.register.field + RegisterForm::FIELDS - 1) % RegisterForm::FIELDS
            }
            KeyCode::Enter => {
                let form = &self.register;
                let result = self
                    .auth
                    .register(&form.email, &form.password, &form.firstname, &form.lastname)
                    .await;
                if result.is_ok() {
                    self.register = RegisterForm::default();
                }
            }
            code => edit_text(self.register.active(), code),
        }
    }

    async fn handle_board_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Left => self.board.move_column(-1),
            KeyCode::Right => self.board.move_column(1),
            KeyCode::Up => self.board.move_task(-1),
            KeyCode::Down => self.board.move_task(1),
            KeyCode::Char('/') => self.mode = InputMode::Search,
            KeyCode::Char(c @ '1'..='3') => {
                let index = c as usize - '1' as usize;
                self.board.filter.toggle_priority(Priority::ALL[index]);
                self.board.clamp_selection();
            }
            KeyCode::Char('n') => {
                self.editor_field = EditorField::Name;
                self.board.begin_create();
            }
            KeyCode::Char('e') => {
                if let Some(id) = self.board.selected().map(|t| t.id) {
                    self.editor_field = EditorField::Name;
                    self.board.begin_edit(id);
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.board.selected().map(|t| t.id) {
                    let _ = self.board.remove(id).await;
                }
            }
            KeyCode::Char('r') => {
                let _ = self.board.load().await;
            }
            KeyCode::Char('L') => self.auth.logout(),
            KeyCode::Esc => self.toasts.dismiss(),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.mode = InputMode::Normal,
            code => {
                edit_text(&mut self.board.filter.query, code);
                self.board.clamp_selection();
            }
        }
    }

    async fn handle_editor_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.board.cancel_edit(),
            KeyCode::Enter => {
                let _ = self.board.save_draft().await;
            }
            KeyCode::Tab | KeyCode::Down => self.editor_field = self.editor_field.step(1),
            KeyCode::BackTab | KeyCode::Up => self.editor_field = self.editor_field.step(-1),
            code => {
                let field = self.editor_field;
                let Some(draft) = self.board.draft_mut() else {
                    return;
                };
                let step = match code {
                    KeyCode::Left => -1,
                    KeyCode::Right => 1,
                    _ => 0,
                };
                match field {
                    EditorField::Name => edit_text(&mut draft.name, code),
                    EditorField::Description => edit_text(&mut draft.description, code),
                    EditorField::Priority if step != 0 => {
                        draft.priority = draft.priority.map(|p| p.cycle(step))
                    }
                    EditorField::Tag if step != 0 => draft.tag = draft.tag.map(|t| t.cycle(step)),
                    _ => {}
                }
            }
        }
    }
}

fn edit_text(buf: &mut String, code: KeyCode) {
    match code {
        KeyCode::Char(c) => buf.push(c),
        KeyCode::Backspace => {
            buf.pop();
        }
        _ => {}
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{app, task};
    use super::*;
    use crate::task::{Priority, Tag};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c))).await;
        }
    }

    #[tokio::test]
    async fn start_without_token_lands_on_login() {
        let mut app = app(vec![], false);
        app.start().await;
        assert_eq!(app.router.current(), Route::Login);
    }

    #[tokio::test]
    async fn login_form_opens_and_loads_the_board() {
        let mut app = app(vec![task(1, "A", Priority::High, Tag::Todo)], false);
        app.start().await;

        type_text(&mut app, "me@example.com").await;
        app.handle_key(key(KeyCode::Tab)).await;
        type_text(&mut app, "secret").await;
        assert_eq!(app.login.email, "me@example.com");
        assert_eq!(app.login.password, "secret");

        app.handle_key(key(KeyCode::Enter)).await;
        assert_eq!(app.router.current(), Route::Board);
        assert_eq!(app.board.tasks().len(), 1);
        assert!(app.login.email.is_empty());
    }

    #[tokio::test]
    async fn ctrl_r_switches_to_register() {
        let mut app = app(vec![], false);
        app.start().await;
        app.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL))
            .await;
        assert_eq!(app.router.current(), Route::Register);
    }

    #[tokio::test]
    async fn empty_forms_report_the_missing_field() {
        let mut app = app(vec![], false);
        app.start().await;

        app.handle_key(key(KeyCode::Enter)).await;
        assert_eq!(app.router.current(), Route::Login);
        assert_eq!(app.toasts.latest().unwrap().message, "email is required");

        app.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL))
            .await;
        type_text(&mut app, "Ada").await;
        app.handle_key(key(KeyCode::Enter)).await;
        assert_eq!(app.router.current(), Route::Register);
        assert_eq!(app.register.firstname, "Ada");
        assert_eq!(app.toasts.latest().unwrap().message, "last name is required");
    }

    #[tokio::test]
    async fn search_and_priority_keys_filter_the_board() {
        let mut app = app(
            vec![
                task(1, "Alpha", Priority::High, Tag::Todo),
                task(2, "Beta", Priority::Low, Tag::Todo),
            ],
            true,
        );
        app.start().await;

        app.handle_key(key(KeyCode::Char('/'))).await;
        type_text(&mut app, "bet").await;
        app.handle_key(key(KeyCode::Enter)).await;
        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(app.board.filter.query, "bet");
        assert_eq!(app.board.visible().len(), 1);

        app.handle_key(key(KeyCode::Char('1'))).await;
        assert!(app.board.visible().is_empty());
        app.handle_key(key(KeyCode::Char('1'))).await;
        assert_eq!(app.board.visible().len(), 1);
    }

    #[tokio::test]
    async fn editor_creates_a_task() {
        let mut app = app(vec![], true);
        app.start().await;

        app.handle_key(key(KeyCode::Char('n'))).await;
        type_text(&mut app, "Ship it").await;
        app.handle_key(key(KeyCode::Tab)).await;
        app.handle_key(key(KeyCode::Tab)).await;
        app.handle_key(key(KeyCode::Left)).await;
        assert_eq!(app.board.draft().unwrap().priority, Some(Priority::High));

        app.handle_key(key(KeyCode::Enter)).await;
        assert!(app.board.draft().is_none());
        assert_eq!(app.board.tasks()[0].name, "Ship it");
        assert_eq!(app.board.tasks()[0].priority, Priority::High);
    }

    #[tokio::test]
    async fn delete_key_removes_selected_task() {
        let mut app = app(vec![task(1, "Alpha", Priority::High, Tag::Todo)], true);
        app.start().await;
        app.handle_key(key(KeyCode::Char('d'))).await;
        assert!(app.board.tasks().is_empty());
    }

    #[tokio::test]
    async fn logout_key_returns_to_login() {
        let mut app = app(vec![], true);
        app.start().await;
        app.handle_key(key(KeyCode::Char('L'))).await;
        assert_eq!(app.router.current(), Route::Login);
    }
}
