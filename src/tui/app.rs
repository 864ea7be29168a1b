use crate::controller::{AuthMode, ViewState};

/// Login form fields
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Create-account form fields
#[derive(Debug, Clone, Default)]
pub struct CreateAccountForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

/// Terminal-side input state. The controller owns everything else.
#[derive(Debug)]
pub struct App {
    pub login: LoginForm,
    pub create: CreateAccountForm,
    /// Path typed on the analysis page
    pub file_input: String,
    /// Index of the focused field on the auth forms
    pub focus: usize,
    /// Is the app running?
    pub running: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            login: LoginForm::default(),
            create: CreateAccountForm::default(),
            file_input: String::new(),
            focus: 0,
            running: true,
        }
    }

    fn field_count(view: ViewState) -> usize {
        match view {
            ViewState::Auth(AuthMode::Login) => 2,
            ViewState::Auth(AuthMode::CreateAccount) => 3,
            ViewState::Analysis(_) => 1,
            ViewState::Dashboard => 0,
        }
    }

    /// The text field receiving keystrokes in `view`
    pub fn active_field_mut(&mut self, view: ViewState) -> Option<&mut String> {
        match (view, self.focus) {
            (ViewState::Auth(AuthMode::Login), 0) => Some(&mut self.login.username),
            (ViewState::Auth(AuthMode::Login), _) => Some(&mut self.login.password),
            (ViewState::Auth(AuthMode::CreateAccount), 0) => Some(&mut self.create.username),
            (ViewState::Auth(AuthMode::CreateAccount), 1) => Some(&mut self.create.password),
            (ViewState::Auth(AuthMode::CreateAccount), _) => {
                Some(&mut self.create.confirm_password)
            }
            (ViewState::Analysis(_), _) => Some(&mut self.file_input),
            (ViewState::Dashboard, _) => None,
        }
    }

    pub fn insert_char(&mut self, view: ViewState, c: char) {
        if let Some(field) = self.active_field_mut(view) {
            field.push(c);
        }
    }

    pub fn delete_char(&mut self, view: ViewState) {
        if let Some(field) = self.active_field_mut(view) {
            field.pop();
        }
    }

    pub fn next_field(&mut self, view: ViewState) {
        let count = Self::field_count(view);
        if count > 0 {
            self.focus = (self.focus + 1) % count;
        }
    }

    pub fn prev_field(&mut self, view: ViewState) {
        let count = Self::field_count(view);
        if count > 0 {
            self.focus = (self.focus + count - 1) % count;
        }
    }

    /// Keep input state in step with the controller's view
    pub fn on_view_change(&mut self, from: ViewState, to: ViewState) {
        self.focus = 0;
        match (from, to) {
            // Logged in: never keep the password around
            (ViewState::Auth(_), ViewState::Dashboard) => {
                self.login = LoginForm::default();
            }
            // Account created: back to a login form with the new name filled in
            (ViewState::Auth(AuthMode::CreateAccount), ViewState::Auth(AuthMode::Login)) => {
                let username = std::mem::take(&mut self.create.username);
                self.create = CreateAccountForm::default();
                if self.login.username.is_empty() {
                    self.login.username = username;
                }
            }
            // Logged out
            (ViewState::Dashboard | ViewState::Analysis(_), ViewState::Auth(_)) => {
                self.clear_forms();
            }
            _ => {}
        }
        self.file_input.clear();
    }

    pub fn clear_forms(&mut self) {
        self.login = LoginForm::default();
        self.create = CreateAccountForm::default();
        self.file_input.clear();
        self.focus = 0;
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }
}

/// Replace every character with a bullet
pub fn mask(secret: &str) -> String {
    "•".repeat(secret.chars().count())
}
