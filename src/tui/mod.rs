// Gateway module for TUI - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod app;
mod input;
mod presenter;
mod render;
mod theme;
mod ui;

// Public re-exports - the ONLY way to access TUI functionality
pub use app::{App, CreateAccountForm, LoginForm};
pub use input::{InputAction, InputHandler};
pub use presenter::TuiPresenter;
pub use ui::run_ui;
