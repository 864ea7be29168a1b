use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::analysis::AnalysisKind;
use crate::controller::ViewState;

/// Maps key presses to UI actions for the current view
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Process a key event
    pub fn handle_key(&self, view: ViewState, key: KeyEvent) -> InputAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Global keyboard shortcuts that work in any view
        if ctrl && key.code == KeyCode::Char('c') {
            return InputAction::Quit;
        }

        match view {
            ViewState::Auth(_) => match key.code {
                KeyCode::F(2) => InputAction::SwitchAuthMode,
                KeyCode::Esc => InputAction::DismissMessage,
                KeyCode::Tab | KeyCode::Down => InputAction::NextField,
                KeyCode::BackTab | KeyCode::Up => InputAction::PrevField,
                KeyCode::Enter => InputAction::Submit,
                KeyCode::Backspace => InputAction::Delete,
                KeyCode::Char(c) if !ctrl => InputAction::Insert(c),
                _ => InputAction::None,
            },
            ViewState::Dashboard => match key.code {
                KeyCode::Char('v') => InputAction::OpenAnalysis(AnalysisKind::Vegetation),
                KeyCode::Char('s') => InputAction::OpenAnalysis(AnalysisKind::Soil),
                KeyCode::Char('l') => InputAction::Logout,
                KeyCode::Char('q') => InputAction::Quit,
                _ => InputAction::None,
            },
            ViewState::Analysis(_) => match key.code {
                KeyCode::Char('s') if ctrl => InputAction::SubmitAnalysis,
                KeyCode::Char('l') if ctrl => InputAction::Logout,
                KeyCode::Esc => InputAction::Back,
                KeyCode::Enter => InputAction::Submit,
                KeyCode::Backspace => InputAction::Delete,
                KeyCode::Char(c) if !ctrl => InputAction::Insert(c),
                _ => InputAction::None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    /// Submit the focused form (login, create account, or stage a file)
    Submit,
    Insert(char),
    Delete,
    NextField,
    PrevField,
    SwitchAuthMode,
    OpenAnalysis(AnalysisKind),
    /// Send the staged file for analysis
    SubmitAnalysis,
    Back,
    Logout,
    /// Clear the message bar early
    DismissMessage,
    Quit,
    None,
}
