use std::fmt;

use crate::analysis::AnalysisKind;

/// Which form the auth panel shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMode {
    Login,
    CreateAccount,
}

impl AuthMode {
    /// The other form, reached through the switch link
    pub fn toggle(&self) -> Self {
        match self {
            Self::Login => Self::CreateAccount,
            Self::CreateAccount => Self::Login,
        }
    }
}

/// Top-level containers; exactly one is visible at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Auth,
    Dashboard,
    Analysis,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::Auth, Panel::Dashboard, Panel::Analysis];
}

/// The single active view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewState {
    Auth(AuthMode),
    Dashboard,
    Analysis(AnalysisKind),
}

impl ViewState {
    /// Container that must be visible for this view
    pub fn panel(&self) -> Panel {
        match self {
            Self::Auth(_) => Panel::Auth,
            Self::Dashboard => Panel::Dashboard,
            Self::Analysis(_) => Panel::Analysis,
        }
    }

    /// Visibility of every container for this view
    pub fn visibility(&self) -> [(Panel, bool); 3] {
        let active = self.panel();
        Panel::ALL.map(|panel| (panel, panel == active))
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    pub fn analysis_kind(&self) -> Option<AnalysisKind> {
        match self {
            Self::Analysis(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auth(AuthMode::Login) => f.write_str("login"),
            Self::Auth(AuthMode::CreateAccount) => f.write_str("create account"),
            Self::Dashboard => f.write_str("dashboard"),
            Self::Analysis(kind) => write!(f, "{}", kind.title().to_lowercase()),
        }
    }
}
