use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

use crate::constants::UI_REFRESH_INTERVAL_MS;
use crate::controller::{AuthMode, Controller, ViewState};
use crate::tui::app::App;
use crate::tui::input::{InputAction, InputHandler};
use crate::tui::presenter::TuiPresenter;
use crate::tui::render::render_ui;
use crate::utils::SiteScanError;

/// Run the terminal UI
pub async fn run_ui(mut controller: Controller<TuiPresenter>) -> Result<()> {
    // Check if we have an interactive terminal
    if !crossterm::tty::IsTty::is_tty(&io::stdout()) {
        eprintln!("SiteScan requires an interactive terminal.");
        eprintln!("   For one-shot analysis use: sitescan analyze --kind <vegetation|soil> <FILE>");
        return Err(anyhow::anyhow!("No interactive terminal available"));
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new();

    // Run the UI loop
    let res = run_app(&mut terminal, &mut app, &mut controller).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        tracing::error!("UI loop failed: {:?}", err);
    }

    res
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    controller: &mut Controller<TuiPresenter>,
) -> Result<()> {
    let handler = InputHandler::new();
    let backend_name = controller.backend_name();
    let mut last_view = controller.view();

    loop {
        // Background completions (login delay, message expiry, analysis results)
        controller.drain_events();
        sync_view(app, controller, &mut last_view);

        terminal.draw(|f| render_ui(f, app, controller.presenter(), &backend_name))?;

        if event::poll(Duration::from_millis(UI_REFRESH_INTERVAL_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let action = handler.handle_key(controller.view(), key);
                dispatch(app, controller, action).await;
                sync_view(app, controller, &mut last_view);
            }
        }

        if !app.running {
            break;
        }

        // Let spawned tasks make progress between frames
        tokio::task::yield_now().await;
    }

    Ok(())
}

/// Reset input state whenever the controller changed view
fn sync_view(app: &mut App, controller: &Controller<TuiPresenter>, last_view: &mut ViewState) {
    let view = controller.view();
    if view != *last_view {
        app.on_view_change(*last_view, view);
        *last_view = view;
    }
}

/// Apply one UI action to the controller
pub async fn dispatch(
    app: &mut App,
    controller: &mut Controller<TuiPresenter>,
    action: InputAction,
) {
    let view = controller.view();

    let outcome: Result<(), SiteScanError> = match action {
        InputAction::Quit => {
            app.quit();
            Ok(())
        }
        InputAction::Insert(c) => {
            app.insert_char(view, c);
            Ok(())
        }
        InputAction::Delete => {
            app.delete_char(view);
            Ok(())
        }
        InputAction::NextField => {
            app.next_field(view);
            Ok(())
        }
        InputAction::PrevField => {
            app.prev_field(view);
            Ok(())
        }
        InputAction::SwitchAuthMode => match view {
            ViewState::Auth(mode) => controller.switch_auth_mode(mode.toggle()),
            _ => Ok(()),
        },
        InputAction::Submit => match view {
            ViewState::Auth(AuthMode::Login) => {
                let form = app.login.clone();
                controller.login(&form.username, &form.password)
            }
            ViewState::Auth(AuthMode::CreateAccount) => {
                let form = app.create.clone();
                controller.create_account(&form.username, &form.password, &form.confirm_password)
            }
            ViewState::Analysis(_) => {
                let selector = app.file_input.trim().to_string();
                controller.choose_file(&selector).await
            }
            ViewState::Dashboard => Ok(()),
        },
        InputAction::OpenAnalysis(kind) => controller.show_analysis(kind),
        InputAction::SubmitAnalysis => controller.submit(),
        InputAction::Back => controller.back_to_dashboard(),
        InputAction::Logout => controller.logout(),
        InputAction::DismissMessage => {
            controller.clear_message();
            Ok(())
        }
        InputAction::None => Ok(()),
    };

    // User-facing failures were already put in the message bar
    if let Err(err) = outcome {
        tracing::debug!("{} in {} not applied: {}", action_name(&action), view, err);
    }
}

fn action_name(action: &InputAction) -> &'static str {
    match action {
        InputAction::Submit => "submit",
        InputAction::SubmitAnalysis => "analyze",
        InputAction::SwitchAuthMode => "switch form",
        InputAction::OpenAnalysis(_) => "open analysis",
        InputAction::Back => "back",
        InputAction::Logout => "logout",
        InputAction::DismissMessage => "dismiss message",
        _ => "input",
    }
}
