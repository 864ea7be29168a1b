use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::analysis::AnalysisKind;
use crate::constants::PREVIEW_DATA_URL_CHARS;
use crate::controller::{AuthMode, Panel, ViewState};
use crate::tui::app::{mask, App};
use crate::tui::presenter::TuiPresenter;
use crate::tui::theme::Theme;

/// Render the main UI
pub fn render_ui(frame: &mut Frame, app: &App, view: &TuiPresenter, backend_name: &str) {
    let theme = Theme::default();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints(
            [
                Constraint::Length(3), // Header
                Constraint::Min(10),   // Active panel
                Constraint::Length(3), // Message bar
                Constraint::Length(1), // Key hints
            ]
            .as_ref() as &[Constraint],
        )
        .split(frame.area());

    render_header(frame, chunks[0], view, backend_name, &theme);

    match view.visible_panel() {
        Some(Panel::Auth) => render_auth(frame, chunks[1], app, view, &theme),
        Some(Panel::Dashboard) => render_dashboard(frame, chunks[1], view, &theme),
        Some(Panel::Analysis) => render_analysis(frame, chunks[1], app, view, &theme),
        None => {}
    }

    render_message_bar(frame, chunks[2], view, &theme);
    render_hints(frame, chunks[3], view, &theme);
}

fn render_header(
    frame: &mut Frame,
    area: Rect,
    view: &TuiPresenter,
    backend_name: &str,
    theme: &Theme,
) {
    let mut spans = vec![
        Span::styled("SiteScan", theme.title()),
        Span::raw(" | Backend: "),
        Span::styled(backend_name.to_string(), Style::default().fg(Color::Green)),
    ];
    if let Some(username) = &view.username {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(username.clone(), theme.hint()));
    }

    let header = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(theme.border(false)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(header, area);
}

/// One labelled input line
fn field_line<'a>(label: &'a str, value: String, focused: bool, theme: &Theme) -> Line<'a> {
    let marker = if focused { "> " } else { "  " };
    let value_style = if focused {
        Style::default()
            .fg(theme.text_primary)
            .add_modifier(Modifier::UNDERLINED)
    } else {
        Style::default().fg(theme.text_primary)
    };
    let cursor = if focused { "_" } else { "" };

    Line::from(vec![
        Span::styled(marker, Style::default().fg(theme.border_focused)),
        Span::styled(format!("{:<18}", label), theme.hint()),
        Span::styled(value, value_style),
        Span::styled(cursor, Style::default().fg(theme.border_focused)),
    ])
}

fn render_auth(frame: &mut Frame, area: Rect, app: &App, view: &TuiPresenter, theme: &Theme) {
    let mode = match view.view {
        ViewState::Auth(mode) => mode,
        _ => AuthMode::Login,
    };

    let (title, mut lines, switch_hint) = match mode {
        AuthMode::Login => (
            " Login ",
            vec![
                field_line("Username", app.login.username.clone(), app.focus == 0, theme),
                field_line("Password", mask(&app.login.password), app.focus == 1, theme),
            ],
            "No account? Press F2 to create one.",
        ),
        AuthMode::CreateAccount => (
            " Create Account ",
            vec![
                field_line("Username", app.create.username.clone(), app.focus == 0, theme),
                field_line("Password", mask(&app.create.password), app.focus == 1, theme),
                field_line(
                    "Confirm password",
                    mask(&app.create.confirm_password),
                    app.focus == 2,
                    theme,
                ),
            ],
            "Already have an account? Press F2 to log in.",
        ),
    };

    lines.insert(0, Line::from(""));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(switch_hint, theme.hint())));

    let form = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(title, theme.title()))
            .borders(Borders::ALL)
            .border_style(theme.border(true)),
    );

    frame.render_widget(form, centered(area, 60, 9));
}

fn render_dashboard(frame: &mut Frame, area: Rect, view: &TuiPresenter, theme: &Theme) {
    let username = view.username.as_deref().unwrap_or("");

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("Welcome, "),
            Span::styled(username.to_string(), theme.title()),
            Span::raw("!"),
        ]),
        Line::from(""),
    ];
    for (key, kind) in [('v', AnalysisKind::Vegetation), ('s', AnalysisKind::Soil)] {
        lines.push(Line::from(vec![
            Span::styled(format!("  [{}] ", key), Style::default().fg(theme.border_focused)),
            Span::raw(kind.title()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  [l] ", Style::default().fg(theme.border_focused)),
        Span::raw("Logout"),
    ]));

    let dashboard = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(" Dashboard ", theme.title()))
            .borders(Borders::ALL)
            .border_style(theme.border(false)),
    );

    frame.render_widget(dashboard, centered(area, 60, 10));
}

fn render_analysis(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    view: &TuiPresenter,
    theme: &Theme,
) {
    let title = view
        .view
        .analysis_kind()
        .map(|kind| kind.title())
        .unwrap_or("Analysis");

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3), // File input
                Constraint::Length(5), // Preview
                Constraint::Min(4),    // Result
            ]
            .as_ref() as &[Constraint],
        )
        .split(area);

    // File input
    let input = Paragraph::new(Line::from(vec![
        Span::raw(app.file_input.clone()),
        Span::styled("_", Style::default().fg(theme.border_focused)),
    ]))
    .block(
        Block::default()
            .title(Span::styled(format!(" {} | Image path ", title), theme.title()))
            .borders(Borders::ALL)
            .border_style(theme.border(!view.busy)),
    );
    frame.render_widget(input, chunks[0]);

    // Preview
    let preview_lines = match &view.preview {
        Some(preview) => vec![
            Line::from(vec![
                Span::styled("File: ", theme.hint()),
                Span::raw(preview.file_name.clone()),
                Span::styled(format!("  ({})", format_size(preview.size)), theme.hint()),
            ]),
            Line::from(vec![
                Span::styled("Data: ", theme.hint()),
                Span::raw(truncate_data_url(&preview.data_url, PREVIEW_DATA_URL_CHARS)),
            ]),
            Line::from(Span::styled(
                if view.busy { "Uploading..." } else { "Ready. Press Ctrl+S to submit." },
                theme.hint(),
            )),
        ],
        None => vec![Line::from(Span::styled("No image selected.", theme.hint()))],
    };
    let preview = Paragraph::new(preview_lines).block(
        Block::default()
            .title(" Preview ")
            .borders(Borders::ALL)
            .border_style(theme.border(false)),
    );
    frame.render_widget(preview, chunks[1]);

    // Result
    let (heading, body) = view.result.lines();
    let mut lines = Vec::new();
    if let Some(heading) = heading {
        lines.push(Line::from(Span::styled(heading, theme.title())));
    }
    lines.extend(body.into_iter().map(Line::from));

    let result = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" Result ")
                .borders(Borders::ALL)
                .border_style(theme.border(false)),
        );
    frame.render_widget(result, chunks[2]);
}

fn render_message_bar(frame: &mut Frame, area: Rect, view: &TuiPresenter, theme: &Theme) {
    let (text, color) = match &view.message {
        Some(message) => (
            format!("[{}] {}", message.shown_at.format("%H:%M:%S"), message.text),
            theme.severity_color(message.severity),
        ),
        None => (String::new(), theme.text_secondary),
    };

    let bar = Paragraph::new(Span::styled(
        text,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(theme.border(false)),
    );

    frame.render_widget(bar, area);
}

fn render_hints(frame: &mut Frame, area: Rect, view: &TuiPresenter, theme: &Theme) {
    let hints = match view.visible_panel() {
        Some(Panel::Auth) => {
            "Tab: next field | Enter: submit | F2: switch form | Esc: dismiss message | Ctrl+C: quit"
        },
        Some(Panel::Dashboard) => "v: vegetation | s: soil | l: logout | Ctrl+C: quit",
        Some(Panel::Analysis) => {
            "Enter: select file | Ctrl+S: analyze | Esc: back | Ctrl+L: logout | Ctrl+C: quit"
        }
        None => "",
    };
    frame.render_widget(Paragraph::new(Span::styled(hints, theme.hint())), area);
}

/// A box of at most `width` x `height`, centred horizontally at the top of `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + 1.min(area.height - height),
        width,
        height,
    }
}

/// Shorten a data URL for display, keeping its prefix
pub fn truncate_data_url(url: &str, max_chars: usize) -> String {
    if url.chars().count() <= max_chars {
        return url.to_string();
    }
    let head: String = url.chars().take(max_chars).collect();
    format!("{}...", head)
}

/// Human-readable byte count
pub fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    let bytes_f = bytes as f64;
    if bytes_f < KB {
        format!("{} B", bytes)
    } else if bytes_f < KB * KB {
        format!("{:.1} KB", bytes_f / KB)
    } else {
        format!("{:.1} MB", bytes_f / (KB * KB))
    }
}
