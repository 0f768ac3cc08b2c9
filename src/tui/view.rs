//! Pure rendering: project the wizard state onto ratatui widgets.
//!
//! Each step has a dedicated body builder; `render()` dispatches on
//! the current step. Builders are pure (state in, lines out); the only
//! effect is `Frame::render_widget()` writing the terminal buffer.
//! Nothing here feeds back into the state machine.

use std::collections::BTreeSet;

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use super::state::{
    App, Step, TextConfirm, ALIAS_CHOICES, PACKAGE_MANAGER_CHOICES,
    SHORTCUT_CHOICES, SPINNER_FRAMES, UNINSTALL_CHOICES,
};
use super::theme;

// ============================================================================
// BANNER
// ============================================================================

const BANNER: [&str; 5] = [
    r"  _   _ _           _               ",
    r" | \ | (_)_ __ ___ | |__  _   _ ___ ",
    r" |  \| | | '_ ` _ \| '_ \| | | / __|",
    r" | |\  | | | | | | | |_) | |_| \__ \",
    r" |_| \_|_|_| |_| |_|_.__/ \__,_|___/",
];

/// Banner art plus subtitle and a separating blank line.
const BANNER_HEIGHT: u16 = BANNER.len() as u16 + 2;

fn banner() -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = BANNER
        .iter()
        .map(|row| Line::from(Span::styled(*row, theme::STYLE_BANNER)))
        .collect();
    lines.push(Line::from(Span::styled(
        format!("         Desktop Setup v{}", env!("CARGO_PKG_VERSION")),
        theme::STYLE_DIM,
    )));
    lines.push(Line::from(""));
    lines
}

// ============================================================================
// DISPATCH
// ============================================================================

/// Render the current screen to the terminal frame.
pub fn render(app: &App, frame: &mut Frame) {
    let chunks = Layout::vertical([
        Constraint::Length(BANNER_HEIGHT),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .split(frame.area());

    frame.render_widget(Paragraph::new(banner()), chunks[0]);
    render_body(app, frame, chunks[1]);
    frame.render_widget(
        Paragraph::new(Span::styled(help_text(app.step), theme::STYLE_HELP)),
        chunks[2],
    );
}

fn render_body(app: &App, frame: &mut Frame, area: Rect) {
    let lines = match app.step {
        Step::Menu => list_body("Main Menu", Step::Menu, app, false),
        Step::ChoosePackageManager => {
            list_body("Step 1: Select package manager", app.step, app, true)
        }
        Step::CheckingRequirements => checking_body(app),
        Step::ChooseAliases => {
            checkbox_body("Step 3: Select aliases", ALIAS_CHOICES, &app.aliases, app.cursor)
        }
        Step::ChooseShortcuts => checkbox_body(
            "Step 4: Shortcut options",
            SHORTCUT_CHOICES,
            &app.shortcuts,
            app.cursor,
        ),
        Step::ConfirmInstall => confirm_install_body(app),
        Step::Installing => {
            run_body("Installing Nimbus Desktop...", app.progress.fraction(), app.viewport.0)
        }
        Step::InstallDone => done_body("✓ Installation complete!"),
        Step::ConfirmUninstallText => confirm_uninstall_body(&app.confirm),
        Step::ChooseUninstallOptions => checkbox_body(
            "Step 2: Uninstall options",
            UNINSTALL_CHOICES,
            &app.uninstall_options,
            app.cursor,
        ),
        Step::Uninstalling => {
            run_body("Removing components...", app.progress.fraction(), app.viewport.0)
        }
        Step::UninstallDone => done_body("Nimbus Desktop has been removed."),
        Step::SystemInfo => system_info_body(app),
    };

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

/// Help line showing the key bindings active on the current step.
fn help_text(step: Step) -> &'static str {
    match step {
        Step::Menu => "↑/↓ navigate  Enter select  q quit",
        Step::ChoosePackageManager => "↑/↓ navigate  Enter continue  Esc back",
        Step::CheckingRequirements => "^C quit",
        Step::ChooseAliases | Step::ChooseShortcuts | Step::ChooseUninstallOptions => {
            "↑/↓ move  Space toggle  Enter continue  Esc back"
        }
        Step::ConfirmInstall => "Enter install  Esc back",
        Step::Installing | Step::Uninstalling => "",
        Step::InstallDone | Step::UninstallDone => "Enter menu",
        Step::ConfirmUninstallText => "Enter confirm  Esc cancel",
        Step::SystemInfo => "Enter/Esc back",
    }
}

// ============================================================================
// LIST SCREENS (menu, single choice)
// ============================================================================

/// Plain cursor list. With `radio` set, rows carry single-choice
/// markers filled on the focused row.
fn list_body(title: &str, step: Step, app: &App, radio: bool) -> Vec<Line<'static>> {
    let choices = step.choices().unwrap_or_default();
    let mut lines = vec![
        Line::from(Span::styled(title.to_string(), theme::STYLE_TITLE)),
        Line::from(""),
    ];

    for (i, choice) in choices.iter().enumerate() {
        let focused = i == app.cursor;
        let marker = match (radio, focused) {
            (true, true) => "(x) ",
            (true, false) => "( ) ",
            (false, _) => "",
        };
        let pointer = if focused { ">" } else { " " };
        let text = format!("  {} {}{}", pointer, marker, choice);
        let line = if focused {
            Line::from(Span::styled(text, theme::STYLE_CURSOR))
        } else {
            Line::from(text)
        };
        lines.push(line);
    }
    lines
}

// ============================================================================
// CHECKBOX SCREENS
// ============================================================================

fn checkbox_body(
    title: &str,
    choices: &'static [&'static str],
    selected: &BTreeSet<usize>,
    cursor: usize,
) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(title.to_string(), theme::STYLE_TITLE)),
        Line::from(""),
    ];

    for (i, choice) in choices.iter().enumerate() {
        let focused = i == cursor;
        let pointer = if focused { ">" } else { " " };
        let checkbox = if selected.contains(&i) {
            Span::styled("[x] ", theme::STYLE_CHECKED)
        } else {
            Span::styled("[ ] ", theme::STYLE_UNCHECKED)
        };

        let label = if focused {
            Span::styled((*choice).to_string(), theme::STYLE_CURSOR)
        } else {
            Span::raw(*choice)
        };
        lines.push(Line::from(vec![
            Span::raw(format!("  {} ", pointer)),
            checkbox,
            label,
        ]));
    }
    lines
}

// ============================================================================
// REQUIREMENTS CHECK
// ============================================================================

fn checking_body(app: &App) -> Vec<Line<'static>> {
    let frame = SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()];
    vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  {} ", frame), theme::STYLE_ACCENT),
            Span::raw("Checking system requirements..."),
        ]),
        Line::from(""),
        Line::from(Span::styled("  This only takes a moment.", theme::STYLE_DIM)),
    ]
}

// ============================================================================
// INSTALL CONFIRMATION
// ============================================================================

fn confirm_install_body(app: &App) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled("Step 5: Confirm", theme::STYLE_TITLE)),
        Line::from(""),
        Line::from("  Ready to install Nimbus Desktop."),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "  Package manager:  {}",
                PACKAGE_MANAGER_CHOICES[app.package_manager % PACKAGE_MANAGER_CHOICES.len()]
            ),
            theme::STYLE_DIM,
        )),
        Line::from(Span::styled(
            format!("  Aliases:          {}", selected_labels(ALIAS_CHOICES, &app.aliases)),
            theme::STYLE_DIM,
        )),
        Line::from(Span::styled(
            format!("  Shortcuts:        {}", selected_labels(SHORTCUT_CHOICES, &app.shortcuts)),
            theme::STYLE_DIM,
        )),
        Line::from(""),
        Line::from("  Press Enter to begin installation."),
    ]
}

/// Comma-joined labels of the selected indices, or "none".
fn selected_labels(choices: &[&str], selected: &BTreeSet<usize>) -> String {
    let labels: Vec<&str> = selected.iter().filter_map(|&i| choices.get(i).copied()).collect();
    if labels.is_empty() {
        "none".to_string()
    } else {
        labels.join(", ")
    }
}

// ============================================================================
// SIMULATED RUNS
// ============================================================================

fn run_body(title: &str, fraction: f64, viewport_width: u16) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(format!("  {}", title)),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", progress_line(fraction, viewport_width)),
            theme::STYLE_PROGRESS,
        )),
    ]
}

/// Text progress bar sized to the viewport, like `[████░░░░]  45%`.
fn progress_line(fraction: f64, viewport_width: u16) -> String {
    let bar_width = (viewport_width.saturating_sub(10) as usize).clamp(10, 40);
    let filled = (bar_width as f64 * fraction).round() as usize;
    let filled = filled.min(bar_width);
    format!(
        "[{}{}] {:>3}%",
        "█".repeat(filled),
        "░".repeat(bar_width - filled),
        (fraction * 100.0).round() as u32
    )
}

fn done_body(message: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {}", message), theme::STYLE_SUCCESS)),
        Line::from(""),
        Line::from(Span::styled(
            "  Press Enter to return to the menu.",
            theme::STYLE_DIM,
        )),
    ]
}

// ============================================================================
// UNINSTALL CONFIRMATION
// ============================================================================

fn confirm_uninstall_body(confirm: &TextConfirm) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            "  Are you sure you want to uninstall Nimbus Desktop?",
            theme::STYLE_WARNING,
        )),
        Line::from(Span::styled(
            "  This will remove the selected components.",
            theme::STYLE_WARNING,
        )),
        Line::from(""),
        Line::from("  Type 'yes' to confirm:"),
        Line::from(""),
        Line::from(input_spans(confirm)),
    ]
}

/// The input row: prompt, buffer with a visible cursor cell, and a
/// placeholder while the buffer is empty.
fn input_spans(confirm: &TextConfirm) -> Vec<Span<'static>> {
    let mut spans = vec![Span::raw("  > ")];

    if confirm.value().is_empty() {
        spans.push(Span::styled(" ", theme::STYLE_INPUT_CURSOR));
        spans.push(Span::styled(" type 'yes'", theme::STYLE_DIM));
        return spans;
    }

    let chars: Vec<char> = confirm.value().chars().collect();
    let cursor = confirm.cursor().min(chars.len());

    let before: String = chars[..cursor].iter().collect();
    if !before.is_empty() {
        spans.push(Span::raw(before));
    }
    if cursor < chars.len() {
        spans.push(Span::styled(chars[cursor].to_string(), theme::STYLE_INPUT_CURSOR));
        let after: String = chars[cursor + 1..].iter().collect();
        if !after.is_empty() {
            spans.push(Span::raw(after));
        }
    } else {
        spans.push(Span::styled(" ", theme::STYLE_INPUT_CURSOR));
    }
    spans
}

// ============================================================================
// SYSTEM INFO
// ============================================================================

fn system_info_body(app: &App) -> Vec<Line<'static>> {
    let package_manager = app
        .system
        .package_manager
        .clone()
        .unwrap_or_else(|| "none found".to_string());
    let install_target = app
        .system
        .install_dir
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    vec![
        Line::from(Span::styled(" SYSTEM INFORMATION ", theme::STYLE_HEADER)),
        Line::from(""),
        Line::from(format!("  OS:               {}", app.system.os)),
        Line::from(format!("  Architecture:     {}", app.system.arch)),
        Line::from(format!("  Package manager:  {}", package_manager)),
        Line::from(format!("  Install target:   {}", install_target)),
        Line::from(format!("  Installer:        v{}", env!("CARGO_PKG_VERSION"))),
        Line::from(format!("  Date:             {}", app.system.date)),
        Line::from(""),
        Line::from(Span::styled("  Press Enter or Esc to return.", theme::STYLE_DIM)),
    ]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::SystemReport;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn make_terminal() -> Terminal<TestBackend> {
        let backend = TestBackend::new(80, 24);
        Terminal::new(backend).unwrap()
    }

    fn test_app() -> App {
        let mut app = App::new(SystemReport {
            os: "linux",
            arch: "x86_64",
            package_manager: Some("pnpm".to_string()),
            install_dir: Some("/home/test/.local/share/nimbus".into()),
            date: "2026-08-07".to_string(),
        });
        app.viewport = (80, 24);
        app
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol().to_string())
            .collect()
    }

    #[test]
    fn every_step_renders_without_panic() {
        let steps = [
            Step::Menu,
            Step::ChoosePackageManager,
            Step::CheckingRequirements,
            Step::ChooseAliases,
            Step::ChooseShortcuts,
            Step::ConfirmInstall,
            Step::Installing,
            Step::InstallDone,
            Step::ConfirmUninstallText,
            Step::ChooseUninstallOptions,
            Step::Uninstalling,
            Step::UninstallDone,
            Step::SystemInfo,
        ];
        let mut terminal = make_terminal();
        for step in steps {
            let mut app = test_app();
            app.step = step;
            terminal
                .draw(|frame| render(&app, frame))
                .expect("every step should render");
        }
    }

    #[test]
    fn menu_shows_all_entries() {
        let mut terminal = make_terminal();
        let app = test_app();
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Main Menu"));
        assert!(text.contains("Install / Update Nimbus Desktop"));
        assert!(text.contains("Uninstall"));
        assert!(text.contains("System Info"));
        assert!(text.contains("Exit"));
    }

    #[test]
    fn alias_screen_shows_preset_checkboxes() {
        let mut terminal = make_terminal();
        let mut app = test_app();
        app.step = Step::ChooseAliases;
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("[x]"), "preset aliases should render checked");
        assert!(text.contains("[ ]"), "the custom alias starts unchecked");
        assert!(text.contains("nimbus-desktop"));
    }

    #[test]
    fn install_run_shows_percentage() {
        let mut terminal = make_terminal();
        let mut app = test_app();
        app.step = Step::Installing;
        for _ in 0..9 {
            app.progress.advance();
        }
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("45%"), "9 of 20 ticks should show 45%");
        assert!(text.contains("Installing Nimbus Desktop"));
    }

    #[test]
    fn checking_screen_shows_spinner_and_message() {
        let mut terminal = make_terminal();
        let mut app = test_app();
        app.step = Step::CheckingRequirements;
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Checking system requirements"));
        assert!(text.contains(SPINNER_FRAMES[0]));
    }

    #[test]
    fn empty_confirmation_input_shows_placeholder() {
        let mut terminal = make_terminal();
        let mut app = test_app();
        app.step = Step::ConfirmUninstallText;
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("type 'yes'"));
    }

    #[test]
    fn typed_confirmation_input_is_visible() {
        use crate::tui::state::EditOp;

        let mut terminal = make_terminal();
        let mut app = test_app();
        app.step = Step::ConfirmUninstallText;
        for c in "zz".chars() {
            app.confirm.apply(EditOp::Insert(c));
        }
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains('z'), "typed characters should be visible");
        assert!(!text.contains("type 'yes'"), "placeholder should be gone");
    }

    #[test]
    fn system_info_shows_probe_results() {
        let mut terminal = make_terminal();
        let mut app = test_app();
        app.step = Step::SystemInfo;
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("SYSTEM INFORMATION"));
        assert!(text.contains("linux"));
        assert!(text.contains("x86_64"));
        assert!(text.contains("pnpm"));
        assert!(text.contains("2026-08-07"));
    }

    #[test]
    fn system_info_without_package_manager_says_none() {
        let mut terminal = make_terminal();
        let mut app = test_app();
        app.system.package_manager = None;
        app.step = Step::SystemInfo;
        terminal.draw(|frame| render(&app, frame)).unwrap();

        assert!(buffer_text(&terminal).contains("none found"));
    }

    #[test]
    fn done_screens_show_outcome() {
        let mut terminal = make_terminal();

        let mut app = test_app();
        app.step = Step::InstallDone;
        terminal.draw(|frame| render(&app, frame)).unwrap();
        assert!(buffer_text(&terminal).contains("Installation complete"));

        app.step = Step::UninstallDone;
        terminal.draw(|frame| render(&app, frame)).unwrap();
        assert!(buffer_text(&terminal).contains("has been removed"));
    }

    #[test]
    fn confirm_install_summarizes_selections() {
        let mut terminal = make_terminal();
        let mut app = test_app();
        app.step = Step::ConfirmInstall;
        app.package_manager = 1;
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("pnpm"));
        assert!(text.contains("nimbus, nimbus-desktop"));
        assert!(text.contains("Desktop, Start Menu"));
    }

    #[test]
    fn progress_line_is_full_at_completion() {
        let line = progress_line(1.0, 50);
        assert!(line.contains("100%"));
        assert!(!line.contains('░'));

        let line = progress_line(0.0, 50);
        assert!(line.contains("0%"));
        assert!(!line.contains('█'));
    }

    #[test]
    fn progress_line_width_tracks_viewport_within_bounds() {
        // Tiny viewport still gets a usable bar; huge ones are capped.
        assert!(progress_line(0.5, 0).contains('█'));
        let wide = progress_line(0.5, 500);
        let cells = wide.matches('█').count() + wide.matches('░').count();
        assert_eq!(cells, 40);
    }

    #[test]
    fn selected_labels_joins_or_says_none() {
        let set = BTreeSet::from([0, 2]);
        assert_eq!(selected_labels(&["a", "b", "c"], &set), "a, c");
        assert_eq!(selected_labels(&["a"], &BTreeSet::new()), "none");
    }
}
