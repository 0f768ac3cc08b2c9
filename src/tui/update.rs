//! Pure state transitions: (App, Msg) -> scheduling requests.
//!
//! This is the wizard's control core, fully testable without a terminal.
//! Each step defines which messages it accepts; everything else is a
//! silent no-op that leaves the step unchanged. There is no error type
//! here: invalid input (wrong confirmation text, confirm at a boundary)
//! simply does not advance the wizard.

use std::collections::BTreeSet;

use super::state::{
    App, Msg, Progress, Schedule, Step, Timer, toggle, ALIAS_CHOICES,
    MENU_EXIT, MENU_INSTALL, MENU_SYSTEM_INFO, MENU_UNINSTALL,
    SHORTCUT_CHOICES, SPINNER_FRAMES, UNINSTALL_CHOICES,
};

/// Apply one input event to the wizard.
///
/// Mutates `app` in place and returns the scheduling requests the
/// environment should honor (ticks to deliver later). Quitting is
/// signaled through [`App::should_quit`].
pub fn update(app: &mut App, msg: Msg) -> Vec<Schedule> {
    match msg {
        // The quit trigger works from every step, including the locked
        // Installing/Uninstalling screens.
        Msg::Quit => {
            app.should_quit = true;
            Vec::new()
        }
        Msg::Resize { width, height } => {
            app.viewport = (width, height);
            Vec::new()
        }
        Msg::Tick(timer) => tick(app, timer),
        msg => dispatch(app, msg),
    }
}

/// Route a user message to the active step's handler.
fn dispatch(app: &mut App, msg: Msg) -> Vec<Schedule> {
    match app.step {
        Step::Menu => menu(app, msg),
        Step::ChoosePackageManager => choose_package_manager(app, msg),
        Step::ChooseAliases | Step::ChooseShortcuts | Step::ChooseUninstallOptions => {
            checkbox(app, msg)
        }
        Step::ConfirmInstall => confirm_install(app, msg),
        Step::ConfirmUninstallText => confirm_uninstall_text(app, msg),
        Step::InstallDone | Step::UninstallDone => done(app, msg),
        Step::SystemInfo => system_info(app, msg),
        // Advanced by timers only. User input is locked out here: the
        // checking screen waits for its one-shot, and the progress
        // screens cannot be navigated away from.
        Step::CheckingRequirements | Step::Installing | Step::Uninstalling => Vec::new(),
    }
}

// ============================================================================
// PER-STEP HANDLERS
// ============================================================================

fn menu(app: &mut App, msg: Msg) -> Vec<Schedule> {
    match msg {
        Msg::MoveUp => app.move_cursor(-1),
        Msg::MoveDown => app.move_cursor(1),
        Msg::Confirm => match app.cursor {
            MENU_INSTALL => {
                app.step = Step::ChoosePackageManager;
                app.cursor = 0;
            }
            MENU_UNINSTALL => {
                app.step = Step::ConfirmUninstallText;
            }
            MENU_SYSTEM_INFO => {
                app.step = Step::SystemInfo;
            }
            MENU_EXIT => {
                app.should_quit = true;
            }
            _ => {}
        },
        _ => {}
    }
    Vec::new()
}

/// Single-choice screen: the choice is the cursor value, captured at
/// confirmation time. Confirming also kicks off the requirements check.
fn choose_package_manager(app: &mut App, msg: Msg) -> Vec<Schedule> {
    match msg {
        Msg::MoveUp => app.move_cursor(-1),
        Msg::MoveDown => app.move_cursor(1),
        Msg::Confirm => {
            app.package_manager = app.cursor;
            app.step = Step::CheckingRequirements;
            app.spinner_frame = 0;
            return vec![Schedule::requirements_check(), Schedule::spinner_frame()];
        }
        Msg::Back => {
            app.step = Step::Menu;
            app.cursor = 0;
        }
        _ => {}
    }
    Vec::new()
}

/// One checkbox screen's wiring: its list, its selection set, and where
/// confirm/back lead.
struct CheckboxScreen {
    list: &'static [&'static str],
    next: Step,
    prev: Step,
}

/// All three multi-select screens share one handler, parameterized by
/// the screen wiring looked up from the current step.
fn checkbox(app: &mut App, msg: Msg) -> Vec<Schedule> {
    let Some(screen) = checkbox_screen(app.step) else {
        return Vec::new();
    };
    debug_assert_eq!(Some(screen.list), app.step.choices());

    match msg {
        Msg::MoveUp => app.move_cursor(-1),
        Msg::MoveDown => app.move_cursor(1),
        Msg::Toggle => {
            let cursor = app.cursor;
            toggle(selection_mut(app), cursor);
        }
        Msg::Confirm => {
            // Selections are preserved on forward navigation. Entering
            // the uninstall run starts a fresh progress simulation.
            if screen.next == Step::Uninstalling {
                app.step = Step::Uninstalling;
                app.progress = Progress::uninstall();
                return vec![Schedule::progress_tick()];
            }
            app.step = screen.next;
            app.cursor = 0;
        }
        Msg::Back => {
            app.step = screen.prev;
            app.cursor = 0;
        }
        _ => {}
    }
    Vec::new()
}

fn checkbox_screen(step: Step) -> Option<CheckboxScreen> {
    match step {
        Step::ChooseAliases => Some(CheckboxScreen {
            list: ALIAS_CHOICES,
            next: Step::ChooseShortcuts,
            prev: Step::ChoosePackageManager,
        }),
        Step::ChooseShortcuts => Some(CheckboxScreen {
            list: SHORTCUT_CHOICES,
            next: Step::ConfirmInstall,
            prev: Step::ChooseAliases,
        }),
        Step::ChooseUninstallOptions => Some(CheckboxScreen {
            list: UNINSTALL_CHOICES,
            next: Step::Uninstalling,
            prev: Step::ConfirmUninstallText,
        }),
        _ => None,
    }
}

/// The selection set belonging to the active checkbox screen.
fn selection_mut(app: &mut App) -> &mut BTreeSet<usize> {
    match app.step {
        Step::ChooseAliases => &mut app.aliases,
        Step::ChooseShortcuts => &mut app.shortcuts,
        _ => &mut app.uninstall_options,
    }
}

fn confirm_install(app: &mut App, msg: Msg) -> Vec<Schedule> {
    match msg {
        Msg::Confirm => {
            app.step = Step::Installing;
            app.progress = Progress::install();
            return vec![Schedule::progress_tick()];
        }
        Msg::Back => {
            app.step = Step::ChooseShortcuts;
        }
        _ => {}
    }
    Vec::new()
}

/// Typed confirmation gate for the uninstall flow. Confirm advances
/// only when the buffer matches the token; any other input stays here,
/// with edits forwarded to the text model.
fn confirm_uninstall_text(app: &mut App, msg: Msg) -> Vec<Schedule> {
    match msg {
        Msg::Edit(op) => app.confirm.apply(op),
        Msg::Confirm => {
            if app.confirm.is_confirmed() {
                app.step = Step::ChooseUninstallOptions;
                app.cursor = 0;
            }
        }
        Msg::Back => {
            app.step = Step::Menu;
            app.cursor = 1;
        }
        _ => {}
    }
    Vec::new()
}

fn done(app: &mut App, msg: Msg) -> Vec<Schedule> {
    if msg == Msg::Confirm {
        app.step = Step::Menu;
        app.cursor = 0;
    }
    Vec::new()
}

fn system_info(app: &mut App, msg: Msg) -> Vec<Schedule> {
    if matches!(msg, Msg::Confirm | Msg::Back) {
        app.step = Step::Menu;
        app.cursor = 2;
    }
    Vec::new()
}

// ============================================================================
// TIMERS
// ============================================================================

/// Handle an elapsed timer. Stale ticks (the step moved on before the
/// tick arrived) are dropped without rescheduling, which is what ends
/// each timer chain.
fn tick(app: &mut App, timer: Timer) -> Vec<Schedule> {
    match timer {
        Timer::CheckDone => {
            if app.step == Step::CheckingRequirements {
                app.step = Step::ChooseAliases;
                app.cursor = 0;
            }
            Vec::new()
        }
        Timer::Spinner => {
            if app.step == Step::CheckingRequirements {
                app.spinner_frame = (app.spinner_frame + 1) % SPINNER_FRAMES.len();
                vec![Schedule::spinner_frame()]
            } else {
                Vec::new()
            }
        }
        Timer::Progress => match app.step {
            Step::Installing => {
                if app.progress.advance() {
                    app.step = Step::InstallDone;
                    Vec::new()
                } else {
                    vec![Schedule::progress_tick()]
                }
            }
            Step::Uninstalling => {
                if app.progress.advance() {
                    app.step = Step::UninstallDone;
                    Vec::new()
                } else {
                    vec![Schedule::progress_tick()]
                }
            }
            _ => Vec::new(),
        },
    }
}

// ============================================================================
// TESTS
// ============================================================================
