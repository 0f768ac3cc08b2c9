//! Wizard state algebra: pure types, zero effects.
//!
//! These types define the entire wizard state space. The transition
//! function (`update`) and the rendering layer (`view`) both program
//! against them. Screens are identified by a closed [`Step`] enum;
//! per-screen choice lists are fixed constants, and selection state
//! references them by index only, so index stability is the contract.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::probe::SystemReport;

// ============================================================================
// STEPS
// ============================================================================

/// The active wizard screen.
///
/// Exactly one step is active at any time; it is the sole driver of
/// input routing and rendering. There are no terminal variants: the
/// done screens and System Info all route back to [`Step::Menu`], and
/// the only exits are the menu's Exit entry and the global quit key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Menu,
    ChoosePackageManager,
    CheckingRequirements,
    ChooseAliases,
    ChooseShortcuts,
    ConfirmInstall,
    Installing,
    InstallDone,
    ConfirmUninstallText,
    ChooseUninstallOptions,
    Uninstalling,
    UninstallDone,
    SystemInfo,
}

impl Step {
    /// The choice list presented on this step, if it has one.
    ///
    /// Steps without a list (confirmations, progress, info) return None;
    /// cursor movement is a no-op on those.
    pub fn choices(self) -> Option<&'static [&'static str]> {
        match self {
            Step::Menu => Some(MENU_CHOICES),
            Step::ChoosePackageManager => Some(PACKAGE_MANAGER_CHOICES),
            Step::ChooseAliases => Some(ALIAS_CHOICES),
            Step::ChooseShortcuts => Some(SHORTCUT_CHOICES),
            Step::ChooseUninstallOptions => Some(UNINSTALL_CHOICES),
            Step::CheckingRequirements
            | Step::ConfirmInstall
            | Step::Installing
            | Step::InstallDone
            | Step::ConfirmUninstallText
            | Step::Uninstalling
            | Step::UninstallDone
            | Step::SystemInfo => None,
        }
    }
}

// ============================================================================
// CHOICE LISTS
// ============================================================================

pub const MENU_CHOICES: &[&str] = &[
    "Install / Update Nimbus Desktop",
    "Uninstall",
    "System Info",
    "Exit",
];

/// Menu entry indices, matched in the menu handler.
pub const MENU_INSTALL: usize = 0;
pub const MENU_UNINSTALL: usize = 1;
pub const MENU_SYSTEM_INFO: usize = 2;
pub const MENU_EXIT: usize = 3;

pub const PACKAGE_MANAGER_CHOICES: &[&str] =
    &["Bun (recommended)", "pnpm", "npm", "Auto-detect"];

pub const ALIAS_CHOICES: &[&str] = &["nimbus", "nimbus-desktop", "custom"];

pub const SHORTCUT_CHOICES: &[&str] = &["Desktop", "Start Menu", "Dock"];

pub const UNINSTALL_CHOICES: &[&str] = &[
    "Remove application",
    "Remove core components",
    "Remove shortcuts",
];

// ============================================================================
// TIMING
// ============================================================================

/// Interval between simulated progress ticks.
pub const TICK_INTERVAL: Duration = Duration::from_millis(200);

/// Simulated duration of the requirements check.
pub const CHECK_DELAY: Duration = Duration::from_secs(2);

/// Spinner animation frame interval.
pub const SPINNER_INTERVAL: Duration = Duration::from_millis(100);

/// Braille-dot spinner cycle shown while checking requirements.
pub const SPINNER_FRAMES: &[&str] =
    &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

// ============================================================================
// MESSAGES
// ============================================================================

/// Everything the wizard core can receive from its environment.
///
/// Key presses are mapped to semantic messages by the effects layer
/// (step-aware, since the text screen consumes raw characters), timers
/// arrive as [`Msg::Tick`], and terminal resizes carry the new size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    MoveUp,
    MoveDown,
    /// Flip the checkbox under the cursor (multi-select screens only).
    Toggle,
    Confirm,
    Back,
    Quit,
    /// Text edit on the uninstall confirmation screen.
    Edit(EditOp),
    /// Terminal resize. Stored for rendering; never changes the step.
    Resize { width: u16, height: u16 },
    /// A scheduled interval elapsed.
    Tick(Timer),
}

/// Text-box editing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

/// Which scheduled timer fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    /// Advance the simulated install/uninstall progress.
    Progress,
    /// The requirements check finished.
    CheckDone,
    /// Advance the spinner animation frame.
    Spinner,
}

// ============================================================================
// SCHEDULING
// ============================================================================

/// A request to deliver [`Msg::Tick`] after a delay.
///
/// Handlers return these instead of touching timers themselves, so the
/// transition logic stays synchronous and tests can fire ticks directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub after: Duration,
    pub timer: Timer,
}

impl Schedule {
    /// Next simulated progress tick.
    pub fn progress_tick() -> Self {
        Schedule { after: TICK_INTERVAL, timer: Timer::Progress }
    }

    /// One-shot requirements-check completion.
    pub fn requirements_check() -> Self {
        Schedule { after: CHECK_DELAY, timer: Timer::CheckDone }
    }

    /// Next spinner animation frame.
    pub fn spinner_frame() -> Self {
        Schedule { after: SPINNER_INTERVAL, timer: Timer::Spinner }
    }
}

// ============================================================================
// TEXT CONFIRMATION
// ============================================================================

/// The literal the user must type to proceed with an uninstall.
pub const CONFIRM_TOKEN: &str = "yes";

/// Maximum confirmation input length, in characters.
pub const CONFIRM_CHAR_LIMIT: usize = 10;

/// Free-text input buffer for the uninstall confirmation screen.
///
/// Supports insert/delete at a character cursor with a length bound.
/// The buffer persists across visits to the screen; it gates the
/// uninstall flow and feeds nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextConfirm {
    buffer: String,
    cursor: usize,
}

impl TextConfirm {
    pub fn value(&self) -> &str {
        &self.buffer
    }

    /// Cursor position, in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// True iff the trimmed input equals the confirmation token,
    /// case-insensitively. No partial or fuzzy matching.
    pub fn is_confirmed(&self) -> bool {
        self.buffer.trim().eq_ignore_ascii_case(CONFIRM_TOKEN)
    }

    pub fn apply(&mut self, op: EditOp) {
        match op {
            EditOp::Insert(c) => self.insert(c),
            EditOp::Backspace => self.backspace(),
            EditOp::Delete => self.delete(),
            EditOp::Left => self.cursor = self.cursor.saturating_sub(1),
            EditOp::Right => self.cursor = (self.cursor + 1).min(self.char_len()),
            EditOp::Home => self.cursor = 0,
            EditOp::End => self.cursor = self.char_len(),
        }
    }

    fn insert(&mut self, c: char) {
        if self.char_len() >= CONFIRM_CHAR_LIMIT {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_index(self.cursor - 1);
        self.buffer.remove(at);
        self.cursor -= 1;
    }

    fn delete(&mut self) {
        if self.cursor >= self.char_len() {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.buffer.remove(at);
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Byte offset of the given character position.
    fn byte_index(&self, char_pos: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }
}

// ============================================================================
// PROGRESS
// ============================================================================

/// Ticks to complete the simulated install (5% per tick).
pub const INSTALL_TICKS: u32 = 20;

/// Ticks to complete the simulated uninstall (10% per tick).
/// Removal is deliberately shown as faster than installation.
pub const UNINSTALL_TICKS: u32 = 10;

/// Simulated progress, counted in whole ticks.
///
/// Counting ticks instead of accumulating a float keeps completion
/// deterministic: the install profile reaches exactly 1.0 on tick 20,
/// the uninstall profile on tick 10. The fraction is a projection and
/// is monotone non-decreasing within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    done: u32,
    total: u32,
}

impl Progress {
    pub fn install() -> Self {
        Progress { done: 0, total: INSTALL_TICKS }
    }

    pub fn uninstall() -> Self {
        Progress { done: 0, total: UNINSTALL_TICKS }
    }

    /// Count one elapsed tick. Returns true once the run is complete;
    /// further calls saturate at the total.
    pub fn advance(&mut self) -> bool {
        self.done = (self.done + 1).min(self.total);
        self.is_complete()
    }

    pub fn is_complete(&self) -> bool {
        self.done >= self.total
    }

    /// Completed fraction in [0, 1].
    pub fn fraction(&self) -> f64 {
        f64::from(self.done) / f64::from(self.total)
    }
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Top-level wizard model.
///
/// Owns the current step, the cursor, the per-screen selection sets,
/// and the simulated-progress state. Mutated exclusively by `update`;
/// the rendering layer reads it as a pure projection.
#[derive(Debug)]
pub struct App {
    pub step: Step,

    /// Row focused on the active choice list.
    pub cursor: usize,

    /// Alias checkboxes, by index into [`ALIAS_CHOICES`].
    pub aliases: BTreeSet<usize>,
    /// Shortcut checkboxes, by index into [`SHORTCUT_CHOICES`].
    pub shortcuts: BTreeSet<usize>,
    /// Uninstall-option checkboxes, by index into [`UNINSTALL_CHOICES`].
    pub uninstall_options: BTreeSet<usize>,

    /// Chosen package manager, as an index into
    /// [`PACKAGE_MANAGER_CHOICES`]. Captured at confirmation time.
    pub package_manager: usize,

    /// Uninstall confirmation input.
    pub confirm: TextConfirm,

    /// Simulated install/uninstall progress. Reset when a run starts.
    pub progress: Progress,

    /// Index into [`SPINNER_FRAMES`].
    pub spinner_frame: usize,

    /// Last reported terminal size, consumed only by rendering.
    pub viewport: (u16, u16),

    /// Set when the event loop should exit after the current turn.
    pub should_quit: bool,

    /// Read-only system facts captured at startup (System Info screen).
    pub system: SystemReport,
}

impl App {
    /// Fresh wizard on the menu, with the designer-chosen presets:
    /// both default aliases, Desktop and Start Menu shortcuts, and
    /// everything but core components marked for removal.
    pub fn new(system: SystemReport) -> Self {
        App {
            step: Step::Menu,
            cursor: 0,
            aliases: BTreeSet::from([0, 1]),
            shortcuts: BTreeSet::from([0, 1]),
            uninstall_options: BTreeSet::from([0, 2]),
            package_manager: 0,
            confirm: TextConfirm::default(),
            progress: Progress::install(),
            spinner_frame: 0,
            viewport: (0, 0),
            should_quit: false,
            system,
        }
    }

    /// Move the cursor on the active choice list, saturating at both
    /// ends. No-op on steps without a list.
    pub fn move_cursor(&mut self, delta: isize) {
        let Some(choices) = self.step.choices() else {
            return;
        };
        let last = choices.len() as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
    }
}

/// Flip membership of `index` in a selection set.
///
/// Two calls with the same index restore the original membership.
pub fn toggle(set: &mut BTreeSet<usize>, index: usize) {
    if !set.remove(&index) {
        set.insert(index);
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> App {
        App::new(SystemReport::default())
    }

    // -- App defaults --

    #[test]
    fn new_app_starts_on_menu_with_presets() {
        let app = fresh();
        assert_eq!(app.step, Step::Menu);
        assert_eq!(app.cursor, 0);
        assert_eq!(app.aliases, BTreeSet::from([0, 1]));
        assert_eq!(app.shortcuts, BTreeSet::from([0, 1]));
        assert_eq!(app.uninstall_options, BTreeSet::from([0, 2]));
        assert!(!app.should_quit);
    }

    #[test]
    fn every_list_step_has_nonempty_choices() {
        for step in [
            Step::Menu,
            Step::ChoosePackageManager,
            Step::ChooseAliases,
            Step::ChooseShortcuts,
            Step::ChooseUninstallOptions,
        ] {
            assert!(!step.choices().unwrap().is_empty());
        }
        assert!(Step::Installing.choices().is_none());
        assert!(Step::ConfirmUninstallText.choices().is_none());
    }

    // -- Cursor --

    #[test]
    fn cursor_saturates_at_top() {
        let mut app = fresh();
        app.move_cursor(-1);
        app.move_cursor(-5);
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn cursor_saturates_at_bottom() {
        let mut app = fresh();
        for _ in 0..10 {
            app.move_cursor(1);
        }
        assert_eq!(app.cursor, MENU_CHOICES.len() - 1);
        app.move_cursor(100);
        assert_eq!(app.cursor, MENU_CHOICES.len() - 1);
    }

    #[test]
    fn cursor_stays_in_bounds_under_any_move_sequence() {
        let mut app = fresh();
        app.step = Step::ChooseAliases;
        let n = ALIAS_CHOICES.len();
        for delta in [1, 1, -3, 2, 2, 2, -1, 7, -9, 1] {
            app.move_cursor(delta);
            assert!(app.cursor < n, "cursor {} out of [0, {})", app.cursor, n);
        }
    }

    #[test]
    fn cursor_noop_on_listless_step() {
        let mut app = fresh();
        app.step = Step::ConfirmInstall;
        app.cursor = 2;
        app.move_cursor(1);
        assert_eq!(app.cursor, 2);
    }

    // -- Selection sets --

    #[test]
    fn toggle_twice_restores_membership() {
        let mut set = BTreeSet::from([0, 1]);

        toggle(&mut set, 2);
        assert!(set.contains(&2));
        toggle(&mut set, 2);
        assert!(!set.contains(&2));

        toggle(&mut set, 0);
        assert!(!set.contains(&0));
        toggle(&mut set, 0);
        assert!(set.contains(&0));

        assert_eq!(set, BTreeSet::from([0, 1]));
    }

    // -- Text confirmation --

    fn typed(s: &str) -> TextConfirm {
        let mut t = TextConfirm::default();
        for c in s.chars() {
            t.apply(EditOp::Insert(c));
        }
        t
    }

    #[test]
    fn confirmation_accepts_case_and_whitespace_variants() {
        assert!(typed("yes").is_confirmed());
        assert!(typed("YES").is_confirmed());
        assert!(typed(" yes ").is_confirmed());
        assert!(typed("Yes").is_confirmed());
    }

    #[test]
    fn confirmation_rejects_everything_else() {
        assert!(!typed("").is_confirmed());
        assert!(!typed("y").is_confirmed());
        assert!(!typed("no").is_confirmed());
        assert!(!typed("yess").is_confirmed());
        assert!(!typed("yes!").is_confirmed());
    }

    #[test]
    fn insert_respects_char_limit() {
        let t = typed("aaaaaaaaaaaaaaa");
        assert_eq!(t.value().chars().count(), CONFIRM_CHAR_LIMIT);
        assert_eq!(t.cursor(), CONFIRM_CHAR_LIMIT);
    }

    #[test]
    fn backspace_removes_before_cursor() {
        let mut t = typed("yes");
        t.apply(EditOp::Backspace);
        assert_eq!(t.value(), "ye");
        assert_eq!(t.cursor(), 2);

        t.apply(EditOp::Home);
        t.apply(EditOp::Backspace); // nothing before cursor
        assert_eq!(t.value(), "ye");
    }

    #[test]
    fn delete_removes_at_cursor() {
        let mut t = typed("yes");
        t.apply(EditOp::Home);
        t.apply(EditOp::Delete);
        assert_eq!(t.value(), "es");
        assert_eq!(t.cursor(), 0);

        t.apply(EditOp::End);
        t.apply(EditOp::Delete); // nothing under cursor
        assert_eq!(t.value(), "es");
    }

    #[test]
    fn cursor_moves_and_mid_buffer_insert() {
        let mut t = typed("ys");
        t.apply(EditOp::Left);
        t.apply(EditOp::Insert('e'));
        assert_eq!(t.value(), "yes");
        assert_eq!(t.cursor(), 2);

        t.apply(EditOp::Right);
        t.apply(EditOp::Right); // saturates at end
        assert_eq!(t.cursor(), 3);
    }

    #[test]
    fn editing_handles_multibyte_chars() {
        let mut t = typed("oui");
        t.apply(EditOp::Home);
        t.apply(EditOp::Insert('é'));
        assert_eq!(t.value(), "éoui");
        assert_eq!(t.cursor(), 1);
        t.apply(EditOp::Home);
        t.apply(EditOp::Delete);
        assert_eq!(t.value(), "oui");
    }

    // -- Progress --

    #[test]
    fn install_profile_completes_on_tick_20() {
        let mut p = Progress::install();
        for _ in 0..INSTALL_TICKS - 1 {
            assert!(!p.advance());
        }
        assert!(p.advance());
        assert_eq!(p.fraction(), 1.0);
    }

    #[test]
    fn uninstall_profile_completes_on_tick_10() {
        let mut p = Progress::uninstall();
        for _ in 0..UNINSTALL_TICKS - 1 {
            assert!(!p.advance());
        }
        assert!(p.advance());
        assert_eq!(p.fraction(), 1.0);
    }

    #[test]
    fn fraction_is_monotone_and_bounded() {
        let mut p = Progress::install();
        let mut last = p.fraction();
        assert_eq!(last, 0.0);
        for _ in 0..INSTALL_TICKS + 5 {
            p.advance();
            let f = p.fraction();
            assert!(f >= last);
            assert!(f <= 1.0);
            last = f;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn uninstall_ticks_are_coarser_than_install_ticks() {
        assert!(UNINSTALL_TICKS < INSTALL_TICKS);
    }
}
