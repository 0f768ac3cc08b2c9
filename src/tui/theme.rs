//! Style constants for the wizard screens.
//!
//! Centralized so every screen renders with the same color semantics.
//! Pure data, consumed only by the rendering layer.
//!
//! Color semantics:
//! - Cyan: brand accent (banner, focused row, progress fill)
//! - Green: success (done screens, checked boxes)
//! - Yellow: caution (uninstall confirmation)
//! - Dim: de-emphasized (help line, unchecked boxes, placeholders)

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// SEMANTIC STYLES
// ============================================================================

/// Brand accent, used for the banner and focused rows.
pub const STYLE_ACCENT: Style = Style::new().fg(Color::Cyan);

/// Completed operation, success markers.
pub const STYLE_SUCCESS: Style = Style::new().fg(Color::Green);

/// Destructive action warnings.
pub const STYLE_WARNING: Style = Style::new().fg(Color::Yellow);

/// De-emphasized metadata and hints.
pub const STYLE_DIM: Style = Style::new().fg(Color::DarkGray);

// ============================================================================
// UI ELEMENT STYLES
// ============================================================================

/// Banner headline.
pub const STYLE_BANNER: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);

/// Screen title line.
pub const STYLE_TITLE: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);

/// Section header with inverted colors (System Info).
pub const STYLE_HEADER: Style = Style::new().fg(Color::Black).bg(Color::White);

/// Row under the cursor.
pub const STYLE_CURSOR: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);

/// Checkbox: checked.
pub const STYLE_CHECKED: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Checkbox: unchecked.
pub const STYLE_UNCHECKED: Style = Style::new().fg(Color::DarkGray);

/// Progress bar fill.
pub const STYLE_PROGRESS: Style = Style::new().fg(Color::Cyan);

/// Text input cursor cell.
pub const STYLE_INPUT_CURSOR: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Footer / help line.
pub const STYLE_HELP: Style = Style::new().fg(Color::DarkGray);

// ============================================================================
// TESTS
// ============================================================================
