//! Read-only system probing for the System Info screen.
//!
//! The wizard core never calls into this module after startup: a
//! single [`SystemReport`] is captured before the event loop starts
//! and rendered as-is. Nothing here mutates wizard state.
//!
//! Structure:
//! - Constants: lookup candidates and install location naming
//! - Types: the report handed to the rendering layer
//! - Pure functions: path construction, candidate ordering
//! - Effect functions: PATH search, report assembly

use std::env;
use std::path::{Path, PathBuf};

use tracing::info;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Package managers the installer can drive, in preference order.
///
/// The first one found on PATH wins; the order matches the choice
/// list offered on the package-manager screen.
pub const PACKAGE_MANAGER_CANDIDATES: &[&str] = &["bun", "pnpm", "npm"];

/// Directory name of the install target under the local data dir.
pub const INSTALL_DIR_NAME: &str = "nimbus";

// ============================================================================
// TYPES
// ============================================================================

/// System facts shown on the System Info screen.
///
/// Captured once at startup; fields that could not be determined are
/// None and rendered as such rather than failing the wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemReport {
    pub os: &'static str,
    pub arch: &'static str,
    /// First supported package manager found on PATH.
    pub package_manager: Option<String>,
    /// Where the application would be installed.
    pub install_dir: Option<PathBuf>,
    /// Current date, `YYYY-MM-DD`.
    pub date: String,
}

// ============================================================================
// PURE FUNCTIONS
// ============================================================================

/// Compute the install target under a data directory.
pub fn install_dir_under(data_dir: &Path) -> PathBuf {
    data_dir.join(INSTALL_DIR_NAME)
}

// ============================================================================
// EFFECT FUNCTIONS
// ============================================================================

/// Find a named executable in an ordered list of directories.
///
/// Checks file presence only; execute permission is not inspected.
/// On Windows the platform executable suffix is tried as well.
pub fn find_in_dirs(dirs: &[PathBuf], name: &str) -> Option<PathBuf> {
    for dir in dirs {
        let direct = dir.join(name);
        if direct.is_file() {
            return Some(direct);
        }
        if !env::consts::EXE_SUFFIX.is_empty() {
            let suffixed = dir.join(format!("{}{}", name, env::consts::EXE_SUFFIX));
            if suffixed.is_file() {
                return Some(suffixed);
            }
        }
    }
    None
}

/// First candidate package manager found in the given directories.
///
/// Separated from the PATH lookup for testability: tests inject their
/// own directory list.
pub fn detect_package_manager_in(dirs: &[PathBuf]) -> Option<String> {
    PACKAGE_MANAGER_CANDIDATES
        .iter()
        .find(|name| find_in_dirs(dirs, name).is_some())
        .map(|&name| name.to_string())
}

/// First candidate package manager found on PATH.
pub fn detect_package_manager() -> Option<String> {
    let path = env::var_os("PATH")?;
    let dirs: Vec<PathBuf> = env::split_paths(&path).collect();
    detect_package_manager_in(&dirs)
}

/// Assemble the startup report.
pub fn system_report() -> SystemReport {
    let package_manager = detect_package_manager();
    match &package_manager {
        Some(pm) => info!(package_manager = %pm, "package manager detected"),
        None => info!("no supported package manager on PATH"),
    }

    SystemReport {
        os: env::consts::OS,
        arch: env::consts::ARCH,
        package_manager,
        install_dir: dirs::data_local_dir().map(|d| install_dir_under(&d)),
        date: chrono::Local::now().format("%Y-%m-%d").to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
