//! Interactive wizard, split along pure/effect boundaries:
//! - `state`: pure types (Step, App, Msg, Schedule)
//! - `update`: pure transition function
//! - `view`: pure rendering
//! - `theme`: style constants
//! - `run`: effects boundary (terminal, threads, timers)

pub mod run;
pub mod state;
pub mod theme;
pub mod update;
pub mod view;

pub use run::run;
