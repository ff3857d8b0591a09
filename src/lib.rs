//! Core of a log-search assistant: templated shell commands run one at a
//! time with their output captured to a file, plus a reactive highlight
//! engine with cyclic bookmark navigation over the captured text.
//!
//! Hosts (a GUI, the bundled CLI) own the event loop and the text buffer;
//! they call into these modules and render what comes back.

pub mod actions;
pub mod error;
pub mod executor;
pub mod highlighter;
pub mod options;
pub mod runner;
pub mod template;

pub use error::GrepUiError;
pub use executor::{CommandExecutor, ExecuteOutcome, PollStatus, POLL_INTERVAL};
pub use highlighter::{HighlightColor, Highlighter};
pub use options::{CommandOption, OptionStore, Visibility};
pub use runner::ProcessGuard;
