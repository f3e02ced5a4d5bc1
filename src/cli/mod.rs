//! CLI components.

pub mod bridge;
pub mod completion;
pub mod repl;
pub mod runner;
pub mod spinner;

pub use completion::{create_reedline, TaxCompleter, TaxPrompt, COMMANDS};
pub use repl::Repl;
pub use runner::{run_interactive, run_single_prompt};
pub use spinner::{Spinner, SpinnerHandle};
