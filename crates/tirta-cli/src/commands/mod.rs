//! Command implementations.

pub mod history;
pub mod reset;
pub mod watch;

pub use history::cmd_history;
pub use reset::cmd_reset;
pub use watch::{WatchArgs, cmd_watch};
