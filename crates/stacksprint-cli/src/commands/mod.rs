//! Command handlers. One module per subcommand; shared input plumbing lives
//! in [`input`].

pub mod completions;
pub mod config;
pub mod explain;
pub mod generate;
pub mod init;
pub mod input;
pub mod list;
