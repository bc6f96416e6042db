//! CLI command implementations

pub mod add;
pub mod delete;
pub mod fields;
pub mod init;
pub mod list;
pub mod session;
pub mod update;
pub mod validate;
pub mod watch;
