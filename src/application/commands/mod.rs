//! 应用层 - 命令（写操作）

mod podcast_commands;

pub mod handlers;

pub use podcast_commands::*;
