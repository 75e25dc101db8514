pub mod cmd;
pub mod config;
pub mod dirs;
pub mod logs;
pub mod messages;
pub mod server;
pub mod time;
pub mod types;
pub mod validate;
