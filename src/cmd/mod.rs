pub mod attach;
pub mod comment;
pub mod config;
pub mod create;
pub mod log;
pub mod search;
pub mod show;
