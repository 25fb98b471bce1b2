pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod pagination;
pub mod repo_resolver;
pub mod response;
pub mod server;
pub mod target;
pub mod tools;
pub mod types;
pub mod validate;
