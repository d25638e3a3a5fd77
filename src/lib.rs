pub mod config;
pub mod credential;
pub mod error;
pub mod github;
pub mod http;
pub mod release;
pub mod runtime;
pub mod validate;
