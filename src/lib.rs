pub mod aws_config;
pub mod catalog;
pub mod config;
pub mod error;
pub mod handler;
pub mod reconcile;
pub mod tagging;
