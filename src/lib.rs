pub mod aggregator;
pub mod content;
pub mod error;
pub mod github;
pub mod models;
pub mod render;
pub mod server;
pub mod types;
pub mod view;
