pub mod config;
pub mod entry;
pub mod paths;
pub mod seed;
pub mod sentiment;
pub mod store;
