pub mod config;
pub mod error;
pub mod events;
pub mod manager;
pub mod model;
pub mod storage;
