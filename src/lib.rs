// Mockup compositing service library

pub mod catalog;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod imaging;
pub mod logging;
pub mod server;
