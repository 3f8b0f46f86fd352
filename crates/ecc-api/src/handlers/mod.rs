//! API handlers
//!
//! Author: hephaex@gmail.com

pub mod bot;
pub mod fallback;
pub mod health;

pub use bot::bot_handler;
pub use health::health_check;
