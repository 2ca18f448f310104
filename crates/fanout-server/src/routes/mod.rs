pub mod actions;
pub mod config;
pub mod health;
pub mod invoke;
