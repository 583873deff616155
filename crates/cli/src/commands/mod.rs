//! CLI Commands

pub mod config;
pub mod engine;
pub mod garage;
pub mod race;
pub mod shell;
pub mod winners;
