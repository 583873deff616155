//! Async Race CLI
//!
//! Terminal front end for the Async Race garage: one-shot commands, an
//! interactive shell and a live race board.

pub mod board;
pub mod commands;
pub mod output;
pub mod views;
