//! Command-line surface for the workshop kanban board
//!
//! The binary is a thin wrapper: argument parsing lives in [`cli`], command
//! bodies in [`commands`], and subscriber setup in [`logging`].

pub mod cli;
pub mod commands;
pub mod exit_codes;
pub mod logging;
