//! RotaFácil CLI library.
//!
//! Command handlers, terminal styling and output formatting for the
//! `rotafacil` binary.

pub mod commands;
pub mod output;
pub mod terminal;
