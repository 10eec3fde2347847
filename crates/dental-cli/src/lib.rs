//! Library side of the `dental-rules` binary: logging setup, request files
//! and the command runners the binary dispatches to.

pub mod commands;
pub mod logging;
pub mod requests;
