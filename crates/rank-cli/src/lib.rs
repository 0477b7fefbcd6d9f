//! Library side of the `rank-studio` binary.

pub mod commands;
pub mod logging;
