//! CLI subcommand implementations.

pub mod plan;
pub mod render;
pub mod simulate;
pub mod trips;
pub mod util;
