//! CLI module - the argument surface synthesized from the adapter registry

mod surface;

pub use surface::{build_command, param_flag};
