//! Command implementations.

pub(crate) mod bench;
pub(crate) mod repl;
