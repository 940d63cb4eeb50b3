//! Command handlers for CLI subcommands

mod digest;

pub use digest::{handle_digest_command, DigestConfig};
