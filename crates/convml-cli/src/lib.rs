//! Library surface of the convml CLI: configuration types and the
//! subcommand entry points, kept out of `main.rs` so they can be tested.
pub mod experiments;
pub mod update;
