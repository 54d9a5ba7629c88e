//! Core models and shared plumbing for `cobind`.
//!
//! - [models]: genomic points and regions, binding sites, clusters, PWMs and the factor roster
//! - [traits]: seams to sequence, motif and quantitative-signal collaborators
//! - [config]: run configuration (TOML + defaults)
//! - [errors]: the error taxonomy shared by every crate in the workspace

pub mod config;
pub mod errors;
pub mod models;
pub mod traits;
pub mod utils;

// re-exports
pub use errors::{CobindError, CobindResult};
