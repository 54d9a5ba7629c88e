//! File formats and concrete collaborators for `cobind`.
//!
//! Readers for per-factor event calls, PFM motif files and TSS lists, the
//! persisted cluster format, FASTA sequence providers and a read-hit signal store.

pub mod cluster_file;
pub mod events;
pub mod fasta;
pub mod pfm;
pub mod reads;
pub mod tss;

// re-exports
pub use cluster_file::{read_clusters, write_clusters};
pub use events::{BindingEvent, read_events};
pub use fasta::{GenomeAssembly, IndexedGenome, open_sequence_provider};
pub use pfm::read_pfm;
pub use reads::ReadHitStore;
pub use tss::read_tss;
