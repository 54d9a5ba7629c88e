//! # Multi-factor binding-site clustering and TSS correlation
//!
//! `cobind-spatial` pools the binding events of many transcription factors,
//! optionally snaps each event to the nearest strong occurrence of its factor's
//! motif, chains the pooled sites into clusters per chromosome, and correlates
//! each cluster's per-factor binding strength with per-factor read signal at
//! nearby transcription start sites.
//!
//! ```rust,no_run
//! use cobind_core::config::RunConfig;
//! use cobind_spatial::build_clusters;
//!
//! let config = RunConfig {
//!     roster: Some("factors.tsv".into()),
//!     dir: "gem_runs".into(),
//!     ..Default::default()
//! };
//! let clusters = build_clusters(&config).unwrap();
//! println!("{} clusters", clusters.len());
//! ```

pub mod cluster;
pub mod correlate;
pub mod loader;
pub mod motif;
pub mod pipeline;
pub mod stores;

// re-exports
pub use cluster::find_clusters;
pub use correlate::{CorrelationOptions, CorrelationRecord, CorrelationSummary, TssIndex, correlate_clusters, pearson};
pub use loader::{EventLoader, LoaderOptions};
pub use motif::OutwardScanner;
pub use pipeline::{build_clusters, correlate, correlate_to_report};
pub use stores::OpenStores;
