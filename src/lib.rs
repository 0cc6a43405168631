//! otupipe: a resumable amplicon-sequencing pipeline.
//!
//! Raw paired-end reads go through nine checkpointed stages (primer
//! trimming, read merging, quality filtering, run combination,
//! dereplication, clustering, chimera removal, table construction) to an
//! OTU abundance table. Each stage writes into its own directory under the
//! work dir; a populated directory marks the stage as done, so interrupted
//! runs resume where they stopped.

pub mod cli;
pub mod config;
pub mod consts;
pub mod core;
pub mod discovery;
pub mod error;
pub mod naming;
pub mod runner;
pub mod stage;
pub mod util;
