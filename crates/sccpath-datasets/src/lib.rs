#![forbid(unsafe_code)]
//! sccpath-datasets library.
//!
//! Seeded synthetic graph documents for benchmarking the sccpath algorithms:
//! six random [`families`] and a fixed nine-entry [`standard_catalog`] split
//! into small, medium and large buckets.
//!
//! ```no_run
//! use std::path::Path;
//!
//! let written = sccpath_datasets::write_catalog(Path::new("data"), 42)?;
//! assert_eq!(written.len(), 9);
//! # Ok::<(), sccpath_datasets::DatasetError>(())
//! ```

pub mod catalog;
pub mod error;
pub mod families;

pub use catalog::{
    DatasetSpec, Family, SizeCategory, WrittenDataset, standard_catalog, write_catalog,
};
pub use error::DatasetError;
