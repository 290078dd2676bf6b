//! Datasets and tabular loading

mod dataset;
mod loader;

pub use dataset::Dataset;
pub use loader::{DataLoader, FileFormat};
