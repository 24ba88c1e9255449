//! Impression-round sources: the MIND dataset loader and a synthetic
//! MIND-format generator for development and tests.

pub mod mind;
pub mod synthetic;

pub use mind::MindDataset;
pub use synthetic::SyntheticConfig;
