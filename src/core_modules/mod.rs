pub mod binary;
pub mod blob;
pub mod classifier;
pub mod error;
pub mod filter;
pub mod grayscale;
pub mod image;
pub mod labeling;
pub mod morphology;
pub mod tracker;
pub mod utils;
