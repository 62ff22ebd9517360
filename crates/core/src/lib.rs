//! Race timeline analysis over per-frame vision labels.
//!
//! Repairs short scene-classification dropouts, segments the frame
//! sequence into races, and summarizes each race. Pure and synchronous; the
//! surrounding system owns video decoding, model calls, and storage.

pub mod analysis;
pub mod answer_parsing;
pub mod consensus;
pub mod display;
pub mod error;
pub mod imputation;
pub mod labels;
pub mod segmentation;
pub mod stats;
pub mod types;
