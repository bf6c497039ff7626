pub mod engine;
pub mod fastq;
pub mod io;
pub mod label;
pub mod metrics;
pub mod model;
