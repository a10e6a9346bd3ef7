//! HPOA data ingestion: loads annotation tables from tab-separated sources.

pub mod error;
pub mod hpoa;

pub use error::LoadError;
pub use hpoa::{load_bytes, load_path, load_reader, read_hpoa_str};
