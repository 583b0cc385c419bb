//! Writers that hand a finished [`ResultSet`](crate::models::ResultSet) to
//! the file system.
//!
//! # Submodules
//!
//! - [`json`]: records (and optionally failures) as one JSON document
//! - [`text`]: the concatenated diagnostic dump
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── speeches.json
//! ```

pub mod json;
pub mod text;
