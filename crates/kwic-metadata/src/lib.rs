//! Document metadata for kwic.
//!
//! Loads the delimiter-separated metadata file that accompanies a corpus and resolves a
//! document identifier to its composition date. Dates are written as one or more year
//! numerals, optionally tagged ` BCE`; see [`parse_period`].

#![warn(missing_docs)]

mod error;
mod index;
mod period;

pub use error::MetadataError;
pub use index::{MetadataIndex, MetadataOptions, MetadataRecord};
pub use period::parse_period;
