//! Safe SQL builder: identifiers sanitized, values as parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
