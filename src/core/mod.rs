// Core modules implementing path resolution, coercion, and error modeling.
pub mod coerce;
pub mod describe;
pub mod error;
pub mod path;
pub mod resolve;
