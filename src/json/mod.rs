//! Purpose: JSON decoding boundary shared by the query API and the CLI.
//! Exports: `parse` module with decode helpers and failure categorisation.
//! Role: Single seam for the decoder so callsites avoid ad hoc decode logic.
//! Invariants: Decode failures always surface as `Decode` or `Io` errors with a hint.

pub mod parse;
