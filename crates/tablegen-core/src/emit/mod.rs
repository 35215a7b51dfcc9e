//! Emission: renders the immutable [`crate::types::IndexTables`] produced by
//! [`crate::collect`] as C99 source text (§4.3-§4.6).

pub mod behavior;
pub mod driver;
pub mod names;
pub mod runtime_protocol;
pub mod structural;
pub mod writer;
