//! Common transport-layer types shared by the backend handlers.
//!
//! Several endpoints accept the same value in more than one shape (a list of
//! semesters or an already joined string, a number or a numeric string coming
//! from an HTML form). Those shapes are normalized here so every handler
//! stores the same column representation.

pub mod converters;
mod filters;
mod semesters;

pub use filters::JobFilter;
pub use semesters::HiringSemesters;
