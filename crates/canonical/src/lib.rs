//! fieldfill canonical text layer.
//!
//! Every free-text value that takes part in matching goes through this crate
//! first: the field of study being classified, the dataset's own labels, and
//! each line of the reference vocabulary. Matching is only meaningful if all
//! three sides were normalized by the same rules.
//!
//! ## What we do
//!
//! - Unicode lowercasing (locale-free)
//! - Removal of ASCII digits and ASCII punctuation
//! - Whitespace normalization (collapses to single spaces, trims edges)
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no OS/locale dependence, no hidden state.
//! Normalization is idempotent: `normalize_text(&normalize_text(x)) ==
//! normalize_text(x)` for every `x`.
//!
//! ## Absent vs. empty
//!
//! A missing cell is not the same thing as a cell that normalizes to nothing.
//! [`normalize_field`] keeps that distinction (`None` stays `None`, `"42"`
//! becomes `Some("")`); [`normalize_label`] folds empty results into `None`
//! for values that are used as category labels.

mod normalize;
mod whitespace;

pub use crate::normalize::{normalize_field, normalize_label, normalize_text};
pub use crate::whitespace::collapse_whitespace;
