//! Text-side inputs: base direction, logical attributes and style attributes.

pub mod attrs;
pub mod direction;
pub mod log_attrs;
