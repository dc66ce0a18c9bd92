//! Validation phases, in their fixed order:
//!
//! 1. structural construction of a step from its definition,
//! 2. selector wiring checks during graph construction,
//! 3. value binding checks during execution.
//!
//! Each phase operates on the output of the previous one, so a malformed step
//! can never reach the wiring or binding checks.

pub mod binding;
pub mod construct;
pub mod selector;

pub use binding::validate_field_binding;
pub use construct::construct;
pub use selector::validate_field_selector;
