//! Arbor AST - shared node handles and frozen node sequences
//!
//! A tree builder produces an ordered sequence of mutable node handles,
//! wraps it in a [`NodeSeq`] exactly once, and hands the same sequence to
//! any number of read-only consumers without per-call conversion: as a
//! slice of [`NodePtr`], a slice of [`ConstNodePtr`], or a whole
//! [`ConstNodeSeq`]. All three observe the very same underlying nodes.

mod error;
mod ptr;
mod seq;

pub use error::*;
pub use ptr::*;
pub use seq::*;
