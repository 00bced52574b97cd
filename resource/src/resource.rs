//! This module defines the type [`Imr`] and its set algebra.

mod _struct;
pub use _struct::*;
mod _set;
