//! Engine-agnostic primitives for exact-arithmetic lattice computations.
//!
//! This crate exposes the shared building blocks used by the saturation
//! engines:
//! - arbitrary-precision rational scalars (`num`)
//! - id-heaps keyed by external weight vectors (`heap`)
//!
//! Engines live in separate crates and build on top of these APIs.

pub mod heap;
pub mod num;

pub use heap::WeightHeap;
pub use num::{Numeral, Sign};
