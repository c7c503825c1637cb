//! Hilbert basis computation for systems of homogeneous linear inequalities.
//!
//! Given constraints `a · x >= 0` over non-negative integer variables, the
//! engine computes the minimal generating set of the solution monoid: every
//! non-negative integer solution is a non-negative integer combination of
//! the returned basis vectors.
//!
//! The engine processes inequalities one at a time, keeping a generating
//! set for the cumulative system and saturating it under opposite-sign
//! resolution with aggressive subsumption pruning (Pottier / Contejean &
//! Devie).
//!
//! ```
//! use hilbasis::{HilbertBasis, Numeral, SaturationStatus};
//!
//! let mut hb = HilbertBasis::new();
//! // x1 = x2
//! hb.add_eq(vec![Numeral::from(1), Numeral::from(-1)]).unwrap();
//! assert_eq!(hb.saturate(), SaturationStatus::Sat);
//! assert_eq!(hb.basis_len(), 1);
//! assert_eq!(hb.basis(0), &[Numeral::from(1), Numeral::from(1)]);
//! ```

pub mod hb;

pub use hb::engine::{CancelHandle, HilbertBasis};
pub use hb::stats::{IndexStats, Stats};
pub use hb::wrappers::{SemiLinearBasis, SignedLinearBasis};
pub use hilbasis_core::{Numeral, Sign};

/// Outcome of a [`HilbertBasis::saturate`] run.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SaturationStatus {
    /// The basis generates all solutions of the declared system.
    Sat,
    /// Some inequality admits no non-trivial non-negative solution in
    /// conjunction with the earlier ones.
    Unsat,
    /// Cancellation was observed mid-run; the engine should be reset
    /// before reuse.
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum HilbasisError {
    #[error("inequality has {got} coefficients, expected {expected}")]
    DimensionMismatch { expected: usize, got: usize },
}
