use hilbasis_core::Numeral;

use crate::hb::engine::HilbertBasis;
use crate::{HilbasisError, SaturationStatus};

/// Engine wrapper for bounded constraints `v · x <= bound` over
/// non-negative variables.
///
/// A slack dimension is prepended at coordinate 0 carrying `-bound`, which
/// homogenizes the constraint; basis vectors with first coordinate 1 are
/// the solutions of the original bounded system.
#[derive(Debug, Default)]
pub struct SemiLinearBasis {
    engine: HilbertBasis,
}

impl SemiLinearBasis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_le(&mut self, v: Vec<Numeral>, bound: Numeral) -> Result<(), HilbasisError> {
        let mut w = Vec::with_capacity(v.len() + 1);
        w.push(-bound);
        w.extend(v);
        self.engine.add_le(w)
    }

    pub fn saturate(&mut self) -> SaturationStatus {
        self.engine.saturate()
    }

    pub fn engine(&self) -> &HilbertBasis {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut HilbertBasis {
        &mut self.engine
    }
}

/// Engine wrapper for bounded constraints over signed integer variables.
///
/// Each signed variable is split into a non-negative pair `x = x⁺ - x⁻`
/// (interleaved in that order), doubling the dimension; the bound follows
/// as a trailing split pair, as in the semi-linear encoding.
#[derive(Debug, Default)]
pub struct SignedLinearBasis {
    engine: HilbertBasis,
}

impl SignedLinearBasis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_le(&mut self, v: Vec<Numeral>, bound: Numeral) -> Result<(), HilbasisError> {
        let mut w = Vec::with_capacity(2 * v.len() + 2);
        for coeff in v {
            w.push(coeff.clone());
            w.push(-coeff);
        }
        w.push(bound.ref_neg());
        w.push(bound);
        self.engine.add_le(w)
    }

    pub fn saturate(&mut self) -> SaturationStatus {
        self.engine.saturate()
    }

    pub fn engine(&self) -> &HilbertBasis {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut HilbertBasis {
        &mut self.engine
    }
}
