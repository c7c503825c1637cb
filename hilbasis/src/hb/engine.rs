use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use hilbasis_core::Numeral;
use tracing::{debug, trace};

use crate::hb::index::SubsumptionIndex;
use crate::hb::passive::PassiveQueue;
use crate::hb::stats::Stats;
use crate::hb::store::{Offset, VectorStore};
use crate::{HilbasisError, SaturationStatus};

/// Cloneable handle for interrupting a running [`HilbertBasis::saturate`]
/// from another thread. Cancellation is polled at every passive pop and
/// between inequalities.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

/// Hilbert basis engine over homogeneous linear inequalities.
///
/// Inequalities are processed in declaration order, one saturation round
/// each: the current basis is evaluated against the inequality, candidates
/// drain from the passive queue in ascending L1 weight, unsubsumed ones
/// resolve against all activated vectors of opposite sign, and the zero
/// class plus the positive survivors become the next basis.
#[derive(Debug, Default)]
pub struct HilbertBasis {
    ineqs: Vec<Vec<Numeral>>,
    store: VectorStore,
    basis: Vec<Offset>,
    active: Vec<Offset>,
    passive: PassiveQueue,
    zero: Vec<Offset>,
    index: SubsumptionIndex,
    cancel: Arc<AtomicBool>,
    stats: Stats,
}

impl HilbertBasis {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dimension of the solution space; zero until the first inequality.
    pub fn num_vars(&self) -> usize {
        self.ineqs.last().map_or(0, Vec::len)
    }

    /// Appends the inequality `v · x >= 0`. The first inequality fixes the
    /// dimension for the lifetime of the engine (until [`reset`]).
    ///
    /// [`reset`]: HilbertBasis::reset
    pub fn add_ge(&mut self, v: Vec<Numeral>) -> Result<(), HilbasisError> {
        if let Some(first) = self.ineqs.first()
            && first.len() != v.len()
        {
            return Err(HilbasisError::DimensionMismatch {
                expected: first.len(),
                got: v.len(),
            });
        }
        if self.ineqs.is_empty() {
            self.index.init(v.len());
        }
        self.ineqs.push(v);
        Ok(())
    }

    /// Appends `v · x <= 0` by negating the coefficients.
    pub fn add_le(&mut self, v: Vec<Numeral>) -> Result<(), HilbasisError> {
        self.add_ge(v.into_iter().map(|coeff| -coeff).collect())
    }

    /// Appends `v · x = 0` as a pair of opposing inequalities.
    pub fn add_eq(&mut self, v: Vec<Numeral>) -> Result<(), HilbasisError> {
        self.add_le(v.clone())?;
        self.add_ge(v)
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            flag: Arc::clone(&self.cancel),
        }
    }

    #[inline(always)]
    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Clears every piece of state, including the declared inequalities
    /// and the cancellation flag. A fresh dimension may be used afterwards.
    pub fn reset(&mut self) {
        self.ineqs.clear();
        self.store.reset(0);
        self.basis.clear();
        self.active.clear();
        self.passive.reset();
        self.zero.clear();
        self.index = SubsumptionIndex::new();
        self.cancel.store(false, Ordering::Relaxed);
    }

    pub fn stats(&self) -> Stats {
        let mut stats = self.stats;
        stats.index = self.index.stats();
        stats
    }

    pub fn reset_statistics(&mut self) {
        self.stats = Stats::default();
        self.index.reset_statistics();
    }

    pub fn basis_len(&self) -> usize {
        self.basis.len()
    }

    pub fn basis(&self, at: usize) -> &[Numeral] {
        self.store.vec(self.basis[at])
    }

    pub fn basis_iter(&self) -> impl Iterator<Item = &[Numeral]> {
        self.basis.iter().map(|&offset| self.store.vec(offset))
    }

    /// Computes the Hilbert basis of the declared system.
    ///
    /// On [`SaturationStatus::Unsat`] and [`SaturationStatus::Cancelled`]
    /// the engine state is partially mutated; call [`reset`] before reuse.
    ///
    /// [`reset`]: HilbertBasis::reset
    pub fn saturate(&mut self) -> SaturationStatus {
        self.init_basis();
        for at in 0..self.ineqs.len() {
            if self.cancelled() {
                return SaturationStatus::Cancelled;
            }
            let ineq = self.ineqs[at].clone();
            let status = self.saturate_ineq(&ineq);
            if status != SaturationStatus::Sat {
                return status;
            }
            debug!(
                target: "hilbasis",
                inequality = at,
                basis_len = self.basis.len(),
                "saturation round complete"
            );
        }
        if self.cancelled() {
            return SaturationStatus::Cancelled;
        }
        SaturationStatus::Sat
    }

    /// Seeds the basis with the standard unit vectors.
    fn init_basis(&mut self) {
        let num_vars = self.num_vars();
        self.basis.clear();
        self.store.reset(num_vars);
        for var in 0..num_vars {
            let offset = self.store.alloc();
            self.store.set_unit(offset, var);
            self.basis.push(offset);
        }
    }

    fn saturate_ineq(&mut self, ineq: &[Numeral]) -> SaturationStatus {
        self.active.clear();
        self.passive.reset();
        self.zero.clear();
        self.index.reset();
        trace!(target: "hilbasis", ineq = %DisplayIneq(ineq), "saturating");

        let mut has_non_negative = false;
        for at in 0..self.basis.len() {
            let idx = self.basis[at];
            let eval = self.store.eval_against(idx, ineq);
            has_non_negative |= eval.is_nonneg();
            self.store.set_eval(idx, eval);
            self.add_goal(idx);
        }
        if !has_non_negative {
            return SaturationStatus::Unsat;
        }

        // Resolve passive into active.
        while let Some(idx) = self.passive.pop() {
            if self.cancelled() {
                return SaturationStatus::Cancelled;
            }
            if self.is_subsumed(idx) {
                self.recycle(idx);
                continue;
            }
            let sign = self.store.sign(idx);
            for at in 0..self.active.len() {
                let other = self.active[at];
                if self.store.sign(other) != sign {
                    let target = self.store.alloc();
                    self.resolve(idx, other, target);
                    self.add_goal(target);
                }
            }
            self.active.push(idx);
        }

        // The zero class and the positive survivors form the next basis;
        // everything else goes back to the arena.
        self.basis.clear();
        self.basis.append(&mut self.zero);
        let active = std::mem::take(&mut self.active);
        for idx in active {
            if self.store.eval(idx).is_pos() {
                self.basis.push(idx);
            } else {
                self.recycle(idx);
            }
        }
        SaturationStatus::Sat
    }

    /// Indexes a candidate and routes it to the zero class or the passive
    /// queue. A zero-evaluation candidate that is already dominated is
    /// recycled on the spot.
    fn add_goal(&mut self, idx: Offset) {
        {
            let Self { store, index, .. } = self;
            index.insert(idx, store.vec(idx), store.eval(idx));
        }
        if self.store.eval(idx).is_zero() {
            if self.is_subsumed(idx) {
                self.recycle(idx);
            } else {
                self.zero.push(idx);
            }
        } else {
            let weight = self.store.weight(idx);
            self.passive.insert(idx, weight);
        }
    }

    fn is_subsumed(&mut self, idx: Offset) -> bool {
        let Self {
            store,
            index,
            stats,
            ..
        } = self;
        match index.find(store.vec(idx), store.eval(idx), idx) {
            Some(dominator) => {
                trace!(
                    target: "hilbasis",
                    candidate = %DisplayVec(store.vec(idx)),
                    dominator = %DisplayVec(store.vec(dominator)),
                    "subsumed"
                );
                stats.num_subsumptions += 1;
                true
            }
            None => false,
        }
    }

    fn resolve(&mut self, left: Offset, right: Offset, target: Offset) {
        debug_assert!(self.store.sign(left) != self.store.sign(right));
        self.stats.num_resolves += 1;
        self.store.resolve_into(left, right, target);
    }

    /// Unindexes a slot and returns it to the arena's free list.
    fn recycle(&mut self, idx: Offset) {
        let Self { store, index, .. } = self;
        index.remove(idx, store.vec(idx), store.eval(idx));
        store.free(idx);
    }
}

struct DisplayVec<'a>(&'a [Numeral]);

impl fmt::Display for DisplayVec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (at, value) in self.0.iter().enumerate() {
            if at > 0 {
                write!(f, " ")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

struct DisplayIneq<'a>(&'a [Numeral]);

impl fmt::Display for DisplayIneq<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (var, coeff) in self.0.iter().enumerate() {
            if coeff.is_zero() {
                continue;
            }
            if first {
                if coeff.is_neg() {
                    write!(f, "-")?;
                }
            } else if coeff.is_pos() {
                write!(f, " + ")?;
            } else {
                write!(f, " - ")?;
            }
            first = false;
            let magnitude = coeff.abs();
            if !magnitude.is_one() {
                write!(f, "{magnitude}*")?;
            }
            write!(f, "x{var}")?;
        }
        if first {
            write!(f, "0")?;
        }
        write!(f, " >= 0")
    }
}

impl fmt::Display for HilbertBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "inequalities:")?;
        for ineq in &self.ineqs {
            writeln!(f, "{}", DisplayIneq(ineq))?;
        }
        if !self.basis.is_empty() {
            writeln!(f, "basis:")?;
            for &offset in &self.basis {
                writeln!(
                    f,
                    "{} -> {}",
                    DisplayVec(self.store.vec(offset)),
                    self.store.eval(offset)
                )?;
            }
        }
        if !self.active.is_empty() {
            writeln!(f, "active:")?;
            for &offset in &self.active {
                writeln!(f, "{}", DisplayVec(self.store.vec(offset)))?;
            }
        }
        if self.passive.iter().next().is_some() {
            writeln!(f, "passive:")?;
            for offset in self.passive.iter() {
                writeln!(f, "{}", DisplayVec(self.store.vec(offset)))?;
            }
        }
        if !self.zero.is_empty() {
            writeln!(f, "zero:")?;
            for &offset in &self.zero {
                writeln!(f, "{}", DisplayVec(self.store.vec(offset)))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::HilbertBasis;
    use crate::SaturationStatus;
    use hilbasis_core::Numeral;

    fn nums(raw: &[i64]) -> Vec<Numeral> {
        raw.iter().copied().map(Numeral::from).collect()
    }

    #[test]
    fn seed_basis_is_the_unit_basis() {
        let mut hb = HilbertBasis::new();
        hb.add_ge(nums(&[1, 2, 3])).unwrap();
        hb.init_basis();
        assert_eq!(hb.basis_len(), 3);
        for (var, vector) in hb.basis_iter().enumerate() {
            for (at, value) in vector.iter().enumerate() {
                assert_eq!(value.is_one(), at == var);
            }
        }
    }

    #[test]
    fn mismatched_dimension_is_rejected() {
        let mut hb = HilbertBasis::new();
        hb.add_ge(nums(&[1, 0])).unwrap();
        assert!(hb.add_ge(nums(&[1, 0, 0])).is_err());
        assert!(hb.add_le(nums(&[2, 1])).is_ok());
    }

    #[test]
    fn all_negative_inequality_is_unsat() {
        let mut hb = HilbertBasis::new();
        hb.add_ge(nums(&[-1, -2])).unwrap();
        assert_eq!(hb.saturate(), SaturationStatus::Unsat);
    }

    #[test]
    fn pre_cancelled_runs_report_cancellation() {
        let mut hb = HilbertBasis::new();
        hb.add_ge(nums(&[1, 0])).unwrap();
        hb.cancel();
        assert_eq!(hb.saturate(), SaturationStatus::Cancelled);

        hb.reset();
        hb.add_ge(nums(&[1, 0])).unwrap();
        assert_eq!(hb.saturate(), SaturationStatus::Sat);
    }

    #[test]
    fn display_renders_polynomial_inequalities() {
        let mut hb = HilbertBasis::new();
        hb.add_ge(nums(&[2, -1, 0])).unwrap();
        let rendered = hb.to_string();
        assert!(rendered.contains("2*x0 - x1 >= 0"), "got: {rendered}");
    }
}
