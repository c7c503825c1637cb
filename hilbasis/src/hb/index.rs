use ahash::AHashMap;
use hilbasis_core::{Numeral, WeightHeap};
use smallvec::SmallVec;

use crate::hb::stats::IndexStats;
use crate::hb::store::Offset;

type OffsetBucket = SmallVec<[Offset; 4]>;

/// One dimension of the subsumption index.
///
/// Distinct numeral values are declared into small ids on first sight; the
/// ids sit on a weight heap (non-negative values only) so "every declared
/// value `<=` a threshold" is a pruned heap walk. Each id carries the list
/// of offsets currently holding that value in this dimension.
#[derive(Clone, Debug, Default)]
struct WeightMap {
    values: Vec<Numeral>,
    ids: AHashMap<Numeral, u32>,
    heap: WeightHeap,
    offsets: Vec<OffsetBucket>,
    le: Vec<u32>,
}

impl WeightMap {
    fn declare(&mut self, value: &Numeral) -> u32 {
        if let Some(&id) = self.ids.get(value) {
            return id;
        }
        let id = self.values.len() as u32;
        self.values.push(value.clone());
        self.ids.insert(value.clone(), id);
        self.heap.set_bounds(id as usize + 1);
        if value.is_nonneg() {
            self.heap.insert(id, &self.values);
        }
        self.offsets.push(OffsetBucket::new());
        id
    }

    fn insert(&mut self, offset: Offset, value: &Numeral) {
        let id = self.declare(value);
        self.offsets[id as usize].push(offset);
    }

    fn remove(&mut self, offset: Offset, value: &Numeral) {
        let id = self.declare(value);
        let bucket = &mut self.offsets[id as usize];
        if let Some(at) = bucket.iter().position(|&o| o == offset) {
            bucket.swap_remove(at);
        }
    }

    fn reset(&mut self) {
        self.values.clear();
        self.ids.clear();
        self.heap.clear();
        self.offsets.clear();
        self.le.clear();
    }

    /// Seeds the working set from the evaluation dimension.
    ///
    /// A positive candidate evaluation admits any dominator with evaluation
    /// in `(0, eval]` (zero-evaluation vectors belong to the zero class and
    /// are skipped); a non-positive one requires the exact same evaluation.
    fn seed_find(
        &mut self,
        refs: &mut AHashMap<Offset, u32>,
        eval: &Numeral,
        self_offset: Offset,
        comparisons: &mut u64,
    ) -> Option<Offset> {
        let val = self.declare(eval);
        self.le.clear();
        if eval.is_pos() {
            self.heap
                .find_le(&self.values[val as usize], &self.values, &mut self.le);
        } else {
            self.le.push(val);
        }
        let mut found = None;
        for &id in &self.le {
            if eval.is_pos() && self.values[id as usize].is_zero() {
                continue;
            }
            for &offset in &self.offsets[id as usize] {
                *comparisons += 1;
                if offset != self_offset {
                    refs.insert(offset, 0);
                    found = Some(offset);
                }
            }
        }
        found
    }

    /// One refinement round over a coordinate dimension: survivors of round
    /// `round` whose stored value is `<= value` advance to `round + 1`.
    fn refine_find(
        &mut self,
        refs: &mut AHashMap<Offset, u32>,
        round: u32,
        value: &Numeral,
        self_offset: Offset,
        comparisons: &mut u64,
    ) -> Option<Offset> {
        let val = self.declare(value);
        self.le.clear();
        self.heap
            .find_le(&self.values[val as usize], &self.values, &mut self.le);
        let mut found = None;
        for &id in &self.le {
            for &offset in &self.offsets[id as usize] {
                *comparisons += 1;
                if offset == self_offset {
                    continue;
                }
                if let Some(at) = refs.get_mut(&offset)
                    && *at == round
                {
                    *at = round + 1;
                    found = Some(offset);
                }
            }
        }
        found
    }
}

/// Multi-dimensional domination index over the live working vectors.
///
/// `find` answers whether some other indexed vector `w` subsumes the
/// candidate `v`: `v[i] >= w[i]` on every coordinate, `eval(w) >= eval(v)`
/// when both evaluations are non-negative, and `eval(w) == eval(v)` exactly
/// when `eval(v)` is negative. The evaluation dimension is queried first
/// (it is the most selective), then each coordinate narrows the surviving
/// set in turn.
#[derive(Clone, Debug, Default)]
pub struct SubsumptionIndex {
    coords: Vec<WeightMap>,
    eval_weights: WeightMap,
    refs: AHashMap<Offset, u32>,
    stats: IndexStats,
}

impl SubsumptionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the coordinate dimensionality. Idempotent once sized.
    pub fn init(&mut self, num_vars: usize) {
        if self.coords.is_empty() {
            self.coords.resize_with(num_vars, WeightMap::default);
        }
        debug_assert_eq!(self.coords.len(), num_vars, "index dimension mismatch");
    }

    pub fn insert(&mut self, offset: Offset, values: &[Numeral], eval: &Numeral) {
        self.stats.num_insert += 1;
        debug_assert_eq!(values.len(), self.coords.len(), "vector arity mismatch");
        for (map, value) in self.coords.iter_mut().zip(values) {
            map.insert(offset, value);
        }
        self.eval_weights.insert(offset, eval);
    }

    pub fn remove(&mut self, offset: Offset, values: &[Numeral], eval: &Numeral) {
        for (map, value) in self.coords.iter_mut().zip(values) {
            map.remove(offset, value);
        }
        self.eval_weights.remove(offset, eval);
    }

    /// Some other indexed offset dominating `(values, eval)`, if any.
    pub fn find(
        &mut self,
        values: &[Numeral],
        eval: &Numeral,
        self_offset: Offset,
    ) -> Option<Offset> {
        let Self {
            coords,
            eval_weights,
            refs,
            stats,
        } = self;
        stats.num_find += 1;
        let mut found = eval_weights.seed_find(refs, eval, self_offset, &mut stats.num_comparisons);
        let mut round = 0u32;
        while found.is_some() && (round as usize) < coords.len() {
            found = coords[round as usize].refine_find(
                refs,
                round,
                &values[round as usize],
                self_offset,
                &mut stats.num_comparisons,
            );
            round += 1;
        }
        refs.clear();
        found
    }

    /// Empties every dimension; the coordinate count is retained.
    pub fn reset(&mut self) {
        for map in &mut self.coords {
            map.reset();
        }
        self.eval_weights.reset();
        self.refs.clear();
    }

    #[inline(always)]
    pub fn stats(&self) -> IndexStats {
        self.stats
    }

    pub fn reset_statistics(&mut self) {
        self.stats = IndexStats::default();
    }
}
