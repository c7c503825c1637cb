/// Counters maintained by the subsumption index.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct IndexStats {
    /// Offset comparisons performed across seed and refinement rounds.
    pub num_comparisons: u64,
    pub num_find: u64,
    pub num_insert: u64,
}

/// Counters maintained by the engine across `saturate` runs.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// Candidates dropped because an indexed vector dominated them.
    pub num_subsumptions: u64,
    /// Opposite-sign resolutions performed.
    pub num_resolves: u64,
    pub index: IndexStats,
}
