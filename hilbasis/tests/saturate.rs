use hilbasis::{HilbertBasis, Numeral, SaturationStatus};

fn nums(raw: &[i64]) -> Vec<Numeral> {
    raw.iter().copied().map(Numeral::from).collect()
}

fn basis_set(hb: &HilbertBasis) -> Vec<Vec<Numeral>> {
    let mut set: Vec<Vec<Numeral>> = hb.basis_iter().map(<[Numeral]>::to_vec).collect();
    set.sort();
    set
}

fn expect_basis(hb: &HilbertBasis, rows: &[&[i64]]) {
    let mut expected: Vec<Vec<Numeral>> = rows.iter().map(|row| nums(row)).collect();
    expected.sort();
    assert_eq!(basis_set(hb), expected);
}

#[test]
fn single_halfspace_keeps_the_unit_basis() {
    let mut hb = HilbertBasis::new();
    hb.add_ge(nums(&[1, 0])).unwrap();
    assert_eq!(hb.saturate(), SaturationStatus::Sat);
    expect_basis(&hb, &[&[1, 0], &[0, 1]]);
}

#[test]
fn equality_collapses_to_the_diagonal() {
    let mut hb = HilbertBasis::new();
    hb.add_eq(nums(&[1, -1])).unwrap();
    assert_eq!(hb.saturate(), SaturationStatus::Sat);
    expect_basis(&hb, &[&[1, 1]]);
}

#[test]
fn opposing_halfspaces_resolve_to_the_diagonal() {
    let mut hb = HilbertBasis::new();
    hb.add_ge(nums(&[1, -1, 0])).unwrap();
    hb.add_ge(nums(&[-1, 1, 0])).unwrap();
    hb.add_ge(nums(&[0, 0, 1])).unwrap();
    assert_eq!(hb.saturate(), SaturationStatus::Sat);
    expect_basis(&hb, &[&[1, 1, 0], &[0, 0, 1]]);
}

#[test]
fn frobenius_style_equality() {
    let mut hb = HilbertBasis::new();
    // 2*x0 = 3*x1
    hb.add_eq(nums(&[2, -3])).unwrap();
    assert_eq!(hb.saturate(), SaturationStatus::Sat);
    expect_basis(&hb, &[&[3, 2]]);
}

#[test]
fn contradictory_halfspaces_are_unsat() {
    let mut hb = HilbertBasis::new();
    hb.add_ge(nums(&[-1])).unwrap();
    hb.add_ge(nums(&[1])).unwrap();
    assert_eq!(hb.saturate(), SaturationStatus::Unsat);
}

#[test]
fn mixed_three_variable_halfspace() {
    let mut hb = HilbertBasis::new();
    // x0 + x1 >= x2
    hb.add_ge(nums(&[1, 1, -1])).unwrap();
    assert_eq!(hb.saturate(), SaturationStatus::Sat);
    expect_basis(&hb, &[&[1, 0, 0], &[0, 1, 0], &[1, 0, 1], &[0, 1, 1]]);
}

#[test]
fn no_inequalities_is_vacuously_sat() {
    let mut hb = HilbertBasis::new();
    assert_eq!(hb.saturate(), SaturationStatus::Sat);
    assert_eq!(hb.basis_len(), 0);
}

#[test]
fn non_negative_coefficients_change_nothing() {
    let mut hb = HilbertBasis::new();
    hb.add_ge(nums(&[2, 0, 5])).unwrap();
    assert_eq!(hb.saturate(), SaturationStatus::Sat);
    expect_basis(&hb, &[&[1, 0, 0], &[0, 1, 0], &[0, 0, 1]]);
}

#[test]
fn rational_coefficients_scale_away() {
    let mut scaled = HilbertBasis::new();
    scaled.add_ge(nums(&[3, -2])).unwrap();
    assert_eq!(scaled.saturate(), SaturationStatus::Sat);

    let mut fractional = HilbertBasis::new();
    fractional
        .add_ge(vec![Numeral::ratio(1, 2), Numeral::ratio(-1, 3)])
        .unwrap();
    assert_eq!(fractional.saturate(), SaturationStatus::Sat);

    assert_eq!(basis_set(&scaled), basis_set(&fractional));
}

#[test]
fn reset_then_replay_reproduces_the_basis() {
    let mut hb = HilbertBasis::new();
    hb.add_eq(nums(&[2, -3])).unwrap();
    assert_eq!(hb.saturate(), SaturationStatus::Sat);
    let first = basis_set(&hb);

    hb.reset();
    assert_eq!(hb.num_vars(), 0);
    hb.add_eq(nums(&[2, -3])).unwrap();
    assert_eq!(hb.saturate(), SaturationStatus::Sat);
    assert_eq!(basis_set(&hb), first);
}

#[test]
fn reset_allows_a_new_dimension() {
    let mut hb = HilbertBasis::new();
    hb.add_ge(nums(&[1, -1, 0])).unwrap();
    assert_eq!(hb.saturate(), SaturationStatus::Sat);

    hb.reset();
    hb.add_eq(nums(&[1, -1])).unwrap();
    assert_eq!(hb.saturate(), SaturationStatus::Sat);
    expect_basis(&hb, &[&[1, 1]]);
}

#[test]
fn saturate_is_idempotent() {
    let mut hb = HilbertBasis::new();
    hb.add_ge(nums(&[1, 1, -1])).unwrap();
    assert_eq!(hb.saturate(), SaturationStatus::Sat);
    let first = basis_set(&hb);
    assert_eq!(hb.saturate(), SaturationStatus::Sat);
    assert_eq!(basis_set(&hb), first);
}

#[test]
fn implied_inequality_leaves_the_basis_unchanged() {
    let mut hb = HilbertBasis::new();
    hb.add_eq(nums(&[1, -1])).unwrap();
    assert_eq!(hb.saturate(), SaturationStatus::Sat);
    let without = basis_set(&hb);

    // 2*x0 >= 2*x1 is implied by x0 = x1.
    hb.add_ge(nums(&[2, -2])).unwrap();
    assert_eq!(hb.saturate(), SaturationStatus::Sat);
    assert_eq!(basis_set(&hb), without);
}

#[test]
fn declaration_order_does_not_change_the_basis_set() {
    let rows: [&[i64]; 3] = [&[1, -1, 0], &[-1, 1, 0], &[0, 0, 1]];

    let mut forward = HilbertBasis::new();
    for row in rows {
        forward.add_ge(nums(row)).unwrap();
    }
    assert_eq!(forward.saturate(), SaturationStatus::Sat);

    let mut backward = HilbertBasis::new();
    for row in rows.iter().rev() {
        backward.add_ge(nums(row)).unwrap();
    }
    assert_eq!(backward.saturate(), SaturationStatus::Sat);

    assert_eq!(basis_set(&forward), basis_set(&backward));
}

#[test]
fn repeated_runs_are_deterministic() {
    let build = || {
        let mut hb = HilbertBasis::new();
        hb.add_eq(nums(&[2, -3, 0])).unwrap();
        hb.add_ge(nums(&[1, 1, -2])).unwrap();
        hb
    };

    let mut first = build();
    assert_eq!(first.saturate(), SaturationStatus::Sat);
    let mut second = build();
    assert_eq!(second.saturate(), SaturationStatus::Sat);
    assert_eq!(basis_set(&first), basis_set(&second));
}

#[test]
fn basis_vectors_are_pairwise_unsubsumed() {
    let mut hb = HilbertBasis::new();
    hb.add_ge(nums(&[1, 1, -1])).unwrap();
    hb.add_ge(nums(&[2, -1, 0])).unwrap();
    assert_eq!(hb.saturate(), SaturationStatus::Sat);

    let basis = basis_set(&hb);
    for (i, a) in basis.iter().enumerate() {
        for (j, b) in basis.iter().enumerate() {
            if i == j {
                continue;
            }
            let dominates = a.iter().zip(b).all(|(av, bv)| av <= bv);
            assert!(!dominates, "{a:?} subsumes {b:?} inside the final basis");
        }
    }
}

/// Every lattice point satisfying the system must decompose into a
/// non-negative integer combination of basis vectors.
fn decomposes(point: &[Numeral], basis: &[Vec<Numeral>]) -> bool {
    if point.iter().all(Numeral::is_zero) {
        return true;
    }
    for generator in basis {
        let fits = generator
            .iter()
            .zip(point)
            .all(|(gv, pv)| gv <= pv)
            && generator.iter().any(|gv| gv.is_pos());
        if !fits {
            continue;
        }
        let rest: Vec<Numeral> = point
            .iter()
            .zip(generator)
            .map(|(pv, gv)| pv.ref_sub(gv))
            .collect();
        if decomposes(&rest, basis) {
            return true;
        }
    }
    false
}

#[test]
fn every_small_solution_is_generated() {
    let systems: [&[&[i64]]; 3] = [
        &[&[1, 1, -1]],
        &[&[1, -1, 0], &[-1, 1, 0], &[0, 0, 1]],
        &[&[2, -3], &[-2, 3]],
    ];
    const BOUND: i64 = 4;

    for rows in systems {
        let mut hb = HilbertBasis::new();
        for row in rows {
            hb.add_ge(nums(row)).unwrap();
        }
        assert_eq!(hb.saturate(), SaturationStatus::Sat);
        let basis = basis_set(&hb);
        let num_vars = hb.num_vars();

        let mut point = vec![0i64; num_vars];
        loop {
            let candidate = nums(&point);
            let satisfies = rows.iter().all(|row| {
                let mut dot = Numeral::zero();
                for (coeff, value) in nums(row).iter().zip(&candidate) {
                    dot += &coeff.ref_mul(value);
                }
                dot.is_nonneg()
            });
            if satisfies {
                assert!(
                    decomposes(&candidate, &basis),
                    "{point:?} satisfies {rows:?} but is not generated"
                );
            }

            // odometer step
            let mut at = 0;
            loop {
                if at == num_vars {
                    break;
                }
                point[at] += 1;
                if point[at] <= BOUND {
                    break;
                }
                point[at] = 0;
                at += 1;
            }
            if at == num_vars {
                break;
            }
        }
    }
}

#[test]
fn cancellation_interrupts_and_reset_recovers() {
    let mut hb = HilbertBasis::new();
    hb.add_eq(nums(&[2, -3])).unwrap();
    let handle = hb.cancel_handle();
    handle.cancel();
    assert_eq!(hb.saturate(), SaturationStatus::Cancelled);

    hb.reset();
    hb.add_eq(nums(&[2, -3])).unwrap();
    assert_eq!(hb.saturate(), SaturationStatus::Sat);
    expect_basis(&hb, &[&[3, 2]]);
}

#[test]
fn statistics_count_the_work() {
    let mut hb = HilbertBasis::new();
    hb.add_eq(nums(&[2, -3])).unwrap();
    assert_eq!(hb.saturate(), SaturationStatus::Sat);

    let stats = hb.stats();
    assert!(stats.num_resolves > 0);
    assert!(stats.num_subsumptions > 0);
    assert!(stats.index.num_insert > 0);
    assert!(stats.index.num_find >= stats.num_subsumptions);
    assert!(stats.index.num_comparisons > 0);

    hb.reset_statistics();
    let cleared = hb.stats();
    assert_eq!(cleared.num_resolves, 0);
    assert_eq!(cleared.index.num_find, 0);
}
