//! Integration tests for the pharmacology model.
//!
//! Tests verify:
//! - Bath mixing stays between the prior and applied concentrations
//! - Draining is idempotent and dosing after a drain starts from zero
//! - Tension rises with agonist and falls with antagonist
//! - The Unknown behaves exactly like the stock drug it copies
//! - Answer checking honours its inclusive tolerance bounds

use organ_bath_simulator::{
    competitive_occupancy, create_unknown, is_correct, Drug, Receptor, DEFAULT_TOLERANCE,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn default_stock() -> Vec<Drug> {
    vec![
        Drug::agonist("Agonist 1", 0.78, 0.10),
        Drug::agonist("Agonist 2", 0.64, 0.15),
        Drug::agonist("Agonist 3", 0.97, 0.17),
        Drug::antagonist("Antagonist 1", 0.12),
        Drug::antagonist("Antagonist 2", 0.09),
        Drug::antagonist("Antagonist 3", 0.17),
    ]
}

// ============================================================================
// Dosing
// ============================================================================

/// New concentration lies between the old and applied concentrations
#[test]
fn test_dosing_convexity() {
    let starts = [0.0, 0.01, 0.2, 1.0, 3.5];
    let applied = [0.0, 0.05, 1.0, 2.5, 10.0];
    let volumes = [0.0, 0.1, 1.0, 5.0, 100.0];

    for &start in &starts {
        for &stock in &applied {
            for &volume in &volumes {
                let mut drug = Drug::agonist("Agonist 1", 0.78, 0.10);
                // A huge volume of `start` stock brings the bath to ~`start`
                drug.apply_dose(start, 1.0e12, 1.0);
                let before = drug.concentration_uM();
                drug.apply_dose(stock, volume, 25.0);
                let after = drug.concentration_uM();

                let lo = before.min(stock) - 1e-9;
                let hi = before.max(stock) + 1e-9;
                assert!(
                    after >= lo && after <= hi,
                    "start {} stock {} volume {}: {} not in [{}, {}]",
                    before, stock, volume, after, lo, hi
                );
                assert!(after >= 0.0);
            }
        }
    }
}

/// Zero stock volume leaves the bath unchanged
#[test]
fn test_zero_volume_dose_is_noop() {
    let mut drug = Drug::antagonist("Antagonist 2", 0.09);
    drug.apply_dose(1.0, 1.0, 25.0);
    let before = drug.concentration_uM();
    drug.apply_dose(50.0, 0.0, 25.0);
    assert!((drug.concentration_uM() - before).abs() < 1e-15);
}

/// reset() twice leaves 0; dosing after reset matches dosing a fresh drug
#[test]
fn test_reset_idempotence() {
    let mut dosed = Drug::agonist("Agonist 2", 0.64, 0.15);
    dosed.apply_dose(1.0, 2.0, 25.0);
    dosed.apply_dose(1.0, 2.0, 25.0);
    dosed.reset();
    dosed.reset();
    assert_eq!(dosed.concentration_uM(), 0.0);

    let mut fresh = Drug::agonist("Agonist 2", 0.64, 0.15);
    dosed.apply_dose(0.8, 1.5, 25.0);
    fresh.apply_dose(0.8, 1.5, 25.0);
    assert_eq!(dosed.concentration_uM(), fresh.concentration_uM());
}

// ============================================================================
// Tension response
// ============================================================================

/// More agonist never lowers tension; more antagonist never raises it
#[test]
fn test_tension_monotonicity() {
    let levels: Vec<f64> = (0..40).map(|i| i as f64 * 0.05).collect();

    for &antagonist in &[0.0, 0.05, 0.12, 1.0] {
        let mut previous = -1.0;
        for &agonist in &levels {
            let f = competitive_occupancy(0.78, 0.10, agonist, antagonist, 0.12);
            assert!(
                f >= previous,
                "tension fell from {} to {} raising agonist to {} (antagonist {})",
                previous, f, agonist, antagonist
            );
            previous = f;
        }
    }

    for &agonist in &[0.0, 0.01, 0.1, 2.0] {
        let mut previous = f64::INFINITY;
        for &antagonist in &levels {
            let f = competitive_occupancy(0.97, 0.17, agonist, antagonist, 0.17);
            assert!(
                f <= previous,
                "tension rose from {} to {} raising antagonist to {} (agonist {})",
                previous, f, antagonist, agonist
            );
            previous = f;
        }
    }
}

/// Fractions stay within [0, efficacy] for non-negative inputs
#[test]
fn test_tension_bounds() {
    for &agonist in &[0.0, 1e-6, 0.1, 1.0, 1e6] {
        for &antagonist in &[0.0, 0.1, 1e6] {
            let f = competitive_occupancy(0.97, 0.17, agonist, antagonist, 0.17);
            assert!((0.0..=0.97).contains(&f), "f = {} at A={} B={}", f, agonist, antagonist);
        }
    }
}

/// Receptor reads through roster indices, so one dose is seen by the receptor
#[test]
fn test_receptor_sees_roster_doses() {
    let mut drugs = default_stock();
    let mut receptor = Receptor::new("Receptor 2", vec![1], vec![4], &drugs).unwrap();

    drugs[1].apply_dose(1.0, 1.0, 25.0);
    receptor.update_tension(&drugs);

    let expected = competitive_occupancy(0.64, 0.15, 1.0 / 26.0, 0.0, 0.09);
    assert!(
        (receptor.tension_fraction() - expected).abs() < 1e-12,
        "expected {}, got {}",
        expected,
        receptor.tension_fraction()
    );
}

// ============================================================================
// Unknown fidelity
// ============================================================================

/// The Unknown's contribution equals its source drug's at equal concentration
#[test]
fn test_unknown_fidelity() {
    let mut rng = StdRng::seed_from_u64(2024);

    for _ in 0..30 {
        let stock = default_stock();
        let unknown = create_unknown(&stock, &mut rng).unwrap();
        let i = unknown.source_index;
        let (agonist, antagonist) = if i < 3 { (i, i + 3) } else { (i - 3, i) };

        let mut drugs = stock.clone();
        drugs.push(unknown.drug.clone());
        let u = drugs.len() - 1;

        // Same receptor wired once with the stock drug, once with the Unknown in its place
        let (stock_ag, stock_ant, unk_ag, unk_ant) = if i < 3 {
            (vec![agonist], vec![antagonist], vec![u], vec![antagonist])
        } else {
            (vec![agonist], vec![antagonist], vec![agonist], vec![u])
        };
        let mut with_stock = Receptor::new("stock", stock_ag, stock_ant, &drugs).unwrap();
        let mut with_unknown = Receptor::new("unknown", unk_ag, unk_ant, &drugs).unwrap();

        for &c in &[0.01, 0.05, 0.3, 1.2] {
            drugs.iter_mut().for_each(Drug::reset);
            if i >= 3 {
                // Background agonist so the antagonist has something to block
                drugs[agonist].apply_dose(1.0, 1.0, 25.0);
            }
            drugs[i].apply_dose(c, 1.0e12, 1.0);
            with_stock.update_tension(&drugs);
            drugs[i].reset();
            drugs[u].apply_dose(c, 1.0e12, 1.0);
            with_unknown.update_tension(&drugs);

            assert!(
                (with_stock.tension_fraction() - with_unknown.tension_fraction()).abs() < 1e-9,
                "source {} at {} uM: stock {} vs unknown {}",
                i,
                c,
                with_stock.tension_fraction(),
                with_unknown.tension_fraction()
            );
        }
    }
}

// ============================================================================
// Answer verification
// ============================================================================

/// 0.98 and 1.02 accepted, just outside rejected, wrong index always rejected
#[test]
fn test_verifier_boundary() {
    assert!(is_correct(4, 0.98, 4, 1.0, DEFAULT_TOLERANCE));
    assert!(is_correct(4, 1.02, 4, 1.0, DEFAULT_TOLERANCE));
    assert!(!is_correct(4, 0.979999, 4, 1.0, DEFAULT_TOLERANCE));
    assert!(!is_correct(4, 1.020001, 4, 1.0, DEFAULT_TOLERANCE));

    for guessed in 0..6 {
        if guessed != 4 {
            assert!(!is_correct(guessed, 1.0, 4, 1.0, DEFAULT_TOLERANCE));
        }
    }
}

/// Tolerance is relative to the true concentration
#[test]
fn test_verifier_relative_tolerance() {
    assert!(is_correct(0, 0.49, 0, 0.5, DEFAULT_TOLERANCE));
    assert!(!is_correct(0, 0.48, 0, 0.5, DEFAULT_TOLERANCE));
    assert!(is_correct(0, 1.45, 0, 1.45, 0.0));
}
