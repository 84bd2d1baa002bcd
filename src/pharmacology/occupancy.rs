//! Rate equations for bath mixing and receptor occupancy.
//!
//! References:
//! - Gaddum JH. J Physiol. 1937;89:7P-9P (competitive antagonism)
//! - Schild HO. Br J Pharmacol. 1947;2:189-206

/// Volume-weighted mixing of a stock solution into the bath
///
/// c' = (c × V_bath + V_stock × c_stock) / (V_stock + V_bath)
///
/// The result is a convex combination of `current_uM` and `applied_uM`.
/// `stock_volume_mL + bath_volume_mL` must be > 0.
///
/// # Arguments
/// * `current_uM` - Concentration already in the bath
/// * `applied_uM` - Concentration of the stock being added
/// * `stock_volume_mL` - Volume of stock added
/// * `bath_volume_mL` - Bath volume
pub fn mixed_concentration_uM(
    current_uM: f64,
    applied_uM: f64,
    stock_volume_mL: f64,
    bath_volume_mL: f64,
) -> f64 {
    (current_uM * bath_volume_mL + stock_volume_mL * applied_uM) / (stock_volume_mL + bath_volume_mL)
}

/// Fractional response of a receptor under competitive antagonism
///
/// f = E × [A] / ([A] + EC50 × (1 + [B] / Kd))
///
/// Returns 0 when no agonist is present, whatever the antagonist level.
/// `kd_uM` must be > 0; receptors enforce this at construction.
///
/// # Arguments
/// * `efficacy` - Maximal fractional response E
/// * `half_max_uM` - Agonist EC50
/// * `agonist_uM` - Total agonist concentration [A]
/// * `antagonist_uM` - Total antagonist concentration [B]
/// * `kd_uM` - Antagonist dissociation constant
pub fn competitive_occupancy(
    efficacy: f64,
    half_max_uM: f64,
    agonist_uM: f64,
    antagonist_uM: f64,
    kd_uM: f64,
) -> f64 {
    if agonist_uM <= 0.0 {
        return 0.0;
    }
    let shifted_ec50 = half_max_uM * (1.0 + antagonist_uM / kd_uM);
    efficacy * agonist_uM / (agonist_uM + shifted_ec50)
}
