// ─────────────────────────────────────────────────────────────────────
// SCPN Wake Core — Standard Materials
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Collimator materials with pN cross-sections quoted at 450 GeV.

use std::collections::BTreeMap;

use crate::properties::MaterialProperties;

#[allow(clippy::too_many_arguments)]
fn reference(
    z: f64,
    a: f64,
    density: f64,
    dedx: f64,
    x0: f64,
    sigma_t: f64,
    sigma_i: f64,
    sigma_d: f64,
    sigma_e: f64,
    sigma_r: f64,
) -> MaterialProperties {
    let mut m = MaterialProperties {
        z,
        a,
        density,
        dedx,
        sigma_r,
        sigma_i,
        sigma_e,
        sigma_d,
        sigma_t,
        x0,
        ..Default::default()
    };
    m.update();
    m
}

impl MaterialProperties {
    pub fn beryllium() -> Self {
        reference(4.0, 9.012182, 1848.0, 0.295, 0.3528, 0.268, 0.199, 0.0035, 0.0655, 0.000035)
    }
    pub fn carbon() -> Self {
        reference(6.0, 12.0107, 2210.0, 0.385, 0.1932, 0.331, 0.231, 0.0035, 0.0965, 0.000076)
    }
    pub fn aluminium() -> Self {
        reference(13.0, 26.981539, 2699.0, 0.436, 0.08897, 0.634, 0.421, 0.0048, 0.2082, 0.00034)
    }
    pub fn copper() -> Self {
        reference(29.0, 63.546, 8960.0, 1.257, 0.01436, 1.232, 0.782, 0.0066, 0.4434, 0.00153)
    }
    pub fn tungsten() -> Self {
        reference(74.0, 183.84, 19300.0, 2.21, 0.003504, 2.767, 1.65, 0.0099, 1.1071, 0.00768)
    }
    pub fn lead() -> Self {
        reference(82.0, 207.2, 11350.0, 1.273, 0.005612, 2.960, 1.77, 0.0103, 1.1797, 0.00907)
    }
}

/// Standard materials keyed by chemical symbol.
pub fn standard_materials() -> BTreeMap<String, MaterialProperties> {
    [
        ("Be", MaterialProperties::beryllium()),
        ("C", MaterialProperties::carbon()),
        ("Al", MaterialProperties::aluminium()),
        ("Cu", MaterialProperties::copper()),
        ("W", MaterialProperties::tungsten()),
        ("Pb", MaterialProperties::lead()),
    ]
    .into_iter()
    .map(|(symbol, m)| (symbol.to_string(), m))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_has_six_materials() {
        let dict = standard_materials();
        assert_eq!(dict.len(), 6);
        assert_eq!(dict["W"].z, 74.0);
    }

    #[test]
    fn test_collision_length_shrinks_with_density() {
        let be = MaterialProperties::beryllium();
        let w = MaterialProperties::tungsten();
        assert!(be.lambda > w.lambda);
        assert!(w.lambda > 0.0);
    }

    #[test]
    fn test_cross_sections_are_ordered() {
        for (symbol, m) in standard_materials() {
            assert!(m.sigma_t > m.sigma_i, "{symbol}");
            assert!(m.sigma_t > m.sigma_e, "{symbol}");
            assert!(m.sigma_r < m.sigma_d, "{symbol}");
        }
    }
}
