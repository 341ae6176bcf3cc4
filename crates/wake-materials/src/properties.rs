// ─────────────────────────────────────────────────────────────────────
// SCPN Wake Core — Material Properties
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Physical quantities of a material, used for collimation and wakes.
//!
//! Units: A in g/mol, density in kg/m³, dE/dx in GeV/m, cross-sections in
//! barn, radiation and interaction lengths in m.

use std::collections::BTreeMap;
use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use wake_types::constants::{AVOGADRO, BARN, PROTON_MASS_GEV};
use wake_types::error::{WakeError, WakeResult};

/// Beam energy the reference cross-sections are quoted at (GeV).
pub const REFERENCE_ENERGY_GEV: f64 = 450.0;

/// Power law of the pN total, inelastic and elastic cross-sections.
const CROSS_SECTION_EXPONENT: f64 = 0.05;

/// Below this energy the single-diffractive log law is undefined (GeV).
const MIN_SCALING_ENERGY_GEV: f64 = 1.0 / (0.15 * 2.0 * PROTON_MASS_GEV);

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Atomic number.
    pub z: f64,
    /// Atomic mass (g/mol).
    pub a: f64,
    pub density: f64,
    pub dedx: f64,
    /// Rutherford cross-section above the tracking cut.
    pub sigma_r: f64,
    /// Inelastic (absorptive) pN cross-section.
    pub sigma_i: f64,
    /// Elastic pN cross-section.
    pub sigma_e: f64,
    /// Single-diffractive pN cross-section.
    pub sigma_d: f64,
    /// Total pN cross-section.
    pub sigma_t: f64,
    /// Radiation length.
    pub x0: f64,
    /// Nuclear collision length, derived from `sigma_t`.
    pub lambda: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) extra: Option<BTreeMap<String, f64>>,
}

/// Effective nucleus seen by a scattering process.
///
/// Plain materials always return their own A. Mixtures draw a constituent
/// at random on every call.
pub trait NucleusSampler {
    fn properties(&self) -> &MaterialProperties;

    /// Mass number for Rutherford scattering.
    fn a_r(&self, rng: &mut dyn RngCore) -> f64;

    /// Mass number for hadronic (elastic) scattering.
    fn a_h(&self, rng: &mut dyn RngCore) -> f64;
}

impl MaterialProperties {
    /// Recompute the derived collision length from `sigma_t`.
    pub fn update(&mut self) {
        let n_sigma = AVOGADRO * self.density * self.sigma_t * BARN;
        self.lambda = if n_sigma > 0.0 && self.a > 0.0 {
            self.a * 1.0e-3 / n_sigma
        } else {
            0.0
        };
    }

    /// Copy of the material with cross-sections at beam energy `e` (GeV).
    ///
    /// Total, inelastic and elastic pN cross-sections follow
    /// `(E/E_ref)^0.05`; single diffraction follows `ln(0.15·s)` with
    /// `s = 2·m_p·E`. Rutherford, dE/dx and X0 are kept.
    pub fn energy_scale(&self, e: f64) -> WakeResult<MaterialProperties> {
        if !e.is_finite() || e <= MIN_SCALING_ENERGY_GEV {
            return Err(WakeError::PhysicsViolation(format!(
                "energy must be finite and > {MIN_SCALING_ENERGY_GEV:.3} GeV, got {e}"
            )));
        }
        let power = (e / REFERENCE_ENERGY_GEV).powf(CROSS_SECTION_EXPONENT);
        let s = 2.0 * PROTON_MASS_GEV * e;
        let s_ref = 2.0 * PROTON_MASS_GEV * REFERENCE_ENERGY_GEV;
        let diffractive = (0.15 * s).ln() / (0.15 * s_ref).ln();

        let mut scaled = self.clone();
        scaled.sigma_t *= power;
        scaled.sigma_i *= power;
        scaled.sigma_e *= power;
        scaled.sigma_d *= diffractive;
        scaled.update();
        Ok(scaled)
    }

    pub fn set_extra(&mut self, key: &str, value: f64) {
        self.extra
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), value);
    }

    pub fn get_extra(&self, key: &str) -> WakeResult<f64> {
        self.extra
            .as_ref()
            .and_then(|m| m.get(key).copied())
            .ok_or_else(|| WakeError::ExtraNotFound(key.to_string()))
    }

    pub fn have_extra(&self, key: &str) -> bool {
        self.extra.as_ref().is_some_and(|m| m.contains_key(key))
    }

    /// Named extra attributes, if any were ever set.
    pub fn extras(&self) -> Option<&BTreeMap<String, f64>> {
        self.extra.as_ref()
    }
}

impl NucleusSampler for MaterialProperties {
    fn properties(&self) -> &MaterialProperties {
        self
    }

    fn a_r(&self, _rng: &mut dyn RngCore) -> f64 {
        self.a
    }

    fn a_h(&self, _rng: &mut dyn RngCore) -> f64 {
        self.a
    }
}

impl fmt::Display for MaterialProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("Z", self.z),
            ("A", self.a),
            ("density", self.density),
            ("dEdx", self.dedx),
            ("sigma_R", self.sigma_r),
            ("sigma_I", self.sigma_i),
            ("sigma_E", self.sigma_e),
            ("sigma_D", self.sigma_d),
            ("sigma_T", self.sigma_t),
            ("X0", self.x0),
            ("lambda", self.lambda),
        ];
        for (label, value) in rows {
            writeln!(f, "{label:<10}{value:>14.6e}")?;
        }
        if let Some(extra) = &self.extra {
            for (key, value) in extra {
                writeln!(f, "{key:<10}{value:>14.6e}")?;
            }
        }
        Ok(())
    }
}
