// ─────────────────────────────────────────────────────────────────────
// SCPN Wake Core — Material Mixtures
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Compound materials built from catalogue entries.
//!
//! Proportions are atom fractions. Bulk quantities are averaged; the
//! nucleus a particle scatters on is drawn at random per interaction.

use std::collections::BTreeMap;
use std::fmt;

use rand::{Rng, RngCore};
use wake_types::error::{WakeError, WakeResult};

use crate::properties::{MaterialProperties, NucleusSampler};

#[derive(Debug, Clone, PartialEq)]
pub struct Constituent {
    pub name: String,
    pub a: f64,
    /// Normalised atom fraction.
    pub proportion: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mixture {
    properties: MaterialProperties,
    constituents: Vec<Constituent>,
    /// Cumulative σ_R·p, normalised to 1.
    rutherford_cdf: Vec<f64>,
    /// Cumulative σ_E·p, normalised to 1.
    hadronic_cdf: Vec<f64>,
}

fn cumulative(weights: impl Iterator<Item = f64>, what: &str) -> WakeResult<Vec<f64>> {
    let mut acc = 0.0;
    let mut cdf: Vec<f64> = weights
        .map(|w| {
            acc += w;
            acc
        })
        .collect();
    if !acc.is_finite() || acc <= 0.0 {
        return Err(WakeError::PhysicsViolation(format!(
            "mixture has no {what} cross-section"
        )));
    }
    for c in &mut cdf {
        *c /= acc;
    }
    Ok(cdf)
}

impl Mixture {
    /// Combine `names` from `dict` in atom `proportions` at bulk `density`.
    pub fn new(
        dict: &BTreeMap<String, MaterialProperties>,
        names: &[&str],
        proportions: &[f64],
        density: f64,
    ) -> WakeResult<Self> {
        if names.is_empty() || names.len() != proportions.len() {
            return Err(WakeError::ConfigError(format!(
                "mixture needs one proportion per constituent, got {} names and {} proportions",
                names.len(),
                proportions.len()
            )));
        }
        if !density.is_finite() || density <= 0.0 {
            return Err(WakeError::PhysicsViolation(format!(
                "mixture density must be finite and > 0, got {density}"
            )));
        }
        if proportions.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(WakeError::ConfigError(
                "mixture proportions must be finite and >= 0".to_string(),
            ));
        }
        let total: f64 = proportions.iter().sum();
        if total <= 0.0 {
            return Err(WakeError::ConfigError(
                "mixture proportions sum to zero".to_string(),
            ));
        }

        let mut parts = Vec::with_capacity(names.len());
        for (&name, &p) in names.iter().zip(proportions) {
            let m = dict.get(name).ok_or_else(|| {
                WakeError::ConfigError(format!("unknown mixture constituent '{name}'"))
            })?;
            if m.a <= 0.0 || m.density <= 0.0 || m.x0 <= 0.0 {
                return Err(WakeError::PhysicsViolation(format!(
                    "constituent '{name}' needs positive A, density and X0"
                )));
            }
            parts.push((name, m, p / total));
        }

        let mut mix = MaterialProperties {
            density,
            ..Default::default()
        };
        for &(_, m, p) in &parts {
            mix.z += p * m.z;
            mix.a += p * m.a;
            mix.sigma_r += p * m.sigma_r;
            mix.sigma_i += p * m.sigma_i;
            mix.sigma_e += p * m.sigma_e;
            mix.sigma_d += p * m.sigma_d;
            mix.sigma_t += p * m.sigma_t;
        }

        // Mass fractions for the stopping power and radiation length.
        let mut dedx_per_rho = 0.0;
        let mut inv_x0_per_rho = 0.0;
        for &(_, m, p) in &parts {
            let w = p * m.a / mix.a;
            dedx_per_rho += w * m.dedx / m.density;
            inv_x0_per_rho += w / (m.x0 * m.density);
        }
        mix.dedx = density * dedx_per_rho;
        mix.x0 = 1.0 / (density * inv_x0_per_rho);
        mix.update();

        let rutherford_cdf = cumulative(parts.iter().map(|(_, m, p)| m.sigma_r * p), "Rutherford")?;
        let hadronic_cdf = cumulative(parts.iter().map(|(_, m, p)| m.sigma_e * p), "elastic")?;

        let constituents: Vec<Constituent> = parts
            .iter()
            .map(|&(name, m, p)| Constituent {
                name: name.to_string(),
                a: m.a,
                proportion: p,
            })
            .collect();
        log::debug!(
            "mixture of {} constituents: A={:.3}, X0={:.4e} m, lambda={:.4e} m",
            constituents.len(),
            mix.a,
            mix.x0,
            mix.lambda
        );

        Ok(Mixture {
            properties: mix,
            constituents,
            rutherford_cdf,
            hadronic_cdf,
        })
    }

    pub fn constituents(&self) -> &[Constituent] {
        &self.constituents
    }

    /// Mixture at beam energy `e`. All constituents share the elastic
    /// power law, so the draw weights carry over unchanged.
    pub fn energy_scale(&self, e: f64) -> WakeResult<Mixture> {
        Ok(Mixture {
            properties: self.properties.energy_scale(e)?,
            ..self.clone()
        })
    }

    fn draw(&self, cdf: &[f64], rng: &mut dyn RngCore) -> f64 {
        let u: f64 = rng.gen();
        let i = cdf.partition_point(|&c| c <= u);
        self.constituents[i.min(self.constituents.len() - 1)].a
    }
}

impl NucleusSampler for Mixture {
    fn properties(&self) -> &MaterialProperties {
        &self.properties
    }

    fn a_r(&self, rng: &mut dyn RngCore) -> f64 {
        self.draw(&self.rutherford_cdf, rng)
    }

    fn a_h(&self, rng: &mut dyn RngCore) -> f64 {
        self.draw(&self.hadronic_cdf, rng)
    }
}

impl fmt::Display for Mixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.properties)?;
        for c in &self.constituents {
            writeln!(f, "{:<10}{:>14.6e}  A={:.4}", c.name, c.proportion, c.a)?;
        }
        Ok(())
    }
}
