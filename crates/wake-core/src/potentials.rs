// ─────────────────────────────────────────────────────────────────────
// SCPN Wake Core — Wake Potentials
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Wake potential capabilities exposed by accelerator structures.
//!
//! All wake functions take the separation `s > 0` behind the source charge
//! in metres. Longitudinal wakes are in V/C/m, transverse wakes in V/C/m²,
//! coupler wakes in V/C per structure and coupler RF kicks are
//! dimensionless (per unit accelerating voltage).

use num_complex::Complex64;
use wake_types::state::Vector2D;

/// Short-range wake functions of a structure, per unit structure length.
pub trait WakePotentials: Send + Sync {
    /// Longitudinal wake at separation `s`.
    fn wlong(&self, s: f64) -> f64;

    /// Transverse dipole wake at separation `s`.
    fn wtrans(&self, s: f64) -> f64;
}

/// Structure wakes combined with the input/output coupler fields.
pub trait CombinedWakeRf: WakePotentials {
    /// Charge-dependent coupler wake at transverse position (x, y).
    fn wxy(&self, x: f64, y: f64) -> Vector2D;

    /// Charge-independent RF kick from the coupler at (x, y) and RF phase.
    fn coupler_rf_kick(&self, x: f64, y: f64, phase: f64) -> Vector2D;
}

const V_PER_PC: f64 = 1.0e12;

/// Bane's fits to the TESLA 9-cell cavity short-range wakes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeslaCavityWake {
    /// Longitudinal amplitude (V/C/m).
    pub long_amplitude: f64,
    /// Longitudinal decay length (m).
    pub long_scale: f64,
    /// Transverse amplitude (V/C/m²).
    pub trans_amplitude: f64,
    /// Transverse rise length (m).
    pub trans_scale: f64,
}

impl Default for TeslaCavityWake {
    fn default() -> Self {
        TeslaCavityWake {
            long_amplitude: 38.1 * V_PER_PC,
            long_scale: 3.65e-3,
            trans_amplitude: 1290.0 * V_PER_PC,
            trans_scale: 0.92e-3,
        }
    }
}

impl WakePotentials for TeslaCavityWake {
    fn wlong(&self, s: f64) -> f64 {
        let s = s.max(0.0);
        self.long_amplitude * (1.165 * (-(s / self.long_scale).sqrt()).exp() - 0.165)
    }

    fn wtrans(&self, s: f64) -> f64 {
        let s = s.max(0.0);
        let r = (s / self.trans_scale).sqrt();
        self.trans_amplitude * (1.0 - (1.0 + r) * (-r).exp())
    }
}

/// Linear coupler model: each plane is `c0 + cx·x + cy·y`.
///
/// The RF kick coefficients are complex; the kick is the real part of the
/// linear form multiplied by `exp(i·phase)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CouplerWakeModel {
    pub cavity: TeslaCavityWake,
    /// Coupler wake coefficients per plane, `[c0, cx, cy]` (V/C, V/C/m).
    pub wake_x: [f64; 3],
    pub wake_y: [f64; 3],
    /// Coupler RF kick coefficients per plane, `[c0, cx, cy]`.
    pub rf_x: [Complex64; 3],
    pub rf_y: [Complex64; 3],
}

impl CouplerWakeModel {
    /// TESLA-like coupler coefficients (upstream plus downstream coupler).
    pub fn tesla() -> Self {
        CouplerWakeModel {
            cavity: TeslaCavityWake::default(),
            wake_x: [-23.0e9, 0.0, 0.0],
            wake_y: [-5.7e9, 0.0, -1.4e12],
            rf_x: [
                Complex64::new(-5.4e-5, 7.9e-6),
                Complex64::new(-1.1e-3, 7.3e-4),
                Complex64::new(-1.0e-4, 2.0e-5),
            ],
            rf_y: [
                Complex64::new(-1.2e-5, 4.8e-5),
                Complex64::new(-1.0e-4, 2.0e-5),
                Complex64::new(1.1e-3, -7.3e-4),
            ],
        }
    }

    /// Coupler model with only the cavity wakes switched on.
    pub fn without_coupler(cavity: TeslaCavityWake) -> Self {
        CouplerWakeModel {
            cavity,
            wake_x: [0.0; 3],
            wake_y: [0.0; 3],
            rf_x: [Complex64::new(0.0, 0.0); 3],
            rf_y: [Complex64::new(0.0, 0.0); 3],
        }
    }
}

fn linear(c: &[f64; 3], x: f64, y: f64) -> f64 {
    c[0] + c[1] * x + c[2] * y
}

fn linear_rf(c: &[Complex64; 3], x: f64, y: f64, phase: f64) -> f64 {
    let amplitude = c[0] + c[1] * x + c[2] * y;
    (amplitude * Complex64::from_polar(1.0, phase)).re
}

impl WakePotentials for CouplerWakeModel {
    fn wlong(&self, s: f64) -> f64 {
        self.cavity.wlong(s)
    }

    fn wtrans(&self, s: f64) -> f64 {
        self.cavity.wtrans(s)
    }
}

impl CombinedWakeRf for CouplerWakeModel {
    fn wxy(&self, x: f64, y: f64) -> Vector2D {
        Vector2D::new(linear(&self.wake_x, x, y), linear(&self.wake_y, x, y))
    }

    fn coupler_rf_kick(&self, x: f64, y: f64, phase: f64) -> Vector2D {
        Vector2D::new(
            linear_rf(&self.rf_x, x, y, phase),
            linear_rf(&self.rf_y, x, y, phase),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_tesla_longitudinal_wake_at_origin() {
        let w = TeslaCavityWake::default();
        assert!((w.wlong(0.0) - 38.1e12).abs() < 1e3);
        assert!(w.wlong(1e-3) < w.wlong(0.0));
    }

    #[test]
    fn test_tesla_transverse_wake_rises_from_zero() {
        let w = TeslaCavityWake::default();
        assert_eq!(w.wtrans(0.0), 0.0);
        assert!(w.wtrans(1e-4) > 0.0);
        assert!(w.wtrans(1e-3) > w.wtrans(1e-4));
    }

    #[test]
    fn test_rf_kick_follows_phase() {
        let m = CouplerWakeModel::tesla();
        let k0 = m.coupler_rf_kick(0.0, 0.0, 0.0);
        let k90 = m.coupler_rf_kick(0.0, 0.0, PI / 2.0);
        assert!((k0.x - m.rf_x[0].re).abs() < 1e-15);
        assert!((k90.x + m.rf_x[0].im).abs() < 1e-15);
    }

    #[test]
    fn test_without_coupler_has_no_coupler_fields() {
        let m = CouplerWakeModel::without_coupler(TeslaCavityWake::default());
        assert_eq!(m.wxy(1e-3, 1e-3), Vector2D::new(0.0, 0.0));
        assert_eq!(m.coupler_rf_kick(1e-3, -1e-3, 0.3), Vector2D::new(0.0, 0.0));
        assert!(m.wtrans(1e-3) > 0.0);
    }
}
