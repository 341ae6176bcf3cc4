// ─────────────────────────────────────────────────────────────────────
// SCPN Wake Core — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

use crate::constants::{ELECTRON_MASS_MEV, GEV, MEV};
use crate::error::{WakeError, WakeResult};

/// Where along a wake-carrying element the integrated kick is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ImpulseLocation {
    #[default]
    AtCentre,
    AtExit,
}

/// Which wake planes a process evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WakeKinds {
    Longitudinal,
    Transverse,
    #[default]
    Both,
}

impl WakeKinds {
    pub fn longitudinal(self) -> bool {
        matches!(self, WakeKinds::Longitudinal | WakeKinds::Both)
    }

    pub fn transverse(self) -> bool {
        matches!(self, WakeKinds::Transverse | WakeKinds::Both)
    }
}

/// Slicing and scheduling parameters for a wake-field process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WakeConfig {
    /// Process priority within the tracker (lower runs first).
    #[serde(default)]
    pub priority: i32,
    /// Number of longitudinal slices.
    #[serde(default = "default_nbins")]
    pub nbins: usize,
    /// Half-width of the slicing window in units of σz.
    #[serde(default = "default_nsig")]
    pub nsig: f64,
    #[serde(default)]
    pub impulse_location: ImpulseLocation,
    #[serde(default)]
    pub wake_kinds: WakeKinds,
    /// Evaluate the transverse convolution across the rayon pool.
    #[serde(default)]
    pub parallel: bool,
}

fn default_nbins() -> usize {
    100
}
fn default_nsig() -> f64 {
    3.0
}

impl Default for WakeConfig {
    fn default() -> Self {
        WakeConfig {
            priority: 0,
            nbins: default_nbins(),
            nsig: default_nsig(),
            impulse_location: ImpulseLocation::default(),
            wake_kinds: WakeKinds::default(),
            parallel: false,
        }
    }
}

impl WakeConfig {
    pub fn new(priority: i32, nbins: usize, nsig: f64) -> WakeResult<Self> {
        let config = WakeConfig {
            priority,
            nbins,
            nsig,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from JSON file.
    pub fn from_file(path: &str) -> WakeResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> WakeResult<()> {
        if self.nbins == 0 {
            return Err(WakeError::ConfigError(
                "nbins must be >= 1".to_string(),
            ));
        }
        if !self.nsig.is_finite() || self.nsig <= 0.0 {
            return Err(WakeError::ConfigError(format!(
                "nsig must be finite and > 0, got {}",
                self.nsig
            )));
        }
        Ok(())
    }
}

/// Matched beam parameters at the start of the lattice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamData {
    pub beta_x: f64,
    pub beta_y: f64,
    #[serde(default)]
    pub alpha_x: f64,
    #[serde(default)]
    pub alpha_y: f64,
    /// Geometric emittances (m).
    pub emit_x: f64,
    pub emit_y: f64,
    /// RMS bunch length (m).
    pub sig_z: f64,
    /// RMS relative momentum spread.
    pub sig_dp: f64,
    /// Number of real particles in the bunch, signed by species.
    pub charge: f64,
    /// Reference momentum (GeV/c).
    pub p0: f64,
}

impl Default for BeamData {
    /// 250 GeV ILC-like beam used by the halo collimation studies.
    fn default() -> Self {
        let p0 = 250.0 * GEV;
        let gamma = p0 / (ELECTRON_MASS_MEV * MEV);
        BeamData {
            beta_x: 172.070,
            beta_y: 57.48,
            alpha_x: 0.0,
            alpha_y: 0.0,
            emit_x: 10.0e-06 / gamma,
            emit_y: 0.03e-06 / gamma,
            sig_z: 0.0003,
            sig_dp: 1.5e-03,
            charge: 2.0e+10,
            p0,
        }
    }
}

impl BeamData {
    pub fn from_file(path: &str) -> WakeResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let beam: Self = serde_json::from_str(&contents)?;
        beam.validate()?;
        Ok(beam)
    }

    pub fn validate(&self) -> WakeResult<()> {
        let positive = [
            ("beta_x", self.beta_x),
            ("beta_y", self.beta_y),
            ("p0", self.p0),
        ];
        for (label, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(WakeError::ConfigError(format!(
                    "{label} must be finite and > 0, got {value}"
                )));
            }
        }
        let non_negative = [
            ("emit_x", self.emit_x),
            ("emit_y", self.emit_y),
            ("sig_z", self.sig_z),
            ("sig_dp", self.sig_dp),
        ];
        for (label, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(WakeError::ConfigError(format!(
                    "{label} must be finite and >= 0, got {value}"
                )));
            }
        }
        if !self.charge.is_finite() {
            return Err(WakeError::ConfigError(
                "charge must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
