// ─────────────────────────────────────────────────────────────────────
// SCPN Wake Core — Accelerator Components
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Accelerator component interface seen by bunch processes.
//!
//! Components are owned by the accelerator model. Processes only query
//! them through the two closed enums below and keep at most a `Weak`
//! reference to their wake potentials.

use std::sync::Arc;

use crate::potentials::{CombinedWakeRf, WakePotentials};

/// RF parameters of a travelling-wave structure.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RfParameters {
    /// RF phase (rad).
    pub phase: f64,
    /// Peak accelerating voltage (GeV).
    pub voltage: f64,
    /// RF wave number (1/m).
    pub k: f64,
}

/// Structural variant of a component, as far as wake processes care.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StructureKind {
    Drift,
    /// Changes the bunch length distribution through R56.
    SectorBend,
    TravelingWaveCavity(RfParameters),
    StandingWaveCavity,
    Other,
}

/// Wake potentials attached to a component.
#[derive(Clone, Default)]
pub enum WakeCapability {
    #[default]
    None,
    Basic(Arc<dyn WakePotentials>),
    CombinedRf(Arc<dyn CombinedWakeRf>),
}

impl WakeCapability {
    pub fn is_none(&self) -> bool {
        matches!(self, WakeCapability::None)
    }
}

impl std::fmt::Debug for WakeCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WakeCapability::None => write!(f, "None"),
            WakeCapability::Basic(w) => write!(f, "Basic({:p})", Arc::as_ptr(w) as *const ()),
            WakeCapability::CombinedRf(w) => {
                write!(f, "CombinedRf({:p})", Arc::as_ptr(w) as *const ())
            }
        }
    }
}

pub trait AcceleratorComponent {
    fn name(&self) -> &str;

    /// Physical length (m).
    fn length(&self) -> f64;

    fn structure(&self) -> StructureKind;

    fn wake_potentials(&self) -> WakeCapability {
        WakeCapability::None
    }
}

#[derive(Debug, Clone)]
pub struct Drift {
    pub name: String,
    pub length: f64,
}

impl Drift {
    pub fn new(name: &str, length: f64) -> Self {
        Drift {
            name: name.to_string(),
            length,
        }
    }
}

impl AcceleratorComponent for Drift {
    fn name(&self) -> &str {
        &self.name
    }
    fn length(&self) -> f64 {
        self.length
    }
    fn structure(&self) -> StructureKind {
        StructureKind::Drift
    }
}

#[derive(Debug, Clone)]
pub struct SectorBend {
    pub name: String,
    pub length: f64,
    /// Bending angle (rad).
    pub angle: f64,
}

impl SectorBend {
    pub fn new(name: &str, length: f64, angle: f64) -> Self {
        SectorBend {
            name: name.to_string(),
            length,
            angle,
        }
    }
}

impl AcceleratorComponent for SectorBend {
    fn name(&self) -> &str {
        &self.name
    }
    fn length(&self) -> f64 {
        self.length
    }
    fn structure(&self) -> StructureKind {
        StructureKind::SectorBend
    }
}

/// Travelling-wave RF structure, optionally carrying wake potentials.
#[derive(Clone)]
pub struct TwrfStructure {
    pub name: String,
    pub length: f64,
    pub rf: RfParameters,
    pub wake: WakeCapability,
}

impl TwrfStructure {
    pub fn new(name: &str, length: f64, rf: RfParameters) -> Self {
        TwrfStructure {
            name: name.to_string(),
            length,
            rf,
            wake: WakeCapability::None,
        }
    }

    pub fn with_combined_wake(mut self, wake: Arc<dyn CombinedWakeRf>) -> Self {
        self.wake = WakeCapability::CombinedRf(wake);
        self
    }

    pub fn with_wake(mut self, wake: Arc<dyn WakePotentials>) -> Self {
        self.wake = WakeCapability::Basic(wake);
        self
    }
}

impl AcceleratorComponent for TwrfStructure {
    fn name(&self) -> &str {
        &self.name
    }
    fn length(&self) -> f64 {
        self.length
    }
    fn structure(&self) -> StructureKind {
        StructureKind::TravelingWaveCavity(self.rf)
    }
    fn wake_potentials(&self) -> WakeCapability {
        self.wake.clone()
    }
}

/// Non-RF element carrying wake potentials (collimator jaws, bellows,
/// standing-wave structures).
#[derive(Clone)]
pub struct WakeElement {
    pub name: String,
    pub length: f64,
    pub kind: StructureKind,
    pub wake: WakeCapability,
}

impl WakeElement {
    pub fn new(name: &str, length: f64, wake: WakeCapability) -> Self {
        WakeElement {
            name: name.to_string(),
            length,
            kind: StructureKind::Other,
            wake,
        }
    }
}

impl AcceleratorComponent for WakeElement {
    fn name(&self) -> &str {
        &self.name
    }
    fn length(&self) -> f64 {
        self.length
    }
    fn structure(&self) -> StructureKind {
        self.kind
    }
    fn wake_potentials(&self) -> WakeCapability {
        self.wake.clone()
    }
}
