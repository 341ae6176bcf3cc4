// ─────────────────────────────────────────────────────────────────────
// SCPN Wake Core — Coupler Wake-Field Process
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Transverse cavity and coupler wakes of travelling-wave RF structures.
//!
//! Only components exposing a combined RF wake are tracked. The transverse
//! kick at each slice boundary has three parts: the charge-independent
//! coupler RF kick, the coupler wake of the charge at and ahead of the
//! slice, and the cavity dipole wake of the same charge.

use ndarray::Array1;
use rayon::prelude::*;
use wake_types::config::WakeConfig;
use wake_types::error::{WakeError, WakeResult};
use wake_types::state::{ParticleBunch, Point2D, Vector2D};

use crate::component::{AcceleratorComponent, RfParameters, StructureKind, WakeCapability};
use crate::potentials::CombinedWakeRf;
use crate::process::{
    causal_transverse_sum, BunchProcess, SliceMoments, TransverseKicks, WakeFieldProcess,
    WakeHandle, WakeSource,
};

pub const COUPLER_WAKEFIELD_ID: &str = "COUPLERWAKEFIELD";

/// RF state and length of the structure a kick is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CouplerDrive {
    pub rf: RfParameters,
    /// Structure length (m).
    pub length: f64,
}

/// Kick at boundary `i` (GeV/m).
fn coupler_cell(
    moments: &SliceMoments,
    wake: &dyn CombinedWakeRf,
    drive: &CouplerDrive,
    a0: f64,
    i: usize,
) -> Point2D {
    let nbins = moments.nbins();
    let clen = drive.length;
    let mut rf_kick = Vector2D::default();
    let mut cxy = Vector2D::default();
    if i < nbins {
        let c = moments.centroids[i];
        cxy = wake.wxy(c.x, c.y);
        let phase = drive.rf.phase.abs()
            + drive.rf.k * (moments.zmin + (i as f64 + 0.5) * moments.dz);
        rf_kick = wake.coupler_rf_kick(c.x, c.y, phase) * (drive.rf.voltage / clen);
    }
    let q_ahead: f64 = moments.qd.iter().skip(i).sum();
    let w = causal_transverse_sum(moments, wake, i) + cxy * (q_ahead / clen);
    // The RF kick is already in GeV/m and does not scale with charge.
    w * a0 + rf_kick
}

/// Transverse kicks of a combined RF wake at every slice boundary (GeV/m).
///
/// Boundary `i` only sees slices `j >= i`. The closing boundary
/// (`i == nbins`) carries neither a coupler nor a wake term.
pub fn coupler_transverse_wake(
    moments: &SliceMoments,
    wake: &dyn CombinedWakeRf,
    drive: &CouplerDrive,
    parallel: bool,
) -> TransverseKicks {
    let a0 = moments.normalisation();
    let n = moments.nbins() + 1;
    let cells: Vec<Point2D> = if parallel {
        (0..n)
            .into_par_iter()
            .map(|i| coupler_cell(moments, wake, drive, a0, i))
            .collect()
    } else {
        (0..n)
            .map(|i| coupler_cell(moments, wake, drive, a0, i))
            .collect()
    };
    TransverseKicks {
        wake_x: cells.iter().map(|c| c.x).collect::<Array1<f64>>(),
        wake_y: cells.iter().map(|c| c.y).collect::<Array1<f64>>(),
    }
}

/// Wake-field process for structures with input/output couplers.
pub struct CouplerWakeFieldProcess {
    base: WakeFieldProcess,
    rf: RfParameters,
}

impl CouplerWakeFieldProcess {
    pub fn new(config: WakeConfig) -> WakeResult<Self> {
        Ok(CouplerWakeFieldProcess {
            base: WakeFieldProcess::new(COUPLER_WAKEFIELD_ID, config)?,
            rf: RfParameters::default(),
        })
    }

    pub fn base(&self) -> &WakeFieldProcess {
        &self.base
    }

    /// Cached RF parameters; all zero for non-RF structures.
    pub fn rf(&self) -> RfParameters {
        self.rf
    }

    pub fn active(&self) -> bool {
        self.base.active()
    }

    pub fn recalc(&self) -> bool {
        self.base.recalc()
    }

    fn combined_wake(&self) -> WakeResult<std::sync::Arc<dyn CombinedWakeRf>> {
        match self.base.wake_handle()? {
            WakeHandle::CombinedRf(w) => Ok(w),
            WakeHandle::Basic(_) => Err(WakeError::PhysicsViolation(format!(
                "{COUPLER_WAKEFIELD_ID}: wake source is not a combined RF wake"
            ))),
        }
    }

    pub fn calculate_wake_t(&self, bunch: &ParticleBunch) -> WakeResult<TransverseKicks> {
        let moments = self.base.slice_moments(bunch)?;
        let wake = self.combined_wake()?;
        let drive = CouplerDrive {
            rf: self.rf,
            length: self.base.component_length(),
        };
        Ok(coupler_transverse_wake(
            &moments,
            wake.as_ref(),
            &drive,
            self.base.config().parallel,
        ))
    }

    pub fn calculate_wake_l(&self, bunch: &ParticleBunch) -> WakeResult<Array1<f64>> {
        self.base.calculate_wake_l(bunch)
    }
}

impl BunchProcess for CouplerWakeFieldProcess {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn priority(&self) -> i32 {
        self.base.config().priority
    }

    fn set_current_component(
        &mut self,
        component: &dyn AcceleratorComponent,
        bunch: Option<&ParticleBunch>,
    ) -> WakeResult<()> {
        let capability = component.wake_potentials();
        match (bunch, &capability) {
            (Some(bunch), WakeCapability::CombinedRf(_)) => {
                let source = WakeSource::from_capability(&capability).ok_or_else(|| {
                    WakeError::PhysicsViolation("combined wake without a source".to_string())
                })?;
                self.base.activate(component, source, bunch)?;
                self.rf = match component.structure() {
                    StructureKind::TravelingWaveCavity(rf) => rf,
                    _ => RfParameters::default(),
                };
                log::debug!(
                    "{}: tracking {} (phi={:.4}, V={:.4e} GeV, k={:.4})",
                    COUPLER_WAKEFIELD_ID,
                    component.name(),
                    self.rf.phase,
                    self.rf.voltage,
                    self.rf.k
                );
                Ok(())
            }
            _ => {
                self.base.deactivate(component);
                Ok(())
            }
        }
    }

    fn do_process(&mut self, bunch: &mut ParticleBunch, ds: f64) -> WakeResult<()> {
        if !self.base.advance(ds) {
            return Ok(());
        }
        self.base.ensure_sliced(bunch)?;
        let kinds = self.base.config().wake_kinds;
        let wake_z = if kinds.longitudinal() {
            Some(self.calculate_wake_l(bunch)?)
        } else {
            None
        };
        let wake_t = if kinds.transverse() {
            Some(self.calculate_wake_t(bunch)?)
        } else {
            None
        };
        self.base
            .apply_wakefield(bunch, wake_z.as_ref(), wake_t.as_ref())
    }

    fn max_allowed_step_size(&self) -> f64 {
        self.base.max_allowed_step_size()
    }

    fn is_active(&self) -> bool {
        self.base.active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Drift, SectorBend, TwrfStructure, WakeElement};
    use crate::potentials::{CouplerWakeModel, WakePotentials};
    use std::sync::Arc;
    use wake_types::constants::{ELECTRON_CHARGE, VOLT};
    use wake_types::state::Particle;

    /// Decaying transverse wake with optional constant coupler fields.
    struct ToyWake {
        coupler: Vector2D,
        rf: Vector2D,
    }

    impl WakePotentials for ToyWake {
        fn wlong(&self, _s: f64) -> f64 {
            0.0
        }
        fn wtrans(&self, s: f64) -> f64 {
            (-s).exp()
        }
    }

    impl CombinedWakeRf for ToyWake {
        fn wxy(&self, _x: f64, _y: f64) -> Vector2D {
            self.coupler
        }
        fn coupler_rf_kick(&self, _x: f64, _y: f64, _phase: f64) -> Vector2D {
            self.rf
        }
    }

    fn pure_wake() -> ToyWake {
        ToyWake {
            coupler: Vector2D::default(),
            rf: Vector2D::default(),
        }
    }

    fn unit_moments(qd: Vec<f64>, centroids: Vec<Point2D>) -> SliceMoments {
        SliceMoments {
            centroids,
            qd: Array1::from(qd),
            zmin: 0.0,
            dz: 1.0,
            total_charge: 1.0 / (ELECTRON_CHARGE * VOLT),
        }
    }

    fn bunch4(x: f64) -> ParticleBunch {
        let particles = [-1.5, -0.5, 0.5, 1.5]
            .iter()
            .map(|&z| Particle::at(x, 0.5 * x, z, 0.0))
            .collect();
        ParticleBunch::with_total_charge(250.0, 2.0e10, particles)
    }

    fn config(nbins: usize) -> WakeConfig {
        WakeConfig::new(0, nbins, 1.5).unwrap()
    }

    #[test]
    fn test_drift_like_wake_carrier_has_no_rf() {
        let mut proc = CouplerWakeFieldProcess::new(config(2)).unwrap();
        let bunch = bunch4(1e-3);
        let wake: Arc<dyn CombinedWakeRf> = Arc::new(CouplerWakeModel::tesla());
        let elem = WakeElement::new("COUPLER", 0.5, WakeCapability::CombinedRf(wake));
        proc.set_current_component(&elem, Some(&bunch)).unwrap();
        assert!(proc.active());
        assert_eq!(proc.rf(), RfParameters::default());
    }

    #[test]
    fn test_cavity_rf_parameters_cached() {
        let mut proc = CouplerWakeFieldProcess::new(config(2)).unwrap();
        let bunch = bunch4(1e-3);
        let rf = RfParameters {
            phase: -0.1,
            voltage: 0.031,
            k: 27.2,
        };
        let cav = TwrfStructure::new("CAV", 1.038, rf)
            .with_combined_wake(Arc::new(CouplerWakeModel::tesla()));
        proc.set_current_component(&cav, Some(&bunch)).unwrap();
        assert!(proc.active());
        assert_eq!(proc.rf(), rf);
        assert!((proc.base().impulse_s() - 0.519).abs() < 1e-12);
    }

    #[test]
    fn test_basic_wake_not_understood() {
        let mut proc = CouplerWakeFieldProcess::new(config(2)).unwrap();
        let bunch = bunch4(1e-3);
        let wake: Arc<dyn WakePotentials> = Arc::new(crate::potentials::TeslaCavityWake::default());
        let cav = TwrfStructure::new("CAV", 1.0, RfParameters::default()).with_wake(wake);
        proc.set_current_component(&cav, Some(&bunch)).unwrap();
        assert!(!proc.active());
        assert!(!proc.recalc());
    }

    #[test]
    fn test_recalc_set_only_by_bend_while_inactive() {
        let mut proc = CouplerWakeFieldProcess::new(config(2)).unwrap();
        let bunch = bunch4(1e-3);
        proc.set_current_component(&Drift::new("D", 1.0), Some(&bunch)).unwrap();
        assert!(!proc.active());
        assert!(!proc.recalc());
        proc.set_current_component(&SectorBend::new("B", 1.0, 0.02), Some(&bunch)).unwrap();
        assert!(!proc.active());
        assert!(proc.recalc());

        let cav = TwrfStructure::new("CAV", 1.0, RfParameters::default())
            .with_combined_wake(Arc::new(CouplerWakeModel::tesla()));
        proc.set_current_component(&cav, Some(&bunch)).unwrap();
        assert!(proc.active());
        assert!(!proc.recalc());
    }

    #[test]
    fn test_no_bunch_keeps_process_idle() {
        let mut proc = CouplerWakeFieldProcess::new(config(2)).unwrap();
        let cav = TwrfStructure::new("CAV", 1.0, RfParameters::default())
            .with_combined_wake(Arc::new(CouplerWakeModel::tesla()));
        proc.set_current_component(&cav, None).unwrap();
        assert!(!proc.active());
        assert!(proc.base().slices().is_none());
    }

    #[test]
    fn test_causality_ignores_trailing_slices() {
        let wake = ToyWake {
            coupler: Vector2D::new(0.3, -0.2),
            rf: Vector2D::new(1e-2, 2e-2),
        };
        let drive = CouplerDrive {
            rf: RfParameters {
                phase: 0.2,
                voltage: 0.03,
                k: 1.0,
            },
            length: 1.0,
        };
        let centroids: Vec<Point2D> = (0..6)
            .map(|i| Point2D::new(1e-3 * (i as f64 + 1.0), -2e-3 * i as f64))
            .collect();
        let full = unit_moments(vec![0.1, 0.3, 0.2, 0.25, 0.15], centroids.clone());
        let reference = coupler_transverse_wake(&full, &wake, &drive, false);

        for i in 1..5 {
            let mut qd = full.qd.to_vec();
            for q in qd.iter_mut().take(i) {
                *q = 0.0;
            }
            let cut = unit_moments(qd, centroids.clone());
            let kicks = coupler_transverse_wake(&cut, &wake, &drive, false);
            for b in i..6 {
                assert!((kicks.wake_x[b] - reference.wake_x[b]).abs() < 1e-15);
                assert!((kicks.wake_y[b] - reference.wake_y[b]).abs() < 1e-15);
            }
        }
    }

    #[test]
    fn test_rf_term_is_charge_independent() {
        let wake = ToyWake {
            coupler: Vector2D::default(),
            rf: Vector2D::new(2.0, -1.0),
        };
        let drive = CouplerDrive {
            rf: RfParameters {
                phase: 0.0,
                voltage: 0.5,
                k: 0.0,
            },
            length: 2.0,
        };
        let mut moments = unit_moments(vec![0.0, 0.0], vec![Point2D::default(); 3]);
        moments.total_charge = 3.0e10;
        let kicks = coupler_transverse_wake(&moments, &wake, &drive, false);
        assert!((kicks.wake_x[0] - 0.5).abs() < 1e-12);
        assert!((kicks.wake_y[1] + 0.25).abs() < 1e-12);
        assert_eq!(kicks.wake_x[2], 0.0);
    }

    #[test]
    fn test_pure_wake_leading_slice_accumulates_both() {
        let mut proc = CouplerWakeFieldProcess::new(config(2)).unwrap();
        let bunch = bunch4(1e-3);
        let cav = TwrfStructure::new("CAV", 1.0, RfParameters::default())
            .with_combined_wake(Arc::new(pure_wake()));
        proc.set_current_component(&cav, Some(&bunch)).unwrap();

        let kicks = proc.calculate_wake_t(&bunch).unwrap();
        assert_eq!(kicks.wake_x.len(), 3);
        let table = proc.base().slices().unwrap();
        let dz = table.dz;
        let qd = proc.base().line_density();
        assert_eq!(qd[0], qd[1]);

        let a0 = dz * 2.0e10 * ELECTRON_CHARGE * VOLT;
        let own = a0 * qd[1] * (-(0.5 * dz)).exp() * 1e-3;
        assert!((kicks.wake_x[1] - own).abs() <= 1e-12 * own.abs());
        assert!(kicks.wake_x[0].abs() >= kicks.wake_x[1].abs());
        assert!((kicks.wake_y[0] - 0.5 * kicks.wake_x[0]).abs() <= 1e-12 * kicks.wake_x[0].abs());
        assert_eq!(kicks.wake_x[2], 0.0);
    }

    #[test]
    fn test_parallel_coupler_matches_serial() {
        let wake = CouplerWakeModel::tesla();
        let drive = CouplerDrive {
            rf: RfParameters {
                phase: 0.05,
                voltage: 0.0315,
                k: 27.2,
            },
            length: 1.038,
        };
        let centroids = (0..21).map(|i| Point2D::new(1e-6 * i as f64, 2e-7 * i as f64)).collect();
        let moments = SliceMoments {
            centroids,
            qd: Array1::from_shape_fn(20, |i| 50.0 + i as f64),
            zmin: -9e-4,
            dz: 9e-5,
            total_charge: -2e10,
        };
        let serial = coupler_transverse_wake(&moments, &wake, &drive, false);
        let parallel = coupler_transverse_wake(&moments, &wake, &drive, true);
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_do_process_kicks_bunch_at_exit() {
        let mut cfg = config(4);
        cfg.impulse_location = wake_types::config::ImpulseLocation::AtExit;
        let mut proc = CouplerWakeFieldProcess::new(cfg).unwrap();
        let mut bunch = bunch4(1e-3);
        let cav = TwrfStructure::new("CAV", 1.0, RfParameters::default())
            .with_combined_wake(Arc::new(pure_wake()));
        proc.set_current_component(&cav, Some(&bunch)).unwrap();
        assert_eq!(proc.max_allowed_step_size(), 1.0);
        proc.do_process(&mut bunch, 1.0).unwrap();
        assert!(bunch.particles().iter().any(|p| p.xp > 0.0));
        assert!(bunch.particles().iter().all(|p| p.dp == 0.0));
    }
}
