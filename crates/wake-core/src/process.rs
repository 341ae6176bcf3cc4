// ─────────────────────────────────────────────────────────────────────
// SCPN Wake Core — Wake-Field Process
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Base wake-field process.
//!
//! The process is Idle until a component exposing wake potentials is set,
//! then Tracking until the next component without them. A sector bend
//! seen while Idle sets the sticky `recalc` flag, which forces re-slicing
//! on the next activation.

use std::sync::{Arc, Weak};

use ndarray::Array1;
use rayon::prelude::*;
use wake_types::config::{ImpulseLocation, WakeConfig};
use wake_types::constants::{ELECTRON_CHARGE, VOLT};
use wake_types::error::{WakeError, WakeResult};
use wake_types::state::{ParticleBunch, Point2D};

use crate::component::{AcceleratorComponent, StructureKind, WakeCapability};
use crate::potentials::{CombinedWakeRf, WakePotentials};
use crate::slicer::{BunchSlicer, SliceTable};

/// Tolerance when comparing the running position with the impulse point (m).
const S_TOLERANCE: f64 = 1.0e-9;

/// A process applied to the bunch while it crosses each component.
pub trait BunchProcess {
    fn id(&self) -> &str;

    fn priority(&self) -> i32;

    /// Notify the process of the component being entered. `bunch` is
    /// `None` while no bunch has been assigned to the tracker.
    fn set_current_component(
        &mut self,
        component: &dyn AcceleratorComponent,
        bunch: Option<&ParticleBunch>,
    ) -> WakeResult<()>;

    /// Advance the process by `ds` metres through the current component.
    fn do_process(&mut self, bunch: &mut ParticleBunch, ds: f64) -> WakeResult<()>;

    /// Largest step the tracker may take before calling `do_process` again.
    fn max_allowed_step_size(&self) -> f64;

    fn is_active(&self) -> bool;
}

/// Non-owning reference to the wake potentials of the current component.
#[derive(Clone)]
pub enum WakeSource {
    Basic(Weak<dyn WakePotentials>),
    CombinedRf(Weak<dyn CombinedWakeRf>),
}

/// Strong handle obtained from a [`WakeSource`] for the duration of a call.
#[derive(Clone)]
pub enum WakeHandle {
    Basic(Arc<dyn WakePotentials>),
    CombinedRf(Arc<dyn CombinedWakeRf>),
}

impl WakeSource {
    pub fn from_capability(capability: &WakeCapability) -> Option<Self> {
        match capability {
            WakeCapability::None => None,
            WakeCapability::Basic(w) => Some(WakeSource::Basic(Arc::downgrade(w))),
            WakeCapability::CombinedRf(w) => Some(WakeSource::CombinedRf(Arc::downgrade(w))),
        }
    }

    fn addr(&self) -> *const () {
        match self {
            WakeSource::Basic(w) => w.as_ptr() as *const (),
            WakeSource::CombinedRf(w) => w.as_ptr() as *const (),
        }
    }

    /// True when both refer to the same wake object.
    pub fn same_object(&self, other: &WakeSource) -> bool {
        std::ptr::eq(self.addr(), other.addr())
    }

    pub fn upgrade(&self) -> Option<WakeHandle> {
        match self {
            WakeSource::Basic(w) => w.upgrade().map(WakeHandle::Basic),
            WakeSource::CombinedRf(w) => w.upgrade().map(WakeHandle::CombinedRf),
        }
    }
}

impl WakePotentials for WakeHandle {
    fn wlong(&self, s: f64) -> f64 {
        match self {
            WakeHandle::Basic(w) => w.wlong(s),
            WakeHandle::CombinedRf(w) => w.wlong(s),
        }
    }

    fn wtrans(&self, s: f64) -> f64 {
        match self {
            WakeHandle::Basic(w) => w.wtrans(s),
            WakeHandle::CombinedRf(w) => w.wtrans(s),
        }
    }
}

/// Per-slice inputs of the wake convolutions.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceMoments {
    /// `nbins + 1` centroids; the last repeats slice `nbins - 1`.
    pub centroids: Vec<Point2D>,
    /// Line density of each of the `nbins` slices (1/m).
    pub qd: Array1<f64>,
    pub zmin: f64,
    pub dz: f64,
    /// Signed number of particles in the bunch.
    pub total_charge: f64,
}

impl SliceMoments {
    pub fn new(table: &SliceTable, qd: &Array1<f64>, bunch: &ParticleBunch) -> Self {
        SliceMoments {
            centroids: table.centroids(bunch),
            qd: qd.clone(),
            zmin: table.zmin,
            dz: table.dz,
            total_charge: bunch.total_charge(),
        }
    }

    pub fn nbins(&self) -> usize {
        self.qd.len()
    }

    /// Converts the dimensionless convolution sums into GeV/m.
    pub fn normalisation(&self) -> f64 {
        self.dz * self.total_charge.abs() * ELECTRON_CHARGE * VOLT
    }
}

/// Transverse kicks per slice boundary (GeV/m).
#[derive(Debug, Clone, PartialEq)]
pub struct TransverseKicks {
    pub wake_x: Array1<f64>,
    pub wake_y: Array1<f64>,
}

/// Causal sum over the slices at and ahead of `i`.
pub(crate) fn causal_transverse_sum<W: WakePotentials + ?Sized>(
    moments: &SliceMoments,
    wake: &W,
    i: usize,
) -> Point2D {
    let nbins = moments.nbins();
    let mut sum = Point2D::default();
    for j in i..nbins {
        let wxy = moments.qd[j] * wake.wtrans((j - i) as f64 * moments.dz + 0.5 * moments.dz);
        sum += moments.centroids[j] * wxy;
    }
    sum
}

/// Transverse dipole wake at every slice boundary.
pub fn transverse_wake<W: WakePotentials + ?Sized>(
    moments: &SliceMoments,
    wake: &W,
    parallel: bool,
) -> TransverseKicks {
    let a0 = moments.normalisation();
    let cell = |i: usize| causal_transverse_sum(moments, wake, i) * a0;
    let n = moments.nbins() + 1;
    let cells: Vec<Point2D> = if parallel {
        (0..n).into_par_iter().map(cell).collect()
    } else {
        (0..n).map(cell).collect()
    };
    TransverseKicks {
        wake_x: cells.iter().map(|c| c.x).collect(),
        wake_y: cells.iter().map(|c| c.y).collect(),
    }
}

/// Longitudinal wake at every slice boundary (GeV/m).
pub fn longitudinal_wake<W: WakePotentials + ?Sized>(moments: &SliceMoments, wake: &W) -> Array1<f64> {
    let a0 = moments.normalisation();
    let nbins = moments.nbins();
    Array1::from_shape_fn(nbins + 1, |i| {
        let mut sum = 0.0;
        for j in i..nbins {
            sum += moments.qd[j] * wake.wlong((j - i) as f64 * moments.dz);
        }
        sum * a0
    })
}

/// State shared by all wake-field processes.
pub struct WakeFieldProcess {
    id: String,
    config: WakeConfig,
    slicer: BunchSlicer,
    source: Option<WakeSource>,
    slices: Option<SliceTable>,
    qd: Array1<f64>,
    /// Length of the current component (m).
    clen: f64,
    impulse_s: f64,
    current_s: f64,
    active: bool,
    recalc: bool,
    kicked: bool,
}

impl WakeFieldProcess {
    pub fn new(id: &str, config: WakeConfig) -> WakeResult<Self> {
        config.validate()?;
        let slicer = BunchSlicer::new(config.nbins, config.nsig)?;
        Ok(WakeFieldProcess {
            id: id.to_string(),
            config,
            slicer,
            source: None,
            slices: None,
            qd: Array1::zeros(0),
            clen: 0.0,
            impulse_s: 0.0,
            current_s: 0.0,
            active: false,
            recalc: false,
            kicked: false,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &WakeConfig {
        &self.config
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn recalc(&self) -> bool {
        self.recalc
    }

    pub fn component_length(&self) -> f64 {
        self.clen
    }

    pub fn impulse_s(&self) -> f64 {
        self.impulse_s
    }

    pub fn current_s(&self) -> f64 {
        self.current_s
    }

    pub fn slices(&self) -> Option<&SliceTable> {
        self.slices.as_ref()
    }

    pub fn line_density(&self) -> &Array1<f64> {
        &self.qd
    }

    pub fn source(&self) -> Option<&WakeSource> {
        self.source.as_ref()
    }

    /// Enter Tracking for a wake-carrying component.
    ///
    /// Re-slices when `recalc` is set or the wake object changed.
    pub fn activate(
        &mut self,
        component: &dyn AcceleratorComponent,
        source: WakeSource,
        bunch: &ParticleBunch,
    ) -> WakeResult<()> {
        // Idle until the new component is fully set up.
        self.active = false;
        let clen = component.length();
        if !clen.is_finite() || clen <= 0.0 {
            return Err(WakeError::PhysicsViolation(format!(
                "wake-carrying component {} must have finite length > 0, got {clen}",
                component.name()
            )));
        }
        let changed = match &self.source {
            Some(current) => !current.same_object(&source),
            None => true,
        };
        if self.recalc || changed {
            self.init(bunch)?;
            self.source = Some(source);
        }

        self.clen = clen;
        self.impulse_s = match self.config.impulse_location {
            ImpulseLocation::AtCentre => clen / 2.0,
            ImpulseLocation::AtExit => clen,
        };
        self.current_s = 0.0;
        self.kicked = false;
        self.active = true;
        Ok(())
    }

    /// Enter Idle. Sector bends invalidate the slicing.
    pub fn deactivate(&mut self, component: &dyn AcceleratorComponent) {
        if self.active {
            log::debug!("{}: idle at {}", self.id, component.name());
        }
        self.active = false;
        if component.structure() == StructureKind::SectorBend {
            self.recalc = true;
        }
    }

    /// Slice the bunch and rebuild the line density. Leaves the previous
    /// table in place when slicing fails.
    pub fn init(&mut self, bunch: &ParticleBunch) -> WakeResult<()> {
        let table = self.slicer.slice(bunch)?;
        self.qd = table.line_density();
        log::debug!(
            "{}: sliced {} particles into {} bins, sigz={:.4e} m, dz={:.4e} m",
            self.id,
            bunch.len(),
            table.nbins(),
            table.sigz,
            table.dz
        );
        self.slices = Some(table);
        self.recalc = false;
        Ok(())
    }

    /// Re-slice when the bunch no longer matches the table.
    pub fn ensure_sliced(&mut self, bunch: &ParticleBunch) -> WakeResult<()> {
        let stale = match &self.slices {
            Some(table) => table.particle_count() != bunch.len(),
            None => true,
        };
        if stale || self.recalc {
            self.init(bunch)?;
        }
        Ok(())
    }

    /// Upgrade the wake source for the duration of a call.
    pub fn wake_handle(&self) -> WakeResult<WakeHandle> {
        let source = self.source.as_ref().ok_or_else(|| {
            WakeError::WakeSourceDropped(format!("{}: no wake source set", self.id))
        })?;
        source.upgrade().ok_or_else(|| {
            WakeError::WakeSourceDropped(format!(
                "{}: component wake released while tracking",
                self.id
            ))
        })
    }

    pub fn slice_moments(&self, bunch: &ParticleBunch) -> WakeResult<SliceMoments> {
        let table = self.slices.as_ref().ok_or_else(|| {
            WakeError::PhysicsViolation(format!("{}: bunch has not been sliced", self.id))
        })?;
        if table.particle_count() != bunch.len() {
            return Err(WakeError::PhysicsViolation(format!(
                "{}: slice table built for {} particles, bunch has {}",
                self.id,
                table.particle_count(),
                bunch.len()
            )));
        }
        Ok(SliceMoments::new(table, &self.qd, bunch))
    }

    pub fn calculate_wake_l(&self, bunch: &ParticleBunch) -> WakeResult<Array1<f64>> {
        let moments = self.slice_moments(bunch)?;
        let wake = self.wake_handle()?;
        Ok(longitudinal_wake(&moments, &wake))
    }

    pub fn calculate_wake_t(&self, bunch: &ParticleBunch) -> WakeResult<TransverseKicks> {
        let moments = self.slice_moments(bunch)?;
        let wake = self.wake_handle()?;
        Ok(transverse_wake(&moments, &wake, self.config.parallel))
    }

    /// Advance the running position. True when the kick is due now.
    pub fn advance(&mut self, ds: f64) -> bool {
        self.current_s += ds;
        self.active && !self.kicked && self.current_s >= self.impulse_s - S_TOLERANCE
    }

    pub fn max_allowed_step_size(&self) -> f64 {
        if self.active && !self.kicked {
            (self.impulse_s - self.current_s).max(0.0)
        } else {
            f64::INFINITY
        }
    }

    /// Apply the integrated kicks to every particle inside the window.
    ///
    /// Kicks are interpolated linearly between the two boundaries of the
    /// particle's slice and integrated over the component length.
    pub fn apply_wakefield(
        &mut self,
        bunch: &mut ParticleBunch,
        wake_z: Option<&Array1<f64>>,
        wake_t: Option<&TransverseKicks>,
    ) -> WakeResult<()> {
        let table = self.slices.as_ref().ok_or_else(|| {
            WakeError::PhysicsViolation(format!("{}: bunch has not been sliced", self.id))
        })?;
        if table.particle_count() != bunch.len() {
            return Err(WakeError::PhysicsViolation(format!(
                "{}: slice table built for {} particles, bunch has {}",
                self.id,
                table.particle_count(),
                bunch.len()
            )));
        }
        let boundaries = table.nbins() + 1;
        let short = wake_z.is_some_and(|w| w.len() < boundaries)
            || wake_t.is_some_and(|w| w.wake_x.len() < boundaries || w.wake_y.len() < boundaries);
        if short {
            return Err(WakeError::PhysicsViolation(format!(
                "{}: kick arrays must cover all {boundaries} slice boundaries",
                self.id
            )));
        }
        let p0 = bunch.reference_momentum();
        if !p0.is_finite() || p0 <= 0.0 {
            return Err(WakeError::PhysicsViolation(format!(
                "reference momentum must be finite and > 0, got {p0}"
            )));
        }
        let scale = self.clen / p0;
        let (zmin, dz) = (table.zmin, table.dz);
        let particles = bunch.particles_mut();

        for i in 0..table.nbins() {
            for &k in table.slice_indices(i) {
                let p = &mut particles[k];
                let f = ((p.z - zmin) / dz - i as f64).clamp(0.0, 1.0);
                if let Some(wz) = wake_z {
                    let w = wz[i] + f * (wz[i + 1] - wz[i]);
                    p.dp -= w * scale;
                }
                if let Some(wt) = wake_t {
                    let wx = wt.wake_x[i] + f * (wt.wake_x[i + 1] - wt.wake_x[i]);
                    let wy = wt.wake_y[i] + f * (wt.wake_y[i + 1] - wt.wake_y[i]);
                    p.xp += wx * scale;
                    p.yp += wy * scale;
                }
            }
        }
        self.kicked = true;
        Ok(())
    }
}

impl BunchProcess for WakeFieldProcess {
    fn id(&self) -> &str {
        &self.id
    }

    fn priority(&self) -> i32 {
        self.config.priority
    }

    fn set_current_component(
        &mut self,
        component: &dyn AcceleratorComponent,
        bunch: Option<&ParticleBunch>,
    ) -> WakeResult<()> {
        match (bunch, WakeSource::from_capability(&component.wake_potentials())) {
            (Some(bunch), Some(source)) => self.activate(component, source, bunch),
            _ => {
                self.deactivate(component);
                Ok(())
            }
        }
    }

    fn do_process(&mut self, bunch: &mut ParticleBunch, ds: f64) -> WakeResult<()> {
        if !self.advance(ds) {
            return Ok(());
        }
        self.ensure_sliced(bunch)?;
        let kinds = self.config.wake_kinds;
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
        self.apply_wakefield(bunch, wake_z.as_ref(), wake_t.as_ref())
    }

    fn max_allowed_step_size(&self) -> f64 {
        WakeFieldProcess::max_allowed_step_size(self)
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
