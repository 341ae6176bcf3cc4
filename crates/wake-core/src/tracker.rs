// ─────────────────────────────────────────────────────────────────────
// SCPN Wake Core — Process Tracker
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Steps a bunch through a beamline, running bunch processes in priority
//! order. Particle transport between steps is left to the caller.

use wake_types::error::WakeResult;
use wake_types::state::ParticleBunch;

use crate::component::AcceleratorComponent;
use crate::process::BunchProcess;

const END_TOLERANCE: f64 = 1.0e-12;

#[derive(Default)]
pub struct ProcessTracker {
    processes: Vec<Box<dyn BunchProcess>>,
}

/// Counters from one pass over a beamline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackingSummary {
    pub components: usize,
    pub steps: usize,
}

impl ProcessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a process, keeping the list sorted by priority.
    pub fn add_process(&mut self, process: Box<dyn BunchProcess>) {
        self.processes.push(process);
        self.processes.sort_by_key(|p| p.priority());
    }

    pub fn processes(&self) -> &[Box<dyn BunchProcess>] {
        &self.processes
    }

    /// Track the bunch once through `beamline`.
    pub fn track(
        &mut self,
        beamline: &[&dyn AcceleratorComponent],
        bunch: &mut ParticleBunch,
    ) -> WakeResult<TrackingSummary> {
        let mut summary = TrackingSummary::default();
        for &component in beamline {
            for process in self.processes.iter_mut() {
                process.set_current_component(component, Some(&*bunch))?;
            }
            let length = component.length().max(0.0);
            let mut s = 0.0;
            loop {
                let step = self
                    .processes
                    .iter()
                    .map(|p| p.max_allowed_step_size())
                    .fold(length - s, f64::min)
                    .max(0.0);
                for process in self.processes.iter_mut() {
                    process.do_process(bunch, step)?;
                }
                s += step;
                summary.steps += 1;
                if length - s <= END_TOLERANCE {
                    break;
                }
            }
            summary.components += 1;
        }
        Ok(summary)
    }

    /// Track the bunch through `turns` passes of a ring.
    pub fn track_turns(
        &mut self,
        beamline: &[&dyn AcceleratorComponent],
        bunch: &mut ParticleBunch,
        turns: usize,
    ) -> WakeResult<TrackingSummary> {
        let mut total = TrackingSummary::default();
        for turn in 0..turns {
            let summary = self.track(beamline, bunch)?;
            log::debug!("turn {turn}: {} steps over {} components", summary.steps, summary.components);
            total.components += summary.components;
            total.steps += summary.steps;
        }
        Ok(total)
    }
}
