//! The shot admission chain: ordered accept/reject filters every shot passes
//! through before hit resolution. The first rejecting processor
//! short-circuits the chain, and the rejection carries the processor's kind
//! so downstream logic can switch on it.

use crate::config::RangeConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use range_model::Shot;
use tracing::debug;

/// Why a processor rejected a shot. Downstream recording logic switches on
/// this kind, never on processor identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    Duplicate,
    Malfunction,
    VirtualMagazine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Accepted,
    Rejected(RejectionKind),
}

/// One filter in the admission chain.
pub trait ShotProcessor: Send {
    fn name(&self) -> &'static str;

    /// The rejection kind this processor produces.
    fn kind(&self) -> RejectionKind;

    /// Returns `false` to reject the shot.
    fn process(&mut self, shot: &Shot) -> bool;

    /// Restore initial state (e.g. refill a virtual magazine) on range reset.
    fn reset(&mut self) {}
}

/// Ordered list of shot processors.
pub struct AdmissionChain {
    processors: Vec<Box<dyn ShotProcessor>>,
}

impl AdmissionChain {
    pub fn new() -> Self {
        Self {
            processors: Vec::new(),
        }
    }

    /// Build the chain a configuration asks for: deduplication always runs
    /// first, then the optional virtual magazine and malfunction filters.
    pub fn from_config(config: &RangeConfig) -> Self {
        let mut chain = Self::new();
        chain.push(Box::new(DeduplicationProcessor::new(
            config.dedupe_distance,
            config.dedupe_frame_window,
        )));
        if config.use_virtual_magazine {
            chain.push(Box::new(VirtualMagazineProcessor::new(
                config.virtual_magazine_capacity,
            )));
        }
        if config.use_malfunctions {
            chain.push(Box::new(MalfunctionsProcessor::new(
                config.malfunction_probability,
            )));
        }
        chain
    }

    pub fn push(&mut self, processor: Box<dyn ShotProcessor>) {
        self.processors.push(processor);
    }

    pub fn admit(&mut self, shot: &Shot) -> Admission {
        for processor in &mut self.processors {
            if !processor.process(shot) {
                debug!("shot rejected by {}", processor.name());
                return Admission::Rejected(processor.kind());
            }
        }
        Admission::Accepted
    }

    pub fn reset(&mut self) {
        for processor in &mut self.processors {
            processor.reset();
        }
    }
}

impl Default for AdmissionChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Rejects a shot landing within a distance threshold of the previously
/// accepted shot inside a frame-count window. Camera noise often reports the
/// same laser pulse twice on consecutive frames.
pub struct DeduplicationProcessor {
    distance: f64,
    frame_window: u64,
    last_accepted: Option<(f64, f64, u64)>,
}

impl DeduplicationProcessor {
    pub fn new(distance: f64, frame_window: u64) -> Self {
        Self {
            distance,
            frame_window,
            last_accepted: None,
        }
    }
}

impl ShotProcessor for DeduplicationProcessor {
    fn name(&self) -> &'static str {
        "deduplication"
    }

    fn kind(&self) -> RejectionKind {
        RejectionKind::Duplicate
    }

    fn process(&mut self, shot: &Shot) -> bool {
        if let Some((last_x, last_y, last_frame)) = self.last_accepted {
            let within_window = shot.timestamp.saturating_sub(last_frame) <= self.frame_window;
            let dx = shot.x - last_x;
            let dy = shot.y - last_y;
            if within_window && (dx * dx + dy * dy).sqrt() <= self.distance {
                return false;
            }
        }
        self.last_accepted = Some((shot.x, shot.y, shot.timestamp));
        true
    }

    fn reset(&mut self) {
        self.last_accepted = None;
    }
}

/// Counts shots against a fixed magazine capacity. When the magazine runs
/// dry the shot is rejected (a dry click) and the magazine refills.
pub struct VirtualMagazineProcessor {
    capacity: u32,
    remaining: u32,
}

impl VirtualMagazineProcessor {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            remaining: capacity,
        }
    }
}

impl ShotProcessor for VirtualMagazineProcessor {
    fn name(&self) -> &'static str {
        "virtual_magazine"
    }

    fn kind(&self) -> RejectionKind {
        RejectionKind::VirtualMagazine
    }

    fn process(&mut self, _shot: &Shot) -> bool {
        if self.remaining == 0 {
            self.remaining = self.capacity;
            return false;
        }
        self.remaining -= 1;
        true
    }

    fn reset(&mut self) {
        self.remaining = self.capacity;
    }
}

/// Randomly turns shots into simulated malfunctions with the configured
/// probability.
pub struct MalfunctionsProcessor {
    probability: f32,
    rng: StdRng,
}

impl MalfunctionsProcessor {
    pub fn new(probability: f32) -> Self {
        Self {
            probability,
            rng: StdRng::from_entropy(),
        }
    }
}

impl ShotProcessor for MalfunctionsProcessor {
    fn name(&self) -> &'static str {
        "malfunctions"
    }

    fn kind(&self) -> RejectionKind {
        RejectionKind::Malfunction
    }

    fn process(&mut self, _shot: &Shot) -> bool {
        self.rng.gen::<f32>() >= self.probability
    }
}
