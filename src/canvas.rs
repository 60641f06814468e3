//! The canvas coordinator: owns the shot and target lists for one display
//! surface, runs the admission → resolution → command pipeline for each
//! shot, and remaps shots onto a linked arena/projector surface.

use crate::admission::{Admission, AdmissionChain, RejectionKind};
use crate::command::execute_region_commands;
use crate::config::RangeConfig;
use crate::session::{compose_video_string, RecordingManager, SessionRecorder};
use crate::surface::{AudioPlayer, DrawableSurface, SurfaceSupervisor, TrainingExercise};
use range_hit::HitResolver;
use range_model::{
    Bounds, Hit, Shot, ShotColor, ShotEntry, Target, SELECTED_STROKE, UNSELECTED_STROKE,
};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, warn};

/// Link to a projector/arena surface: the arena canvas plus the rectangular
/// bounds of the projected region within this canvas's own coordinates.
#[derive(Clone)]
pub struct ArenaLink {
    pub canvas: Arc<Mutex<Canvas>>,
    pub projection_bounds: Bounds,
}

/// Coordinator for one display surface.
///
/// All mutation must happen on a single coordination context (the pipeline
/// task); see [`crate::pipeline::RangePipeline`]. This serializes resets and
/// clears with in-flight resolutions.
pub struct Canvas {
    name: String,
    width: f64,
    height: f64,
    config: RangeConfig,
    chain: AdmissionChain,
    resolver: HitResolver,
    shots: Vec<Shot>,
    shot_entries: Vec<ShotEntry>,
    targets: Vec<Target>,
    show_shots: bool,
    selected_target: Option<usize>,
    start_time: Option<Instant>,
    surface: Arc<dyn DrawableSurface>,
    recorder: Option<Arc<dyn SessionRecorder>>,
    recording_managers: Vec<Arc<dyn RecordingManager>>,
    exercise: Option<Arc<dyn TrainingExercise>>,
    supervisor: Option<Arc<dyn SurfaceSupervisor>>,
    audio: Option<Arc<dyn AudioPlayer>>,
    arena: Option<ArenaLink>,
}

impl Canvas {
    pub fn new(
        name: impl Into<String>,
        width: f64,
        height: f64,
        config: RangeConfig,
        surface: Arc<dyn DrawableSurface>,
    ) -> Self {
        let chain = AdmissionChain::from_config(&config);
        Self {
            name: name.into(),
            width,
            height,
            config,
            chain,
            resolver: HitResolver::new(),
            shots: Vec::new(),
            shot_entries: Vec::new(),
            targets: Vec::new(),
            show_shots: true,
            selected_target: None,
            start_time: None,
            surface,
            recorder: None,
            recording_managers: Vec::new(),
            exercise: None,
            supervisor: None,
            audio: None,
            arena: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn surface_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn shots(&self) -> &[Shot] {
        &self.shots
    }

    pub fn shot_entries(&self) -> &[ShotEntry] {
        &self.shot_entries
    }

    /// Time since the first shot or the last reset.
    pub fn elapsed(&self) -> Option<std::time::Duration> {
        self.start_time.map(|start| start.elapsed())
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn targets_mut(&mut self) -> &mut [Target] {
        &mut self.targets
    }

    pub fn set_admission_chain(&mut self, chain: AdmissionChain) {
        self.chain = chain;
    }

    pub fn set_recorder(&mut self, recorder: Option<Arc<dyn SessionRecorder>>) {
        self.recorder = recorder;
    }

    pub fn add_recording_manager(&mut self, manager: Arc<dyn RecordingManager>) {
        self.recording_managers.push(manager);
    }

    pub fn set_exercise(&mut self, exercise: Option<Arc<dyn TrainingExercise>>) {
        self.exercise = exercise;
    }

    pub fn set_supervisor(&mut self, supervisor: Option<Arc<dyn SurfaceSupervisor>>) {
        self.supervisor = supervisor;
    }

    pub fn set_audio(&mut self, audio: Option<Arc<dyn AudioPlayer>>) {
        self.audio = audio;
    }

    /// Configure the projector/arena surface this canvas forwards shots to.
    pub fn set_projector_arena(&mut self, canvas: Arc<Mutex<Canvas>>, projection_bounds: Bounds) {
        self.arena = Some(ArenaLink {
            canvas,
            projection_bounds,
        });
    }

    pub fn clear_projector_arena(&mut self) {
        self.arena = None;
    }

    /// Process a freshly detected shot: admission chain, hit resolution,
    /// region commands, arena remapping, and exercise notification.
    pub fn add_shot(&mut self, color: ShotColor, x: f64, y: f64, frame: u64) {
        if self.start_time.is_none() {
            self.start_time = Some(Instant::now());
        }

        let shot = Shot::new(color, x, y, frame, self.config.marker_radius);

        if let Admission::Rejected(kind) = self.chain.admit(&shot) {
            self.record_rejected(&shot, kind);
            return;
        }

        self.notify_recording_managers(&shot);
        self.shot_entries.push(ShotEntry::new(shot.clone()));
        self.shots.push(shot.clone());
        self.draw_shot(&shot);
        self.play_feedback_sound(&shot);

        let hit = self.resolve_and_record(&shot);
        self.run_hit_commands(hit.as_ref());

        let mut arena_consumed = false;
        if let Some(link) = self.arena.clone() {
            let bounds = link.projection_bounds;
            if bounds.contains(shot.x, shot.y) {
                match link.canvas.lock() {
                    Ok(mut arena) => {
                        let (arena_width, arena_height) = arena.surface_size();
                        let x_scale = arena_width / bounds.width;
                        let y_scale = arena_height / bounds.height;
                        let arena_shot = Shot::new(
                            shot.color,
                            (shot.x - bounds.min_x()) * x_scale,
                            (shot.y - bounds.min_y()) * y_scale,
                            shot.timestamp,
                            self.config.marker_radius,
                        );
                        arena_consumed = arena.add_arena_shot(arena_shot);
                    }
                    Err(_) => warn!("arena canvas lock poisoned; shot not forwarded"),
                }
            }
        }

        // At most one listener sees any physical shot, preferring the
        // arena's listener when it consumed the forwarded shot.
        if !arena_consumed {
            self.notify_exercise(&shot, hit.as_ref());
        }
    }

    /// Lighter ingestion path for shots remapped from a primary surface; the
    /// shot already passed that surface's admission chain. Returns whether an
    /// active exercise consumed the shot.
    pub fn add_arena_shot(&mut self, shot: Shot) -> bool {
        self.shots.push(shot.clone());
        self.draw_shot(&shot);

        let hit = self.resolve_and_record(&shot);
        self.run_hit_commands(hit.as_ref());

        if self.exercise.is_some() {
            self.notify_exercise(&shot, hit.as_ref());
            return true;
        }
        false
    }

    /// Remove all drawn markers and clear the shot list and the external
    /// shot log, propagating to a linked arena surface.
    pub fn clear_shots(&mut self) {
        for shot in &self.shots {
            self.surface.remove_marker(shot);
        }
        self.shots.clear();
        self.shot_entries.clear();

        if let Some(link) = &self.arena {
            if let Ok(mut arena) = link.canvas.lock() {
                arena.clear_shots();
            }
        }
    }

    /// Full reset: restart the elapsed-time clock, rewind every image
    /// region's animation, refill admission state, and clear all shots.
    /// Propagates to a linked arena surface.
    pub fn reset(&mut self) {
        self.start_time = Some(Instant::now());

        for target in &mut self.targets {
            for region in target.regions_mut() {
                if let Some(image_region) = region.as_image_mut() {
                    image_region.reset();
                }
            }
        }
        self.resolver.clear_cache();
        self.chain.reset();

        if let Some(link) = &self.arena {
            if let Ok(mut arena) = link.canvas.lock() {
                arena.reset();
            }
        }

        self.clear_shots();
    }

    /// Append a target; insertion order defines the z-order used during hit
    /// resolution. Returns the target's index.
    pub fn add_target(&mut self, mut target: Target) -> usize {
        let index = self.targets.len();
        target.set_provenance(index);
        if let Some(recorder) = &self.recorder {
            recorder.record_target_added(&self.name, &target);
        }
        self.targets.push(target);
        index
    }

    pub fn remove_target(&mut self, index: usize) -> Option<Target> {
        if index >= self.targets.len() {
            return None;
        }
        let target = self.targets.remove(index);
        if let Some(recorder) = &self.recorder {
            recorder.record_target_removed(&self.name, &target);
        }
        self.resolver.clear_cache();
        match self.selected_target {
            Some(selected) if selected == index => self.selected_target = None,
            Some(selected) if selected > index => self.selected_target = Some(selected - 1),
            _ => {}
        }
        Some(target)
    }

    /// Select a target (or deselect with `None`). At most one target is
    /// selected at a time; the previous selection gets its unselected stroke
    /// styling back.
    pub fn toggle_target_selection(&mut self, new_selection: Option<usize>) {
        if let Some(previous) = self.selected_target.take() {
            self.set_target_selection(previous, false);
        }
        if let Some(index) = new_selection {
            if index < self.targets.len() {
                self.set_target_selection(index, true);
                self.selected_target = Some(index);
            }
        }
    }

    pub fn selected_target(&self) -> Option<usize> {
        self.selected_target
    }

    pub fn set_show_shots(&mut self, show_shots: bool) {
        if self.show_shots != show_shots {
            for shot in &self.shots {
                self.surface.set_marker_visible(shot, show_shots);
            }
        }
        self.show_shots = show_shots;
    }

    fn set_target_selection(&mut self, index: usize, selected: bool) {
        let stroke = if selected {
            SELECTED_STROKE
        } else {
            UNSELECTED_STROKE
        };
        if let Some(target) = self.targets.get_mut(index) {
            for region in target.regions_mut() {
                if let Some(shape) = region.as_shape_mut() {
                    shape.set_stroke(stroke);
                }
            }
        }
    }

    fn draw_shot(&self, shot: &Shot) {
        self.surface.add_marker(shot);
        self.surface.set_marker_visible(shot, self.show_shots);
    }

    fn play_feedback_sound(&self, shot: &Shot) {
        let Some(audio) = &self.audio else {
            return;
        };
        match shot.color {
            ShotColor::Red if self.config.use_red_laser_sound => {
                audio.play(&self.config.red_laser_sound)
            }
            ShotColor::Green if self.config.use_green_laser_sound => {
                audio.play(&self.config.green_laser_sound)
            }
            _ => {}
        }
    }

    /// Recording policy for rejected shots: duplicates are dropped without
    /// any recording, malfunction and virtual-magazine rejections are
    /// recorded-but-not-scored. This asymmetry is deliberate; do not
    /// generalize it to other kinds.
    fn record_rejected(&self, shot: &Shot, kind: RejectionKind) {
        debug!("shot ({}, {}) rejected: {:?}", shot.x, shot.y, kind);

        let Some(recorder) = &self.recorder else {
            return;
        };
        let (is_malfunction, is_virtual_magazine) = match kind {
            RejectionKind::Duplicate => return,
            RejectionKind::Malfunction => (true, false),
            RejectionKind::VirtualMagazine => (false, true),
        };

        self.notify_recording_managers(shot);
        let video_string = self.video_string(shot);
        recorder.record_shot(
            &self.name,
            shot,
            is_malfunction,
            is_virtual_magazine,
            None,
            None,
            video_string,
        );
    }

    /// Resolve a shot and make exactly one recording call (hit or miss) when
    /// a recorder is active.
    fn resolve_and_record(&mut self, shot: &Shot) -> Option<Hit> {
        let hit = self.resolver.resolve(shot, &self.targets);

        if self.config.debug_mode {
            if let Some(h) = &hit {
                let region = &self.targets[h.target_index].regions()[h.region_index];
                let tags: Vec<String> = region
                    .tags()
                    .iter()
                    .map(|(k, v)| format!("{}:{}", k, v))
                    .collect();
                debug!(
                    "hit region for shot ({}, {}): tags ({})",
                    shot.x,
                    shot.y,
                    tags.join(", ")
                );
            }
        }

        if let Some(recorder) = &self.recorder {
            let video_string = self.video_string(shot);
            match &hit {
                Some(h) => recorder.record_shot(
                    &self.name,
                    shot,
                    false,
                    false,
                    Some(h.target_index),
                    Some(h.region_index),
                    video_string,
                ),
                None => {
                    recorder.record_shot(&self.name, shot, false, false, None, None, video_string)
                }
            }
        }

        hit
    }

    fn run_hit_commands(&mut self, hit: Option<&Hit>) {
        let Some(hit) = hit else {
            return;
        };
        let reset_requested =
            execute_region_commands(&mut self.targets, hit, self.audio.as_deref());
        if reset_requested {
            match self.supervisor.clone() {
                Some(supervisor) => supervisor.reset_all(),
                None => self.reset(),
            }
        }
    }

    fn notify_exercise(&self, shot: &Shot, hit: Option<&Hit>) {
        let Some(exercise) = &self.exercise else {
            return;
        };
        let hit_region = hit.map(|h| &self.targets[h.target_index].regions()[h.region_index]);
        exercise.shot_listener(shot, hit_region);
    }

    fn notify_recording_managers(&self, shot: &Shot) {
        if self.recorder.is_some() {
            for manager in &self.recording_managers {
                manager.notify_shot(shot);
            }
        }
    }

    fn video_string(&self, shot: &Shot) -> Option<String> {
        if self.recorder.is_none() {
            return None;
        }
        compose_video_string(&self.recording_managers, shot)
    }
}
