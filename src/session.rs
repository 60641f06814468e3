//! Session recording interfaces. Persistence format is out of scope; the
//! core only delivers fully-formed event descriptions.

use range_model::{Shot, Target};
use std::path::PathBuf;
use std::sync::Arc;

/// Consumes structured hit/miss/target events while a session is recording.
pub trait SessionRecorder: Send + Sync {
    #[allow(clippy::too_many_arguments)]
    fn record_shot(
        &self,
        surface: &str,
        shot: &Shot,
        is_malfunction: bool,
        is_virtual_magazine: bool,
        target_index: Option<usize>,
        region_index: Option<usize>,
        video_string: Option<String>,
    );

    fn record_target_added(&self, surface: &str, target: &Target);

    fn record_target_removed(&self, surface: &str, target: &Target);
}

/// Identifies the video file a recording manager is writing for a shot.
#[derive(Debug, Clone)]
pub struct RecorderHandle {
    pub name: String,
    pub relative_file: PathBuf,
}

/// A camera feed recording video alongside the session.
pub trait RecordingManager: Send + Sync {
    fn notify_shot(&self, shot: &Shot);

    /// The recorder holding footage relevant to this shot.
    fn relevant_recorder(&self, shot: &Shot) -> RecorderHandle;
}

/// Compose the `name:relative-path` description of all in-progress video
/// recordings for a shot, pairs joined by commas. `None` when no recording
/// manager is active.
pub fn compose_video_string(
    managers: &[Arc<dyn RecordingManager>],
    shot: &Shot,
) -> Option<String> {
    if managers.is_empty() {
        return None;
    }

    let parts: Vec<String> = managers
        .iter()
        .map(|manager| {
            let recorder = manager.relevant_recorder(shot);
            format!("{}:{}", recorder.name, recorder.relative_file.display())
        })
        .collect();

    Some(parts.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use range_model::ShotColor;

    struct FixedManager(&'static str, &'static str);

    impl RecordingManager for FixedManager {
        fn notify_shot(&self, _shot: &Shot) {}

        fn relevant_recorder(&self, _shot: &Shot) -> RecorderHandle {
            RecorderHandle {
                name: self.0.to_string(),
                relative_file: PathBuf::from(self.1),
            }
        }
    }

    #[test]
    fn test_compose_video_string() {
        let shot = Shot::new(ShotColor::Red, 1.0, 2.0, 0, 2.0);
        let managers: Vec<Arc<dyn RecordingManager>> = vec![
            Arc::new(FixedManager("cam0", "cam0/shot_1.mp4")),
            Arc::new(FixedManager("cam1", "cam1/shot_1.mp4")),
        ];
        assert_eq!(
            compose_video_string(&managers, &shot).unwrap(),
            "cam0:cam0/shot_1.mp4,cam1:cam1/shot_1.mp4"
        );
        assert!(compose_video_string(&[], &shot).is_none());
    }
}
