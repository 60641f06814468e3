//! Async ingestion pipeline: capture threads push detected shots into an
//! mpsc channel; a single coordination task owns all canvas mutation, so
//! resets and clears are serialized with in-flight resolutions.

use crate::canvas::Canvas;
use range_model::ShotColor;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

/// A detected shot as reported by a capture source, in the primary surface's
/// coordinate space.
#[derive(Debug, Clone)]
pub struct ShotEvent {
    pub color: ShotColor,
    pub x: f64,
    pub y: f64,
    /// Capture frame index at detection time.
    pub frame: u64,
}

/// Published status of the ingestion pipeline.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RangeStatus {
    pub running: bool,
    pub shots_seen: u64,
    pub last_shot_frame: Option<u64>,
}

/// Manages the capture → admission → resolution pipeline for one canvas.
pub struct RangePipeline {
    stop: Arc<AtomicBool>,
    shot_tx: mpsc::Sender<ShotEvent>,
    status_rx: watch::Receiver<RangeStatus>,
    canvas: Arc<Mutex<Canvas>>,
}

impl RangePipeline {
    /// Spawn the coordination task. Must be called within a tokio runtime.
    pub fn start(canvas: Arc<Mutex<Canvas>>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let (shot_tx, mut shot_rx) = mpsc::channel::<ShotEvent>(64);
        let (status_tx, status_rx) = watch::channel(RangeStatus {
            running: true,
            ..RangeStatus::default()
        });

        let stop_task = stop.clone();
        let canvas_task = canvas.clone();
        tokio::spawn(async move {
            let mut shots_seen = 0u64;
            let mut last_shot_frame = None;

            loop {
                if stop_task.load(Ordering::Relaxed) {
                    break;
                }

                let Some(event) = shot_rx.recv().await else {
                    break;
                };

                match canvas_task.lock() {
                    Ok(mut canvas) => {
                        canvas.add_shot(event.color, event.x, event.y, event.frame)
                    }
                    Err(_) => {
                        warn!("canvas lock poisoned; pipeline stopping");
                        break;
                    }
                }

                shots_seen += 1;
                last_shot_frame = Some(event.frame);
                let _ = status_tx.send(RangeStatus {
                    running: true,
                    shots_seen,
                    last_shot_frame,
                });
            }

            let _ = status_tx.send(RangeStatus {
                running: false,
                shots_seen,
                last_shot_frame,
            });
            info!("Range pipeline stopped");
        });

        info!("Range pipeline started");

        Self {
            stop,
            shot_tx,
            status_rx,
            canvas,
        }
    }

    /// Sender handed to capture sources.
    pub fn shot_sender(&self) -> mpsc::Sender<ShotEvent> {
        self.shot_tx.clone()
    }

    pub fn status(&self) -> RangeStatus {
        self.status_rx.borrow().clone()
    }

    pub fn canvas(&self) -> Arc<Mutex<Canvas>> {
        self.canvas.clone()
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
        info!("Range pipeline stop requested");
    }
}
