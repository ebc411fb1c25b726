/*
 * Debug Information Module
 *
 * Frame timing and simulation metrics shown in the UI panel and reported
 * at the end of headless runs:
 * - FPS (smoothed) and last frame time
 * - Number of ticks and frames
 * - Flock statistics when the flock demo is active
 */

use std::time::Duration;

use serde::Serialize;

use crate::flock::FlockStats;

// Weight of the newest sample in the smoothed FPS
const FPS_SMOOTHING: f32 = 0.1;

#[derive(Debug, Clone, Default, Serialize)]
pub struct DebugInfo {
    pub fps: f32,
    #[serde(with = "duration_ms")]
    pub frame_time: Duration,
    #[serde(with = "duration_ms")]
    pub elapsed: Duration,
    pub frames: u64,
    pub ticks: u64,
    pub flock: Option<FlockStats>,
}

impl DebugInfo {
    // Fold one frame's duration into the running numbers
    pub fn record_frame(&mut self, frame_time: Duration) {
        self.frame_time = frame_time;
        self.elapsed += frame_time;
        self.frames += 1;

        let secs = frame_time.as_secs_f32();
        if secs > 0.0 {
            let instant_fps = 1.0 / secs;
            self.fps = if self.fps == 0.0 {
                instant_fps
            } else {
                self.fps + (instant_fps - self.fps) * FPS_SMOOTHING
            };
        }
    }

    /// Ticks per second of wall-clock time, over the whole run.
    pub fn ticks_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.ticks as f64 / secs
        }
    }
}

mod duration_ms {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
    }
}
