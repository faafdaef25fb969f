//! Audio frame boundary type and reaction thresholds.
//!
//! Capture and FFT band extraction live in the host; the solver only sees
//! smoothed band levels in [0, 1] once per step.

/// One frame of band-limited audio levels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AudioFrame {
    pub low: f32,
    pub mid: f32,
    pub high: f32,
    pub volume: f32,
}

impl AudioFrame {
    /// Constant low-level frame for hosts without audio capture.
    pub const FALLBACK: AudioFrame = AudioFrame {
        low: 0.1,
        mid: 0.1,
        high: 0.1,
        volume: 0.1,
    };

    /// Silence. A zero volume gates off all audio reaction.
    pub const SILENT: AudioFrame = AudioFrame {
        low: 0.0,
        mid: 0.0,
        high: 0.0,
        volume: 0.0,
    };
}

/// Bass level above which velocity turbulence is injected.
pub const BASS_THRESHOLD: f32 = 0.2;
/// Mid level above which density is injected.
pub const MID_THRESHOLD: f32 = 0.3;
/// High level above which density is injected.
pub const HIGH_THRESHOLD: f32 = 0.3;

/// Velocity payload scale per unit of bass level.
pub const BASS_GAIN: f32 = 20.0;
/// Velocity splats injected per reacting step.
pub const BASS_SPLATS: usize = 3;
/// Density splats injected per reacting step.
pub const DENSITY_SPLATS: usize = 2;
