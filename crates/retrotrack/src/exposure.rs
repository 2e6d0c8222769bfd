//! Manual/auto exposure switching.
//!
//! Fixed color thresholds only hold under a fixed manual exposure, so the
//! tracker reports nothing while the camera runs on auto exposure.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExposureMode {
    #[default]
    Manual,
    Auto,
}

impl ExposureMode {
    /// Interpret a store value: any non-zero number requests auto exposure.
    pub fn from_request(value: Option<f64>) -> Self {
        match value {
            Some(v) if v != 0.0 && !v.is_nan() => ExposureMode::Auto,
            _ => ExposureMode::Manual,
        }
    }
}

/// Camera-side exposure control.
pub trait ExposureControl {
    fn set_manual(&mut self, exposure: f64);
    fn set_auto(&mut self);
}

/// Camera that ignores exposure commands.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoExposureControl;

impl ExposureControl for NoExposureControl {
    fn set_manual(&mut self, _exposure: f64) {}
    fn set_auto(&mut self) {}
}

/// Two-state exposure machine; starts in manual mode.
#[derive(Clone, Debug)]
pub struct ExposureMachine {
    mode: ExposureMode,
    manual_exposure: f64,
}

impl ExposureMachine {
    pub fn new(manual_exposure: f64) -> Self {
        Self {
            mode: ExposureMode::Manual,
            manual_exposure,
        }
    }

    pub fn mode(&self) -> ExposureMode {
        self.mode
    }

    /// Apply this frame's request. The camera is commanded only when the mode
    /// changes; the new mode is returned in that case.
    pub fn update<C: ExposureControl + ?Sized>(
        &mut self,
        requested: ExposureMode,
        camera: &mut C,
    ) -> Option<ExposureMode> {
        if requested == self.mode {
            return None;
        }
        match requested {
            ExposureMode::Auto => camera.set_auto(),
            ExposureMode::Manual => camera.set_manual(self.manual_exposure),
        }
        log::info!("exposure mode {:?} -> {:?}", self.mode, requested);
        self.mode = requested;
        Some(requested)
    }
}
