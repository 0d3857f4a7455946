use crate::error::SceneError;

/// Size of the drawable area in CSS (device-independent) pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f64,
    height: f64,
}

impl Viewport {
    /// Both sides must be finite and strictly positive.
    pub fn new(width: f64, height: f64) -> Result<Self, SceneError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Ok(Self { width, height })
        } else {
            Err(SceneError::InvalidViewport { width, height })
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Backing-store size in physical pixels for the given device pixel ratio.
    pub fn physical_size(&self, pixel_ratio: f64) -> (u32, u32) {
        let ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        let scale = |v: f64| ((v * ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }
}
