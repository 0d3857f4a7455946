//! Per-scene configuration.
//!
//! Hosts describe a scene with string key/value pairs (on the web, the
//! mount element's `data-*` attributes). Recognised keys:
//!
//! | key | meaning | default |
//! |---|---|---|
//! | `background` | `#rgb`, `#rrggbb` or `0xrrggbb` | `#000011` |
//! | `clip-scale` | half extent per viewport pixel | `0.5` |
//! | `clip-inset` | pixels subtracted from each side first | `0` |
//! | `clip-half-width`, `clip-half-height` | fixed planes, both required | unset |
//! | `camera-distance` | camera z position, between `near` and `far` | `500` |
//! | `near`, `far` | clip distances | `1`, `1000` |

use crate::camera::Frustum;
use crate::color::Color;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub background: Color,
    pub frustum: Frustum,
    pub camera_distance: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            background: Color::from_hex(0x000011),
            frustum: Frustum::default(),
            camera_distance: 500.0,
            near: 1.0,
            far: 1000.0,
        }
    }
}

impl SceneConfig {
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_frustum(mut self, frustum: Frustum) -> Self {
        self.frustum = frustum;
        self
    }

    pub fn with_camera_distance(mut self, distance: f64) -> Self {
        self.camera_distance = distance;
        self
    }

    pub fn with_clip_distances(mut self, near: f64, far: f64) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Builds a config from a key lookup, starting from the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("background") {
            config.background = value.parse()?;
        }

        let half_width = number(&lookup, "clip-half-width")?;
        let half_height = number(&lookup, "clip-half-height")?;
        config.frustum = match (half_width, half_height) {
            (Some(half_width), Some(half_height)) => Frustum::Fixed {
                half_width: positive("clip-half-width", half_width)?,
                half_height: positive("clip-half-height", half_height)?,
            },
            (Some(_), None) => {
                return Err(ConfigError::MissingPair {
                    key: "clip-half-width",
                    needs: "clip-half-height",
                });
            }
            (None, Some(_)) => {
                return Err(ConfigError::MissingPair {
                    key: "clip-half-height",
                    needs: "clip-half-width",
                });
            }
            (None, None) => {
                let scale = number(&lookup, "clip-scale")?.unwrap_or(0.5);
                let inset = number(&lookup, "clip-inset")?.unwrap_or(0.0);
                if inset < 0.0 {
                    return Err(ConfigError::OutOfRange {
                        key: "clip-inset",
                        value: inset,
                    });
                }
                Frustum::Viewport {
                    scale: positive("clip-scale", scale)?,
                    inset,
                }
            }
        };

        if let Some(distance) = number(&lookup, "camera-distance")? {
            config.camera_distance = positive("camera-distance", distance)?;
        }
        if let Some(near) = number(&lookup, "near")? {
            config.near = near;
        }
        if let Some(far) = number(&lookup, "far")? {
            config.far = far;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks every field; the camera must sit strictly between the near and
    /// far planes or the scene at the origin is clipped away.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("camera-distance", self.camera_distance)?;
        if !(self.near > 0.0 && self.near < self.far && self.far.is_finite()) {
            return Err(ConfigError::ClipPlanes {
                near: self.near,
                far: self.far,
            });
        }
        if !(self.near < self.camera_distance && self.camera_distance < self.far) {
            return Err(ConfigError::OutOfRange {
                key: "camera-distance",
                value: self.camera_distance,
            });
        }
        match self.frustum {
            Frustum::Viewport { scale, inset } => {
                positive("clip-scale", scale)?;
                if !(inset.is_finite() && inset >= 0.0) {
                    return Err(ConfigError::OutOfRange {
                        key: "clip-inset",
                        value: inset,
                    });
                }
            }
            Frustum::Fixed { half_width, half_height } => {
                positive("clip-half-width", half_width)?;
                positive("clip-half-height", half_height)?;
            }
        }
        Ok(())
    }
}

fn number<F>(lookup: &F, key: &'static str) -> Result<Option<f64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or(ConfigError::InvalidNumber { key, value: raw })
}

fn positive(key: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange { key, value })
    }
}
