use thiserror::Error;

/// Errors raised by scene operations.
///
/// Disposal never produces one of these: releasing an already released
/// resource is a silent no-op.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("scene has been disposed")]
    Disposed,

    #[error("invalid viewport {width}x{height}: both sides must be finite and positive")]
    InvalidViewport { width: f64, height: f64 },

    #[error("geometry needs xyz triplets, got {len} floats")]
    InvalidGeometry { len: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A host or graphics API call failed (wasm32 only).
    #[error("platform error: {0}")]
    Platform(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid colour {0:?}, expected #rgb, #rrggbb or 0xrrggbb")]
    InvalidColor(String),

    #[error("{key}: {value:?} is not a number")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{key}: {value} is out of range")]
    OutOfRange { key: &'static str, value: f64 },

    #[error("near plane {near} must be positive and less than far plane {far}")]
    ClipPlanes { near: f64, far: f64 },

    /// One half of a key pair was given without the other.
    #[error("{key} requires {needs}")]
    MissingPair {
        key: &'static str,
        needs: &'static str,
    },
}
