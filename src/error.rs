//! Error types for gwdance.
//!
//! Model and configuration errors are raised once, at startup or when masses
//! are regenerated. GPU and windowing errors only come from the host loop.

use thiserror::Error;

/// Invalid parameters passed to [`OrbitalSystem::configure`](crate::OrbitalSystem::configure).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A mass or rate that must be strictly positive was not (NaN included).
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    /// The sample grid needs at least two points per axis.
    #[error("grid resolution must be at least 2, got {0}")]
    GridTooSmall(usize),
}

/// Errors that can occur while loading or validating a [`GameConfig`](crate::GameConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file or environment could not be read or deserialized.
    #[error("Failed to load config: {0}")]
    Load(#[from] config::ConfigError),
    /// A tunable is out of its allowed range.
    #[error("Invalid config: {0}")]
    Invalid(String),
    /// The configured masses or rates do not describe a valid orbit.
    #[error("Invalid orbital parameters: {0}")]
    Model(#[from] ModelError),
}

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("Failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("No compatible GPU adapter found: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),
    /// Failed to create GPU device.
    #[error("Failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
}

/// Errors that can occur when running the game.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to create or run the event loop.
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create the window.
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    /// Startup configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_error_message_names_parameter() {
        let err = ModelError::NonPositive {
            name: "mass1",
            value: -3.0,
        };
        assert_eq!(err.to_string(), "mass1 must be positive and finite, got -3");
    }

    #[test]
    fn test_config_error_wraps_model_error() {
        let err: ConfigError = ModelError::GridTooSmall(1).into();
        assert!(matches!(err, ConfigError::Model(ModelError::GridTooSmall(1))));
        assert!(err.to_string().contains("at least 2"));
    }
}
