/// Result alias that carries the custom [`ConfiguratorError`] type.
pub type Result<T> = std::result::Result<T, ConfiguratorError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum ConfiguratorError {
    /// Free-form failure reported by a collaborator such as a renderer.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// The asset at `path` could not be interpreted as a binary glTF model.
    #[error("invalid asset `{path}`: {reason}")]
    InvalidAsset { path: String, reason: String },
    /// A color string that is not in `#rgb`, `#rrggbb` or `rgb(r, g, b)` form.
    #[error("invalid color `{0}`: expected #rgb, #rrggbb or rgb(r, g, b)")]
    InvalidColor(String),
    /// A slider range that is inverted, non-positive or not finite.
    #[error("invalid scale range {min}..={max} (step {step})")]
    InvalidScaleRange { min: f32, max: f32, step: f32 },
    /// Malformed configuration file.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl ConfiguratorError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub(crate) fn invalid_asset(path: &str, reason: impl Into<String>) -> Self {
        Self::InvalidAsset {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&str> for ConfiguratorError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for ConfiguratorError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
