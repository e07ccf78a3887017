/// Crate-wide result alias.
pub type DotmorphResult<T> = Result<T, DotmorphError>;

/// Error type shared by every layer of the engine.
///
/// Only configuration loading surfaces these to callers. Resource and sampling failures inside the
/// frame loop are logged and replaced by fallbacks.
#[derive(thiserror::Error, Debug)]
pub enum DotmorphError {
    /// Invalid caller-provided value.
    #[error("validation error: {0}")]
    Validation(String),

    /// SVG markup could not be parsed or contained no usable geometry.
    #[error("svg error: {0}")]
    Svg(String),

    /// An SVG resource could not be fetched.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Point sampling failed (rasterization, empty shape).
    #[error("sampling error: {0}")]
    Sampling(String),

    /// Engine or scenario configuration could not be loaded.
    #[error("config error: {0}")]
    Config(String),

    /// Anything else.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DotmorphError {
    /// Build a [`DotmorphError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DotmorphError::Svg`].
    pub fn svg(msg: impl Into<String>) -> Self {
        Self::Svg(msg.into())
    }

    /// Build a [`DotmorphError::Fetch`].
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Build a [`DotmorphError::Sampling`].
    pub fn sampling(msg: impl Into<String>) -> Self {
        Self::Sampling(msg.into())
    }

    /// Build a [`DotmorphError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
