use thiserror::Error;

/// Mount failed; nothing from the attempt is left alive.
#[derive(Debug, Error)]
pub enum ContextCreationError {
    /// The host surface cannot be drawn to (zero size, already reclaimed).
    #[error("graphics surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// Device/renderer creation against the surface failed.
    #[error("renderer bind failed: {0:#}")]
    RendererBind(anyhow::Error),

    /// Uploading the static room shell failed.
    #[error("failed to build scene shell: {0:#}")]
    Shell(anyhow::Error),

    /// The dedicated render thread could not be started or died during mount.
    #[error("render thread unavailable: {0}")]
    Thread(String),
}

/// The host reclaimed the surface. Terminal for the current context.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
#[error("graphics context lost")]
pub struct ContextLost;

/// A single placed object's external asset could not be resolved.
///
/// Absorbed locally: the leaf keeps rendering its placeholder.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum ResourceResolutionError {
    #[error("empty resource reference")]
    EmptyReference,

    #[error("unsupported resource reference `{0}`")]
    Unsupported(String),

    #[error("failed to read `{reference}`: {message}")]
    Io { reference: String, message: String },

    #[error("failed to decode `{reference}`: {message}")]
    Decode { reference: String, message: String },

    #[error("failed to upload `{reference}`: {message}")]
    Upload { reference: String, message: String },

    #[error("asset loader shut down before resolving `{0}`")]
    LoaderClosed(String),
}
