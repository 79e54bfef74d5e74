use thiserror::Error;

/******************************************************************************/

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkyError {
    #[error("Invalid sky resolution {lats}x{longs}: both must be at least 3")]
    InvalidResolution { lats: u32, longs: u32 },
    #[error("Sky resolution {lats}x{longs} needs {vertices} vertices, more than 32-bit indices address")]
    ResolutionTooLarge { lats: u32, longs: u32, vertices: u64 },
    #[error("Cannot allocate backend buffer: {0}")]
    BackendAllocation(String),
    #[error("Sky is not built")]
    NotBuilt,
    #[error("Shader error: {0}")]
    Shader(String),
    #[error("Texture error: {0}")]
    Texture(String),
}

pub type SkyResult<T> = Result<T, SkyError>;
