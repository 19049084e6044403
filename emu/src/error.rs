use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("No engine selected")]
    NoEngine,

    #[error("No source loaded")]
    NoSource,

    #[error("No successful compilation to execute")]
    NotCompiled,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid file name '{0}'")]
    InvalidFileName(String),

    #[error("Unknown sample '{0}' (available: {1})")]
    UnknownSample(String, String),

    #[error("Unknown engine '{0}' (available: asm, pascal)")]
    UnknownEngine(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Config(#[from] serde_yaml::Error),
}
