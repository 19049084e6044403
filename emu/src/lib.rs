pub mod config;
pub mod emulator;
pub mod engine;
pub mod error;
pub mod help;
pub mod samples;
pub mod shell;
pub mod workspace;

pub use config::Config;
pub use emulator::{Emulator, Report, Stage};
pub use engine::EngineKind;
pub use error::Error;
pub use workspace::FileEntry;
