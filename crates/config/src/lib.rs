// Configuration loading

pub mod settings;

pub use settings::{Settings, DEFAULT_EXPORT_FILE_NAME};
