//! Voices Adapter - 音色目录加载

mod file_conditioning_loader;

pub use file_conditioning_loader::{FileConditioningLoader, CONDITIONING_SAMPLE_RATE};
