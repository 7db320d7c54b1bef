//! Voice Context - 音色限界上下文
//!
//! 职责:
//! - 音色选择表达式解析
//! - 音色组（合并多个子音色）建模

mod aggregate;
mod errors;
mod selection;
mod value_objects;

pub use aggregate::VoiceGroup;
pub use errors::VoiceError;
pub use selection::{VoiceSelection, GROUP_SEPARATOR, MERGE_SEPARATOR};
pub use value_objects::{VoiceName, RANDOM_VOICE};
