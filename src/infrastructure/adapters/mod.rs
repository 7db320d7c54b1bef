//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod audio;
pub mod segmenter;
pub mod storage;
pub mod tts;
pub mod voices;

pub use segmenter::*;
pub use storage::*;
pub use tts::*;
pub use voices::*;
