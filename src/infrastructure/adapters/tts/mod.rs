//! TTS Adapter - 推理引擎实现

mod fake_engine;
mod http_engine_client;

pub use fake_engine::{FakeEngine, FakeEngineConfig};
pub use http_engine_client::{HttpEngineClient, HttpEngineClientConfig};
