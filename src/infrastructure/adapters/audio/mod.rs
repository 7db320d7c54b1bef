//! Audio Adapter - WAV 编解码

mod wav_codec;

pub use wav_codec::{decode_audio, encode_wav, resample_mono, AudioCodecError, DecodedAudio};
