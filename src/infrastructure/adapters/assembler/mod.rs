//! Assembler Adapter - 片段拼接

mod wav_assembler;

pub use wav_assembler::{encode_wav, WavAssembler, DEFAULT_SAMPLE_RATE};
