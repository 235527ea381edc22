//! The four pipeline stages, each a thin wrapper over one external call.
//!
//! # Stages
//!
//! | Stage | Module | Backend | Output |
//! |-------|--------|---------|--------|
//! | Article fetch | [`news`] | NewsAPI `/v2/everything` | title + content snippet |
//! | Script generation | [`script`] | Gemini `generateContent` | 3-4 sentence narration script |
//! | Narration synthesis | [`tts`] | Google Translate TTS | MP3 file |
//! | Video assembly | [`video`] | ffmpeg / ffprobe | captioned MP4 |
//!
//! The stages run once, in order; each one's output feeds the next and an
//! empty result ends the run. Stages log their progress with `tracing` and
//! return `Result` (with `Option` where "nothing found" is not an error).

pub mod news;
pub mod script;
pub mod tts;
pub mod video;
