//! subweave-core: Subtitle stitching and transcript-guided correction.
//!
//! This crate turns independently transcribed audio clips into one
//! time-consistent subtitle track, then reconciles that track against a trusted
//! reference transcript in batches.
//!
//! # Architecture
//!
//! The library is built around three capability traits, injected by the caller:
//!
//! - [`traits::Recognizer`]: Transcribes one clip to subtitle text and reports its duration
//! - [`traits::CorrectionService`]: Corrects a batch of subtitle lines against a reference slice
//! - [`align::ReferenceAligner`]: Splits the reference transcript into per-batch slices
//!
//! # Quick Start
//!
//! ```ignore
//! use subweave_core::correct::TranscriptCorrector;
//! use subweave_core::stitch::stitch;
//! use subweave_core::types::SegmentRecognitionResult;
//!
//! // Stitch per-clip tracks into one timeline
//! let track = stitch(segments)?;
//!
//! // Correct against the reference transcript
//! let corrector = TranscriptCorrector::new(service, config);
//! let correction = corrector.correct(&track, &reference)?;
//! println!("{}", correction.report);
//! ```

pub mod align;
pub mod config;
pub mod correct;
pub mod error;
pub mod recognize;
pub mod report;
pub mod srt;
pub mod stitch;
pub mod time;
pub mod track;
pub mod traits;
pub mod types;
