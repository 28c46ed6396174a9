//! warpcaptcha synthesises captcha images from a short phrase.
//!
//! Every random decision of a build is drawn through one [`Sequencer`] and recorded
//! as a [`Fingerprint`]. Replaying the fingerprint rebuilds the identical image, so a
//! server can store a few integers instead of a picture.
//!
//! # Pipeline overview
//!
//! 1. **Background**: a random light color, a fixed color, or one of the configured images
//! 2. **Behind pass**: lines, arcs and pixel noise under the text ([`run_pass`])
//! 3. **Text**: one glyph per character, each rotated and shifted ([`write_phrase`])
//! 4. **Front pass**: the same effects in the text color over the glyphs
//! 5. **Distortion**: a sinusoidal ripple resampled with bilinear interpolation ([`distort`])
//! 6. **Post filters** (optional): negate, edge detect, contrast and colorize ([`ToneFilter`])
//!
//! Constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Replayable**: the same phrase, options and fingerprint give the same pixels.
//! - **No IO while drawing**: fonts and background images load before the first draw.
//!
//! # Getting started
//!
//! ```no_run
//! use warpcaptcha::{CaptchaBuilder, CaptchaOpts};
//!
//! let mut builder = CaptchaBuilder::new(CaptchaOpts::default());
//! builder.build()?;
//! let jpeg = builder.get()?;
//! let fingerprint = builder.fingerprint().cloned();
//! # let _ = (jpeg, fingerprint);
//! # Ok::<(), warpcaptcha::CaptchaError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod builder;
mod distort;
mod effects;
mod encode;
mod foundation;
mod glyph;
mod ocr;
mod phrase;
mod raster;
mod sequence;

pub use builder::captcha::CaptchaBuilder;
pub use builder::opts::{CaptchaOpts, THREADS_ENV};
pub use builder::state::BuildState;
pub use distort::field::{DistortOpts, DistortionParams, distort, warp};
pub use distort::interpolate::bilinear_interpolate;
pub use effects::post::{ToneFilter, apply_filters, ensure_filter_backend, plan_filters};
pub use effects::scramble::{EffectKind, Pass, ScrambleEffect, pass_count, run_pass};
pub use encode::output::{DEFAULT_QUALITY, ImageType, encode, inline, save, write_to};
pub use foundation::core::{Affine, BezPath, Color, Point, Vec2};
pub use foundation::error::{CaptchaError, CaptchaResult};
pub use glyph::builtin::BuiltinStyle;
pub use glyph::font::{FontFace, FontLibrary, FontSource};
pub use glyph::writer::{TextStyle, write_phrase};
pub use ocr::engine::{OcrEngine, OcradEngine};
pub use ocr::selftest::OcrSelfTest;
pub use phrase::builder::{DEFAULT_CHARSET, PhraseBuilder};
pub use raster::canvas::Canvas;
pub use sequence::fingerprint::Fingerprint;
pub use sequence::sequencer::Sequencer;
