use std::io::Write;
use std::path::Path;

use anyhow::Context;

use crate::builder::opts::CaptchaOpts;
use crate::builder::state::BuildState;
use crate::distort::field::distort;
use crate::effects::post;
use crate::effects::scramble::{Pass, run_pass};
use crate::encode::output;
use crate::foundation::core::Color;
use crate::foundation::error::{CaptchaError, CaptchaResult};
use crate::foundation::math::channel;
use crate::glyph::font::{FontFace, FontLibrary, FontSource};
use crate::glyph::writer::write_phrase;
use crate::phrase::builder::PhraseBuilder;
use crate::raster::canvas::Canvas;
use crate::sequence::fingerprint::Fingerprint;
use crate::sequence::sequencer::Sequencer;

/// Owns a phrase and builds captcha images for it.
///
/// Every random value of a build goes through one [`Sequencer`]; the recorded
/// [`Fingerprint`] replays the identical image later via
/// [`build_from_fingerprint`](Self::build_from_fingerprint).
#[derive(Debug)]
pub struct CaptchaBuilder {
    opts: CaptchaOpts,
    phrase_builder: PhraseBuilder,
    phrase: Option<String>,
    font: Option<FontSource>,
    state: BuildState,
    contents: Option<Canvas>,
    fingerprint: Option<Fingerprint>,
    background: Option<Color>,
    last_error: Option<String>,
}

struct Rendered {
    canvas: Canvas,
    fingerprint: Fingerprint,
    background: Color,
}

/// Resources loaded before the first draw.
struct Resources {
    fonts: FontChoice,
    backgrounds: Vec<Canvas>,
}

enum FontChoice {
    Fixed(FontFace),
    Library(FontLibrary),
}

impl CaptchaBuilder {
    /// Builder without a phrase; one is generated on the first build.
    pub fn new(opts: CaptchaOpts) -> Self {
        Self {
            opts,
            phrase_builder: PhraseBuilder::default(),
            phrase: None,
            font: None,
            state: BuildState::Uninitialized,
            contents: None,
            fingerprint: None,
            background: None,
            last_error: None,
        }
    }

    /// Builder with default options.
    pub fn create() -> Self {
        Self::new(CaptchaOpts::default())
    }

    /// Builder for a fixed phrase.
    pub fn with_phrase(opts: CaptchaOpts, phrase: impl Into<String>) -> Self {
        let mut builder = Self::new(opts);
        builder.set_phrase(phrase);
        builder
    }

    /// Replace the phrase, dropping any previous result or failure.
    pub fn set_phrase(&mut self, phrase: impl Into<String>) {
        self.phrase = Some(phrase.into());
        self.contents = None;
        self.fingerprint = None;
        self.background = None;
        self.last_error = None;
        self.state = BuildState::PhraseSet;
    }

    /// Use `source` for every build instead of drawing a face from the library.
    pub fn set_font(&mut self, source: impl Into<FontSource>) {
        self.font = Some(source.into());
    }

    /// Replace the phrase generator and comparison rules.
    pub fn set_phrase_builder(&mut self, phrase_builder: PhraseBuilder) {
        self.phrase_builder = phrase_builder;
    }

    /// Build with a fresh OS-seeded recording sequencer.
    pub fn build(&mut self) -> CaptchaResult<&Canvas> {
        self.run(Sequencer::recording())
    }

    /// Build with a recording sequencer seeded from `seed`.
    pub fn build_seeded(&mut self, seed: u64) -> CaptchaResult<&Canvas> {
        self.run(Sequencer::seeded(seed))
    }

    /// Rebuild the image recorded as `fingerprint`.
    pub fn build_from_fingerprint(&mut self, fingerprint: Fingerprint) -> CaptchaResult<&Canvas> {
        self.run(Sequencer::replaying(fingerprint))
    }

    #[tracing::instrument(
        name = "build",
        skip_all,
        fields(w = self.opts.width, h = self.opts.height, replay = seq.is_replaying())
    )]
    fn run(&mut self, seq: Sequencer) -> CaptchaResult<&Canvas> {
        if !self.state.can_build() {
            return Err(CaptchaError::validation(format!(
                "cannot build from state '{}'; set a phrase to reset",
                self.state
            )));
        }
        let phrase = match &self.phrase {
            Some(p) => p.clone(),
            None => {
                let p = self.phrase_builder.build();
                self.phrase = Some(p.clone());
                p
            }
        };

        self.state = BuildState::Building;
        self.contents = None;
        self.fingerprint = None;
        self.background = None;

        match self.render(&phrase, seq) {
            Ok(rendered) => {
                tracing::debug!(draws = rendered.fingerprint.len(), "captcha built");
                self.state = BuildState::Built;
                self.last_error = None;
                self.fingerprint = Some(rendered.fingerprint);
                self.background = Some(rendered.background);
                Ok(self.contents.insert(rendered.canvas))
            }
            Err(err) => {
                tracing::warn!(error = %err, "captcha build failed");
                self.state = BuildState::Failed;
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    fn load_resources(&self) -> CaptchaResult<Resources> {
        let fonts = match &self.font {
            Some(source) => FontChoice::Fixed(FontFace::load(source)?),
            None => FontChoice::Library(FontLibrary::from_paths(&self.opts.font_paths)?),
        };
        let backgrounds = self
            .opts
            .background_images
            .iter()
            .map(|p| load_background(p))
            .collect::<CaptchaResult<Vec<_>>>()?;
        Ok(Resources { fonts, backgrounds })
    }

    fn render(&self, phrase: &str, mut seq: Sequencer) -> CaptchaResult<Rendered> {
        self.opts.validate()?;
        if phrase.is_empty() {
            return Err(CaptchaError::EmptyPhrase);
        }
        let res = self.load_resources()?;
        let opts = &self.opts;

        let face = match res.fonts {
            FontChoice::Fixed(face) => face,
            FontChoice::Library(library) => {
                let i = seq.next(0, library.len() as i64 - 1)?;
                library
                    .select(i)
                    .cloned()
                    .ok_or_else(|| CaptchaError::font_load("font library is empty"))?
            }
        };

        let (mut canvas, background) = if res.backgrounds.is_empty() {
            let color = match opts.background_color {
                Some(c) => c,
                None => Color::rgb(
                    channel(seq.next(180, 255)?),
                    channel(seq.next(180, 255)?),
                    channel(seq.next(180, 255)?),
                ),
            };
            let color = match opts.background_alpha {
                Some(a) => color.with_alpha(a),
                None => color,
            };
            (Canvas::filled(opts.width, opts.height, color)?, color)
        } else {
            let last = res.backgrounds.len() as i64 - 1;
            let i = seq.next(0, last)?.clamp(0, last) as usize;
            let mut backgrounds = res.backgrounds;
            let image = backgrounds.swap_remove(i);
            (image, opts.background_color.unwrap_or(Color::WHITE))
        };

        if !opts.ignore_all_effects {
            run_pass(
                &mut canvas,
                &mut seq,
                Pass::Behind,
                opts.max_behind_lines,
                None,
            )?;
        }

        let text_color = write_phrase(&mut canvas, phrase, &face, &mut seq, &opts.text_style())?;

        if !opts.ignore_all_effects {
            run_pass(
                &mut canvas,
                &mut seq,
                Pass::Front,
                opts.max_front_lines,
                Some(text_color),
            )?;
        }

        if opts.distortion && !opts.ignore_all_effects {
            canvas = distort(&canvas, &mut seq, background, &opts.distort_opts())?;
        }

        if opts.post_filters_enabled() {
            match post::ensure_filter_backend() {
                Ok(()) => {
                    let filters = post::plan_filters(&mut seq)?;
                    post::apply_filters(&mut canvas, &filters)?;
                }
                Err(err) if err.is_recoverable() => {
                    tracing::warn!(error = %err, "skipping post filters");
                }
                Err(err) => return Err(err),
            }
        }

        Ok(Rendered {
            canvas,
            fingerprint: seq.into_fingerprint(),
            background,
        })
    }

    /// Options this builder was created with.
    pub fn opts(&self) -> &CaptchaOpts {
        &self.opts
    }

    /// Current phrase, if one was set or generated.
    pub fn phrase(&self) -> Option<&str> {
        self.phrase.as_deref()
    }

    /// Finished image of the last successful build.
    pub fn contents(&self) -> Option<&Canvas> {
        self.contents.as_ref()
    }

    /// Draw log of the last successful build.
    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        self.fingerprint.as_ref()
    }

    /// Background color used by the last successful build.
    pub fn background(&self) -> Option<Color> {
        self.background
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Message of the error that moved the builder to [`BuildState::Failed`].
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Compare a guess against the phrase using the niceize rules.
    pub fn test_phrase(&self, guess: &str) -> bool {
        self.phrase
            .as_deref()
            .is_some_and(|p| self.phrase_builder.compare(p, guess))
    }

    fn built(&self) -> CaptchaResult<&Canvas> {
        self.contents
            .as_ref()
            .ok_or_else(|| CaptchaError::validation("no built image; call build() first"))
    }

    /// Encode the last image in the configured format.
    pub fn encode(&self, quality: u8) -> CaptchaResult<Vec<u8>> {
        output::encode(self.built()?, self.opts.image_type, quality)
    }

    /// Encode the last image into `out`.
    pub fn write_to<W: Write>(&self, out: &mut W, quality: u8) -> CaptchaResult<()> {
        output::write_to(self.built()?, out, self.opts.image_type, quality)
    }

    /// Encode the last image to `path`.
    pub fn save(&self, path: impl AsRef<Path>, quality: u8) -> CaptchaResult<()> {
        output::save(self.built()?, path.as_ref(), self.opts.image_type, quality)
    }

    /// The last image as a base64 `data:` URI.
    pub fn inline(&self, quality: u8) -> CaptchaResult<String> {
        output::inline(self.built()?, self.opts.image_type, quality)
    }

    /// Encode the last image with the configured quality.
    pub fn get(&self) -> CaptchaResult<Vec<u8>> {
        self.encode(self.opts.quality)
    }
}

fn load_background(path: &Path) -> CaptchaResult<Canvas> {
    let img = image::open(path)
        .with_context(|| format!("open background image {}", path.display()))?
        .to_rgba8();
    Canvas::from_rgba_image(&img)
}

#[cfg(test)]
#[path = "../../tests/unit/builder/captcha.rs"]
mod tests;
