use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::foundation::error::{CaptchaError, CaptchaResult};
use crate::sequence::fingerprint::Fingerprint;

/// Single gateway for every random value used by the pipeline.
///
/// In recording mode each draw is generated fresh and appended to the log. In replay mode draws
/// are read back from a previous log through an explicit cursor; ranges are not re-checked, so a
/// fingerprint only reproduces an image when replayed against the same call-site sequence.
#[derive(Debug)]
pub struct Sequencer {
    mode: Mode,
    values: Vec<i64>,
    cursor: usize,
}

#[derive(Debug)]
enum Mode {
    Recording(StdRng),
    Replaying,
}

impl Sequencer {
    /// Recording sequencer seeded from the operating system.
    pub fn recording() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Recording sequencer with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            mode: Mode::Recording(rng),
            values: Vec::new(),
            cursor: 0,
        }
    }

    /// Replay sequencer reading back `fingerprint` in order.
    pub fn replaying(fingerprint: Fingerprint) -> Self {
        Self {
            mode: Mode::Replaying,
            values: fingerprint.into_values(),
            cursor: 0,
        }
    }

    /// Next integer in `[min, max]`, both bounds inclusive.
    ///
    /// Reversed bounds are swapped while recording.
    pub fn next(&mut self, min: i64, max: i64) -> CaptchaResult<i64> {
        match &mut self.mode {
            Mode::Recording(rng) => {
                let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
                let v = rng.random_range(lo..=hi);
                self.values.push(v);
                self.cursor = self.values.len();
                Ok(v)
            }
            Mode::Replaying => {
                let v = self
                    .values
                    .get(self.cursor)
                    .copied()
                    .ok_or(CaptchaError::FingerprintExhausted {
                        consumed: self.cursor,
                    })?;
                self.cursor += 1;
                Ok(v)
            }
        }
    }

    /// Like [`next`](Self::next), but a replayed value outside `[min, max]` is clamped into it.
    ///
    /// Draws that size loops, buffers or geometry go through here.
    pub fn next_within(&mut self, min: i64, max: i64) -> CaptchaResult<i64> {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        Ok(self.next(lo, hi)?.clamp(lo, hi))
    }

    /// `true` when `next(0, 1)` draws `0`.
    pub fn coin(&mut self) -> CaptchaResult<bool> {
        Ok(self.next(0, 1)? == 0)
    }

    /// Number of values drawn so far (recorded or consumed).
    pub fn draws(&self) -> usize {
        self.cursor
    }

    /// Values left to replay; always `0` while recording.
    pub fn remaining(&self) -> usize {
        match self.mode {
            Mode::Recording(_) => 0,
            Mode::Replaying => self.values.len().saturating_sub(self.cursor),
        }
    }

    /// Return `true` in replay mode.
    pub fn is_replaying(&self) -> bool {
        matches!(self.mode, Mode::Replaying)
    }

    /// The draw log: everything recorded, or the replayed values consumed so far.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::new(self.values[..self.cursor].to_vec())
    }

    /// Consume the sequencer, returning its draw log.
    ///
    /// Replayed values past the cursor were never drawn and are dropped.
    pub fn into_fingerprint(mut self) -> Fingerprint {
        self.values.truncate(self.cursor);
        Fingerprint::new(self.values)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/sequencer.rs"]
mod tests;
