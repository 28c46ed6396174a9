/// Lifecycle of a [`CaptchaBuilder`](crate::CaptchaBuilder).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuildState {
    /// No phrase yet; one is generated on the first build.
    Uninitialized,
    /// Phrase chosen, nothing built.
    PhraseSet,
    /// A build is running.
    Building,
    /// Contents and fingerprint are available.
    Built,
    /// The last build failed; `set_phrase` resets the builder.
    Failed,
}

impl BuildState {
    /// Return `true` when a new build may start from this state.
    pub fn can_build(self) -> bool {
        !matches!(self, Self::Building | Self::Failed)
    }
}

impl std::fmt::Display for BuildState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Uninitialized => "uninitialized",
            Self::PhraseSet => "phrase-set",
            Self::Building => "building",
            Self::Built => "built",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}
