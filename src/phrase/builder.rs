use rand::Rng;

/// Default phrase alphabet.
pub const DEFAULT_CHARSET: &str = "abcdefghijklmnopqrstuvwxyz0123456789";

/// Random phrase generator and comparison rules.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PhraseBuilder {
    /// Characters per phrase.
    pub length: usize,
    /// Alphabet to draw from.
    pub charset: String,
    /// `(from, to)` replacements applied after lowercasing when comparing phrases.
    pub confusables: Vec<(char, char)>,
}

impl Default for PhraseBuilder {
    fn default() -> Self {
        Self {
            length: 5,
            charset: DEFAULT_CHARSET.to_string(),
            confusables: vec![('0', 'o'), ('1', 'l')],
        }
    }
}

impl PhraseBuilder {
    /// Generator with the default confusable table.
    pub fn new(length: usize, charset: impl Into<String>) -> Self {
        Self {
            length,
            charset: charset.into(),
            ..Self::default()
        }
    }

    /// Random phrase from the thread-local generator.
    ///
    /// Phrase choice is not part of the image fingerprint.
    pub fn build(&self) -> String {
        self.build_with(&mut rand::rng())
    }

    /// Random phrase from `rng`. Empty when the charset is empty.
    pub fn build_with<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let alphabet: Vec<char> = self.charset.chars().collect();
        if alphabet.is_empty() {
            return String::new();
        }
        (0..self.length)
            .map(|_| alphabet[rng.random_range(0..alphabet.len())])
            .collect()
    }

    /// Canonical form used for comparisons.
    pub fn niceize(&self, s: &str) -> String {
        s.to_lowercase()
            .chars()
            .map(|c| {
                self.confusables
                    .iter()
                    .find(|(from, _)| *from == c)
                    .map_or(c, |&(_, to)| to)
            })
            .collect()
    }

    /// Return `true` when both phrases share a canonical form.
    pub fn compare(&self, a: &str, b: &str) -> bool {
        self.niceize(a) == self.niceize(b)
    }
}
