use crate::foundation::error::{CaptchaError, CaptchaResult};

/// Ordered log of every random draw made during one build.
///
/// Storing the fingerprint next to a session lets a later request re-derive the identical image
/// without storing the image itself. It serializes as a plain JSON array of integers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(Vec<i64>);

impl Fingerprint {
    /// Wrap an existing list of draws.
    pub fn new(values: Vec<i64>) -> Self {
        Self(values)
    }

    /// Borrow the recorded draws in order.
    pub fn values(&self) -> &[i64] {
        &self.0
    }

    /// Number of recorded draws.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return `true` when no draws were recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the fingerprint, returning the raw draws.
    pub fn into_values(self) -> Vec<i64> {
        self.0
    }

    /// Serialize to a compact JSON array.
    pub fn to_json(&self) -> CaptchaResult<String> {
        serde_json::to_string(&self.0)
            .map_err(|e| CaptchaError::validation(format!("fingerprint to json: {e}")))
    }

    /// Parse a JSON array of integers.
    pub fn from_json(s: &str) -> CaptchaResult<Self> {
        serde_json::from_str(s)
            .map(Self)
            .map_err(|e| CaptchaError::validation(format!("fingerprint from json: {e}")))
    }
}

impl From<Vec<i64>> for Fingerprint {
    fn from(values: Vec<i64>) -> Self {
        Self(values)
    }
}

impl AsRef<[i64]> for Fingerprint {
    fn as_ref(&self) -> &[i64] {
        &self.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/fingerprint.rs"]
mod tests;
