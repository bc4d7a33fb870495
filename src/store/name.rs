use std::fmt;

/// Fixed-width ASCII text cell (atom names, elements, residue types).
///
/// Stored inline so columns of names never allocate per entity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Name4([u8; 4]);

impl Name4 {
    /// Build from text, trimming whitespace and keeping at most four
    /// characters. Non-ASCII bytes are replaced with `?`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut bytes = [0u8; 4];
        for (slot, b) in bytes.iter_mut().zip(text.trim().bytes()) {
            *slot = if b.is_ascii() { b } else { b'?' };
        }
        Self(bytes)
    }

    /// The stored text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        let len = self.0.iter().position(|&b| b == 0).unwrap_or(4);
        std::str::from_utf8(&self.0[..len]).unwrap_or("")
    }

    /// Whether no text is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0[0] == 0
    }
}

impl fmt::Debug for Name4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl fmt::Display for Name4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<str> for Name4 {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Name4 {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}
