use serde::Serialize;

/// Ordered alternative outputs of one generation call.
///
/// Never empty: constructors only accept at least one variant. Order is the
/// upstream order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GenerationResult {
    variants: Vec<String>,
}

impl GenerationResult {
    /// One-element result, used when the reply could not be read as a list.
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            variants: vec![text.into()],
        }
    }

    /// `None` for an empty list.
    pub fn from_variants(variants: Vec<String>) -> Option<Self> {
        if variants.is_empty() {
            None
        } else {
            Some(Self { variants })
        }
    }

    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    pub fn first(&self) -> &str {
        &self.variants[0]
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn into_vec(self) -> Vec<String> {
        self.variants
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.variants.iter()
    }
}

impl IntoIterator for GenerationResult {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.variants.into_iter()
    }
}

impl<'a> IntoIterator for &'a GenerationResult {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.variants.iter()
    }
}

impl PartialEq<Vec<&str>> for GenerationResult {
    fn eq(&self, other: &Vec<&str>) -> bool {
        self.variants.len() == other.len()
            && self.variants.iter().zip(other).all(|(a, b)| a == b)
    }
}
