//! Sorted word list with binary-search lookups

use shared::ResourceError;
use std::cmp::Ordering;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: Vec<String>,
}

impl Dictionary {
    /// Builds the index from words already in ascending order.
    ///
    /// Words are lowercased. Repeated words are dropped; a word smaller than
    /// its predecessor is an error, since lookups rely on the ordering.
    pub fn from_sorted<I, T>(words: I) -> Result<Self, ResourceError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut sorted: Vec<String> = Vec::new();

        for (index, word) in words.into_iter().enumerate() {
            let word = word.as_ref().trim().to_lowercase();
            if word.is_empty() {
                continue;
            }

            match sorted.last().map(|last| last.as_str().cmp(word.as_str())) {
                Some(Ordering::Greater) => {
                    return Err(ResourceError::Unsorted {
                        line: index + 1,
                        word,
                    })
                }
                Some(Ordering::Equal) => continue,
                _ => sorted.push(word),
            }
        }

        Ok(Self { words: sorted })
    }

    /// One word per line
    pub fn parse(text: &str) -> Result<Self, ResourceError> {
        Self::from_sorted(text.lines())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ResourceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ResourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Case-insensitive membership test
    pub fn contains(&self, word: &str) -> bool {
        let word = word.to_lowercase();
        self.words
            .binary_search_by(|probe| probe.as_str().cmp(word.as_str()))
            .is_ok()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
