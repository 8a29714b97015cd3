/*!
 * Per-word hit totals.
 *
 * `FrequencyTable` owns the vocabulary and one running total per word. Totals
 * are addressed by the word's position in the vocabulary, so duplicate words
 * keep separate slots and the final order always follows the word list.
 */

/// Running totals for a fixed vocabulary
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyTable {
    /// Words in word-list order
    words: Vec<String>,
    /// Total hit count per word index
    totals: Vec<u64>,
}

impl FrequencyTable {
    /// Create a table with every total at zero
    pub fn new(words: Vec<String>) -> Self {
        let totals = vec![0; words.len()];
        Self { words, totals }
    }

    /// Words in vocabulary order
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of words in the vocabulary
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the vocabulary is empty
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Add `count` to the total of the word at `index`.
    ///
    /// Out-of-range indices are ignored; totals saturate instead of wrapping.
    pub fn accumulate(&mut self, index: usize, count: u64) {
        if let Some(total) = self.totals.get_mut(index) {
            *total = total.saturating_add(count);
        }
    }

    /// Current total of the word at `index`
    pub fn total(&self, index: usize) -> Option<u64> {
        self.totals.get(index).copied()
    }

    /// Pair every word with its total, in vocabulary order
    pub fn finalize(self) -> Vec<(String, u64)> {
        self.words.into_iter().zip(self.totals).collect()
    }
}
