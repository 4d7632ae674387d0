//! Row visitation order of an episode.
use rand::{seq::SliceRandom, Rng};

/// Decides the order in which dataset rows are visited and tracks the step
/// pointer of the current episode.
#[derive(Clone, Debug, Default)]
pub struct EpisodeIndexer {
    idx_list: Vec<usize>,
    pointer: usize,
}

impl EpisodeIndexer {
    /// Creates an indexer over `num_rows` rows, visiting them in file order
    /// until the first [`EpisodeIndexer::reset`].
    pub fn new(num_rows: usize) -> Self {
        Self {
            idx_list: (0..num_rows).collect(),
            pointer: 0,
        }
    }

    /// Starts a new episode.
    ///
    /// The visitation order becomes a fresh permutation of the rows drawn from
    /// `rng` if `shuffle`, the identity otherwise. `rng` is not touched when
    /// `shuffle` is `false`.
    pub fn reset<R: Rng + ?Sized>(&mut self, shuffle: bool, rng: &mut R) {
        for (i, ix) in self.idx_list.iter_mut().enumerate() {
            *ix = i;
        }
        if shuffle {
            self.idx_list.shuffle(rng);
        }
        self.pointer = 0;
    }

    /// Moves the pointer to the next step.
    #[inline]
    pub fn advance(&mut self) {
        self.pointer += 1;
    }

    /// Current step of the episode.
    #[inline]
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Dataset index of the row `offset` steps after the pointer.
    ///
    /// Positions past the end of the visitation order are clamped to the last
    /// row, i.e. the last row is held.
    #[inline]
    pub fn row_at(&self, offset: usize) -> usize {
        let last = self.idx_list.len() - 1;
        self.idx_list[(self.pointer + offset).min(last)]
    }

    /// Visitation order of the current episode.
    pub fn order(&self) -> &[usize] {
        &self.idx_list
    }
}
