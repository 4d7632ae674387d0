//! Stacking of the last few delivered vectors.

/// Keeps the last `n_stack` vectors, oldest first, as one flat buffer.
#[derive(Clone, Debug)]
pub struct HistoryStack {
    buffer: Vec<f32>,
    n_stack: usize,
    dim: usize,
}

impl HistoryStack {
    /// Creates an empty stack of `n_stack` slots.
    pub fn new(n_stack: usize) -> Self {
        Self {
            buffer: Vec::new(),
            n_stack,
            dim: 0,
        }
    }

    /// Fills every slot with `v`, invoked when resetting.
    pub fn fill_buffer(&mut self, v: &[f32]) {
        self.dim = v.len();
        self.buffer.clear();
        for _ in 0..self.n_stack {
            self.buffer.extend_from_slice(v);
        }
    }

    /// Drops the oldest slot and appends `v` as the most recent one.
    pub fn update_buffer(&mut self, v: &[f32]) {
        if self.buffer.is_empty() {
            self.fill_buffer(v);
            return;
        }
        debug_assert_eq!(v.len(), self.dim);

        // Shift slot(j) <- slot(j + 1) for j = 0, .., n_stack - 2
        self.buffer.copy_within(self.dim.., 0);
        let start = (self.n_stack - 1) * self.dim;
        self.buffer[start..].copy_from_slice(v);
    }

    /// Concatenation of the slots, oldest first.
    pub fn stacked(&self) -> &[f32] {
        &self.buffer
    }

    /// Number of slots.
    pub fn n_stack(&self) -> usize {
        self.n_stack
    }

    /// Number of filled slots.
    pub fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.buffer.len() / self.dim
        }
    }

    /// Returns `true` before the first fill.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
