//! Sample-and-hold reporting delay.
use std::collections::VecDeque;

/// A FIFO of the last `delay_steps + 1` measurements.
///
/// The oldest entry is the measurement available to the policy now, i.e. the
/// one taken `delay_steps` steps ago. At the start of an episode the queue is
/// backfilled with the first measurement, which is held until enough steps
/// have passed.
///
/// Pushing the measurement of `pointer + delay_steps` instead would hand out
/// the current row once the queue is warm, so only past rows are queued.
#[derive(Clone, Debug)]
pub struct DelayLine {
    delay_steps: usize,
    buf: VecDeque<Vec<f32>>,
}

impl DelayLine {
    /// Creates a delay line of `delay_steps` steps.
    pub fn new(delay_steps: usize) -> Self {
        Self {
            delay_steps,
            buf: VecDeque::with_capacity(delay_steps + 1),
        }
    }

    /// Fills the queue with `v`, invoked when resetting.
    pub fn fill(&mut self, v: &[f32]) {
        self.buf.clear();
        for _ in 0..=self.delay_steps {
            self.buf.push_back(v.to_vec());
        }
    }

    /// Pushes the newest measurement and returns the delivered one.
    pub fn push(&mut self, v: Vec<f32>) -> &[f32] {
        if self.buf.is_empty() {
            self.fill(&v);
        } else {
            self.buf.pop_front();
            self.buf.push_back(v);
        }
        self.delivered()
    }

    /// The measurement currently available to the policy.
    pub fn delivered(&self) -> &[f32] {
        self.buf.front().map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Number of queued measurements.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` before the first fill.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_delay_is_transparent() {
        let mut delay = DelayLine::new(0);
        delay.fill(&[1.0]);
        assert_eq!(delay.delivered(), &[1.0]);
        assert_eq!(delay.push(vec![2.0]), &[2.0]);
        assert_eq!(delay.push(vec![3.0]), &[3.0]);
        assert_eq!(delay.len(), 1);
    }

    #[test]
    fn test_holds_first_then_lags() {
        let mut delay = DelayLine::new(2);
        delay.fill(&[0.0]);
        assert_eq!(delay.len(), 3);

        let delivered: Vec<f32> = (1..6)
            .map(|t| delay.push(vec![t as f32])[0])
            .collect();
        assert_eq!(delivered, vec![0.0, 0.0, 1.0, 2.0, 3.0]);
        assert_eq!(delay.len(), 3);
    }
}
