use super::Record;

/// Sink for records emitted while running episodes.
///
/// Records passed to [`write`](Recorder::write) are kept as they are, while
/// those passed to [`store`](Recorder::store) are collected until
/// [`flush`](Recorder::flush) reduces them to summary statistics.
pub trait Recorder {
    /// Writes a record as it is.
    fn write(&mut self, record: Record);

    /// Keeps a record for aggregation.
    fn store(&mut self, record: Record);

    /// Aggregates the stored records and writes the result, tagged with `step`.
    fn flush(&mut self, step: i64);
}
