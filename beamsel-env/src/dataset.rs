//! Beam datasets.
//!
//! A dataset is a CSV file with one row per time slot. Each row holds the SINR
//! of every beam and the index of the optimal beam, counted from 1. Two column
//! layouts are recognized:
//!
//! * single user: `sinr_b1, ..., sinr_bN, label`
//! * multi user: `user{u}_stream{s}_sinr_b1, ..., user{u}_stream{s}_sinr_bN, user{u}_stream{s}_label`
//!
//! Any other column (e.g. `phi_main`, `aod_path1`) is ignored.
use crate::BeamEnvError;
use anyhow::Result;
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    fs::File,
    io::BufReader,
    path::Path,
};

/// A per-time-slot channel record.
#[derive(Clone, Debug, PartialEq)]
pub struct BeamRow {
    /// SINR of each beam, non-negative and finite.
    pub sinr: Vec<f32>,

    /// Optimal beam as stored in the dataset, in `[1, num_beams]`.
    pub label_raw: u32,
}

impl BeamRow {
    /// Creates a row from 0-based SINR values and a 1-based label.
    pub fn new(sinr: Vec<f32>, label_raw: u32) -> Self {
        Self { sinr, label_raw }
    }

    /// Index of the optimal beam, `None` if `label_raw` is 0.
    #[inline]
    pub fn checked_label(&self) -> Option<usize> {
        (self.label_raw as usize).checked_sub(1)
    }

    /// Index of the optimal beam, in `[0, num_beams)`.
    ///
    /// # Panics
    ///
    /// If `label_raw` is 0. Rows of a [`BeamDataset`] are validated and never
    /// panic; use [`checked_label`](Self::checked_label) on rows built by hand.
    #[inline]
    pub fn label(&self) -> usize {
        match self.checked_label() {
            Some(label) => label,
            None => panic!("label_raw is 1-based, got 0"),
        }
    }

    /// SINR of the optimal beam.
    #[inline]
    pub fn sinr_optimal(&self) -> f32 {
        self.sinr[self.label()]
    }
}

/// Column metadata of a loaded dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetMeta {
    /// Names of the SINR columns, ordered by beam.
    pub sinr_columns: Vec<String>,

    /// Name of the label column.
    pub label_column: String,

    /// Number of beams.
    pub num_beams: usize,

    /// Number of rows.
    pub num_rows: usize,
}

/// Label distribution and per-beam SINR statistics of a dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetSummary {
    /// Number of rows whose optimal beam is the index.
    pub label_counts: Vec<usize>,

    /// Minimum SINR of each beam.
    pub sinr_min: Vec<f32>,

    /// Maximum SINR of each beam.
    pub sinr_max: Vec<f32>,

    /// Mean SINR of each beam.
    pub sinr_mean: Vec<f32>,
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "beam  label_count  sinr_min  sinr_max  sinr_mean")?;
        for b in 0..self.label_counts.len() {
            writeln!(
                f,
                "{:>4}  {:>11}  {:>8.3}  {:>8.3}  {:>9.3}",
                b + 1,
                self.label_counts[b],
                self.sinr_min[b],
                self.sinr_max[b],
                self.sinr_mean[b]
            )?;
        }
        Ok(())
    }
}

/// An immutable, ordered collection of [`BeamRow`]s.
#[derive(Clone, Debug)]
pub struct BeamDataset {
    rows: Vec<BeamRow>,
    meta: DatasetMeta,
}

fn column_prefix(user_stream: Option<(u32, u32)>) -> String {
    match user_stream {
        Some((u, s)) => format!("user{}_stream{}_", u, s),
        None => String::new(),
    }
}

/// Parses `user{u}_stream{s}_sinr_b{k}` into `(u, s, k)`.
fn parse_multiuser_column(column: &str) -> Option<(u32, u32, u32)> {
    let rest = column.strip_prefix("user")?;
    let (u, rest) = rest.split_once("_stream")?;
    let (s, k) = rest.split_once("_sinr_b")?;
    Some((u.parse().ok()?, s.parse().ok()?, k.parse().ok()?))
}

fn open(path: &Path) -> Result<csv::Reader<BufReader<File>>> {
    let file = File::open(path).map_err(|source| BeamEnvError::DataSource {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file)))
}

fn headers(rdr: &mut csv::Reader<BufReader<File>>, path: &Path) -> Result<csv::StringRecord> {
    Ok(rdr
        .headers()
        .map_err(|e| BeamEnvError::DataFormat(format!("{:?}: cannot read header: {}", path, e)))?
        .clone())
}

/// Scans the header of a multi-user dataset.
///
/// Returns the sorted distinct `(user, stream)` pairs found in
/// `user{u}_stream{s}_sinr_b{k}` columns and the largest beam index `k`.
/// Both are empty/zero for a single-user dataset.
pub fn discover_user_streams(path: impl AsRef<Path>) -> Result<(Vec<(u32, u32)>, usize)> {
    let path = path.as_ref();
    let mut rdr = open(path)?;
    let headers = headers(&mut rdr, path)?;
    let mut pairs = BTreeSet::new();
    let mut num_beams = 0;

    for column in headers.iter() {
        if let Some((u, s, k)) = parse_multiuser_column(column) {
            pairs.insert((u, s));
            num_beams = num_beams.max(k as usize);
        }
    }

    Ok((pairs.into_iter().collect(), num_beams))
}

/// Resolves the SINR and label column positions in a header.
fn resolve_columns(
    headers: &csv::StringRecord,
    user_stream: Option<(u32, u32)>,
) -> Result<(Vec<(usize, String)>, (usize, String))> {
    let prefix = column_prefix(user_stream);
    let sinr_prefix = format!("{}sinr_b", prefix);
    let label_column = format!("{}label", prefix);

    let mut beams = BTreeMap::new();
    for (pos, column) in headers.iter().enumerate() {
        if let Some(k) = column
            .strip_prefix(sinr_prefix.as_str())
            .and_then(|k| k.parse::<usize>().ok())
        {
            if beams.insert(k, (pos, column.to_string())).is_some() {
                return Err(BeamEnvError::DataFormat(format!("duplicated column {}", column)).into());
            }
        }
    }

    if beams.is_empty() {
        return Err(BeamEnvError::DataFormat(format!(
            "no column starting with '{}' was found",
            sinr_prefix
        ))
        .into());
    }
    if beams.keys().copied().ne(1..=beams.len()) {
        return Err(BeamEnvError::DataFormat(format!(
            "beam columns '{}k' must be numbered 1..={} without gaps, found {:?}",
            sinr_prefix,
            beams.len(),
            beams.keys().collect::<Vec<_>>()
        ))
        .into());
    }

    let label_pos = headers
        .iter()
        .position(|c| c == label_column)
        .ok_or_else(|| {
            BeamEnvError::DataFormat(format!("label column '{}' was not found", label_column))
        })?;

    Ok((beams.into_values().collect(), (label_pos, label_column)))
}

fn parse_label(cell: &str, line: u64) -> Result<u32> {
    let v: f64 = cell.parse().map_err(|_| {
        BeamEnvError::DataFormat(format!("line {}: label '{}' is not a number", line, cell))
    })?;
    if v.fract() != 0.0 || v < 0.0 || v > u32::MAX as f64 {
        return Err(BeamEnvError::DataFormat(format!(
            "line {}: label '{}' is not a beam number",
            line, cell
        ))
        .into());
    }
    Ok(v as u32)
}

fn validate_row(row: &BeamRow, num_beams: usize, line: u64) -> Result<()> {
    if row.sinr.len() != num_beams {
        return Err(BeamEnvError::DataFormat(format!(
            "line {}: expected {} SINR values, found {}",
            line,
            num_beams,
            row.sinr.len()
        ))
        .into());
    }
    if let Some(v) = row.sinr.iter().find(|v| !v.is_finite() || **v < 0.0) {
        return Err(BeamEnvError::DataFormat(format!(
            "line {}: SINR must be finite and non-negative, found {}",
            line, v
        ))
        .into());
    }
    if !matches!(row.checked_label(), Some(l) if l < num_beams) {
        return Err(BeamEnvError::DataFormat(format!(
            "line {}: label {} is out of [1, {}]",
            line, row.label_raw, num_beams
        ))
        .into());
    }
    Ok(())
}

impl BeamDataset {
    /// Loads a dataset from a CSV file.
    ///
    /// `user_stream` selects the `user{u}_stream{s}_` columns of a multi-user
    /// dataset; `None` reads the flat single-user layout.
    pub fn load(path: impl AsRef<Path>, user_stream: Option<(u32, u32)>) -> Result<Self> {
        let path = path.as_ref();
        let mut rdr = open(path)?;
        let headers = headers(&mut rdr, path)?;
        let (sinr_columns, (label_pos, label_column)) = resolve_columns(&headers, user_stream)?;
        let num_beams = sinr_columns.len();

        let mut rows = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            // Line 1 is the header.
            let line = i as u64 + 2;
            let record = result
                .map_err(|e| BeamEnvError::DataFormat(format!("line {}: {}", line, e)))?;
            let cell = |pos: usize| record.get(pos).unwrap_or("");

            let sinr = sinr_columns
                .iter()
                .map(|(pos, name)| {
                    cell(*pos).parse::<f32>().map_err(|_| {
                        BeamEnvError::DataFormat(format!(
                            "line {}: {} = '{}' is not a number",
                            line,
                            name,
                            cell(*pos)
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let row = BeamRow::new(sinr, parse_label(cell(label_pos), line)?);
            validate_row(&row, num_beams, line)?;
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(BeamEnvError::DataFormat(format!("{:?} has no data rows", path)).into());
        }

        let meta = DatasetMeta {
            sinr_columns: sinr_columns.into_iter().map(|(_, name)| name).collect(),
            label_column,
            num_beams,
            num_rows: rows.len(),
        };
        log::info!(
            "Loaded {} rows from {:?}, {} columns, {} beams",
            meta.num_rows,
            path,
            headers.len(),
            num_beams
        );

        let dataset = Self { rows, meta };
        log::info!("Dataset summary:\n{}", dataset.summary());
        Ok(dataset)
    }

    /// Builds a dataset from rows in memory, with the flat single-user
    /// column names.
    pub fn from_rows(rows: Vec<BeamRow>, num_beams: usize) -> Result<Self> {
        if num_beams == 0 {
            return Err(BeamEnvError::DataFormat("no beam".to_string()).into());
        }
        if rows.is_empty() {
            return Err(BeamEnvError::DataFormat("no data rows".to_string()).into());
        }
        for (i, row) in rows.iter().enumerate() {
            validate_row(row, num_beams, i as u64 + 1)?;
        }

        let meta = DatasetMeta {
            sinr_columns: (1..=num_beams).map(|k| format!("sinr_b{}", k)).collect(),
            label_column: "label".to_string(),
            num_beams,
            num_rows: rows.len(),
        };
        Ok(Self { rows, meta })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always `false`; a dataset holds at least one row.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of beams.
    pub fn num_beams(&self) -> usize {
        self.meta.num_beams
    }

    /// Column metadata.
    pub fn meta(&self) -> &DatasetMeta {
        &self.meta
    }

    /// Row at `ix`.
    pub fn row(&self, ix: usize) -> &BeamRow {
        &self.rows[ix]
    }

    /// All rows in file order.
    pub fn rows(&self) -> &[BeamRow] {
        &self.rows
    }

    /// Computes the label distribution and per-beam SINR statistics.
    pub fn summary(&self) -> DatasetSummary {
        let n = self.num_beams();
        let mut summary = DatasetSummary {
            label_counts: vec![0; n],
            sinr_min: vec![f32::INFINITY; n],
            sinr_max: vec![f32::NEG_INFINITY; n],
            sinr_mean: vec![0.0; n],
        };
        let mut sums = vec![0f64; n];

        for row in self.rows.iter() {
            summary.label_counts[row.label()] += 1;
            for (b, &v) in row.sinr.iter().enumerate() {
                summary.sinr_min[b] = summary.sinr_min[b].min(v);
                summary.sinr_max[b] = summary.sinr_max[b].max(v);
                sums[b] += v as f64;
            }
        }
        for (mean, sum) in summary.sinr_mean.iter_mut().zip(sums) {
            *mean = (sum / self.rows.len() as f64) as f32;
        }

        summary
    }
}
