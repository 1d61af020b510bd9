//! Catalogs: validated, immutable lists of sky positions.
//!
//! A [`Catalog`] owns `N` right-ascension/declination pairs (degrees) and
//! identifies them by the dense index `0..N`. Any other caller data travels
//! alongside as opaque [`SideData`] and never takes part in matching.
//!
//! Input shapes are adapted through [`CatalogSource`]:
//! - coordinate lists such as `&[[f64; 2]]`, `Vec<(f64, f64)>` or `&[Vec<f64>]`
//!   (each row must hold exactly two values);
//! - a [`Table`] of named columns, where exactly one column must be named
//!   `ra`/`Ra`/`RA` and exactly one `dec`/`Dec`/`DEC`.
//!
//! Tables may be loaded from CSV with [`Table::from_csv_path`].

use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use crate::errors::{CoordinateKind, MatchError, Result};

/// Accepted spellings of the right-ascension column.
pub const RA_COLUMN_NAMES: [&str; 3] = ["ra", "Ra", "RA"];
/// Accepted spellings of the declination column.
pub const DEC_COLUMN_NAMES: [&str; 3] = ["dec", "Dec", "DEC"];
/// Column name reserved for index tracking.
pub const RESERVED_COLUMN: &str = "index";

// ── Tables ──────────────────────────────────────────────────────────────────

/// One named column of a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Float(Vec<f64>),
    Int(Vec<i64>),
    Text(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Float(v) => v.len(),
            Column::Int(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Column::Text(_))
    }

    /// Values as `f64`, or `None` for text columns.
    pub fn to_f64(&self) -> Option<Vec<f64>> {
        match self {
            Column::Float(v) => Some(v.clone()),
            Column::Int(v) => Some(v.iter().map(|&x| x as f64).collect()),
            Column::Text(_) => None,
        }
    }
}

/// Column-oriented table with ordered, named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<(String, Column)>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`push_column`](Self::push_column).
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Self {
        self.push_column(name, column);
        self
    }

    /// Append a column. Column lengths are checked when the table is resolved
    /// into a catalog.
    pub fn push_column(&mut self, name: impl Into<String>, column: Column) {
        self.columns.push((name.into(), column));
    }

    pub fn columns(&self) -> &[(String, Column)] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows (length of the first column).
    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|(_, c)| c.len()).unwrap_or(0)
    }

    /// Read a table from CSV with a header row.
    ///
    /// A column whose cells all parse as integers becomes [`Column::Int`];
    /// one whose non-empty cells all parse as floats becomes
    /// [`Column::Float`] (empty cells read as NaN); anything else is text.
    pub fn from_csv_reader<R: Read>(reader: R) -> anyhow::Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for result in rdr.records() {
            let record = result?;
            for (i, column) in cells.iter_mut().enumerate() {
                column.push(record.get(i).unwrap_or("").trim().to_string());
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, raw)| (name, infer_column(raw)))
            .collect();
        Ok(Self { columns })
    }

    /// Read a table from a CSV file with a header row.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let table = Self::from_csv_reader(file)?;
        info!(
            "Read {} rows x {} columns from {}",
            table.num_rows(),
            table.num_columns(),
            path.as_ref().display()
        );
        Ok(table)
    }
}

fn infer_column(raw: Vec<String>) -> Column {
    if let Ok(ints) = raw.iter().map(|s| s.parse::<i64>()).collect::<std::result::Result<Vec<_>, _>>() {
        return Column::Int(ints);
    }
    let floats: Option<Vec<f64>> = raw
        .iter()
        .map(|s| {
            if s.is_empty() {
                Some(f64::NAN)
            } else {
                s.parse::<f64>().ok()
            }
        })
        .collect();
    match floats {
        Some(v) => Column::Float(v),
        None => Column::Text(raw),
    }
}

// ── Source adapters ─────────────────────────────────────────────────────────

/// Caller columns that are not coordinates, carried through untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SideData {
    columns: Vec<(String, Column)>,
}

impl SideData {
    pub fn columns(&self) -> &[(String, Column)] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Output of [`CatalogSource::resolve`]: plain coordinate arrays plus
/// whatever the source carried besides them.
#[derive(Debug, Clone, Default)]
pub struct ResolvedCoordinates {
    pub ra: Vec<f64>,
    pub dec: Vec<f64>,
    pub side_data: SideData,
    pub ra_column: Option<String>,
    pub dec_column: Option<String>,
}

impl ResolvedCoordinates {
    fn from_pairs<I: IntoIterator<Item = (f64, f64)>>(pairs: I) -> Self {
        let (ra, dec) = pairs.into_iter().unzip();
        Self {
            ra,
            dec,
            ..Default::default()
        }
    }
}

/// Anything that can be turned into catalog coordinates.
pub trait CatalogSource {
    fn resolve(self) -> Result<ResolvedCoordinates>;
}

impl CatalogSource for &[[f64; 2]] {
    fn resolve(self) -> Result<ResolvedCoordinates> {
        Ok(ResolvedCoordinates::from_pairs(self.iter().map(|p| (p[0], p[1]))))
    }
}

impl<const N: usize> CatalogSource for &[[f64; 2]; N] {
    fn resolve(self) -> Result<ResolvedCoordinates> {
        self.as_slice().resolve()
    }
}

impl CatalogSource for &Vec<[f64; 2]> {
    fn resolve(self) -> Result<ResolvedCoordinates> {
        self.as_slice().resolve()
    }
}

impl CatalogSource for Vec<[f64; 2]> {
    fn resolve(self) -> Result<ResolvedCoordinates> {
        self.as_slice().resolve()
    }
}

impl CatalogSource for &[(f64, f64)] {
    fn resolve(self) -> Result<ResolvedCoordinates> {
        Ok(ResolvedCoordinates::from_pairs(self.iter().copied()))
    }
}

impl CatalogSource for &Vec<(f64, f64)> {
    fn resolve(self) -> Result<ResolvedCoordinates> {
        self.as_slice().resolve()
    }
}

impl CatalogSource for Vec<(f64, f64)> {
    fn resolve(self) -> Result<ResolvedCoordinates> {
        self.as_slice().resolve()
    }
}

impl CatalogSource for &[Vec<f64>] {
    fn resolve(self) -> Result<ResolvedCoordinates> {
        if let Some((row, bad)) = self.iter().enumerate().find(|(_, r)| r.len() != 2) {
            return Err(MatchError::shape(format!(
                "row {row} has {} values, expected 2 (ra, dec)",
                bad.len()
            )));
        }
        Ok(ResolvedCoordinates::from_pairs(self.iter().map(|r| (r[0], r[1]))))
    }
}

impl CatalogSource for &Table {
    fn resolve(self) -> Result<ResolvedCoordinates> {
        let n_rows = self.num_rows();
        if let Some((name, col)) = self.columns.iter().find(|(_, c)| c.len() != n_rows) {
            return Err(MatchError::shape(format!(
                "column '{name}' has {} rows, expected {n_rows}",
                col.len()
            )));
        }
        if let Some((name, _)) = self.columns.iter().find(|(n, _)| n == RESERVED_COLUMN) {
            return Err(MatchError::ReservedColumn { name: name.clone() });
        }

        let ra_pos = find_coordinate_column(&self.columns, &RA_COLUMN_NAMES, CoordinateKind::Ra)?;
        let dec_pos = find_coordinate_column(&self.columns, &DEC_COLUMN_NAMES, CoordinateKind::Dec)?;

        let numeric = |pos: usize| {
            let (name, col) = &self.columns[pos];
            col.to_f64()
                .ok_or_else(|| MatchError::NonNumericColumn { name: name.clone() })
        };
        let ra = numeric(ra_pos)?;
        let dec = numeric(dec_pos)?;

        let side_data = SideData {
            columns: self
                .columns
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != ra_pos && *i != dec_pos)
                .map(|(_, c)| c.clone())
                .collect(),
        };

        Ok(ResolvedCoordinates {
            ra,
            dec,
            side_data,
            ra_column: Some(self.columns[ra_pos].0.clone()),
            dec_column: Some(self.columns[dec_pos].0.clone()),
        })
    }
}

impl CatalogSource for Table {
    fn resolve(self) -> Result<ResolvedCoordinates> {
        (&self).resolve()
    }
}

impl CatalogSource for ResolvedCoordinates {
    fn resolve(self) -> Result<ResolvedCoordinates> {
        Ok(self)
    }
}

fn find_coordinate_column(
    columns: &[(String, Column)],
    names: &[&str],
    kind: CoordinateKind,
) -> Result<usize> {
    let hits: Vec<usize> = columns
        .iter()
        .enumerate()
        .filter(|(_, (n, _))| names.contains(&n.as_str()))
        .map(|(i, _)| i)
        .collect();
    match hits.as_slice() {
        [pos] => Ok(*pos),
        _ => Err(MatchError::ColumnResolution {
            kind,
            found: hits.iter().map(|&i| columns[i].0.clone()).collect(),
        }),
    }
}

// ── Catalog ─────────────────────────────────────────────────────────────────

/// Validated sky positions with stable indices `0..len()`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    ra: Vec<f64>,
    dec: Vec<f64>,
    side_data: SideData,
    ra_column: Option<String>,
    dec_column: Option<String>,
}

impl Catalog {
    /// Build a catalog from any [`CatalogSource`].
    ///
    /// NaN or infinite coordinates are rejected. Coordinates outside
    /// `[0, 360)` / `[-90, 90]` only produce a warning.
    pub fn new<S: CatalogSource>(source: S) -> Result<Self> {
        let resolved = source.resolve()?;
        if resolved.ra.len() != resolved.dec.len() {
            return Err(MatchError::shape(format!(
                "{} ra values but {} dec values",
                resolved.ra.len(),
                resolved.dec.len()
            )));
        }

        if let Some(index) = resolved
            .ra
            .iter()
            .zip(&resolved.dec)
            .position(|(ra, dec)| !ra.is_finite() || !dec.is_finite())
        {
            return Err(MatchError::NonFinite {
                index,
                ra: resolved.ra[index],
                dec: resolved.dec[index],
            });
        }

        let ra_out = resolved.ra.iter().filter(|&&ra| !(0.0..360.0).contains(&ra)).count();
        if ra_out > 0 {
            warn!("{} ra values are outside [0, 360)", ra_out);
        }
        let dec_out = resolved.dec.iter().filter(|&&dec| !(-90.0..=90.0).contains(&dec)).count();
        if dec_out > 0 {
            warn!("{} dec values are outside [-90, 90]", dec_out);
        }

        Ok(Self {
            ra: resolved.ra,
            dec: resolved.dec,
            side_data: resolved.side_data,
            ra_column: resolved.ra_column,
            dec_column: resolved.dec_column,
        })
    }

    /// Build a catalog from separate coordinate arrays.
    pub fn from_columns(ra: Vec<f64>, dec: Vec<f64>) -> Result<Self> {
        Self::new(ResolvedCoordinates {
            ra,
            dec,
            ..Default::default()
        })
    }

    pub fn len(&self) -> usize {
        self.ra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ra.is_empty()
    }

    pub fn ra(&self) -> &[f64] {
        &self.ra
    }

    pub fn dec(&self) -> &[f64] {
        &self.dec
    }

    /// Position of row `i` as `(ra, dec)`.
    pub fn point(&self, i: usize) -> (f64, f64) {
        (self.ra[i], self.dec[i])
    }

    /// All positions as `(ra, dec)` pairs.
    pub fn coordinates(&self) -> Vec<(f64, f64)> {
        self.ra.iter().copied().zip(self.dec.iter().copied()).collect()
    }

    /// The index range identifying the rows.
    pub fn indexes(&self) -> std::ops::Range<usize> {
        0..self.len()
    }

    pub fn side_data(&self) -> &SideData {
        &self.side_data
    }

    /// Name of the source column used for right ascension, if tabular.
    pub fn ra_column(&self) -> Option<&str> {
        self.ra_column.as_deref()
    }

    /// Name of the source column used for declination, if tabular.
    pub fn dec_column(&self) -> Option<&str> {
        self.dec_column.as_deref()
    }
}

impl CatalogSource for Catalog {
    fn resolve(self) -> Result<ResolvedCoordinates> {
        Ok(ResolvedCoordinates {
            ra: self.ra,
            dec: self.dec,
            side_data: self.side_data,
            ra_column: self.ra_column,
            dec_column: self.dec_column,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(ra_name: &str, dec_name: &str) -> Table {
        Table::new()
            .with_column(ra_name, Column::Float(vec![1.0, 2.0, 8.0]))
            .with_column(dec_name, Column::Float(vec![3.0, 4.0, 6.0]))
    }

    #[test]
    fn from_pairs() {
        let cat = Catalog::new(&[[1.0, 3.0], [2.0, 4.0]]).unwrap();
        assert_eq!(cat.len(), 2);
        assert_eq!(cat.point(1), (2.0, 4.0));
        assert_eq!(cat.indexes(), 0..2);
        assert!(cat.side_data().is_empty());
        assert_eq!(cat.ra_column(), None);
    }

    #[test]
    fn from_tuples_and_rows() {
        let cat = Catalog::new(vec![(10.0, -5.0), (20.0, 5.0)]).unwrap();
        assert_eq!(cat.coordinates(), vec![(10.0, -5.0), (20.0, 5.0)]);

        let rows = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let cat = Catalog::new(rows.as_slice()).unwrap();
        assert_eq!(cat.dec(), &[2.0, 4.0]);
    }

    #[test]
    fn rows_must_have_two_values() {
        let rows = vec![vec![1.0, 2.0], vec![3.0, 4.0, 5.0]];
        let err = Catalog::new(rows.as_slice()).unwrap_err();
        assert!(matches!(err, MatchError::Shape { .. }));

        let rows = vec![vec![1.0]];
        assert!(matches!(Catalog::new(rows.as_slice()), Err(MatchError::Shape { .. })));
    }

    #[test]
    fn table_column_spellings() {
        for (r, d) in [("ra", "dec"), ("Ra", "Dec"), ("RA", "DEC"), ("RA", "Dec")] {
            let cat = Catalog::new(table(r, d)).unwrap();
            assert_eq!(cat.ra(), &[1.0, 2.0, 8.0]);
            assert_eq!(cat.ra_column(), Some(r));
            assert_eq!(cat.dec_column(), Some(d));
        }
    }

    #[test]
    fn table_missing_or_ambiguous_columns() {
        let t = Table::new().with_column("ra", Column::Float(vec![1.0]));
        assert!(matches!(
            Catalog::new(&t),
            Err(MatchError::ColumnResolution { kind: CoordinateKind::Dec, .. })
        ));

        let t = table("RA", "DEC").with_column("ra", Column::Float(vec![0.0, 0.0, 0.0]));
        match Catalog::new(&t) {
            Err(MatchError::ColumnResolution { kind, found }) => {
                assert_eq!(kind, CoordinateKind::Ra);
                assert_eq!(found, vec!["RA".to_string(), "ra".to_string()]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn table_rejects_reserved_name() {
        let t = table("ra", "dec").with_column("index", Column::Int(vec![10, 20, 30]));
        assert_eq!(
            Catalog::new(&t).unwrap_err(),
            MatchError::ReservedColumn { name: "index".into() }
        );
    }

    #[test]
    fn table_rejects_text_coordinates_and_ragged_columns() {
        let t = Table::new()
            .with_column("ra", Column::Text(vec!["a".into()]))
            .with_column("dec", Column::Float(vec![1.0]));
        assert!(matches!(Catalog::new(&t), Err(MatchError::NonNumericColumn { .. })));

        let t = Table::new()
            .with_column("ra", Column::Float(vec![1.0, 2.0]))
            .with_column("dec", Column::Float(vec![1.0]));
        assert!(matches!(Catalog::new(&t), Err(MatchError::Shape { .. })));
    }

    #[test]
    fn table_keeps_side_data() {
        let t = table("Ra", "Dec")
            .with_column("name", Column::Text(vec!["a".into(), "b".into(), "c".into()]))
            .with_column("mag", Column::Int(vec![1, 2, 3]));
        let cat = Catalog::new(t).unwrap();
        let names: Vec<&str> = cat.side_data().columns().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["name", "mag"]);
        assert_eq!(cat.side_data().column("mag"), Some(&Column::Int(vec![1, 2, 3])));
    }

    #[test]
    fn integer_coordinate_columns_are_accepted() {
        let t = Table::new()
            .with_column("ra", Column::Int(vec![5, 6, 7]))
            .with_column("dec", Column::Int(vec![7, 8, 9]));
        let cat = Catalog::new(t).unwrap();
        assert_eq!(cat.point(2), (7.0, 9.0));
    }

    #[test]
    fn non_finite_values_are_fatal() {
        let err = Catalog::new(&[[1.0, 2.0], [f64::INFINITY, 0.0]]).unwrap_err();
        assert!(matches!(err, MatchError::NonFinite { index: 1, .. }));
        let err = Catalog::from_columns(vec![1.0], vec![f64::NAN]).unwrap_err();
        assert!(matches!(err, MatchError::NonFinite { index: 0, .. }));
    }

    #[test]
    fn out_of_range_values_are_accepted() {
        let cat = Catalog::new(&[[-10.0, 95.0], [400.0, -100.0]]).unwrap();
        assert_eq!(cat.len(), 2);
    }

    #[test]
    fn column_lengths_must_agree() {
        let err = Catalog::from_columns(vec![1.0, 2.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, MatchError::Shape { .. }));
    }

    #[test]
    fn empty_catalog() {
        let empty: Vec<[f64; 2]> = Vec::new();
        let cat = Catalog::new(empty).unwrap();
        assert!(cat.is_empty());
    }

    #[test]
    fn csv_infers_column_types() {
        let data = "id,RA,Dec,name\n1,10.5,-3.25,alpha\n2,11,4,beta\n";
        let t = Table::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(t.num_rows(), 2);
        assert_eq!(t.column("id"), Some(&Column::Int(vec![1, 2])));
        assert_eq!(t.column("RA"), Some(&Column::Float(vec![10.5, 11.0])));
        assert_eq!(t.column("Dec"), Some(&Column::Float(vec![-3.25, 4.0])));
        assert!(matches!(t.column("name"), Some(Column::Text(_))));

        let cat = Catalog::new(&t).unwrap();
        assert_eq!(cat.point(0), (10.5, -3.25));
        assert_eq!(cat.side_data().columns().len(), 2);
    }

    #[test]
    fn csv_empty_cell_becomes_nan() {
        let data = "ra,dec\n1.5,2\n,3\n";
        let t = Table::from_csv_reader(data.as_bytes()).unwrap();
        let err = Catalog::new(t).unwrap_err();
        assert!(matches!(err, MatchError::NonFinite { index: 1, .. }));
    }
}
