use std::path::Path;

use thiserror::Error;

pub type ZoneId = usize;
pub type Distance = f64;

/// Zone id of the warehouse every trip starts from and returns to.
pub const WAREHOUSE: ZoneId = 0;

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("distance matrix is not square: row {row} has {found} cells, expected {expected}")]
    NotSquare {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("distance matrix is not symmetric at ({a}, {b})")]
    Asymmetric { a: ZoneId, b: ZoneId },
    #[error("negative distance {value} at ({a}, {b})")]
    NegativeDistance { a: ZoneId, b: ZoneId, value: f64 },
    #[error("non-zero self distance {value} at zone {zone}")]
    NonZeroDiagonal { zone: ZoneId, value: f64 },
    #[error("distance matrix is empty")]
    Empty,
}

/// Pairwise distances between zone centers, in kilometers.
///
/// The matrix uses a flat row-major structure. To find the index for a pair
/// of zones, use the formula `index = from * num_zones + to`, where
/// `num_zones` is the total number of zones including the warehouse.
#[derive(Debug, Clone)]
pub struct ZoneMatrix {
    distances: Vec<Distance>,
    num_zones: usize,
}

impl ZoneMatrix {
    /// Builds a matrix from nested rows, validating the invariants the
    /// dispatch core relies on: square shape, symmetry, non-negative
    /// entries, and a zero diagonal.
    pub fn from_rows(rows: Vec<Vec<Distance>>) -> Result<Self, MatrixError> {
        let num_zones = rows.len();
        if num_zones == 0 {
            return Err(MatrixError::Empty);
        }

        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != num_zones {
                return Err(MatrixError::NotSquare {
                    row,
                    found: cells.len(),
                    expected: num_zones,
                });
            }
        }

        for a in 0..num_zones {
            if rows[a][a] != 0.0 {
                return Err(MatrixError::NonZeroDiagonal {
                    zone: a,
                    value: rows[a][a],
                });
            }
            for b in 0..num_zones {
                let value = rows[a][b];
                if value < 0.0 {
                    return Err(MatrixError::NegativeDistance { a, b, value });
                }
                if value != rows[b][a] {
                    return Err(MatrixError::Asymmetric { a, b });
                }
            }
        }

        Ok(ZoneMatrix {
            distances: rows.into_iter().flatten().collect(),
            num_zones,
        })
    }

    /// Loads the matrix file format produced by the zone survey tooling:
    /// the first line holds the zone count, each following non-empty line
    /// one comma-separated row.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let text = std::fs::read_to_string(&path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, anyhow::Error> {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

        let first = lines.next().ok_or(MatrixError::Empty)?;
        let num_zones: usize = first
            .split(',')
            .next()
            .unwrap_or(first)
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid zone count {first:?}: {e}"))?;

        let mut rows = Vec::with_capacity(num_zones);
        for line in lines.take(num_zones) {
            let row = line
                .split(',')
                .map(|cell| {
                    cell.trim()
                        .parse::<Distance>()
                        .map_err(|e| anyhow::anyhow!("invalid distance {cell:?}: {e}"))
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }

        if rows.len() != num_zones {
            anyhow::bail!("expected {} matrix rows, found {}", num_zones, rows.len());
        }

        Ok(Self::from_rows(rows)?)
    }

    #[inline(always)]
    fn index(&self, from: ZoneId, to: ZoneId) -> usize {
        from * self.num_zones + to
    }

    /// Distance in kilometers between the centers of two zones.
    #[inline(always)]
    pub fn distance(&self, from: ZoneId, to: ZoneId) -> Distance {
        if from == to {
            return 0.0;
        }

        self.distances[self.index(from, to)]
    }

    pub fn num_zones(&self) -> usize {
        self.num_zones
    }

    pub fn contains(&self, zone: ZoneId) -> bool {
        zone < self.num_zones
    }
}
