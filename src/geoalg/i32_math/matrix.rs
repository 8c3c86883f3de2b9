use std::fmt;
use std::ops::Index;

use tracing::debug;

use crate::error::{ConvError, Result};
use crate::partition::Partition;
use crate::partitioner::Partitioner;

/// Matrix is implemented as a single dimensional vector of i32s.
/// This implementation of Matrix is row-major.
/// Row-major is specified so each row of a product can be computed by its own partition.
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct Matrix {
    rows: usize,
    columns: usize,
    values: Vec<i32>
}

impl Index<(usize, usize)> for Matrix {
    type Output = i32;

    fn index(&self, (row, column): (usize, usize)) -> &Self::Output {
        assert!(row < self.rows && column < self.columns, "Matrix index out of bounds.");
        &self.values[row * self.columns + column]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            let line: Vec<String> = self.row(row).iter().map(|v| v.to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }

        Ok(())
    }
}

impl Matrix {
    /// Returns size of underlying vector.
    pub fn len(&self) -> usize { self.values.len() }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    /// Returns number of rows this matrix has.
    pub fn row_count(&self) -> usize { self.rows }

    /// Returns number of columns this matrix has.
    pub fn column_count(&self) -> usize { self.columns }

    pub fn shape(&self) -> (usize, usize) { (self.rows, self.columns) }

    /// Returns a slice of the values this matrix has.
    pub fn read_values(&self) -> &[i32] { &self.values }

    /// Returns a new Matrix, checking that values fill rows x columns exactly.
    pub fn new(rows: usize, columns: usize, values: Vec<i32>) -> Result<Self> {
        if values.len() != rows * columns {
            return Err(ConvError::ValueCount { expected: rows * columns, found: values.len() });
        }

        Ok(Self::from_parts(rows, columns, values))
    }

    /// Values must already be rows * columns long.
    pub(crate) fn from_parts(rows: usize, columns: usize, values: Vec<i32>) -> Self {
        debug_assert_eq!(values.len(), rows * columns);
        Self { rows, columns, values }
    }

    /// Builds a matrix from nested rows, rejecting jagged input.
    pub fn from_rows(rows: Vec<Vec<i32>>) -> Result<Self> {
        let columns = rows.first().map_or(0, Vec::len);
        let mut values = Vec::with_capacity(rows.len() * columns);
        for row in &rows {
            if row.len() != columns {
                return Err(ConvError::Jagged { axis: 1, expected: columns, found: row.len() });
            }
            values.extend_from_slice(row);
        }

        Ok(Self::from_parts(rows.len(), columns, values))
    }

    /// Returns a contiguous slice of data representing columns in the matrix.
    pub fn row(&self, row_index: usize) -> &[i32] {
        assert!(row_index < self.rows, "Tried to get a row that was out of bounds.");

        let start = row_index * self.columns;
        let end = start + self.columns;
        &self.values[start..end]
    }

    pub fn to_rows(&self) -> Vec<Vec<i32>> {
        (0..self.rows).map(|row| self.row(row).to_vec()).collect()
    }

    /// Single-threaded matrix multiplication.
    pub fn mul(&self, rhs: &Matrix) -> Result<Matrix> {
        self.par_mul(rhs, 1)
    }

    /// Computes matrix multiplication, dividing the rows of lhs amongst partitions.
    /// Sums wrap on overflow, so the result does not depend on the partition count.
    pub fn par_mul(&self, rhs: &Matrix, parallelism: usize) -> Result<Matrix> {
        if self.columns != rhs.rows {
            return Err(ConvError::DimensionMismatch { lhs: self.shape(), rhs: rhs.shape() });
        }
        if rhs.is_empty() {
            return Err(ConvError::EmptyOperand);
        }

        let partitioner = Partitioner::with_partitions(self.rows, parallelism);

        let inner_process = |partition: &Partition| {
            let mut partition_values = vec![0i32; partition.size() * rhs.columns];
            for (local_row, row) in partition.range().enumerate() {
                let output = &mut partition_values[local_row * rhs.columns..(local_row + 1) * rhs.columns];
                for (k, &lhs_value) in self.row(row).iter().enumerate() {
                    for (accum, &rhs_value) in output.iter_mut().zip(rhs.row(k)) {
                        *accum = accum.wrapping_add(lhs_value.wrapping_mul(rhs_value));
                    }
                }
            }

            partition_values
        };

        let values = partitioner.parallelized(inner_process);
        debug!(lhs = ?self.shape(), rhs = ?rhs.shape(), partitions = partitioner.len(), "matrix multiply");

        Ok(Self::from_parts(self.rows, rhs.columns, values))
    }
}
