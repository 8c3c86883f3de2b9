use std::fmt;

use rand_distr::{Distribution, Uniform};

use crate::error::{ConvError, Result};

use super::shape::Shape;

/// Row-major tensor of i32s of any rank.
/// Images are (rows, columns, channels), kernel banks are (filters, rows, columns[, channels]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tensor {
    shape: Shape,
    values: Vec<i32>
}

impl Tensor {
    /// Creates a new tensor with specified shape, checking that values fill it exactly.
    pub fn new(shape: Shape, values: Vec<i32>) -> Result<Self> {
        if values.len() != shape.size() {
            return Err(ConvError::ValueCount { expected: shape.size(), found: values.len() });
        }

        Ok(Tensor { shape, values })
    }

    /// Values must already fill the shape.
    pub(crate) fn from_parts(shape: Shape, values: Vec<i32>) -> Self {
        debug_assert_eq!(values.len(), shape.size());
        Tensor { shape, values }
    }

    /// Rank 2 tensor from nested rows.
    pub fn d2(rows: Vec<Vec<i32>>) -> Result<Self> {
        let mut lengths = [Some(rows.len()), None];
        let mut values = Vec::new();
        for row in &rows {
            Self::check_axis(&mut lengths, 1, row.len())?;
            values.extend_from_slice(row);
        }

        Ok(Self::from_parts(Self::shape_of(&lengths), values))
    }

    /// Rank 3 tensor from nested (row, column, channel) data.
    pub fn d3(planes: Vec<Vec<Vec<i32>>>) -> Result<Self> {
        let mut lengths = [Some(planes.len()), None, None];
        let mut values = Vec::new();
        for rows in &planes {
            Self::check_axis(&mut lengths, 1, rows.len())?;
            for row in rows {
                Self::check_axis(&mut lengths, 2, row.len())?;
                values.extend_from_slice(row);
            }
        }

        Ok(Self::from_parts(Self::shape_of(&lengths), values))
    }

    /// Rank 4 tensor, used for kernel banks with one value per (row, column, channel).
    pub fn d4(blocks: Vec<Vec<Vec<Vec<i32>>>>) -> Result<Self> {
        let mut lengths = [Some(blocks.len()), None, None, None];
        let mut values = Vec::new();
        for planes in &blocks {
            Self::check_axis(&mut lengths, 1, planes.len())?;
            for rows in planes {
                Self::check_axis(&mut lengths, 2, rows.len())?;
                for row in rows {
                    Self::check_axis(&mut lengths, 3, row.len())?;
                    values.extend_from_slice(row);
                }
            }
        }

        Ok(Self::from_parts(Self::shape_of(&lengths), values))
    }

    /// The first sub-array seen along an axis fixes its length, every later one must match.
    fn check_axis(lengths: &mut [Option<usize>], axis: usize, found: usize) -> Result<()> {
        match lengths[axis] {
            None => {
                lengths[axis] = Some(found);
                Ok(())
            },
            Some(expected) if expected != found => Err(ConvError::Jagged { axis, expected, found }),
            Some(_) => Ok(())
        }
    }

    /// Axes never reached (because an outer axis was empty) have length 0.
    fn shape_of(lengths: &[Option<usize>]) -> Shape {
        Shape::new(lengths.iter().map(|length| length.unwrap_or(0)).collect())
    }

    /// Tensor of the given shape filled with values drawn from `uniform`.
    pub fn new_randomized_uniform(shape: Shape, uniform: Uniform<i32>) -> Self {
        let mut rng = rand::thread_rng();
        let values = uniform.sample_iter(&mut rng).take(shape.size()).collect();

        Self::from_parts(shape, values)
    }

    pub fn shape(&self) -> &Shape { &self.shape }

    pub fn rank(&self) -> usize { self.shape.rank() }

    pub fn axis_len(&self, axis: usize) -> usize { self.shape.axis_len(axis) }

    pub fn read_values(&self) -> &[i32] { &self.values }

    /// Value at a coordinate, panicking when the coordinate is outside the shape.
    pub fn at(&self, coordinate: &[usize]) -> i32 {
        self.values[self.shape.index_at(coordinate)]
    }

    /// Sub-tensor at `index` along the first axis, e.g. one filter's map of an output tensor.
    pub fn outer(&self, index: usize) -> Tensor {
        assert!(self.rank() > 0, "Cannot take outer slice of a rank 0 tensor.");
        assert!(index < self.axis_len(0), "Outer index out of bounds.");

        let stride = self.shape.stride_for(0);
        let start = index * stride;
        let shape = Shape::new(self.shape.dimensions()[1..].to_vec());

        Self::from_parts(shape, self.values[start..start + stride].to_vec())
    }

    /// Nested rows of a rank 2 tensor.
    pub fn to_rows(&self) -> Vec<Vec<i32>> {
        assert_eq!(self.rank(), 2, "to_rows requires a rank 2 tensor.");
        let columns = self.axis_len(1);
        if columns == 0 {
            return vec![Vec::new(); self.axis_len(0)];
        }

        self.values.chunks(columns).map(<[i32]>::to_vec).collect()
    }
}

impl fmt::Display for Tensor {
    /// Innermost axis space separated, one line per index of the axis before it,
    /// blank line between higher-rank blocks.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rank() == 0 {
            return Ok(());
        }

        let line_len = self.axis_len(self.rank() - 1);
        let block_len = if self.rank() >= 2 { line_len * self.axis_len(self.rank() - 2) } else { line_len };
        for (line_index, line) in self.values.chunks(line_len.max(1)).enumerate() {
            if block_len > 0 && line_index > 0 && (line_index * line_len) % block_len == 0 {
                writeln!(f)?;
            }
            let line: Vec<String> = line.iter().map(|v| v.to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }

        Ok(())
    }
}
