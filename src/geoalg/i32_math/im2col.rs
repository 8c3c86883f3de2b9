//! Unrolling of sliding windows into matrix columns and back.
//!
//! Im2col and kernel flattening must agree on which receptive-field coordinate every
//! matrix row holds. Both walk the rows through [`ReceptiveField::offsets`], channel
//! outermost, then kernel row, then kernel column.

use tracing::debug;

use crate::error::{ConvError, Result};

use super::{matrix::Matrix, shape::{Dimensions, Shape}, tensor::Tensor};

/// Receptive field of one output position: a footprint repeated over every input channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceptiveField {
    footprint: Dimensions,
    channels: usize
}

impl ReceptiveField {
    pub fn new(footprint: Dimensions, channels: usize) -> Self {
        Self { footprint, channels }
    }

    pub fn footprint(&self) -> Dimensions { self.footprint }

    pub fn channels(&self) -> usize { self.channels }

    /// Number of matrix rows the field unrolls into.
    pub fn len(&self) -> usize { self.footprint.area() * self.channels }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Matrix row holding offset (kernel_row, kernel_column) of `channel`.
    pub fn row_index(&self, channel: usize, kernel_row: usize, kernel_column: usize) -> usize {
        channel * self.footprint.area() + kernel_row * self.footprint.width + kernel_column
    }

    /// (channel, kernel_row, kernel_column) for every matrix row, in row order.
    pub fn offsets(&self) -> impl Iterator<Item = (usize, usize, usize)> {
        let Dimensions { height, width } = self.footprint;
        (0..self.channels).flat_map(move |channel| {
            (0..height).flat_map(move |kernel_row| {
                (0..width).map(move |kernel_column| (channel, kernel_row, kernel_column))
            })
        })
    }
}

/// Spatial extent and channel count of an image.
/// Rank 2 tensors are single channel, rank 3 tensors are (rows, columns, channels).
pub fn image_dimensions(input: &Tensor) -> Result<(Dimensions, usize)> {
    let (extent, channels) = match input.rank() {
        2 => (Dimensions::new(input.axis_len(0), input.axis_len(1)), 1),
        3 => (Dimensions::new(input.axis_len(0), input.axis_len(1)), input.axis_len(2)),
        found => return Err(ConvError::RankMismatch { expected: "2 or 3", found }),
    };

    if extent.is_empty() || channels == 0 {
        return Err(ConvError::EmptyExtent);
    }

    Ok((extent, channels))
}

/// Footprint of a kernel bank, (filters, rows, columns) or (filters, rows, columns, channels).
pub fn kernel_footprint(kernels: &Tensor) -> Result<Dimensions> {
    match kernels.rank() {
        3 | 4 => {}
        found => return Err(ConvError::RankMismatch { expected: "3 or 4", found }),
    }

    let footprint = Dimensions::new(kernels.axis_len(1), kernels.axis_len(2));
    if kernels.axis_len(0) == 0 || footprint.is_empty() {
        return Err(ConvError::EmptyExtent);
    }

    Ok(footprint)
}

/// Unrolls every valid window of `input` into one column.
/// Columns run over window positions row-major, rows follow [`ReceptiveField::offsets`].
pub fn im2col(input: &Tensor, footprint: Dimensions) -> Result<Matrix> {
    let (extent, channels) = image_dimensions(input)?;
    let o_d = extent.valid_extent(&footprint)?;
    let field = ReceptiveField::new(footprint, channels);

    let columns = o_d.area();
    let image = input.read_values();
    let mut values = vec![0; field.len() * columns];
    for (row, (channel, kernel_row, kernel_column)) in field.offsets().enumerate() {
        let output = &mut values[row * columns..(row + 1) * columns];
        for window_row in 0..o_d.height {
            for window_column in 0..o_d.width {
                let pixel = (window_row + kernel_row) * extent.width + window_column + kernel_column;
                output[window_row * o_d.width + window_column] = image[pixel * channels + channel];
            }
        }
    }

    debug!(input = ?input.shape().dimensions(), footprint = ?footprint.shape(), rows = field.len(), columns, "im2col");
    Ok(Matrix::from_parts(field.len(), columns, values))
}

/// Flattens a kernel bank so row n holds filter n in [`ReceptiveField::offsets`] order.
/// Rank 3 banks repeat each filter over all `channels`, rank 4 banks must carry exactly `channels`.
pub fn flatten_kernels(kernels: &Tensor, channels: usize) -> Result<Matrix> {
    let footprint = kernel_footprint(kernels)?;
    if channels == 0 {
        return Err(ConvError::EmptyExtent);
    }

    let broadcast = kernels.rank() == 3;
    if !broadcast && kernels.axis_len(3) != channels {
        return Err(ConvError::ChannelMismatch { input: channels, kernel: kernels.axis_len(3) });
    }

    let field = ReceptiveField::new(footprint, channels);
    let filters = kernels.axis_len(0);
    let mut values = Vec::with_capacity(filters * field.len());
    for filter in 0..filters {
        for (channel, kernel_row, kernel_column) in field.offsets() {
            let value = if broadcast {
                kernels.at(&[filter, kernel_row, kernel_column])
            } else {
                kernels.at(&[filter, kernel_row, kernel_column, channel])
            };
            values.push(value);
        }
    }

    debug!(filters, columns = field.len(), broadcast, "flatten kernels");
    Ok(Matrix::from_parts(filters, field.len(), values))
}

/// Reshapes each row of a convolution result (one per filter) into a map of valid output positions.
/// The output extent is derived from the input extent and footprint, and the row length must agree with it.
pub fn col2im(conv_result: &Matrix, extent: Dimensions, footprint: Dimensions) -> Result<Tensor> {
    let o_d = extent.valid_extent(&footprint)?;

    let columns = conv_result.column_count();
    if columns % o_d.height != 0 {
        return Err(ConvError::InexactDivision { columns, rows: o_d.height });
    }
    let found = columns / o_d.height;
    if found != o_d.width {
        return Err(ConvError::OutputWidthMismatch { expected: o_d.width, found });
    }

    let filters = conv_result.row_count();
    let mut values = Vec::with_capacity(filters * columns);
    for filter in 0..filters {
        let row = conv_result.row(filter);
        for out_row in 0..o_d.height {
            values.extend_from_slice(&row[out_row * o_d.width..(out_row + 1) * o_d.width]);
        }
    }

    debug!(filters, out_rows = o_d.height, out_columns = o_d.width, "col2im");
    Ok(Tensor::from_parts(Shape::d3(filters, o_d.height, o_d.width), values))
}

/// Inverse of [`col2im`]: each (rows, columns) map becomes one matrix row.
pub fn flatten_maps(maps: &Tensor) -> Result<Matrix> {
    if maps.rank() != 3 {
        return Err(ConvError::RankMismatch { expected: "3", found: maps.rank() });
    }

    let filters = maps.axis_len(0);
    let columns = maps.axis_len(1) * maps.axis_len(2);
    Ok(Matrix::from_parts(filters, columns, maps.read_values().to_vec()))
}
