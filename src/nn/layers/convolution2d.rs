use tracing::{debug, instrument};

use crate::config::ConvConfig;
use crate::error::Result;
use crate::geoalg::i32_math::{
    im2col::{col2im, flatten_kernels, im2col, image_dimensions, kernel_footprint},
    shape::Dimensions,
    tensor::Tensor,
};

use super::reference::reference_convolve;

/// Valid (unpadded, stride 1) convolution layer computed with im2col and a single matrix multiply.
///
/// Kernels are either (filters, rows, columns), each filter applied identically to every input
/// channel, or (filters, rows, columns, channels) with one value per channel.
#[derive(Debug, Clone)]
pub struct Convolution2d {
    kernels: Tensor,
    k_d: Dimensions,
    config: ConvConfig,
}

impl Convolution2d {
    pub fn new(kernels: Tensor) -> Result<Self> {
        Self::with_config(kernels, ConvConfig::default())
    }

    pub fn with_config(kernels: Tensor, config: ConvConfig) -> Result<Self> {
        let k_d = kernel_footprint(&kernels)?;
        Ok(Self { kernels, k_d, config })
    }

    pub fn filters(&self) -> usize { self.kernels.axis_len(0) }

    pub fn footprint(&self) -> Dimensions { self.k_d }

    pub fn config(&self) -> &ConvConfig { &self.config }

    /// Kernel of a single filter, in the layout `reference_convolve` accepts.
    pub fn filter(&self, index: usize) -> Tensor { self.kernels.outer(index) }

    /// Output is (filters, rows - kernel rows + 1, columns - kernel columns + 1).
    #[instrument(level = "debug", skip_all, fields(input = ?input.shape().dimensions(), filters = self.filters()))]
    pub fn forward(&self, input: &Tensor) -> Result<Tensor> {
        let (i_d, channels) = image_dimensions(input)?;

        let image = im2col(input, self.k_d)?;
        let kernels = flatten_kernels(&self.kernels, channels)?;
        let conv_result = kernels.par_mul(&image, self.config.parallelism)?;

        col2im(&conv_result, i_d, self.k_d)
    }

    /// Filters whose im2col output differs from the direct reference convolution.
    pub fn mismatched_filters(&self, input: &Tensor) -> Result<Vec<usize>> {
        let output = self.forward(input)?;

        let mut mismatched = Vec::new();
        for filter in 0..self.filters() {
            let expected = reference_convolve(input, &self.filter(filter))?;
            if output.outer(filter) != expected {
                mismatched.push(filter);
            }
        }

        debug!(checked = self.filters(), mismatched = mismatched.len(), "compared against reference");
        Ok(mismatched)
    }
}

/// Convolves `input` with every filter of `kernels` on the calling thread.
pub fn convolve(input: &Tensor, kernels: &Tensor) -> Result<Tensor> {
    Convolution2d::new(kernels.clone())?.forward(input)
}
