use crate::error::{ConvError, Result};
use crate::geoalg::i32_math::{im2col::image_dimensions, shape::{Dimensions, Shape}, tensor::Tensor};

/// Direct valid cross correlation of an image with a single kernel, summed over channels.
/// A rank 2 kernel (rows, columns) is applied identically to every channel,
/// a rank 3 kernel (rows, columns, channels) carries one value per channel.
/// Only used to check the im2col path; no attempt is made to be fast.
pub fn reference_convolve(input: &Tensor, kernel: &Tensor) -> Result<Tensor> {
    let (i_d, channels) = image_dimensions(input)?;

    let broadcast = match kernel.rank() {
        2 => true,
        3 => false,
        found => return Err(ConvError::RankMismatch { expected: "2 or 3", found }),
    };
    if !broadcast && kernel.axis_len(2) != channels {
        return Err(ConvError::ChannelMismatch { input: channels, kernel: kernel.axis_len(2) });
    }

    let k_d = Dimensions::new(kernel.axis_len(0), kernel.axis_len(1));
    let o_d = i_d.valid_extent(&k_d)?;

    let image = input.read_values();
    let mut values = Vec::with_capacity(o_d.area());
    for row in 0..o_d.height {
        for column in 0..o_d.width {
            let mut c_accum = 0i32;
            for kernel_row in 0..k_d.height {
                for kernel_column in 0..k_d.width {
                    let pixel = (row + kernel_row) * i_d.width + column + kernel_column;
                    for channel in 0..channels {
                        let weight = if broadcast {
                            kernel.at(&[kernel_row, kernel_column])
                        } else {
                            kernel.at(&[kernel_row, kernel_column, channel])
                        };
                        c_accum = c_accum.wrapping_add(weight.wrapping_mul(image[pixel * channels + channel]));
                    }
                }
            }

            values.push(c_accum);
        }
    }

    Tensor::new(Shape::d2(o_d.height, o_d.width), values)
}
