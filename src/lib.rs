//! Valid 2D convolution through im2col: sliding windows are unrolled into matrix columns,
//! the kernel bank is flattened into matrix rows, and one integer matrix multiply produces
//! every output map at once. A direct nested-loop convolution is kept alongside as an oracle.

pub mod config;
pub mod error;
pub mod geoalg;
pub mod nn;
pub mod partition;
pub mod partitioner;

pub use config::ConvConfig;
pub use error::{ConvError, ErrorKind, Result};
pub use geoalg::i32_math::{matrix::Matrix, shape::{Dimensions, Shape}, tensor::Tensor};
pub use nn::layers::{convolution2d::{convolve, Convolution2d}, reference::reference_convolve};
