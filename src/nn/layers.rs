pub mod convolution2d;
pub mod reference;
