pub mod im2col;
pub mod matrix;
pub mod shape;
pub mod tensor;
