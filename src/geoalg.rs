pub mod i32_math;
