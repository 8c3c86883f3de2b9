use std::process::ExitCode;

use colored::Colorize;
use im2col::geoalg::i32_math::im2col::im2col as unroll_windows;
use im2col::{Convolution2d, ConvConfig, Dimensions, Shape, Tensor};
use rand_distr::Uniform;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            println!("{}", "Incorrect im2col convolution".bright_red());
            ExitCode::FAILURE
        }
        Err(err) => {
            error!(%err, "case failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> im2col::Result<bool> {
    println!("{}", "Case 1:\n".bright_cyan());
    {
        let image = Tensor::d3(vec![
            vec![vec![1, 13], vec![2, 14], vec![3, 15], vec![4, 16]],
            vec![vec![5, 17], vec![6, 18], vec![7, 19], vec![8, 20]],
            vec![vec![9, 21], vec![10, 22], vec![11, 23], vec![12, 24]]
        ])?;
        println!("Tensor:\n{image}");

        for (height, width) in [(2, 3), (3, 2), (3, 3)] {
            println!("im2col with {height}x{width} kernel:");
            print!("{}", unroll_windows(&image, Dimensions::new(height, width))?);
        }
    }

    let image_3x4x3 = Tensor::d3(vec![
        vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9], vec![10, 11, 12]],
        vec![vec![13, 14, 15], vec![16, 17, 18], vec![19, 20, 21], vec![22, 23, 24]],
        vec![vec![25, 26, 27], vec![28, 29, 30], vec![31, 32, 33], vec![34, 35, 36]]
    ])?;

    let cases = vec![
        (
            "Case 2",
            Tensor::d3(vec![
                vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]],
                vec![vec![10, 11, 12], vec![13, 14, 15], vec![16, 17, 18]],
                vec![vec![19, 20, 21], vec![22, 23, 24], vec![25, 26, 27]]
            ])?,
            Tensor::d3(vec![
                vec![vec![1, 2], vec![3, 4]],
                vec![vec![4, 3], vec![2, 1]]
            ])?,
        ),
        (
            "Case 3",
            image_3x4x3.clone(),
            Tensor::d3(vec![
                vec![vec![1, 2, 3], vec![4, 5, 6]],
                vec![vec![6, 5, 4], vec![3, 2, 1]]
            ])?,
        ),
        (
            "Case 4",
            Tensor::d3((0..4).map(|row| (1..=4).map(|column| vec![row * 4 + column]).collect::<Vec<_>>()).collect())?,
            Tensor::d3(vec![
                vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]],
                vec![vec![9, 8, 7], vec![6, 5, 4], vec![3, 2, 1]]
            ])?,
        ),
        (
            "Case 5",
            image_3x4x3,
            Tensor::d3(vec![
                vec![vec![1, 2], vec![3, 4]],
                vec![vec![4, 3], vec![2, 1]],
                vec![vec![8, 2], vec![2, 5]]
            ])?,
        ),
    ];

    let config = ConvConfig::from_env();
    for (name, image, kernels) in cases {
        println!("\n{}", format!("{name}:\n").bright_cyan());

        let layer = Convolution2d::with_config(kernels, config)?;
        let dims = layer.footprint();
        println!("Conv layer with {}x{}x{} filters:", layer.filters(), dims.height, dims.width);

        if !layer.mismatched_filters(&image)?.is_empty() {
            return Ok(false);
        }

        let output = layer.forward(&image)?;
        for filter in 0..layer.filters() {
            println!("{}", format!("channel: {filter}").bright_green());
            print!("{}", output.outer(filter));
        }
    }

    println!("\n{}", "Random case:\n".bright_cyan());
    {
        let values = Uniform::new_inclusive(-9, 9);
        let image = Tensor::new_randomized_uniform(Shape::d3(6, 5, 3), values);
        let kernels = Tensor::new_randomized_uniform(Shape::new(vec![4, 3, 2]), values);

        let layer = Convolution2d::with_config(kernels, config)?;
        let mismatched = layer.mismatched_filters(&image)?;
        println!("{} filters checked against reference, {} mismatched", layer.filters(), mismatched.len());
        if !mismatched.is_empty() {
            return Ok(false);
        }
    }

    Ok(true)
}
