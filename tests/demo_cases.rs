use im2col::geoalg::i32_math::im2col::im2col as unroll_windows;
use im2col::{reference_convolve, Convolution2d, Dimensions, Shape, Tensor};
use rand_distr::Uniform;

fn image_3x4x2() -> Tensor {
    Tensor::d3(vec![
        vec![vec![1, 13], vec![2, 14], vec![3, 15], vec![4, 16]],
        vec![vec![5, 17], vec![6, 18], vec![7, 19], vec![8, 20]],
        vec![vec![9, 21], vec![10, 22], vec![11, 23], vec![12, 24]]
    ]).unwrap()
}

fn image_3x3x3() -> Tensor {
    Tensor::d3(vec![
        vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]],
        vec![vec![10, 11, 12], vec![13, 14, 15], vec![16, 17, 18]],
        vec![vec![19, 20, 21], vec![22, 23, 24], vec![25, 26, 27]]
    ]).unwrap()
}

fn image_3x4x3() -> Tensor {
    Tensor::d3(vec![
        vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9], vec![10, 11, 12]],
        vec![vec![13, 14, 15], vec![16, 17, 18], vec![19, 20, 21], vec![22, 23, 24]],
        vec![vec![25, 26, 27], vec![28, 29, 30], vec![31, 32, 33], vec![34, 35, 36]]
    ]).unwrap()
}

fn image_4x4x1() -> Tensor {
    Tensor::d3((0..4).map(|row| (1..=4).map(|column| vec![row * 4 + column]).collect::<Vec<_>>()).collect()).unwrap()
}

/// Runs the layer, checks it against the oracle and returns each filter's map.
fn convolve_and_check(input: &Tensor, kernels: Tensor) -> Vec<Vec<Vec<i32>>> {
    let layer = Convolution2d::new(kernels).unwrap();
    assert!(layer.mismatched_filters(input).unwrap().is_empty());

    let output = layer.forward(input).unwrap();
    (0..layer.filters()).map(|filter| output.outer(filter).to_rows()).collect()
}

#[test]
fn test_im2col_dumps_of_3x4x2() {
    let image = image_3x4x2();

    let actual = unroll_windows(&image, Dimensions::new(2, 3)).unwrap();
    assert_eq!(actual.shape(), (12, 4));
    assert_eq!(actual.row(0), &[1, 2, 5, 6]);

    let actual = unroll_windows(&image, Dimensions::new(3, 2)).unwrap();
    assert_eq!(actual.shape(), (12, 3));
    assert_eq!(actual.row(0), &[1, 2, 3]);

    let actual = unroll_windows(&image, Dimensions::new(3, 3)).unwrap();
    assert_eq!(actual.shape(), (18, 2));
    assert_eq!(actual.row(0), &[1, 2]);
    assert_eq!(actual.row(17), &[23, 24]);
}

#[test]
fn test_two_2x2_filters_over_3x4x2() {
    let kernels = Tensor::d3(vec![
        vec![vec![1, 2], vec![3, 4]],
        vec![vec![4, 3], vec![2, 1]]
    ]).unwrap();

    let actual = convolve_and_check(&image_3x4x2(), kernels);
    assert_eq!(actual, vec![
        vec![vec![208, 228, 248], vec![288, 308, 328]],
        vec![vec![172, 192, 212], vec![252, 272, 292]]
    ]);
}

#[test]
fn test_two_2x2_filters_over_3x3x3() {
    let kernels = Tensor::d3(vec![
        vec![vec![1, 2], vec![3, 4]],
        vec![vec![4, 3], vec![2, 1]]
    ]).unwrap();

    let actual = convolve_and_check(&image_3x3x3(), kernels);
    assert_eq!(actual, vec![
        vec![vec![303, 393], vec![573, 663]],
        vec![vec![177, 267], vec![447, 537]]
    ]);
}

#[test]
fn test_two_2x3_filters_over_3x4x3() {
    let kernels = Tensor::d3(vec![
        vec![vec![1, 2, 3], vec![4, 5, 6]],
        vec![vec![6, 5, 4], vec![3, 2, 1]]
    ]).unwrap();

    let actual = convolve_and_check(&image_3x4x3(), kernels);
    assert_eq!(actual, vec![
        vec![vec![891, 1080], vec![1647, 1836]],
        vec![vec![495, 684], vec![1251, 1440]]
    ]);
}

#[test]
fn test_two_3x3_filters_over_4x4x1() {
    let kernels = Tensor::d3(vec![
        vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]],
        vec![vec![9, 8, 7], vec![6, 5, 4], vec![3, 2, 1]]
    ]).unwrap();

    let actual = convolve_and_check(&image_4x4x1(), kernels);
    assert_eq!(actual, vec![
        vec![vec![348, 393], vec![528, 573]],
        vec![vec![192, 237], vec![372, 417]]
    ]);
}

#[test]
fn test_three_2x2_filters_over_3x4x3() {
    let kernels = Tensor::d3(vec![
        vec![vec![1, 2], vec![3, 4]],
        vec![vec![4, 3], vec![2, 1]],
        vec![vec![8, 2], vec![2, 5]]
    ]).unwrap();

    let actual = convolve_and_check(&image_3x4x3(), kernels);
    assert_eq!(actual, vec![
        vec![vec![366, 456, 546], vec![726, 816, 906]],
        vec![vec![204, 294, 384], vec![564, 654, 744]],
        vec![vec![417, 570, 723], vec![1029, 1182, 1335]]
    ]);
}

#[test]
fn test_random_image_and_bank() {
    let values = Uniform::new_inclusive(-20, 20);
    for (height, width, channels, filters, k_height, k_width) in [(5, 7, 3, 4, 2, 3), (6, 6, 1, 2, 6, 1), (4, 9, 2, 3, 3, 3)] {
        let image = Tensor::new_randomized_uniform(Shape::d3(height, width, channels), values);
        let kernels = Tensor::new_randomized_uniform(Shape::new(vec![filters, k_height, k_width]), values);

        let layer = Convolution2d::new(kernels.clone()).unwrap();
        assert!(layer.mismatched_filters(&image).unwrap().is_empty());

        let output = layer.forward(&image).unwrap();
        assert_eq!(output.shape().dimensions(), &[filters, height - k_height + 1, width - k_width + 1]);
        assert_eq!(output.outer(0), reference_convolve(&image, &kernels.outer(0)).unwrap());
    }
}
