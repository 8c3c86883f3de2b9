use crate::error::{ConvError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    dimensions: Vec<usize>,

    // Calculated on creation, and only privately accessible
    strides: Vec<usize>,
    size: usize,
}

impl Shape {
    /// Creates a 2-dimensional shape (row-major).
    pub fn d2(rows: usize, columns: usize) -> Self { Self::new(vec![rows, columns]) }

    /// Creates a 3-dimensional shape, (rows, columns, channels) for images.
    pub fn d3(rows: usize, columns: usize, channels: usize) -> Self { Self::new(vec![rows, columns, channels]) }

    /// Generalized shape creation
    pub fn new(dimensions: Vec<usize>) -> Self {
        let (strides, size) = Shape::compute_strides(&dimensions);

        Self { dimensions, strides, size }
    }

    /// Helper function to pre-compute strides and size of shape.
    fn compute_strides(dimensions: &[usize]) -> (Vec<usize>, usize) {
        let mut strides = vec![0; dimensions.len()];
        let mut stride = 1;
        for axis in (0..dimensions.len()).rev() {
            strides[axis] = stride;
            stride *= dimensions[axis];
        }

        (strides, stride)
    }

    /// Gets total size of shape.
    pub fn size(&self) -> usize { self.size }

    pub fn rank(&self) -> usize { self.dimensions.len() }

    pub fn dimensions(&self) -> &[usize] { &self.dimensions }

    /// Get length of dimension.
    pub fn axis_len(&self, axis: usize) -> usize {
        assert!(axis < self.dimensions.len(), "Cannot get axis_len for non-existant axis.");
        self.dimensions[axis]
    }

    /// Gets offset for specific axis.
    pub fn stride_for(&self, axis: usize) -> usize {
        assert!(axis < self.dimensions.len(), "Cannot get stride_for for non-existant axis.");
        self.strides[axis]
    }

    /// Flat row-major index of a coordinate.
    pub fn index_at(&self, coordinate: &[usize]) -> usize {
        assert_eq!(self.dimensions.len(), coordinate.len(), "Coordinate rank does not match shape rank.");
        let mut index = 0;
        for (axis, &position) in coordinate.iter().enumerate() {
            assert!(self.dimensions[axis] > position, "Coordinate outside of shape bounds.");
            index += self.strides[axis] * position;
        }

        index
    }
}

/// Spatial size of an image or a filter footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub height: usize,
    pub width: usize
}

impl Dimensions {
    pub fn new(height: usize, width: usize) -> Self { Self { height, width } }

    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn area(&self) -> usize { self.height * self.width }

    pub fn is_empty(&self) -> bool { self.height == 0 || self.width == 0 }

    /// Extent of a valid (unpadded, stride 1) convolution of `self` with `footprint`.
    /// Fails instead of underflowing when the footprint does not fit.
    pub fn valid_extent(&self, footprint: &Dimensions) -> Result<Dimensions> {
        if self.is_empty() || footprint.is_empty() {
            return Err(ConvError::EmptyExtent);
        }

        match (self.height.checked_sub(footprint.height), self.width.checked_sub(footprint.width)) {
            (Some(rows), Some(columns)) => Ok(Dimensions::new(rows + 1, columns + 1)),
            _ => Err(ConvError::FootprintExceedsExtent { footprint: footprint.shape(), extent: self.shape() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis() {
        let shape = Shape::new(vec![5, 4, 3, 2]);

        assert_eq!(shape.rank(), 4);
        assert_eq!(shape.axis_len(0), 5);
        assert_eq!(shape.axis_len(1), 4);
        assert_eq!(shape.axis_len(2), 3);
        assert_eq!(shape.axis_len(3), 2);
        assert_eq!(shape.size(), 120);
    }

    #[test]
    fn test_stride() {
        let shape = Shape::new(vec![5, 4, 3, 2]);

        assert_eq!(shape.stride_for(3), 1);
        assert_eq!(shape.stride_for(2), 2);
        assert_eq!(shape.stride_for(1), 6);
        assert_eq!(shape.stride_for(0), 24);
    }

    #[test]
    fn test_index_at() {
        let shape = Shape::new(vec![100, 30, 14, 500]);

        // 1* 8 + 500* 7 + 500*14* 4 + 500*14*30* 1 = 241508
        assert_eq!(shape.index_at(&[1, 4, 7, 8]), 241508);
    }

    #[test]
    #[should_panic]
    fn test_index_at_out_of_bounds() {
        Shape::d3(3, 4, 2).index_at(&[3, 0, 0]);
    }

    #[test]
    fn test_zero_axis_has_no_values() {
        assert_eq!(Shape::d2(0, 7).size(), 0);
    }

    #[test]
    fn test_valid_extent() {
        let image = Dimensions::new(3, 4);

        assert_eq!(image.valid_extent(&Dimensions::new(2, 2)), Ok(Dimensions::new(2, 3)));
        assert_eq!(image.valid_extent(&Dimensions::new(3, 4)), Ok(Dimensions::new(1, 1)));
        assert_eq!(
            image.valid_extent(&Dimensions::new(4, 1)),
            Err(ConvError::FootprintExceedsExtent { footprint: (4, 1), extent: (3, 4) }));
        assert_eq!(
            image.valid_extent(&Dimensions::new(1, 5)),
            Err(ConvError::FootprintExceedsExtent { footprint: (1, 5), extent: (3, 4) }));
        assert_eq!(image.valid_extent(&Dimensions::new(0, 2)), Err(ConvError::EmptyExtent));
    }
}
