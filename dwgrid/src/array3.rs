use crate::LayoutError;

use ndarray_crate::{Array3 as NdArray3, ShapeBuilder};
use num_traits::Zero;
use std::ops::{Index, IndexMut};

/// Dense 3-D grid stored first-index-fastest, so that the memory offset of
/// `[k1, k2, k3]` is `k3·n2·n1 + k2·n1 + k1`.
#[derive(Debug, Clone)]
pub struct Array3<T> {
    shape: [usize; 3],
    data: NdArray3<T>,
}

impl<T: Default + Copy + Zero> Array3<T> {
    pub fn new(shape: [usize; 3]) -> Array3<T> {
        Array3 {
            shape,
            data: NdArray3::from_elem((shape[0], shape[1], shape[2]).f(), T::default()),
        }
    }

    pub fn from_vec(shape: [usize; 3], data: Vec<T>) -> Result<Array3<T>, LayoutError> {
        let nlen = shape[0] * shape[1] * shape[2];

        if data.len() != nlen {
            return Err(LayoutError::Length {
                expected: nlen,
                found: data.len(),
            });
        }

        let data = NdArray3::from_shape_vec((shape[0], shape[1], shape[2]).f(), data).map_err(
            |_| LayoutError::Length {
                expected: nlen,
                found: nlen,
            },
        )?;

        Ok(Array3 { shape, data })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn set_value(&mut self, value: T) {
        self.data.fill(value);
    }

    pub fn sum(&self) -> T {
        self.data.iter().fold(T::zero(), |s, &v| s + v)
    }

    // Both layouts built above are contiguous, so the memory-order view always exists.
    pub fn as_slice(&self) -> &[T] {
        self.data.as_slice_memory_order().unwrap_or(&[])
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.data.as_slice_memory_order_mut().unwrap_or(&mut [])
    }
}

impl<T> Index<[usize; 3]> for Array3<T> {
    type Output = T;

    fn index(&self, idx: [usize; 3]) -> &T {
        &self.data[[idx[0], idx[1], idx[2]]]
    }
}

impl<T> IndexMut<[usize; 3]> for Array3<T> {
    fn index_mut(&mut self, idx: [usize; 3]) -> &mut T {
        &mut self.data[[idx[0], idx[1], idx[2]]]
    }
}
