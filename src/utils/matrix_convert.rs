//! Matrix conversion utilities.
//!
//! The dataset and derived vectors live in ndarray; the solver boundary
//! speaks nalgebra. These helpers copy values across that boundary.

use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2};

/// Convert an ndarray Array2 to a nalgebra DMatrix.
pub fn ndarray_to_nalgebra(arr: &Array2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(arr.nrows(), arr.ncols(), |i, j| arr[[i, j]])
}

/// Convert a nalgebra DMatrix to an ndarray Array2.
pub fn nalgebra_to_ndarray(mat: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((mat.nrows(), mat.ncols()), |(i, j)| mat[(i, j)])
}

/// Convert an ndarray Array1 to a nalgebra DVector.
pub fn ndarray_vec_to_nalgebra(arr: &Array1<f64>) -> DVector<f64> {
    DVector::from_iterator(arr.len(), arr.iter().copied())
}

/// Convert a nalgebra DVector to an ndarray Array1.
pub fn nalgebra_vec_to_ndarray(vec: &DVector<f64>) -> Array1<f64> {
    Array1::from_iter(vec.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr2, array};

    #[test]
    fn test_matrix_round_trip() {
        let arr = arr2(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);

        let mat = ndarray_to_nalgebra(&arr);
        assert_eq!(mat.nrows(), 3);
        assert_eq!(mat.ncols(), 2);
        assert_eq!(mat[(2, 1)], 6.0);

        let back = nalgebra_to_ndarray(&mat);
        assert_eq!(back, arr);
    }

    #[test]
    fn test_vector_round_trip() {
        let arr = array![1.0, -2.5, 3.0];

        let vec = ndarray_vec_to_nalgebra(&arr);
        assert_eq!(vec.len(), 3);
        assert_eq!(vec[1], -2.5);

        let back = nalgebra_vec_to_ndarray(&vec);
        assert_eq!(back, arr);
    }

    #[test]
    fn test_empty_conversion() {
        let arr: Array2<f64> = Array2::zeros((0, 0));
        let mat = ndarray_to_nalgebra(&arr);
        assert_eq!(mat.nrows(), 0);
        assert_eq!(mat.ncols(), 0);
    }
}
