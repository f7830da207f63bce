use ndarray::{Array2, Array3, ArrayView1, Axis};

pub struct MatrixHelper;

impl MatrixHelper {
    /// Outer product of two 1D kernels, used for separable 2D windows.
    pub fn outer(lhs: ArrayView1<f64>, rhs: ArrayView1<f64>) -> Array2<f64> {
        let column = lhs.insert_axis(Axis(1));
        let row = rhs.insert_axis(Axis(0));
        column.dot(&row)
    }

    /// Three-way outer product for separable volume windows.
    pub fn outer3(a: ArrayView1<f64>, b: ArrayView1<f64>, c: ArrayView1<f64>) -> Array3<f64> {
        Array3::from_shape_fn((a.len(), b.len(), c.len()), |(i, j, k)| a[i] * b[j] * c[k])
    }
}
