//! Host-array coercion through the adapter entry points.

use logreg_simd::data::adapter::{self, AdapterError};
use logreg_simd::testing::gaussian_linear_problem;
use logreg_simd::LogRegError;
use ndarray::{s, Array1, Array2, ShapeBuilder};

fn trained_model() -> (logreg_simd::LogisticRegression, Array2<f32>) {
    let problem = gaussian_linear_problem(300, &[1.5, -2.0, 0.8, -1.2], 0.5, 42);
    let x = Array2::from_shape_vec((300, 4), problem.features).unwrap();
    let y = Array1::from(problem.labels);

    let mut model = adapter::construct(4, 0.05, 300).unwrap();
    adapter::train(&mut model, x.view(), y.view()).unwrap();
    (model, x)
}

#[test]
fn strided_view_matches_contiguous_copy() {
    let (model, x) = trained_model();

    let strided = x.slice(s![..;2, ..]);
    assert!(!strided.is_standard_layout());
    let copied = strided.to_owned();
    assert!(copied.is_standard_layout());

    let from_view = adapter::predict_class_batch(&model, strided).unwrap();
    let from_copy = adapter::predict_class_batch(&model, copied.view()).unwrap();
    assert_eq!(from_view, from_copy);

    let p_view = adapter::predict_batch(&model, strided).unwrap();
    let p_copy = adapter::predict_batch(&model, copied.view()).unwrap();
    assert_eq!(p_view, p_copy);
}

#[test]
fn column_major_and_reversed_views_match() {
    let (model, x) = trained_model();
    let expected = adapter::predict_batch(&model, x.view()).unwrap();

    let mut fortran = Array2::<f32>::zeros((300, 4).f());
    fortran.assign(&x);
    assert_eq!(adapter::predict_batch(&model, fortran.view()).unwrap(), expected);

    let reversed = x.slice(s![..;-1, ..]);
    let mut back = adapter::predict_batch(&model, reversed).unwrap().to_vec();
    back.reverse();
    assert_eq!(Array1::from(back), expected);
}

#[test]
fn wider_dtypes_match_f32() {
    let (model, x) = trained_model();
    let x64 = x.mapv(f64::from);
    assert_eq!(
        adapter::predict_class_batch(&model, x64.view()).unwrap(),
        adapter::predict_class_batch(&model, x.view()).unwrap()
    );

    let row = x.row(3);
    let row64 = x64.row(3);
    assert_eq!(
        adapter::predict(&model, row64).unwrap(),
        adapter::predict(&model, row).unwrap()
    );
    assert_eq!(
        adapter::predict_class(&model, row64).unwrap(),
        adapter::predict_class(&model, row).unwrap()
    );
}

#[test]
fn strided_column_sample_is_packed() {
    let (model, x) = trained_model();
    // A row of the transposed matrix is a strided column view.
    let xt = x.t().to_owned();
    let strided_row = xt.column(5);
    assert_eq!(
        adapter::predict(&model, strided_row).unwrap(),
        model.predict(x.row(5).as_slice().unwrap()).unwrap()
    );
}

#[test]
fn int64_labels_train_like_int32() {
    let problem = gaussian_linear_problem(120, &[1.0, -1.0], 0.0, 8);
    let x = Array2::from_shape_vec((120, 2), problem.features).unwrap();
    let y32 = Array1::from(problem.labels);
    let y64 = y32.mapv(i64::from);

    let mut a = adapter::construct(2, 0.1, 100).unwrap();
    let mut b = adapter::construct(2, 0.1, 100).unwrap();
    adapter::train(&mut a, x.view(), y32.view()).unwrap();
    adapter::train(&mut b, x.view(), y64.slice(s![..])).unwrap();
    assert_eq!(a.weights(), b.weights());
    assert_eq!(a.bias(), b.bias());
}

#[test]
fn incompatible_shapes_raise_host_errors() {
    let (mut model, x) = trained_model();
    let before = model.weights().to_vec();

    let narrow = x.slice(s![.., ..3]);
    assert_eq!(
        adapter::predict_batch(&model, narrow).unwrap_err(),
        AdapterError::ColumnMismatch { expected: 4, actual: 3 }
    );
    let y = Array1::<i64>::zeros(10);
    assert_eq!(
        adapter::train(&mut model, x.view(), y.view()).unwrap_err(),
        AdapterError::RowMismatch { rows: 300, labels: 10 }
    );
    assert!(matches!(
        adapter::construct(0, 0.1, 10).unwrap_err(),
        AdapterError::Core(LogRegError::Construction(_))
    ));
    assert_eq!(model.weights(), &before[..]);
}
