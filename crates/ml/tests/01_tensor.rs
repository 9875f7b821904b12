use ml::{MlError, Tensor};

#[test]
fn stack_adds_leading_axis() {
    let a = Tensor::from_vec(vec![1, 2, 2], vec![1.0, 2.0, 3.0, 4.0]);
    let b = Tensor::from_vec(vec![1, 2, 2], vec![5.0, 6.0, 7.0, 8.0]);
    let s = Tensor::stack(&[&a, &b]).unwrap();
    assert_eq!(s.shape, vec![2, 1, 2, 2]);
    assert_eq!(s.rows(), 2);
    assert_eq!(s.row_len(), 4);
    assert_eq!(s.row(1), &[5.0, 6.0, 7.0, 8.0]);
}

#[test]
fn stack_rejects_mismatched_shapes() {
    let a = Tensor::zeros(vec![1, 4, 4]);
    let b = Tensor::zeros(vec![1, 4, 5]);
    let err = Tensor::stack(&[&a, &b]).unwrap_err();
    assert!(matches!(err, MlError::ShapeMismatch { context: "stack", .. }));
}

#[test]
fn stack_of_nothing_is_an_error() {
    assert!(Tensor::stack(&[]).is_err());
}

#[test]
fn try_from_vec_checks_length() {
    assert!(Tensor::try_from_vec(vec![2, 3], vec![0.0; 5]).is_err());
    let t = Tensor::try_from_vec(vec![2, 3], vec![0.0; 6]).unwrap();
    assert_eq!(t.len(), 6);
}

#[test]
fn flatten_rows_keeps_batch() {
    let t = Tensor::zeros(vec![3, 1, 4, 4]);
    let f = t.flatten_rows();
    assert_eq!(f.shape, vec![3, 16]);
    let r = f.reshape(vec![3, 1, 4, 4]).unwrap();
    assert_eq!(r.shape, vec![3, 1, 4, 4]);
}

#[test]
fn row_mut_writes_in_place() {
    let mut t = Tensor::zeros(vec![2, 3]);
    t.row_mut(1)[2] = 9.0;
    assert_eq!(t.data, vec![0.0, 0.0, 0.0, 0.0, 0.0, 9.0]);
}
