use ml::Tensor;
use rl::{QNetwork, RlError, ValueFunction};

fn states(rows: usize) -> Tensor {
    let data = (0..rows * 16).map(|i| (i % 7) as f32 / 7.0).collect();
    Tensor::from_vec(vec![rows, 1, 4, 4], data)
}

#[test]
fn forward_maps_batch_to_action_values() {
    let q = QNetwork::new(&[1, 4, 4], 8, 9, 0.001, 1).unwrap();
    let out = q.forward(&states(5)).unwrap();
    assert_eq!(out.shape, vec![5, 9]);
    assert_eq!(q.action_count(), 9);
    assert_eq!(q.observation_shape(), &[1, 4, 4]);
}

#[test]
fn wrong_observation_shape_is_rejected() {
    let q = QNetwork::new(&[1, 4, 4], 8, 3, 0.001, 1).unwrap();
    let bad = Tensor::zeros(vec![2, 1, 4, 5]);
    assert!(matches!(q.forward(&bad), Err(RlError::ShapeMismatch { .. })));
    let flat = Tensor::zeros(vec![2, 16]);
    assert!(matches!(q.forward(&flat), Err(RlError::ShapeMismatch { .. })));
}

#[test]
fn updates_reduce_loss_on_fixed_batch() {
    let mut q = QNetwork::new(&[1, 4, 4], 16, 3, 0.01, 2).unwrap();
    let inputs = states(4);
    let targets = Tensor::from_vec(vec![4, 3], vec![1.0, 0.0, -1.0, 0.5, 0.5, 0.5, 2.0, 1.0, 0.0, -0.5, 0.0, 0.5]);
    let first = q.update(&inputs, &targets).unwrap();
    let mut last = first;
    for _ in 0..200 {
        last = q.update(&inputs, &targets).unwrap();
    }
    assert!(last < first * 0.5, "first {first} last {last}");
}

#[test]
fn checkpoint_restores_network() {
    let q = QNetwork::new(&[1, 4, 4], 8, 3, 0.001, 3).unwrap();
    let restored = QNetwork::from_checkpoint(q.checkpoint(), 0.001).unwrap();
    let x = states(2);
    let a = q.forward(&x).unwrap();
    let b = restored.forward(&x).unwrap();
    assert_eq!(a, b);
}

#[test]
fn zero_sized_network_is_rejected() {
    assert!(QNetwork::new(&[1, 4, 4], 0, 3, 0.001, 0).is_err());
    assert!(QNetwork::new(&[1, 4, 4], 8, 0, 0.001, 0).is_err());
}
