use ml::Tensor;
use rl::{GreedyPolicy, Policy, SoftmaxPolicy};

#[test]
fn softmax_probabilities_sum_to_one() {
    let policy = SoftmaxPolicy::new(1.0, 0);
    let probs = policy.probabilities(&[1.0, 2.0, 3.0]);
    assert!((probs.iter().sum::<f32>() - 1.0).abs() < 1e-6);
    assert!(probs[2] > probs[1] && probs[1] > probs[0]);
}

#[test]
fn temperature_sharpens_distribution() {
    let cool = SoftmaxPolicy::new(1.0, 0).probabilities(&[0.0, 1.0]);
    let hot = SoftmaxPolicy::new(10.0, 0).probabilities(&[0.0, 1.0]);
    assert!(hot[1] > cool[1]);
}

#[test]
fn softmax_samples_follow_probabilities() {
    let mut policy = SoftmaxPolicy::new(1.0, 17);
    let values = [0.0, (3.0f32).ln()];
    let draws = 10_000;
    let ones = (0..draws).filter(|_| policy.select(&values).unwrap() == 1).count();
    let freq = ones as f32 / draws as f32;
    assert!((freq - 0.75).abs() < 0.03, "freq {freq}");
}

#[test]
fn greedy_takes_lowest_index_on_ties() {
    let mut policy = GreedyPolicy;
    assert_eq!(policy.select(&[1.0, 3.0, 3.0, 2.0]).unwrap(), 1);
}

#[test]
fn select_batch_returns_one_action_per_row() {
    let values = Tensor::from_vec(vec![3, 2], vec![1.0, 0.0, 0.0, 1.0, 5.0, -5.0]);
    assert_eq!(GreedyPolicy.select_batch(&values).unwrap(), vec![0, 1, 0]);
    assert_eq!(SoftmaxPolicy::new(1.0, 1).select_batch(&values).unwrap().len(), 3);
}

#[test]
fn empty_values_are_rejected() {
    assert!(GreedyPolicy.select(&[]).is_err());
    assert!(SoftmaxPolicy::new(1.0, 0).select(&[]).is_err());
}
