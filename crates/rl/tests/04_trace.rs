mod common;

use common::{step, LinearValue};
use ml::Tensor;
use rl::trace::discounted_return;
use rl::{EligibilityTrace, RlError, Series, ValueFunction};
use std::sync::Arc;

fn open_series() -> Series {
    Series::from_steps([step(1.0, 2, 1.0, false), step(2.0, 0, 0.5, false), step(3.0, 1, 9.0, false)]).unwrap()
}

fn terminal_series() -> Series {
    Series::from_steps([step(1.0, 0, 1.0, false), step(2.0, 1, 2.0, false), step(3.0, 2, 4.0, true)]).unwrap()
}

fn values_at(value: &LinearValue, state: &Tensor) -> Vec<f32> {
    value.forward(&Tensor::stack(&[state]).unwrap()).unwrap().data
}

#[test]
fn only_the_taken_action_changes() {
    let value = LinearValue::new(4, 0.5);
    let series = open_series();
    let target = EligibilityTrace::default().target(&value, &series).unwrap();
    let raw = values_at(&value, &series.first().state);
    for (a, (t, r)) in target.iter().zip(&raw).enumerate() {
        if a == series.first().action {
            assert_ne!(t.to_bits(), r.to_bits());
        } else {
            assert_eq!(t.to_bits(), r.to_bits(), "action {a} changed");
        }
    }
}

#[test]
fn open_series_bootstraps_from_greedy_value() {
    let value = LinearValue::new(4, 0.5);
    let series = open_series();
    let gamma = 0.9;
    let target = EligibilityTrace::new(gamma).target(&value, &series).unwrap();
    let last_max = values_at(&value, &series.last().state).into_iter().fold(f32::MIN, f32::max);
    // the last step's reward is never folded in
    let expected = 1.0 + gamma * (0.5 + gamma * last_max);
    assert!((target[2] - expected).abs() < 1e-5, "{} vs {expected}", target[2]);
}

#[test]
fn terminal_bootstrap_is_zero() {
    let series = terminal_series();
    let trace = EligibilityTrace::new(0.99);
    let low = trace.target(&LinearValue::new(3, 0.0), &series).unwrap();
    let high = trace.target(&LinearValue::new(3, 1000.0), &series).unwrap();
    let expected = 1.0 + 0.99 * 2.0;
    assert!((low[0] - expected).abs() < 1e-6);
    assert_eq!(low[0].to_bits(), high[0].to_bits());
}

#[test]
fn two_step_series_applies_first_reward() {
    let series = Series::from_steps([step(1.0, 1, 0.25, false), step(2.0, 0, 7.0, true)]).unwrap();
    let target = EligibilityTrace::default().target(&LinearValue::new(3, 1.0), &series).unwrap();
    assert_eq!(target[1], 0.25);
}

#[test]
fn one_two_row_forward_per_series() {
    let value = LinearValue::new(3, 1.0);
    let batch: Vec<Arc<Series>> = vec![Arc::new(open_series()), Arc::new(terminal_series())];
    EligibilityTrace::default().build(&value, &batch).unwrap();
    assert_eq!(value.forward_calls.get(), 2);
    assert_eq!(value.forward_rows.get(), 4);
}

#[test]
fn build_stacks_first_states_and_targets() {
    let value = LinearValue::new(3, 1.0);
    let batch: Vec<Arc<Series>> = vec![Arc::new(open_series()), Arc::new(terminal_series())];
    let out = EligibilityTrace::default().build(&value, &batch).unwrap();
    assert_eq!(out.inputs.shape, vec![2, 1, 2, 2]);
    assert_eq!(out.targets.shape, vec![2, 3]);
    assert_eq!(out.inputs.row(0), batch[0].first().state.data.as_slice());
    assert_eq!(out.inputs.row(1), batch[1].first().state.data.as_slice());
}

#[test]
fn out_of_range_action_is_rejected() {
    let series = Series::from_steps([step(1.0, 5, 1.0, false), step(2.0, 0, 1.0, true)]).unwrap();
    let err = EligibilityTrace::default().target(&LinearValue::new(3, 1.0), &series).unwrap_err();
    assert!(matches!(err, RlError::ActionOutOfRange { action: 5, actions: 3 }));
}

#[test]
fn empty_batch_is_rejected() {
    assert!(EligibilityTrace::default().build(&LinearValue::new(3, 1.0), &[]).is_err());
}

#[test]
fn discounted_return_folds_backward() {
    assert_eq!(discounted_return([].into_iter(), 5.0, 0.5), 5.0);
    assert_eq!(discounted_return([1.0, 2.0].into_iter(), 4.0, 0.5), 1.0 + 0.5 * (2.0 + 0.5 * 4.0));
}
