//! Integration tests for the trend light on synthetic price paths.

use hobart_signals::{TrendConfig, TrendLight, TrendSignal};

/// Roughly three months of daily closes.
fn path(start: f64, daily: f64, days: usize) -> Vec<f64> {
    (0..days).map(|i| start + daily * i as f64).collect()
}

#[test]
fn test_steady_uptrend() {
    let signal = TrendSignal::evaluate(&path(100.0, 0.5, 63));

    assert_eq!(signal.light, TrendLight::Green);
    assert_eq!(signal.observations, 63);
}

#[test]
fn test_steady_downtrend() {
    let signal = TrendSignal::evaluate(&path(100.0, -0.5, 63));
    assert_eq!(signal.light, TrendLight::Red);
}

#[test]
fn test_fresh_reversal_is_ambiguous() {
    // A long rally followed by a two-day drop: the fast EMA turns down while
    // still above the slow one.
    let mut closes = path(100.0, 0.5, 60);
    closes.extend([125.0, 124.0]);

    let signal = TrendSignal::evaluate(&closes);
    assert_eq!(signal.light, TrendLight::Yellow);
    assert!(signal.fast_ema.unwrap() > signal.slow_ema.unwrap());
}

#[test]
fn test_custom_spans() {
    let config = TrendConfig {
        fast_span: 3,
        slow_span: 5,
        min_observations: 5,
    };

    let short = TrendSignal::evaluate_with(&config, &path(10.0, 1.0, 4));
    assert_eq!(short.light, TrendLight::Unknown);

    let enough = TrendSignal::evaluate_with(&config, &path(10.0, 1.0, 5));
    assert_eq!(enough.light, TrendLight::Green);
}

#[test]
fn test_empty_history() {
    let signal = TrendSignal::evaluate(&[]);

    assert_eq!(signal.light, TrendLight::Unknown);
    assert!(signal.summary().starts_with(TrendLight::Unknown.symbol()));
}
