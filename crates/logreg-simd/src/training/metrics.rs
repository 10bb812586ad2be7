//! Binary classification metrics.

/// Probability at or above which a sample is assigned class 1.
pub const DECISION_THRESHOLD: f32 = 0.5;

/// Binary cross-entropy: -mean(y*log(p) + (1-y)*log(1-p))
///
/// Probabilities are clamped to `[1e-15, 1 - 1e-15]`. Empty input yields 0.
pub fn log_loss(probabilities: &[f32], labels: &[i32]) -> f64 {
    debug_assert_eq!(probabilities.len(), labels.len());
    const EPS: f64 = 1e-15;

    let n = probabilities.len().min(labels.len());
    if n == 0 {
        return 0.0;
    }
    let sum: f64 = probabilities
        .iter()
        .zip(labels)
        .map(|(&p, &l)| {
            let p = (p as f64).clamp(EPS, 1.0 - EPS);
            if l == 1 { -p.ln() } else { -(1.0 - p).ln() }
        })
        .sum();
    sum / n as f64
}

/// Fraction of probabilities that land on the correct side of [`DECISION_THRESHOLD`].
pub fn accuracy(probabilities: &[f32], labels: &[i32]) -> f64 {
    debug_assert_eq!(probabilities.len(), labels.len());
    let n = probabilities.len().min(labels.len());
    if n == 0 {
        return 0.0;
    }
    let correct = probabilities
        .iter()
        .zip(labels)
        .filter(|&(&p, &l)| i32::from(p >= DECISION_THRESHOLD) == l)
        .count();
    correct as f64 / n as f64
}

/// Fraction of predicted classes equal to the labels.
pub fn class_accuracy(classes: &[i32], labels: &[i32]) -> f64 {
    debug_assert_eq!(classes.len(), labels.len());
    let n = classes.len().min(labels.len());
    if n == 0 {
        return 0.0;
    }
    let correct = classes.iter().zip(labels).filter(|(c, l)| c == l).count();
    correct as f64 / n as f64
}
