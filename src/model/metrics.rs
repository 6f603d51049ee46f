//! Evaluation metrics for the held-out test split.
//!
//! Every metric returns `None` for empty input or when the two slices differ in
//! length.

pub fn mae(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    paired(actual, predicted)?;
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum();
    Some(sum / actual.len() as f64)
}

pub fn rmse(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    paired(actual, predicted)?;
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    Some((sum / actual.len() as f64).sqrt())
}

/// Share of predictions equal to the label.
pub fn accuracy(labels: &[bool], predicted: &[bool]) -> Option<f64> {
    paired(labels, predicted)?;
    let hits = labels.iter().zip(predicted).filter(|(l, p)| l == p).count();
    Some(hits as f64 / labels.len() as f64)
}

/// Area under the ROC curve, computed from score ranks (Mann-Whitney U) with
/// tied scores sharing their average rank.
///
/// `None` unless both classes are present.
pub fn roc_auc(labels: &[bool], scores: &[f64]) -> Option<f64> {
    paired(labels, scores)?;
    let positives = labels.iter().filter(|l| **l).count();
    let negatives = labels.len() - positives;
    if positives == 0 || negatives == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));
    let mut ranks = vec![0.0; scores.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        // Ranks are 1-based; the tie group covers ranks start+1..=end.
        let average = (start + 1 + end) as f64 / 2.0;
        for &index in &order[start..end] {
            ranks[index] = average;
        }
        start = end;
    }

    let positive_rank_sum: f64 = labels
        .iter()
        .zip(&ranks)
        .filter(|(l, _)| **l)
        .map(|(_, r)| r)
        .sum();
    let p = positives as f64;
    let u = positive_rank_sum - p * (p + 1.0) / 2.0;
    Some(u / (p * negatives as f64))
}

fn paired<A, B>(a: &[A], b: &[B]) -> Option<()> {
    (!a.is_empty() && a.len() == b.len()).then_some(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_mae_and_rmse() {
        let actual = [1.0, 2.0, 3.0, 4.0];
        let predicted = [1.0, 3.0, 1.0, 4.0];
        assert_abs_diff_eq!(mae(&actual, &predicted).unwrap(), 0.75);
        assert_abs_diff_eq!(rmse(&actual, &predicted).unwrap(), (5.0f64 / 4.0).sqrt());
    }

    #[test]
    fn test_empty_or_mismatched_input() {
        assert_eq!(mae(&[], &[]), None);
        assert_eq!(rmse(&[1.0], &[1.0, 2.0]), None);
        assert_eq!(accuracy(&[], &[]), None);
    }

    #[test]
    fn test_accuracy() {
        let labels = [true, false, true, false];
        let predicted = [true, true, true, false];
        assert_abs_diff_eq!(accuracy(&labels, &predicted).unwrap(), 0.75);
    }

    #[test]
    fn test_roc_auc_perfect_and_inverted() {
        let labels = [false, false, true, true];
        assert_abs_diff_eq!(roc_auc(&labels, &[0.1, 0.2, 0.8, 0.9]).unwrap(), 1.0);
        assert_abs_diff_eq!(roc_auc(&labels, &[0.9, 0.8, 0.2, 0.1]).unwrap(), 0.0);
    }

    #[test]
    fn test_roc_auc_ties_count_half() {
        let labels = [false, true];
        assert_abs_diff_eq!(roc_auc(&labels, &[0.5, 0.5]).unwrap(), 0.5);
        let labels = [false, false, true, true];
        // One positive ties with one negative, the other positive is ranked above all.
        assert_abs_diff_eq!(roc_auc(&labels, &[0.1, 0.4, 0.4, 0.9]).unwrap(), 0.875);
    }

    #[test]
    fn test_roc_auc_needs_both_classes() {
        assert_eq!(roc_auc(&[true, true], &[0.3, 0.6]), None);
        assert_eq!(roc_auc(&[false], &[0.3]), None);
    }
}
