//! Grouping primitives.
//!
//! The group counts here are tiny (4 weather categories, 24 hours, 2 flags),
//! so groups live in a `Vec` scanned linearly; this keeps first-appearance
//! order without an ordered-map dependency.

/// Incremental mean accumulator.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanAcc {
    sum: f64,
    n: usize,
}

impl MeanAcc {
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.n += 1;
    }

    pub fn count(&self) -> usize {
        self.n
    }

    /// Mean of the accumulated values; `None` when nothing was pushed.
    pub fn mean(&self) -> Option<f64> {
        if self.n == 0 {
            None
        } else {
            Some(self.sum / self.n as f64)
        }
    }
}

/// Fold items into per-key accumulators, preserving first-appearance key order.
pub fn group_fold<T, K, A>(
    items: impl Iterator<Item = T>,
    key: impl Fn(&T) -> K,
    fold: impl Fn(&mut A, &T),
) -> Vec<(K, A)>
where
    K: PartialEq,
    A: Default,
{
    let mut groups: Vec<(K, A)> = Vec::new();
    for item in items {
        let k = key(&item);
        match groups.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, acc)) => fold(acc, &item),
            None => {
                let mut acc = A::default();
                fold(&mut acc, &item);
                groups.push((k, acc));
            }
        }
    }
    groups
}

/// Group means of a numeric value, in first-appearance key order.
pub fn group_mean<T, K: PartialEq>(
    items: impl Iterator<Item = T>,
    key: impl Fn(&T) -> K,
    value: impl Fn(&T) -> f64,
) -> Vec<(K, f64)> {
    group_fold::<T, K, MeanAcc>(items, key, |acc, item| acc.push(value(item)))
        .into_iter()
        // Groups only exist because at least one row matched, so the mean is
        // always defined here.
        .filter_map(|(k, acc)| acc.mean().map(|m| (k, m)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_acc_empty_is_none() {
        let acc = MeanAcc::default();
        assert_eq!(acc.mean(), None);
        assert_eq!(acc.count(), 0);
    }

    #[test]
    fn mean_acc_averages() {
        let mut acc = MeanAcc::default();
        acc.push(100.0);
        acc.push(200.0);
        assert_eq!(acc.mean(), Some(150.0));
    }

    #[test]
    fn group_fold_preserves_first_appearance_order() {
        let items = ["b", "a", "b", "c", "a"];
        let groups = group_fold::<_, _, MeanAcc>(
            items.iter(),
            |s| **s,
            |acc, _| acc.push(1.0),
        );
        let keys: Vec<&str> = groups.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(groups[0].1.count(), 2);
        assert_eq!(groups[2].1.count(), 1);
    }

    #[test]
    fn group_mean_basic() {
        let items = [("x", 10.0), ("y", 1.0), ("x", 20.0)];
        let means = group_mean(items.iter(), |(k, _)| *k, |(_, v)| *v);
        assert_eq!(means, vec![("x", 15.0), ("y", 1.0)]);
    }
}
