//! Majority voting over neighbor labels.

use std::collections::BTreeMap;

use super::Label;

/// Return the most frequent label, or `None` for an empty input.
///
/// Ties between equally frequent labels resolve to the smallest label value,
/// so the result never depends on the order of `labels`.
pub fn majority_label<I>(labels: I) -> Option<Label>
where
    I: IntoIterator<Item = Label>,
{
    let mut counts: BTreeMap<Label, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut best: Option<(Label, usize)> = None;
    for (label, count) in counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((label, count)),
        }
    }

    best.map(|(label, _)| label)
}
