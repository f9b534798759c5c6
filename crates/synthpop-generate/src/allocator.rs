use serde::Serialize;

/// Exact number of customers assigned to one segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentCount {
    pub segment: String,
    pub count: usize,
}

/// Per-segment counts in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SegmentAllocation {
    counts: Vec<SegmentCount>,
}

impl SegmentAllocation {
    pub fn counts(&self) -> &[SegmentCount] {
        &self.counts
    }

    pub fn get(&self, segment: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|entry| entry.segment == segment)
            .map(|entry| entry.count)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|entry| entry.count).sum()
    }

    /// One label per unit: the first segment repeated `count` times, then the next.
    pub fn expand(&self) -> Vec<&str> {
        let mut labels = Vec::with_capacity(self.total());
        for entry in &self.counts {
            labels.extend(std::iter::repeat_n(entry.segment.as_str(), entry.count));
        }
        labels
    }
}

/// Partition `n` units across weighted segments so the counts sum to `n` exactly.
///
/// Every segment but the last receives `floor(n * weight)`, capped at what is
/// still unassigned. The weight sum is not checked here; drift is absorbed by
/// the last segment. With no segments the allocation is empty.
pub fn allocate<S: AsRef<str>>(n: usize, weights: &[(S, f64)]) -> SegmentAllocation {
    let mut counts = Vec::with_capacity(weights.len());
    let mut assigned = 0_usize;

    for (index, (segment, weight)) in weights.iter().enumerate() {
        let count = if index + 1 == weights.len() {
            // Last segment takes the remainder. This is what keeps the total exact
            // when truncation (or a weight sum below 1.0) leaves units unassigned.
            n - assigned
        } else {
            let share = (n as f64 * weight.max(0.0)).floor() as usize;
            let count = share.min(n - assigned);
            assigned += count;
            count
        };
        counts.push(SegmentCount {
            segment: segment.as_ref().to_string(),
            count,
        });
    }

    SegmentAllocation { counts }
}
