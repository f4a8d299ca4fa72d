use crate::domain::{ResultSeries, SampledRow};
use tracing::debug;

/// Thins a dense result series into display rows spaced by `interval` along
/// the channel.
///
/// The first and last points are always present. In between, each threshold
/// `k * interval` selects the first point at or beyond it. A non-positive or
/// non-finite interval keeps only the end points.
pub fn sample(series: &ResultSeries, interval: f64) -> Vec<SampledRow> {
    sample_indices(series.positions(), interval)
        .into_iter()
        .filter_map(|index| series.row(index))
        .collect()
}

/// Indices selected by [`sample`] for a non-decreasing position profile.
pub fn sample_indices(positions: &[f64], interval: f64) -> Vec<usize> {
    let Some(&last_position) = positions.last() else {
        return Vec::new();
    };
    let last_index = positions.len() - 1;

    let mut selected = vec![0];
    if interval.is_finite() && interval > 0.0 {
        let mut cursor = 0;
        let mut threshold = interval;
        while threshold.is_finite() && threshold <= last_position {
            while cursor < positions.len() && positions[cursor] < threshold {
                cursor += 1;
            }
            let Some(&position) = positions.get(cursor) else {
                break;
            };
            if selected.last().is_none_or(|previous| cursor > *previous) {
                selected.push(cursor);
            }
            // Thresholds up to `position` resolve to the same point.
            let next = interval * ((position / interval).floor() + 1.0);
            threshold = if next.is_finite() && next > position {
                next
            } else {
                // `interval` is below the float spacing at `position`.
                match positions[cursor..].iter().find(|&&later| later > position) {
                    Some(&later) => later,
                    None => break,
                }
            };
        }
    }

    let last_emitted = selected.last().copied().unwrap_or(0);
    if positions[last_index] > positions[last_emitted] {
        selected.push(last_index);
    } else if let Some(tail) = selected.last_mut() {
        *tail = last_index;
    }

    debug!(
        points = positions.len(),
        interval,
        rows = selected.len(),
        "sampled result series"
    );
    selected
}
