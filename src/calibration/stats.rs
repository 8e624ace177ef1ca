//! Point estimates over error distributions.

/// Median with linear interpolation between the two middle values for
/// even-sized inputs. Returns `None` for an empty slice.
///
/// The slice is sorted in place (total order, so NaN sorts last).
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));

    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Median of a borrowed slice, leaving the input untouched.
pub fn median_of(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    median(&mut sorted)
}
