/// Whether two pixel positions are equal within `epsilon`.
pub fn within_range(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() <= epsilon
}

/// Formats `value` with at most `decimals` fraction digits, without trailing zeros.
pub fn truncate(value: f32, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value);
    let trimmed = if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted.as_str()
    };
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Rounds `value` to `decimals` fraction digits.
pub fn round_to(value: f32, decimals: usize) -> f32 {
    let factor = 10f32.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Share of the free space placed before an item, given the space on both sides.
pub fn calculate_bias(start: f32, end: f32, decimals: usize) -> f32 {
    if start == 0.0 {
        0.0
    } else if end == 0.0 {
        1.0
    } else {
        round_to((start / (start + end)).max(0.0), decimals)
    }
}

/// Formats a pixel dimension the way layout attributes carry it.
pub fn format_px(value: f32) -> String {
    let rounded = value.round() as i64;
    format!("{}px", rounded)
}

/// Splits `items` into runs where `starts_new` says whether an item opens a new run.
pub fn split_runs<T: Copy>(items: &[T], mut starts_new: impl FnMut(&[T], T) -> bool) -> Vec<Vec<T>> {
    let mut runs: Vec<Vec<T>> = Vec::new();
    for &item in items {
        match runs.last_mut() {
            Some(current) if !starts_new(current, item) => current.push(item),
            _ => runs.push(vec![item]),
        }
    }
    runs
}
