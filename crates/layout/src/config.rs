use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Replace a parent without any visual contribution by its only child.
    ///
    /// Defaults to `true`.
    pub collapse_unattributed_elements: bool,
    /// Precision used when writing bias and percentage values.
    ///
    /// Defaults to `4`.
    pub decimal_places: usize,
    /// Tolerance in px under which two positions are treated as equal.
    ///
    /// Defaults to `0.5`.
    pub relative_epsilon: f32,
    /// Emit `start`/`end` anchor names instead of `left`/`right`, and mirror
    /// horizontal bias for `direction: rtl` containers.
    ///
    /// Defaults to `false`.
    pub supports_rtl: bool,
    /// Size percentage children of constraint containers with
    /// `layout_constraintWidth_percent` instead of a fixed px value.
    ///
    /// Defaults to `true`.
    pub constraint_percent_dimensions: bool,
    /// The gap used for `column-gap: normal`, in px.
    ///
    /// Defaults to `16`.
    pub default_column_gap: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            collapse_unattributed_elements: true,
            decimal_places: 4,
            relative_epsilon: 0.5,
            supports_rtl: false,
            constraint_percent_dimensions: true,
            default_column_gap: 16.0,
        }
    }
}
