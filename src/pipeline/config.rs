use crate::error::PipelineError;
use anchorage_layout::LayoutConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;

fn default_indent() -> usize {
    4
}

/// Options for the written layout files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputOptions {
    /// Indent nested elements. Defaults to `true`.
    pub pretty_print: bool,
    /// Spaces per nesting level when pretty printing. Defaults to `4`.
    #[serde(default = "default_indent")]
    pub indent: usize,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            pretty_print: true,
            indent: default_indent(),
        }
    }
}

/// Everything that can be configured for one conversion, as loaded from a
/// JSON configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    pub layout: LayoutConfig,
    #[serde(flatten)]
    pub output: OutputOptions,
}

impl PipelineConfig {
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| {
            PipelineError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read configuration from '{}': {}", path.display(), e),
            ))
        })?;
        Self::from_json(&source)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        let layout = &self.layout;
        if !(layout.relative_epsilon.is_finite() && layout.relative_epsilon >= 0.0) {
            return Err(PipelineError::Config(format!(
                "relative_epsilon must be a non-negative number, got {}",
                layout.relative_epsilon
            )));
        }
        if layout.decimal_places > 8 {
            return Err(PipelineError::Config(format!(
                "decimal_places must be at most 8, got {}",
                layout.decimal_places
            )));
        }
        if !(layout.default_column_gap.is_finite() && layout.default_column_gap >= 0.0) {
            return Err(PipelineError::Config(format!(
                "default_column_gap must be a non-negative number, got {}",
                layout.default_column_gap
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_the_default() {
        let config = PipelineConfig::from_json("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert!(config.output.pretty_print);
        assert_eq!(config.layout.decimal_places, 4);
    }

    #[test]
    fn layout_and_output_options_are_read() {
        let config = PipelineConfig::from_json(
            r#"{ "layout": { "supports_rtl": true, "decimal_places": 2 }, "prettyPrint": false, "indent": 2 }"#,
        )
        .unwrap();
        assert!(config.layout.supports_rtl);
        assert_eq!(config.layout.decimal_places, 2);
        assert!(config.layout.collapse_unattributed_elements);
        assert!(!config.output.pretty_print);
        assert_eq!(config.output.indent, 2);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let result = PipelineConfig::from_json(r#"{ "layout": { "relative_epsilon": -1.0 } }"#);
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }
}
