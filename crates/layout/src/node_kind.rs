/// The native control a node is rendered as.
///
/// Layout containers are the variants that own children; everything else is a
/// leaf widget or a synthetic helper line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ContainerType {
    #[default]
    Unknown,
    Text,
    Line,
    Image,
    Edit,
    Select,
    Checkbox,
    Radio,
    Button,
    Range,
    Space,
    Block,
    Frame,
    Linear,
    Grid,
    Relative,
    Constraint,
    Guideline,
    Barrier,
}

impl ContainerType {
    /// The fully qualified control name written to the layout file.
    pub fn control_name(&self) -> &'static str {
        match self {
            ContainerType::Unknown | ContainerType::Line | ContainerType::Block => "View",
            ContainerType::Text => "TextView",
            ContainerType::Image => "ImageView",
            ContainerType::Edit => "EditText",
            ContainerType::Select => "Spinner",
            ContainerType::Checkbox => "CheckBox",
            ContainerType::Radio => "RadioButton",
            ContainerType::Button => "Button",
            ContainerType::Range => "SeekBar",
            ContainerType::Space => "Space",
            ContainerType::Frame => "FrameLayout",
            ContainerType::Linear => "LinearLayout",
            ContainerType::Grid => "GridLayout",
            ContainerType::Relative => "RelativeLayout",
            ContainerType::Constraint => "androidx.constraintlayout.widget.ConstraintLayout",
            ContainerType::Guideline => "androidx.constraintlayout.widget.Guideline",
            ContainerType::Barrier => "androidx.constraintlayout.widget.Barrier",
        }
    }

    /// Prefix used for generated document ids, e.g. `textview_1`.
    pub fn id_prefix(&self) -> String {
        let name = self.control_name();
        let short = name.rsplit('.').next().unwrap_or(name);
        short.to_ascii_lowercase()
    }

    /// Whether the control positions child views.
    pub fn is_layout(&self) -> bool {
        matches!(
            self,
            ContainerType::Frame
                | ContainerType::Linear
                | ContainerType::Grid
                | ContainerType::Relative
                | ContainerType::Constraint
        )
    }

    /// Containers whose children are placed with anchors.
    pub fn is_anchored(&self) -> bool {
        matches!(self, ContainerType::Relative | ContainerType::Constraint)
    }

    pub fn is_helper(&self) -> bool {
        matches!(self, ContainerType::Guideline | ContainerType::Barrier)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerType::Unknown => "Unknown",
            ContainerType::Text => "Text",
            ContainerType::Line => "Line",
            ContainerType::Image => "Image",
            ContainerType::Edit => "Edit",
            ContainerType::Select => "Select",
            ContainerType::Checkbox => "Checkbox",
            ContainerType::Radio => "Radio",
            ContainerType::Button => "Button",
            ContainerType::Range => "Range",
            ContainerType::Space => "Space",
            ContainerType::Block => "Block",
            ContainerType::Frame => "Frame",
            ContainerType::Linear => "Linear",
            ContainerType::Grid => "Grid",
            ContainerType::Relative => "Relative",
            ContainerType::Constraint => "Constraint",
            ContainerType::Guideline => "Guideline",
            ContainerType::Barrier => "Barrier",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_prefix_uses_short_control_name() {
        assert_eq!(ContainerType::Constraint.id_prefix(), "constraintlayout");
        assert_eq!(ContainerType::Text.id_prefix(), "textview");
        assert_eq!(ContainerType::Guideline.id_prefix(), "guideline");
    }

    #[test]
    fn only_containers_are_layouts() {
        assert!(ContainerType::Linear.is_layout());
        assert!(!ContainerType::Text.is_layout());
        assert!(ContainerType::Relative.is_anchored());
        assert!(!ContainerType::Frame.is_anchored());
    }
}
