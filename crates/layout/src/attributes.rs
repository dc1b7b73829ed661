//! Typed platform attributes and the per-node attribute bag.
//!
//! Every attribute the engine emits has a variant here. Names are built from
//! the variant, never concatenated by callers.

use anchorage_types::{Axis, Edge};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Namespace {
    Android,
    App,
}

impl Namespace {
    pub fn prefix(self) -> &'static str {
        match self {
            Namespace::Android => "android",
            Namespace::App => "app",
        }
    }

    pub fn uri(self) -> &'static str {
        match self {
            Namespace::Android => "http://schemas.android.com/apk/res/android",
            Namespace::App => "http://schemas.android.com/apk/res-auto",
        }
    }
}

/// Edge-to-edge relations of a constraint layout child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstraintRelation {
    LeftToLeftOf,
    LeftToRightOf,
    RightToRightOf,
    RightToLeftOf,
    StartToStartOf,
    StartToEndOf,
    EndToEndOf,
    EndToStartOf,
    TopToTopOf,
    TopToBottomOf,
    BottomToBottomOf,
    BottomToTopOf,
    BaselineToBaselineOf,
}

impl ConstraintRelation {
    pub fn name(self) -> &'static str {
        match self {
            ConstraintRelation::LeftToLeftOf => "layout_constraintLeft_toLeftOf",
            ConstraintRelation::LeftToRightOf => "layout_constraintLeft_toRightOf",
            ConstraintRelation::RightToRightOf => "layout_constraintRight_toRightOf",
            ConstraintRelation::RightToLeftOf => "layout_constraintRight_toLeftOf",
            ConstraintRelation::StartToStartOf => "layout_constraintStart_toStartOf",
            ConstraintRelation::StartToEndOf => "layout_constraintStart_toEndOf",
            ConstraintRelation::EndToEndOf => "layout_constraintEnd_toEndOf",
            ConstraintRelation::EndToStartOf => "layout_constraintEnd_toStartOf",
            ConstraintRelation::TopToTopOf => "layout_constraintTop_toTopOf",
            ConstraintRelation::TopToBottomOf => "layout_constraintTop_toBottomOf",
            ConstraintRelation::BottomToBottomOf => "layout_constraintBottom_toBottomOf",
            ConstraintRelation::BottomToTopOf => "layout_constraintBottom_toTopOf",
            ConstraintRelation::BaselineToBaselineOf => "layout_constraintBaseline_toBaselineOf",
        }
    }

    /// The start/end form of a left/right relation.
    pub fn to_directional(self) -> Self {
        match self {
            ConstraintRelation::LeftToLeftOf => ConstraintRelation::StartToStartOf,
            ConstraintRelation::LeftToRightOf => ConstraintRelation::StartToEndOf,
            ConstraintRelation::RightToRightOf => ConstraintRelation::EndToEndOf,
            ConstraintRelation::RightToLeftOf => ConstraintRelation::EndToStartOf,
            other => other,
        }
    }
}

/// Rules of a relative layout child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelativeRule {
    AlignParentLeft,
    AlignParentRight,
    AlignParentStart,
    AlignParentEnd,
    AlignParentTop,
    AlignParentBottom,
    CenterHorizontal,
    CenterVertical,
    CenterInParent,
    AlignLeft,
    AlignRight,
    AlignStart,
    AlignEnd,
    AlignTop,
    AlignBottom,
    AlignBaseline,
    ToLeftOf,
    ToRightOf,
    ToStartOf,
    ToEndOf,
    Above,
    Below,
}

impl RelativeRule {
    pub fn name(self) -> &'static str {
        match self {
            RelativeRule::AlignParentLeft => "layout_alignParentLeft",
            RelativeRule::AlignParentRight => "layout_alignParentRight",
            RelativeRule::AlignParentStart => "layout_alignParentStart",
            RelativeRule::AlignParentEnd => "layout_alignParentEnd",
            RelativeRule::AlignParentTop => "layout_alignParentTop",
            RelativeRule::AlignParentBottom => "layout_alignParentBottom",
            RelativeRule::CenterHorizontal => "layout_centerHorizontal",
            RelativeRule::CenterVertical => "layout_centerVertical",
            RelativeRule::CenterInParent => "layout_centerInParent",
            RelativeRule::AlignLeft => "layout_alignLeft",
            RelativeRule::AlignRight => "layout_alignRight",
            RelativeRule::AlignStart => "layout_alignStart",
            RelativeRule::AlignEnd => "layout_alignEnd",
            RelativeRule::AlignTop => "layout_alignTop",
            RelativeRule::AlignBottom => "layout_alignBottom",
            RelativeRule::AlignBaseline => "layout_alignBaseline",
            RelativeRule::ToLeftOf => "layout_toLeftOf",
            RelativeRule::ToRightOf => "layout_toRightOf",
            RelativeRule::ToStartOf => "layout_toStartOf",
            RelativeRule::ToEndOf => "layout_toEndOf",
            RelativeRule::Above => "layout_above",
            RelativeRule::Below => "layout_below",
        }
    }

    /// Rules relative to the parent take `true` instead of a sibling id.
    pub fn targets_parent(self) -> bool {
        matches!(
            self,
            RelativeRule::AlignParentLeft
                | RelativeRule::AlignParentRight
                | RelativeRule::AlignParentStart
                | RelativeRule::AlignParentEnd
                | RelativeRule::AlignParentTop
                | RelativeRule::AlignParentBottom
                | RelativeRule::CenterHorizontal
                | RelativeRule::CenterVertical
                | RelativeRule::CenterInParent
        )
    }

    pub fn to_directional(self) -> Self {
        match self {
            RelativeRule::AlignParentLeft => RelativeRule::AlignParentStart,
            RelativeRule::AlignParentRight => RelativeRule::AlignParentEnd,
            RelativeRule::AlignLeft => RelativeRule::AlignStart,
            RelativeRule::AlignRight => RelativeRule::AlignEnd,
            RelativeRule::ToLeftOf => RelativeRule::ToStartOf,
            RelativeRule::ToRightOf => RelativeRule::ToEndOf,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeKey {
    Id,
    LayoutWidth,
    LayoutHeight,
    Margin(Edge),
    Padding(Edge),
    Orientation,
    Gravity,
    LayoutGravity,
    LayoutWeight,
    BaselineAligned,
    BaselineAlignedChildIndex,
    ColumnCount,
    Visibility,
    Text,
    Src,
    ScaleType,
    AdjustViewBounds,
    ContentDescription,
    InputType,
    Hint,
    Checked,
    MinLines,
    Background,
    ShadowColor,
    ShadowDx,
    ShadowDy,
    ShadowRadius,
    TranslationX,
    TranslationY,
    MinWidth,
    MinHeight,
    MaxWidth,
    MaxHeight,
    Relative(RelativeRule),
    Constraint(ConstraintRelation),
    ChainStyle(Axis),
    Bias(Axis),
    ChainWeight(Axis),
    Constrained(Axis),
    DimensionPercent(Axis),
    DimensionMin(Axis),
    DimensionMax(Axis),
    GuideBegin,
    GuidePercent,
    BarrierDirection,
    ReferencedIds,
}

fn axis_name(axis: Axis) -> &'static str {
    match axis {
        Axis::Horizontal => "Horizontal",
        Axis::Vertical => "Vertical",
    }
}

fn dimension_name(axis: Axis) -> &'static str {
    match axis {
        Axis::Horizontal => "Width",
        Axis::Vertical => "Height",
    }
}

fn edge_name(edge: Edge) -> &'static str {
    match edge {
        Edge::Top => "Top",
        Edge::Right => "Right",
        Edge::Bottom => "Bottom",
        Edge::Left => "Left",
    }
}

impl AttributeKey {
    pub fn namespace(&self) -> Namespace {
        match self {
            AttributeKey::Constraint(_)
            | AttributeKey::ChainStyle(_)
            | AttributeKey::Bias(_)
            | AttributeKey::ChainWeight(_)
            | AttributeKey::Constrained(_)
            | AttributeKey::DimensionPercent(_)
            | AttributeKey::DimensionMin(_)
            | AttributeKey::DimensionMax(_)
            | AttributeKey::GuideBegin
            | AttributeKey::GuidePercent
            | AttributeKey::BarrierDirection
            | AttributeKey::ReferencedIds => Namespace::App,
            _ => Namespace::Android,
        }
    }

    /// The attribute name without its namespace prefix.
    pub fn name(&self) -> String {
        match self {
            AttributeKey::Id => "id".into(),
            AttributeKey::LayoutWidth => "layout_width".into(),
            AttributeKey::LayoutHeight => "layout_height".into(),
            AttributeKey::Margin(edge) => format!("layout_margin{}", edge_name(*edge)),
            AttributeKey::Padding(edge) => format!("padding{}", edge_name(*edge)),
            AttributeKey::Orientation => "orientation".into(),
            AttributeKey::Gravity => "gravity".into(),
            AttributeKey::LayoutGravity => "layout_gravity".into(),
            AttributeKey::LayoutWeight => "layout_weight".into(),
            AttributeKey::BaselineAligned => "baselineAligned".into(),
            AttributeKey::BaselineAlignedChildIndex => "baselineAlignedChildIndex".into(),
            AttributeKey::ColumnCount => "columnCount".into(),
            AttributeKey::Visibility => "visibility".into(),
            AttributeKey::Text => "text".into(),
            AttributeKey::Src => "src".into(),
            AttributeKey::ScaleType => "scaleType".into(),
            AttributeKey::AdjustViewBounds => "adjustViewBounds".into(),
            AttributeKey::ContentDescription => "contentDescription".into(),
            AttributeKey::InputType => "inputType".into(),
            AttributeKey::Hint => "hint".into(),
            AttributeKey::Checked => "checked".into(),
            AttributeKey::MinLines => "minLines".into(),
            AttributeKey::Background => "background".into(),
            AttributeKey::ShadowColor => "shadowColor".into(),
            AttributeKey::ShadowDx => "shadowDx".into(),
            AttributeKey::ShadowDy => "shadowDy".into(),
            AttributeKey::ShadowRadius => "shadowRadius".into(),
            AttributeKey::TranslationX => "translationX".into(),
            AttributeKey::TranslationY => "translationY".into(),
            AttributeKey::MinWidth => "minWidth".into(),
            AttributeKey::MinHeight => "minHeight".into(),
            AttributeKey::MaxWidth => "maxWidth".into(),
            AttributeKey::MaxHeight => "maxHeight".into(),
            AttributeKey::Relative(rule) => rule.name().into(),
            AttributeKey::Constraint(relation) => relation.name().into(),
            AttributeKey::ChainStyle(axis) => {
                format!("layout_constraint{}_chainStyle", axis_name(*axis))
            }
            AttributeKey::Bias(axis) => format!("layout_constraint{}_bias", axis_name(*axis)),
            AttributeKey::ChainWeight(axis) => {
                format!("layout_constraint{}_weight", axis_name(*axis))
            }
            AttributeKey::Constrained(axis) => format!("layout_constrained{}", dimension_name(*axis)),
            AttributeKey::DimensionPercent(axis) => {
                format!("layout_constraint{}_percent", dimension_name(*axis))
            }
            AttributeKey::DimensionMin(axis) => {
                format!("layout_constraint{}_min", dimension_name(*axis))
            }
            AttributeKey::DimensionMax(axis) => {
                format!("layout_constraint{}_max", dimension_name(*axis))
            }
            AttributeKey::GuideBegin => "layout_constraintGuide_begin".into(),
            AttributeKey::GuidePercent => "layout_constraintGuide_percent".into(),
            AttributeKey::BarrierDirection => "barrierDirection".into(),
            AttributeKey::ReferencedIds => "constraint_referenced_ids".into(),
        }
    }

    /// `namespace:name`, as written to the layout file.
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.namespace().prefix(), self.name())
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

/// The emitted attributes of one node, in deterministic key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeBag {
    values: BTreeMap<AttributeKey, String>,
}

impl AttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `value` unless `overwrite` is false and the key already has one.
    /// Returns whether the value was stored.
    pub fn set(&mut self, key: AttributeKey, value: impl Into<String>, overwrite: bool) -> bool {
        if !overwrite && self.values.contains_key(&key) {
            return false;
        }
        self.values.insert(key, value.into());
        true
    }

    pub fn put(&mut self, key: AttributeKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: AttributeKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    pub fn has(&self, key: AttributeKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn remove(&mut self, key: AttributeKey) -> Option<String> {
        self.values.remove(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttributeKey, &str)> {
        self.values.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn namespaces(&self) -> impl Iterator<Item = Namespace> + '_ {
        let mut seen: Vec<Namespace> = self.values.keys().map(|k| k.namespace()).collect();
        seen.sort();
        seen.dedup();
        seen.into_iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
