//! Anchor bookkeeping for children of anchored containers.

use crate::attributes::{ConstraintRelation, RelativeRule};
use anchorage_types::{Axis, Edge, NodeId};
use std::collections::BTreeMap;

/// Which edge of the node is tied to which edge of the target.
///
/// Single names align the same edge (`Left` is left-to-left); pairs tie the
/// first edge of the node to the second edge of the target (`LeftRight` puts
/// the node's left edge on the target's right edge).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnchorPosition {
    Left,
    Right,
    Top,
    Bottom,
    Baseline,
    LeftRight,
    RightLeft,
    TopBottom,
    BottomTop,
    CenterHorizontal,
    CenterVertical,
}

impl AnchorPosition {
    pub fn axis(self) -> Axis {
        match self {
            AnchorPosition::Left
            | AnchorPosition::Right
            | AnchorPosition::LeftRight
            | AnchorPosition::RightLeft
            | AnchorPosition::CenterHorizontal => Axis::Horizontal,
            _ => Axis::Vertical,
        }
    }

    /// The edge of the anchored node this position constrains.
    pub fn node_edge(self) -> Option<Edge> {
        match self {
            AnchorPosition::Left | AnchorPosition::LeftRight => Some(Edge::Left),
            AnchorPosition::Right | AnchorPosition::RightLeft => Some(Edge::Right),
            AnchorPosition::Top | AnchorPosition::TopBottom => Some(Edge::Top),
            AnchorPosition::Bottom | AnchorPosition::BottomTop => Some(Edge::Bottom),
            _ => None,
        }
    }

    /// The position which aligns `edge` with the same edge of the target.
    pub fn aligned(edge: Edge) -> Self {
        match edge {
            Edge::Top => AnchorPosition::Top,
            Edge::Right => AnchorPosition::Right,
            Edge::Bottom => AnchorPosition::Bottom,
            Edge::Left => AnchorPosition::Left,
        }
    }

    /// The position which puts `edge` against the opposite edge of the target.
    pub fn adjacent(edge: Edge) -> Self {
        match edge {
            Edge::Top => AnchorPosition::TopBottom,
            Edge::Right => AnchorPosition::RightLeft,
            Edge::Bottom => AnchorPosition::BottomTop,
            Edge::Left => AnchorPosition::LeftRight,
        }
    }

    /// Swaps left and right, for mirrored rows.
    pub fn mirrored(self) -> Self {
        match self {
            AnchorPosition::Left => AnchorPosition::Right,
            AnchorPosition::Right => AnchorPosition::Left,
            AnchorPosition::LeftRight => AnchorPosition::RightLeft,
            AnchorPosition::RightLeft => AnchorPosition::LeftRight,
            other => other,
        }
    }

    pub fn constraint_relation(self) -> Option<ConstraintRelation> {
        Some(match self {
            AnchorPosition::Left => ConstraintRelation::LeftToLeftOf,
            AnchorPosition::Right => ConstraintRelation::RightToRightOf,
            AnchorPosition::Top => ConstraintRelation::TopToTopOf,
            AnchorPosition::Bottom => ConstraintRelation::BottomToBottomOf,
            AnchorPosition::Baseline => ConstraintRelation::BaselineToBaselineOf,
            AnchorPosition::LeftRight => ConstraintRelation::LeftToRightOf,
            AnchorPosition::RightLeft => ConstraintRelation::RightToLeftOf,
            AnchorPosition::TopBottom => ConstraintRelation::TopToBottomOf,
            AnchorPosition::BottomTop => ConstraintRelation::BottomToTopOf,
            AnchorPosition::CenterHorizontal | AnchorPosition::CenterVertical => return None,
        })
    }

    pub fn relative_rule(self, to_parent: bool) -> Option<RelativeRule> {
        let rule = if to_parent {
            match self {
                AnchorPosition::Left => RelativeRule::AlignParentLeft,
                AnchorPosition::Right => RelativeRule::AlignParentRight,
                AnchorPosition::Top => RelativeRule::AlignParentTop,
                AnchorPosition::Bottom => RelativeRule::AlignParentBottom,
                AnchorPosition::CenterHorizontal => RelativeRule::CenterHorizontal,
                AnchorPosition::CenterVertical => RelativeRule::CenterVertical,
                _ => return None,
            }
        } else {
            match self {
                AnchorPosition::Left => RelativeRule::AlignLeft,
                AnchorPosition::Right => RelativeRule::AlignRight,
                AnchorPosition::Top => RelativeRule::AlignTop,
                AnchorPosition::Bottom => RelativeRule::AlignBottom,
                AnchorPosition::Baseline => RelativeRule::AlignBaseline,
                AnchorPosition::LeftRight => RelativeRule::ToRightOf,
                AnchorPosition::RightLeft => RelativeRule::ToLeftOf,
                AnchorPosition::TopBottom => RelativeRule::Below,
                AnchorPosition::BottomTop => RelativeRule::Above,
                _ => return None,
            }
        };
        Some(rule)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnchorTarget {
    Parent,
    Node(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorRecord {
    pub target: AnchorTarget,
    pub horizontal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainStyle {
    Packed,
    Spread,
    SpreadInside,
}

impl ChainStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            ChainStyle::Packed => "packed",
            ChainStyle::Spread => "spread",
            ChainStyle::SpreadInside => "spread_inside",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GuidelineMode {
    Percent,
    Begin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GuidelineKey {
    pub axis: Axis,
    pub mode: GuidelineMode,
    pub edge: Edge,
}

/// Anchors of one node, plus the guidelines created inside it when it is a
/// container.
#[derive(Debug, Clone, Default)]
pub struct AnchorState {
    current: BTreeMap<AnchorPosition, AnchorRecord>,
    horizontal: bool,
    vertical: bool,
    guidelines: BTreeMap<GuidelineKey, BTreeMap<String, NodeId>>,
}

impl AnchorState {
    pub fn get(&self, position: AnchorPosition) -> Option<&AnchorRecord> {
        self.current.get(&position)
    }

    /// Records an anchor. A sibling anchor is only replaced when `overwrite` is set.
    pub fn insert(&mut self, position: AnchorPosition, target: AnchorTarget, overwrite: bool) -> bool {
        if let Some(existing) = self.current.get(&position)
            && !overwrite
            && matches!(existing.target, AnchorTarget::Node(_))
        {
            return false;
        }
        self.current.insert(
            position,
            AnchorRecord {
                target,
                horizontal: position.axis().is_horizontal(),
            },
        );
        true
    }

    pub fn remove(&mut self, position: AnchorPosition) -> Option<AnchorRecord> {
        self.current.remove(&position)
    }

    pub fn clear(&mut self, axis: Option<Axis>) -> Vec<AnchorPosition> {
        let removed: Vec<AnchorPosition> = self
            .current
            .keys()
            .copied()
            .filter(|p| axis.is_none_or(|a| p.axis() == a))
            .collect();
        for position in &removed {
            self.current.remove(position);
        }
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnchorPosition, &AnchorRecord)> {
        self.current.iter().map(|(p, r)| (*p, r))
    }

    /// Whether any anchor exists on `axis`.
    pub fn anchored(&self, axis: Axis) -> bool {
        self.current.keys().any(|p| p.axis() == axis)
    }

    pub fn targets(&self, axis: Axis) -> impl Iterator<Item = AnchorTarget> + '_ {
        self.current
            .iter()
            .filter(move |(p, _)| p.axis() == axis)
            .map(|(_, r)| r.target)
    }

    pub fn anchored_to_parent(&self, position: AnchorPosition) -> bool {
        self.get(position).is_some_and(|r| r.target == AnchorTarget::Parent)
    }

    /// Marks the axis as fully positioned. Never reverts.
    pub fn pin(&mut self, axis: Axis) {
        match axis {
            Axis::Horizontal => self.horizontal = true,
            Axis::Vertical => self.vertical = true,
        }
    }

    pub fn pinned(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    pub fn guideline(&self, key: GuidelineKey, value: &str) -> Option<NodeId> {
        self.guidelines.get(&key).and_then(|m| m.get(value)).copied()
    }

    pub fn cache_guideline(&mut self, key: GuidelineKey, value: String, id: NodeId) {
        self.guidelines.entry(key).or_default().insert(value, id);
    }

    pub fn guideline_count(&self) -> usize {
        self.guidelines.values().map(BTreeMap::len).sum()
    }
}
