use serde::{Deserialize, Serialize};

/// The two layout axes. `Horizontal` is the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Axis::Horizontal)
    }

    pub fn cross(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// Near (start) and far (end) edge of this axis.
    pub fn edges(self) -> (Edge, Edge) {
        match self {
            Axis::Horizontal => (Edge::Left, Edge::Right),
            Axis::Vertical => (Edge::Top, Edge::Bottom),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Horizontal => "horizontal",
            Axis::Vertical => "vertical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub fn axis(self) -> Axis {
        match self {
            Edge::Left | Edge::Right => Axis::Horizontal,
            Edge::Top | Edge::Bottom => Axis::Vertical,
        }
    }

    pub fn opposite(self) -> Edge {
        match self {
            Edge::Top => Edge::Bottom,
            Edge::Right => Edge::Left,
            Edge::Bottom => Edge::Top,
            Edge::Left => Edge::Right,
        }
    }

    pub fn is_near(self) -> bool {
        matches!(self, Edge::Top | Edge::Left)
    }
}

/// Per-edge values (margins, paddings, border widths, box adjustments).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Edges {
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn all(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn x(value: f32) -> Self {
        Self::new(0.0, value, 0.0, value)
    }

    pub fn y(value: f32) -> Self {
        Self::new(value, 0.0, value, 0.0)
    }

    pub fn get(&self, edge: Edge) -> f32 {
        match edge {
            Edge::Top => self.top,
            Edge::Right => self.right,
            Edge::Bottom => self.bottom,
            Edge::Left => self.left,
        }
    }

    pub fn get_mut(&mut self, edge: Edge) -> &mut f32 {
        match edge {
            Edge::Top => &mut self.top,
            Edge::Right => &mut self.right,
            Edge::Bottom => &mut self.bottom,
            Edge::Left => &mut self.left,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    pub fn sum(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.horizontal(),
            Axis::Vertical => self.vertical(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0 && self.left == 0.0
    }
}

/// An axis aligned rectangle stored with all four edges resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BoxRect {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl BoxRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            top,
            right: left + width,
            bottom: top + height,
            left,
            width,
            height,
        }
    }

    pub fn from_edges(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
            width: right - left,
            height: bottom - top,
        }
    }

    pub fn edge(&self, edge: Edge) -> f32 {
        match edge {
            Edge::Top => self.top,
            Edge::Right => self.right,
            Edge::Bottom => self.bottom,
            Edge::Left => self.left,
        }
    }

    pub fn size(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Grows the rectangle outwards by `edges` (negative values shrink it).
    pub fn expand(&self, edges: &Edges) -> Self {
        Self::from_edges(
            self.top - edges.top,
            self.right + edges.right,
            self.bottom + edges.bottom,
            self.left - edges.left,
        )
    }

    pub fn shrink(&self, edges: &Edges) -> Self {
        Self::from_edges(
            self.top + edges.top,
            self.right - edges.right,
            self.bottom - edges.bottom,
            self.left + edges.left,
        )
    }

    pub fn union(&self, other: &BoxRect) -> Self {
        Self::from_edges(
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
            self.left.min(other.left),
        )
    }

    /// The overlapping area, or `None` when the rectangles are disjoint.
    pub fn intersection(&self, other: &BoxRect) -> Option<Self> {
        let rect = Self::from_edges(
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
            self.left.max(other.left),
        );
        (!rect.is_empty()).then_some(rect)
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.left + dx, self.top + dy, self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn overlaps_vertically(&self, other: &BoxRect) -> bool {
        self.top < other.bottom && other.top < self.bottom
    }

    pub fn overlaps_horizontally(&self, other: &BoxRect) -> bool {
        self.left < other.right && other.left < self.right
    }
}

impl<'de> Deserialize<'de> for BoxRect {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RectDef {
            #[serde(default)]
            left: f32,
            #[serde(default)]
            top: f32,
            #[serde(default)]
            width: f32,
            #[serde(default)]
            height: f32,
        }

        let def = RectDef::deserialize(deserializer)?;
        Ok(BoxRect::new(def.left, def.top, def.width, def.height))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }
}
