use bitflags::bitflags;

bitflags! {
    /// How the children of a classified layout are arranged.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Alignment: u32 {
        const UNKNOWN = 1;
        const HORIZONTAL = 1 << 1;
        const VERTICAL = 1 << 2;
        const ABSOLUTE = 1 << 3;
        const FLOAT = 1 << 4;
        const COLUMN = 1 << 5;
        const AUTO_LAYOUT = 1 << 6;
        const SINGLE = 1 << 7;
        /// A synthetic group holding right-floated items.
        const RIGHT = 1 << 8;
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Alignment::empty()
    }
}

impl Alignment {
    #[inline]
    pub fn has_any(self, mask: Alignment) -> bool {
        self.intersects(mask)
    }

    #[inline]
    pub fn has_all(self, mask: Alignment) -> bool {
        !mask.is_empty() && self.contains(mask)
    }

    /// Whether the children form a single row.
    #[inline]
    pub fn is_row(self) -> bool {
        self.contains(Alignment::HORIZONTAL)
    }
}
