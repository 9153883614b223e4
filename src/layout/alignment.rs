//! Alignment flags for items placed in a layout.

use bitflags::bitflags;

bitflags! {
    /// Horizontal and vertical alignment of an item within its cell.
    ///
    /// At most one horizontal and one vertical flag is meaningful; an empty
    /// projection means "fill the cell" (justify) on that axis.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Alignment: u8 {
        const LEFT    = 0b0000_0001;
        const RIGHT   = 0b0000_0010;
        const CENTER  = 0b0000_0100;
        const JUSTIFY = 0b0000_1000;
        const TOP     = 0b0001_0000;
        const MIDDLE  = 0b0010_0000;
        const BOTTOM  = 0b0100_0000;

        const HORIZONTAL_MASK = Self::LEFT.bits()
            | Self::RIGHT.bits()
            | Self::CENTER.bits()
            | Self::JUSTIFY.bits();
        const VERTICAL_MASK = Self::TOP.bits() | Self::MIDDLE.bits() | Self::BOTTOM.bits();
    }
}

/// A single horizontal alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Right,
    Center,
    Justify,
}

/// A single vertical alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

impl Alignment {
    /// The horizontal component. When several horizontal flags are set the
    /// first of left, right, center, justify wins.
    pub fn horizontal(self) -> Option<HAlign> {
        if self.contains(Alignment::LEFT) {
            Some(HAlign::Left)
        } else if self.contains(Alignment::RIGHT) {
            Some(HAlign::Right)
        } else if self.contains(Alignment::CENTER) {
            Some(HAlign::Center)
        } else if self.contains(Alignment::JUSTIFY) {
            Some(HAlign::Justify)
        } else {
            None
        }
    }

    /// The vertical component, first of top, middle, bottom.
    pub fn vertical(self) -> Option<VAlign> {
        if self.contains(Alignment::TOP) {
            Some(VAlign::Top)
        } else if self.contains(Alignment::MIDDLE) {
            Some(VAlign::Middle)
        } else if self.contains(Alignment::BOTTOM) {
            Some(VAlign::Bottom)
        } else {
            None
        }
    }

    /// Bits understood by the client sizing algorithm: left 0x1, right 0x2,
    /// center 0x4, top 0x10, bottom 0x20, middle 0x40. Justify has no bit.
    pub fn client_bits(self) -> u32 {
        let h = match self.horizontal() {
            Some(HAlign::Left) => 0x1,
            Some(HAlign::Right) => 0x2,
            Some(HAlign::Center) => 0x4,
            Some(HAlign::Justify) | None => 0,
        };
        let v = match self.vertical() {
            Some(VAlign::Top) => 0x10,
            Some(VAlign::Bottom) => 0x20,
            Some(VAlign::Middle) => 0x40,
            None => 0,
        };
        h | v
    }
}
