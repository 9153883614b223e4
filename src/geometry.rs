//! Core geometry types: Length, Side, Spacing.
//!
//! These are the sizing primitives shared by widgets (declared widths and
//! heights), layouts (contents margins, initial section sizes) and the table
//! renderer (per-cell padding).

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Length
// ---------------------------------------------------------------------------

/// A CSS length as declared on the server side.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Length {
    /// Let the browser decide.
    #[default]
    Auto,
    /// An absolute size in CSS pixels.
    Pixels(f64),
    /// A size relative to the parent.
    Percentage(f64),
}

impl Length {
    /// Shorthand for [`Length::Pixels`].
    #[inline]
    pub const fn px(value: f64) -> Self {
        Length::Pixels(value)
    }

    /// Shorthand for [`Length::Percentage`].
    #[inline]
    pub const fn percent(value: f64) -> Self {
        Length::Percentage(value)
    }

    /// Whether this is [`Length::Auto`].
    #[inline]
    pub const fn is_auto(self) -> bool {
        matches!(self, Length::Auto)
    }

    /// Pixel value of an absolute length. Auto and percentages yield 0,
    /// since they cannot be resolved without the client.
    #[inline]
    pub fn to_pixels(self) -> i32 {
        match self {
            Length::Pixels(v) => v as i32,
            Length::Auto | Length::Percentage(_) => 0,
        }
    }

    /// CSS text for this length, or `None` for auto.
    pub fn css_text(self) -> Option<String> {
        match self {
            Length::Auto => None,
            Length::Pixels(v) => Some(format!("{}px", round_css(v, 1))),
            Length::Percentage(v) => Some(format!("{}%", round_css(v, 1))),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.css_text() {
            Some(text) => f.write_str(&text),
            None => f.write_str("auto"),
        }
    }
}

/// Round `value` to at most `digits` decimals and render it without
/// trailing zeros (`33.333…` → `"33.33"`, `50.0` → `"50"`).
pub fn round_css(value: f64, digits: u32) -> String {
    let factor = 10f64.powi(digits as i32);
    let rounded = (value * factor).round() / factor;
    let mut text = format!("{:.*}", digits as usize, rounded);
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    if text == "-0" {
        text = "0".to_owned();
    }
    text
}

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// One side of a rectangle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

// ---------------------------------------------------------------------------
// Spacing
// ---------------------------------------------------------------------------

/// Spacing around the four sides of a rectangle, used for margin and padding.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Spacing {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

/// Contents margins of a layout.
pub type Margins = Spacing;

impl Spacing {
    /// Zero spacing on all sides.
    pub const ZERO: Spacing = Spacing { top: 0, right: 0, bottom: 0, left: 0 };

    /// Create spacing with explicit values for each side.
    #[inline]
    pub const fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self { top, right, bottom, left }
    }

    /// All four sides set to the same value.
    #[inline]
    pub const fn all(value: i32) -> Self {
        Self { top: value, right: value, bottom: value, left: value }
    }

    /// Value for a single side.
    #[inline]
    pub const fn side(self, side: Side) -> i32 {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    /// Total horizontal extent: `left + right`.
    #[inline]
    pub const fn width(self) -> i32 {
        self.left + self.right
    }

    /// Total vertical extent: `top + bottom`.
    #[inline]
    pub const fn height(self) -> i32 {
        self.top + self.bottom
    }

    /// Swap left and right (right-to-left rendering).
    #[inline]
    pub const fn mirrored(self) -> Spacing {
        Spacing { top: self.top, right: self.left, bottom: self.bottom, left: self.right }
    }

    /// CSS `padding` declaration, using the one-value shorthand when all
    /// sides agree. Returns an empty string for uniform zero spacing.
    pub fn css_padding(self) -> String {
        if self.top == self.right && self.top == self.bottom && self.top == self.left {
            if self.top == 0 {
                String::new()
            } else {
                format!("padding:{}px;", self.top)
            }
        } else {
            format!(
                "padding:{}px {}px {}px {}px;",
                self.top, self.right, self.bottom, self.left
            )
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
