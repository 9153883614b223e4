//! Built-in leaf widgets: Container, Text, Button, TextArea, Anchor, GroupBox.

pub mod container;
pub mod text;
pub mod button;
pub mod text_area;
pub mod anchor;
pub mod group_box;

pub use container::{Container, ContainerTag};
pub use text::Text;
pub use button::Button;
pub use text_area::TextArea;
pub use anchor::{Anchor, AnchorTarget};
pub use group_box::GroupBox;
