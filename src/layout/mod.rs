//! Layout managers: the grid model, layout operations on the widget tree,
//! and the renderer that negotiates sizes with the client.

pub mod alignment;
pub mod attach;
pub mod config;
pub mod grid;
pub mod manager;
pub mod renderer;

pub use alignment::{Alignment, HAlign, VAlign};
pub use config::{GridConfig, ItemConfig, LayoutCommand, ResizeConfig, SectionConfig};
pub use grid::{Grid, Item, Section, DEFAULT_SPACING};
pub use manager::{Direction, Layout, LayoutError, LayoutId, LayoutItem, LayoutKind, RendererState};
