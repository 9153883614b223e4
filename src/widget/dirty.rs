//! Change tracking: what changed on a widget since it was last rendered.

use bitflags::bitflags;

bitflags! {
    /// Aspects of a widget that changed since the last acknowledged render.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DirtyFlags: u8 {
        /// Text, value or inner markup.
        const CONTENT    = 0b0000_0001;
        /// HTML attributes and DOM properties other than style.
        const ATTRIBUTES = 0b0000_0010;
        /// Style class and declared sizes.
        const STYLE      = 0b0000_0100;
        /// Hidden or shown.
        const VISIBILITY = 0b0000_1000;
        /// The layout attached to a container.
        const LAYOUT     = 0b0001_0000;
        /// Children were added, removed or reordered.
        const CHILDREN   = 0b0010_0000;
    }
}

/// Where a widget is in its render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderState {
    /// Nothing to send.
    #[default]
    Clean,
    /// Mutated since the last acknowledged render.
    Dirty(DirtyFlags),
    /// Emitted in the current batch, awaiting acknowledgment.
    Rendering(DirtyFlags),
}

impl RenderState {
    /// Record a change. Returns `true` when the widget was not already
    /// waiting for a render pass, so the caller knows to schedule one.
    ///
    /// A change during flight keeps the in-flight flags: until the batch is
    /// acknowledged those changes may still have to be sent again.
    pub fn mark(&mut self, flags: DirtyFlags) -> bool {
        match *self {
            RenderState::Clean => {
                *self = RenderState::Dirty(flags);
                true
            }
            RenderState::Rendering(in_flight) => {
                *self = RenderState::Dirty(in_flight | flags);
                true
            }
            RenderState::Dirty(existing) => {
                *self = RenderState::Dirty(existing | flags);
                false
            }
        }
    }

    /// Move a dirty widget into the rendering state, returning the flags
    /// the update must cover. Clean widgets are left untouched.
    pub fn begin_render(&mut self) -> Option<DirtyFlags> {
        match *self {
            RenderState::Dirty(flags) => {
                *self = RenderState::Rendering(flags);
                Some(flags)
            }
            RenderState::Clean | RenderState::Rendering(_) => None,
        }
    }

    /// Force the rendering state, used when a widget is emitted as part of a
    /// newly created subtree regardless of its own flags.
    pub fn begin_full_render(&mut self) {
        let flags = self.flags();
        *self = RenderState::Rendering(flags | DirtyFlags::all());
    }

    /// The batch carrying this widget was delivered.
    pub fn acknowledge(&mut self) {
        if let RenderState::Rendering(_) = self {
            *self = RenderState::Clean;
        }
    }

    /// The batch carrying this widget was lost: the changes are pending again.
    pub fn roll_back(&mut self) {
        if let RenderState::Rendering(flags) = *self {
            *self = RenderState::Dirty(flags);
        }
    }

    /// Flags currently recorded, whatever the state.
    pub fn flags(self) -> DirtyFlags {
        match self {
            RenderState::Clean => DirtyFlags::empty(),
            RenderState::Dirty(flags) | RenderState::Rendering(flags) => flags,
        }
    }

    pub fn is_clean(self) -> bool {
        matches!(self, RenderState::Clean)
    }

    pub fn is_dirty(self) -> bool {
        matches!(self, RenderState::Dirty(_))
    }

    pub fn is_rendering(self) -> bool {
        matches!(self, RenderState::Rendering(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_from_clean_requests_schedule() {
        let mut state = RenderState::Clean;
        assert!(state.mark(DirtyFlags::CONTENT));
        assert_eq!(state, RenderState::Dirty(DirtyFlags::CONTENT));
    }

    #[test]
    fn mark_while_dirty_accumulates() {
        let mut state = RenderState::Dirty(DirtyFlags::CONTENT);
        assert!(!state.mark(DirtyFlags::STYLE));
        assert_eq!(state.flags(), DirtyFlags::CONTENT | DirtyFlags::STYLE);
    }

    #[test]
    fn render_cycle() {
        let mut state = RenderState::Clean;
        assert_eq!(state.begin_render(), None);
        state.mark(DirtyFlags::VISIBILITY);
        assert_eq!(state.begin_render(), Some(DirtyFlags::VISIBILITY));
        assert!(state.is_rendering());
        state.acknowledge();
        assert!(state.is_clean());
    }

    #[test]
    fn roll_back_restores_flags() {
        let mut state = RenderState::Dirty(DirtyFlags::ATTRIBUTES);
        state.begin_render();
        state.roll_back();
        assert_eq!(state, RenderState::Dirty(DirtyFlags::ATTRIBUTES));
    }

    #[test]
    fn mark_during_render_survives_acknowledge() {
        let mut state = RenderState::Dirty(DirtyFlags::CONTENT);
        state.begin_render();
        assert!(state.mark(DirtyFlags::STYLE));
        state.acknowledge();
        assert!(state.is_dirty());
    }

    #[test]
    fn mark_during_render_keeps_in_flight_flags() {
        let mut state = RenderState::Dirty(DirtyFlags::CONTENT);
        state.begin_render();
        state.mark(DirtyFlags::VISIBILITY);
        state.roll_back();
        assert_eq!(state, RenderState::Dirty(DirtyFlags::CONTENT | DirtyFlags::VISIBILITY));
    }

    #[test]
    fn full_render_covers_everything() {
        let mut state = RenderState::Clean;
        state.begin_full_render();
        assert_eq!(state.flags(), DirtyFlags::all());
    }
}
