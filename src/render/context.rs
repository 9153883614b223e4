//! Per-session render context, threaded explicitly through every pass.

/// Reading direction of the client document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// Capabilities of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// The client runs script and can position layout items itself. When
    /// false, layouts degrade to plain tables.
    pub ajax: bool,
    pub layout_direction: LayoutDirection,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            ajax: true,
            layout_direction: LayoutDirection::LeftToRight,
        }
    }
}

/// Everything a render pass needs to know about the session it renders
/// for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub environment: Environment,
    pub locale: String,
    /// Client namespace used when a batch is flattened to script.
    pub javascript_class: String,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            locale: "en".to_owned(),
            javascript_class: "Wt".to_owned(),
        }
    }
}

impl RenderContext {
    /// A context for a client without script support.
    pub fn progressive() -> Self {
        Self {
            environment: Environment {
                ajax: false,
                ..Environment::default()
            },
            ..Self::default()
        }
    }

    pub fn is_right_to_left(&self) -> bool {
        self.environment.layout_direction == LayoutDirection::RightToLeft
    }
}
