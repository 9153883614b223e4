//! Application and session: one widget tree, its render context, and the
//! event/render cycle that keeps a client in sync with it.
//!
//! [`Application`] is the synchronous core: handlers mutate the tree, a
//! flush renders the pending changes into one batch, hands it to a
//! [`RenderSink`], and acknowledges or rolls back depending on the outcome.
//! [`Session`] serialises concurrent requests for one application behind a
//! tokio mutex so exactly one handler-plus-render cycle is in flight.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::dom::escape::escape_js_single;
use crate::dom::{Instruction, RenderBatch, RenderSink, SinkError};
use crate::layout::LayoutError;
use crate::render::{Environment, LayoutDirection, RenderContext, Renderer};
use crate::widget::{TreeError, WidgetTree, DEFAULT_CONTENTS_MARGIN};

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Configuration for an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Document title, sent to the client on the first flush.
    pub title: Option<String>,
    /// The client runs script. Decides once how layouts are rendered.
    pub ajax: bool,
    pub layout_direction: LayoutDirection,
    pub locale: String,
    /// Contents margin of top-level layouts, in pixels.
    pub default_contents_margin: i32,
    /// Client namespace used when a batch is flattened to script.
    pub javascript_class: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: None,
            ajax: true,
            layout_direction: LayoutDirection::LeftToRight,
            locale: "en".to_owned(),
            default_contents_margin: DEFAULT_CONTENTS_MARGIN,
            javascript_class: "Wt".to_owned(),
        }
    }
}

impl AppConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title (builder).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Declare whether the client runs script (builder).
    pub fn with_ajax(mut self, ajax: bool) -> Self {
        self.ajax = ajax;
        self
    }

    pub fn with_layout_direction(mut self, direction: LayoutDirection) -> Self {
        self.layout_direction = direction;
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_default_contents_margin(mut self, margin: i32) -> Self {
        self.default_contents_margin = margin;
        self
    }

    pub fn with_javascript_class(mut self, class: impl Into<String>) -> Self {
        self.javascript_class = class.into();
        self
    }

    /// The render context a session with this config renders for.
    pub fn render_context(&self) -> RenderContext {
        RenderContext {
            environment: Environment {
                ajax: self.ajax,
                layout_direction: self.layout_direction,
            },
            locale: self.locale.clone(),
            javascript_class: self.javascript_class.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionError
// ---------------------------------------------------------------------------

/// Anything that can fail an event/render cycle.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

/// One widget tree and everything needed to render it for one client.
#[derive(Debug)]
pub struct Application {
    pub tree: WidgetTree,
    pub context: RenderContext,
    pub renderer: Renderer,
    pub config: AppConfig,
    title_pending: bool,
    title_in_flight: bool,
}

impl Application {
    pub fn new(config: AppConfig) -> Self {
        Self {
            tree: WidgetTree::with_contents_margin(config.default_contents_margin),
            context: config.render_context(),
            renderer: Renderer::new(),
            title_pending: config.title.is_some(),
            title_in_flight: false,
            config,
        }
    }

    /// Run an event handler against the tree.
    pub fn handle<R>(&mut self, handler: impl FnOnce(&mut WidgetTree) -> R) -> R {
        handler(&mut self.tree)
    }

    /// Change the document title; the next flush sends it.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.config.title = Some(title.into());
        self.title_pending = true;
    }

    /// Collect pending changes into a batch without delivering it.
    ///
    /// The widgets it carries wait for [`WidgetTree::propagate_render_ok`]
    /// or [`WidgetTree::render_failed`].
    pub fn render(&mut self) -> RenderBatch {
        let mut batch = self.renderer.render(&mut self.tree, &self.context);
        if self.title_pending {
            if let Some(title) = &self.config.title {
                batch.push(Instruction::Script {
                    code: format!("document.title='{}';", escape_js_single(title)),
                });
            }
            self.title_pending = false;
            self.title_in_flight = true;
        }
        batch
    }

    /// Render and deliver pending changes.
    ///
    /// On success the tree is acknowledged and the delivered batch is
    /// returned. When the sink fails every change is rolled back so the
    /// next flush sends it again. An empty batch is not delivered.
    pub fn flush<S: RenderSink + ?Sized>(&mut self, sink: &mut S) -> Result<RenderBatch, SessionError> {
        let batch = self.render();
        if batch.is_empty() {
            return Ok(batch);
        }
        match sink.apply(&batch) {
            Ok(()) => {
                self.tree.propagate_render_ok(&batch);
                self.title_in_flight = false;
                Ok(batch)
            }
            Err(err) => {
                tracing::warn!(instructions = batch.len(), "render sink failed: {err}");
                self.tree.render_failed();
                if self.title_in_flight {
                    self.title_pending = true;
                    self.title_in_flight = false;
                }
                Err(err.into())
            }
        }
    }

    /// Explicit refresh: the whole tree is re-created on the next flush.
    pub fn refresh(&mut self) -> Result<(), SessionError> {
        if let Some(root) = self.tree.root() {
            if self.tree.get(root).is_some_and(|n| n.is_rendered()) {
                self.tree.mark_full_rerender(root)?;
            }
        }
        self.title_pending = self.config.title.is_some();
        Ok(())
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

struct SessionInner<S> {
    app: Application,
    sink: S,
}

/// A shareable handle on one application and the sink its batches go to.
///
/// Every dispatch holds the session lock for the whole handler and flush,
/// so concurrent requests for the same tree run one after another.
pub struct Session<S> {
    inner: Arc<Mutex<SessionInner<S>>>,
}

impl<S> Clone for Session<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: RenderSink + Send> Session<S> {
    pub fn new(app: Application, sink: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionInner { app, sink })),
        }
    }

    /// Run `handler` against the tree, then flush.
    ///
    /// A handler error skips the flush; whatever the handler changed before
    /// failing stays pending for the next cycle.
    pub async fn dispatch<R, E>(
        &self,
        handler: impl FnOnce(&mut WidgetTree) -> Result<R, E>,
    ) -> Result<R, SessionError>
    where
        SessionError: From<E>,
    {
        let mut guard = self.inner.lock().await;
        let SessionInner { app, sink } = &mut *guard;
        let value = app.handle(handler)?;
        app.flush(sink)?;
        Ok(value)
    }

    /// Re-create the whole tree on the client.
    pub async fn refresh(&self) -> Result<RenderBatch, SessionError> {
        let mut guard = self.inner.lock().await;
        let SessionInner { app, sink } = &mut *guard;
        app.refresh()?;
        app.flush(sink)
    }

    /// Inspect the application and sink under the session lock.
    pub async fn with<R>(&self, f: impl FnOnce(&mut Application, &mut S) -> R) -> R {
        let mut guard = self.inner.lock().await;
        let SessionInner { app, sink } = &mut *guard;
        f(app, sink)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
