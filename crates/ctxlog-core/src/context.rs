//! Request-scoped context carrying a logger.
//!
//! A [`Context`] is an immutable chain of values. Deriving a context adds a
//! node in front of its parent; lookups walk from the newest node back to
//! the root, so the closest binding wins and the parent is never changed.
//!
//! ```
//! use ctxlog_core::{Context, Level, Logger};
//!
//! let root = Context::background();
//! let ctx = root.with_logger(Logger::new(Level::Debug));
//!
//! assert_eq!(ctx.logger().current_level(), Level::Debug);
//! // The root still falls back to the default logger.
//! assert_eq!(root.logger().current_level(), Level::Error);
//! ```

use crate::logger::Logger;
use crate::state;
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

tokio::task_local! {
    static CURRENT: Context;
}

struct Node {
    parent: Option<Arc<Node>>,
    value: Arc<dyn Any + Send + Sync>,
}

/// An immutable, cheaply cloneable chain of typed values.
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Node>>,
}

impl Context {
    /// An empty root context.
    pub fn background() -> Self {
        Self::default()
    }

    /// A child context holding `value`.
    ///
    /// Values are looked up by type; a child's value shadows any value of
    /// the same type further up the chain.
    pub fn with_value<T: Any + Send + Sync>(&self, value: T) -> Context {
        Context {
            head: Some(Arc::new(Node {
                parent: self.head.clone(),
                value: Arc::new(value),
            })),
        }
    }

    /// The closest value of type `T`, if any.
    pub fn value<T: Any + Send + Sync>(&self) -> Option<&T> {
        let mut node = self.head.as_deref();
        while let Some(current) = node {
            if let Some(value) = current.value.downcast_ref::<T>() {
                return Some(value);
            }
            node = current.parent.as_deref();
        }
        None
    }

    /// A child context with `logger` bound.
    pub fn with_logger(&self, logger: Logger) -> Context {
        self.with_value(logger)
    }

    /// The bound logger, or the default logger when none is bound.
    pub fn logger(&self) -> Logger {
        self.value::<Logger>()
            .cloned()
            .unwrap_or_else(state::default_logger)
    }

    /// Number of values in the chain.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut node = self.head.as_deref();
        while let Some(current) = node {
            depth += 1;
            node = current.parent.as_deref();
        }
        depth
    }

    /// Run `future` with this context as the task's current context.
    pub async fn scope<F: Future>(self, future: F) -> F::Output {
        CURRENT.scope(self, future).await
    }

    /// Run `f` with this context as the current context.
    pub fn sync_scope<R>(self, f: impl FnOnce() -> R) -> R {
        CURRENT.sync_scope(self, f)
    }

    /// The context installed by the enclosing [`scope`](Context::scope),
    /// or an empty one.
    pub fn current() -> Context {
        CURRENT.try_with(Context::clone).unwrap_or_default()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("depth", &self.depth())
            .field("has_logger", &self.value::<Logger>().is_some())
            .finish()
    }
}

/// Bind `logger` to a child of `ctx`.
pub fn to_context(ctx: &Context, logger: Logger) -> Context {
    ctx.with_logger(logger)
}

/// The logger bound to `ctx`, or the default logger.
pub fn from_context(ctx: &Context) -> Logger {
    ctx.logger()
}
