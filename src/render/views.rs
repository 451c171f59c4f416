//! View rendering collaborators.

use crate::error::RenderEngineError;
use crate::render::context::ResponseContext;
use futures::future::{self, BoxFuture, FutureExt};
use handlebars::Handlebars;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Renders a named view with a resolved context into an HTML body.
pub trait ViewRenderer: Send + Sync {
    fn render<'a>(
        &'a self,
        view: &'a str,
        context: &'a ResponseContext,
    ) -> BoxFuture<'a, Result<String, RenderEngineError>>;
}

/// Handlebars-backed views addressed by template name (e.g. `errors/404`).
#[derive(Clone)]
pub struct HandlebarsViews {
    handlebars: Arc<RwLock<Handlebars<'static>>>,
}

impl HandlebarsViews {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        Self {
            handlebars: Arc::new(RwLock::new(handlebars)),
        }
    }

    /// Register a template from source.
    pub fn register(&self, name: &str, source: &str) -> Result<(), RenderEngineError> {
        self.handlebars
            .write()
            .register_template_string(name, source)
            .map_err(|e| RenderEngineError::new(name, e))
    }

    /// Load every `*.<extension>` file below `dir`; a file's path relative to
    /// `dir`, without extension and with `/` separators, becomes its name.
    ///
    /// # Returns
    /// The number of registered templates.
    pub fn load_directory(&self, dir: impl AsRef<Path>, extension: &str) -> Result<usize, RenderEngineError> {
        let dir = dir.as_ref();
        let mut count = 0;
        self.load_from(dir, dir, extension.trim_start_matches('.'), &mut count)?;
        info!("Loaded {} view templates from {}", count, dir.display());
        Ok(count)
    }

    fn load_from(
        &self,
        root: &Path,
        dir: &Path,
        extension: &str,
        count: &mut usize,
    ) -> Result<(), RenderEngineError> {
        let display = dir.display().to_string();
        let entries = std::fs::read_dir(dir).map_err(|e| RenderEngineError::new(&display, e))?;

        for entry in entries {
            let path = entry.map_err(|e| RenderEngineError::new(&display, e))?.path();
            if path.is_dir() {
                self.load_from(root, &path, extension, count)?;
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(extension) {
                continue;
            }

            let name = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .with_extension("")
                .components()
                .map(|component| component.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            let source = std::fs::read_to_string(&path)
                .map_err(|e| RenderEngineError::new(&name, e))?;
            self.register(&name, &source)?;
            *count += 1;
        }

        Ok(())
    }

    pub fn has_view(&self, name: &str) -> bool {
        self.handlebars.read().has_template(name)
    }
}

impl Default for HandlebarsViews {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewRenderer for HandlebarsViews {
    fn render<'a>(
        &'a self,
        view: &'a str,
        context: &'a ResponseContext,
    ) -> BoxFuture<'a, Result<String, RenderEngineError>> {
        let rendered = self
            .handlebars
            .read()
            .render(view, context)
            .map_err(|e| RenderEngineError::new(view, e));
        future::ready(rendered).boxed()
    }
}
