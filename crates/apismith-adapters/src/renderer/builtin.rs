//! Renderer for the built-in module templates.

use apismith_core::{
    application::ports::ModuleRenderer,
    domain::{LogicalModule, RenderContext},
    error::ApismithResult,
};
use tracing::{instrument, trace};

/// Calls the module's template function, then substitutes `{{VARIABLE}}`
/// placeholders.
///
/// Every non-empty file ends with exactly one newline.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinRenderer;

impl BuiltinRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ModuleRenderer for BuiltinRenderer {
    #[instrument(skip_all, fields(module = %module.id, path = %context.path()))]
    fn render(&self, module: &LogicalModule, context: &RenderContext<'_>) -> ApismithResult<String> {
        let raw = (module.template)(context)?;
        let mut content = context.render(&raw);

        let trimmed = content.trim_end_matches('\n').len();
        content.truncate(trimmed);
        if !content.is_empty() {
            content.push('\n');
        }

        trace!(bytes = content.len(), "module rendered");
        Ok(content)
    }
}
