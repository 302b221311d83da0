use markdown_context_config::ContextToggles;
use markdown_context_engine::{Context, ContextKind};

/// Drops contexts the user switched off in the config.
#[derive(Debug, Clone, Default)]
pub struct ContextFilter {
    toggles: ContextToggles,
}

impl ContextFilter {
    pub fn new(toggles: ContextToggles) -> Self {
        Self { toggles }
    }

    pub fn allows(&self, kind: ContextKind) -> bool {
        let t = &self.toggles;
        match kind {
            ContextKind::Link => t.links,
            ContextKind::Image => t.images,
            ContextKind::Code => t.code,
            ContextKind::Checkbox => t.checkboxes,
            ContextKind::TaskSelection => t.task_selection,
            ContextKind::Footnote => t.footnotes,
            ContextKind::LinkSelection => t.link_selection,
        }
    }

    pub fn apply(&self, contexts: Vec<Context>) -> Vec<Context> {
        contexts
            .into_iter()
            .filter(|context| self.allows(context.kind()))
            .collect()
    }
}
