use super::super::state::Controller;
use super::Effect;
use crate::dom::PageInventory;
use crate::typography::{normalize_heading, select_targets};
use tracing::{debug, info};

impl Controller {
    pub(super) fn handle_typography_setup(
        &mut self,
        inventory: &PageInventory,
        effects: &mut Vec<Effect>,
    ) {
        let mut rewritten = 0usize;
        for block in select_targets(&inventory.headings, &inventory.forced_text) {
            if self.normalized_text.contains(&block.element) {
                continue;
            }
            self.normalized_text.insert(block.element);
            let Some(html) = normalize_heading(&block.html) else {
                debug!(element = block.element.0, "Heading left untouched");
                continue;
            };
            effects.push(Effect::SetInnerHtml {
                element: block.element,
                html,
            });
            rewritten += 1;
        }
        info!(rewritten, "Typography normalized");
    }
}
