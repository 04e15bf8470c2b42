//! Behaviour attached to every page at load: mobile menu, header scroll
//! style and reveal-on-scroll for cards.

use std::collections::BTreeSet;

use mixler_core::UiConfig;

use crate::dom::{NodeId, SharedDocument};

const REVEAL_CLASSES: [&str; 3] = ["step-card", "event-card", "testimonial-card"];
const REVEAL_THRESHOLD: f64 = 0.1;
/// The viewport is shrunk by this much at the bottom for reveal checks.
const REVEAL_BOTTOM_MARGIN_PX: f64 = 50.0;

/// Vertical extent of an element relative to the viewport top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Fraction of this rect inside `[0, viewport_height - margin]`.
    pub fn intersection_ratio(&self, viewport_height: f64) -> f64 {
        if self.height <= 0.0 {
            return 0.0;
        }
        let root_bottom = viewport_height - REVEAL_BOTTOM_MARGIN_PX;
        let visible_top = self.top.max(0.0);
        let visible_bottom = (self.top + self.height).min(root_bottom);
        ((visible_bottom - visible_top).max(0.0) / self.height).min(1.0)
    }
}

pub struct PageBehavior {
    document: SharedDocument,
    scroll_threshold: f64,
    observed: BTreeSet<NodeId>,
}

impl PageBehavior {
    /// Attach to the document: every card present now starts hidden and
    /// observed.
    pub fn attach(document: SharedDocument, config: &UiConfig) -> Self {
        let observed = {
            let mut doc = document.lock();
            let mut observed = BTreeSet::new();
            for class in REVEAL_CLASSES {
                for node in doc.query_class(class) {
                    doc.remove_class(node, "visible");
                    observed.insert(node);
                }
            }
            observed
        };
        tracing::debug!("Observing {} cards for reveal", observed.len());

        Self {
            document,
            scroll_threshold: config.scroll_threshold_px,
            observed,
        }
    }

    /// Mobile menu button clicked.
    pub fn on_menu_click(&self) {
        let mut doc = self.document.lock();
        if let Some(links) = doc.query_first("nav-links") {
            doc.toggle_class(links, "active");
        }
        if let Some(button) = doc.query_first("mobile-menu-btn") {
            doc.toggle_class(button, "active");
        }
    }

    /// A navigation link was followed; close the menu.
    pub fn on_nav_link_click(&self) {
        let mut doc = self.document.lock();
        for class in ["nav-links", "mobile-menu-btn"] {
            if let Some(node) = doc.query_first(class) {
                doc.remove_class(node, "active");
            }
        }
    }

    /// Window scrolled to `scroll_y`.
    pub fn on_scroll(&self, scroll_y: f64) {
        let mut doc = self.document.lock();
        let Some(header) = doc.query_first("site-header") else {
            return;
        };
        if scroll_y > self.scroll_threshold {
            doc.add_class(header, "scrolled");
        } else {
            doc.remove_class(header, "scrolled");
        }
    }

    /// Layout report for observed cards. Cards at least 10% inside the
    /// viewport become visible and are no longer observed. Returns them.
    pub fn on_intersection(
        &mut self,
        viewport_height: f64,
        layout: &[(NodeId, Rect)],
    ) -> Vec<NodeId> {
        let mut revealed = Vec::new();
        let mut doc = self.document.lock();

        for (node, rect) in layout {
            if !self.observed.contains(node) {
                continue;
            }
            if rect.intersection_ratio(viewport_height) >= REVEAL_THRESHOLD {
                doc.add_class(*node, "visible");
                self.observed.remove(node);
                revealed.push(*node);
            }
        }

        revealed
    }

    pub fn is_observing(&self, node: NodeId) -> bool {
        self.observed.contains(&node)
    }

    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }
}
