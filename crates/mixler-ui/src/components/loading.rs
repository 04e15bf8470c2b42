use crate::dom::{NodeId, SharedDocument};

pub const LOADING_HTML: &str = r#"<div class="loading-spinner"><div class="spinner"></div></div>"#;

/// Replace `container`'s content with the spinner. False if it is gone.
pub fn show_loading(document: &SharedDocument, container: NodeId) -> bool {
    document.lock().set_inner_html(container, LOADING_HTML)
}
