//! Page-level pieces of the Mixler site: formatting, shared components,
//! the page document model and the behaviour attached at page load.

pub mod app_services;
pub mod bootstrap;
pub mod components;
pub mod debounce;
pub mod dom;
pub mod error_mapping;
pub mod format;
pub mod html;
pub mod params;

pub use app_services::AppServices;
pub use bootstrap::{PageBehavior, Rect};
pub use debounce::{debounce, Debounced};
pub use dom::{Document, Element, NodeId, SharedDocument};
pub use error_mapping::IntoAppError;
pub use format::{format_date, format_price, format_short_date, format_time};
pub use params::get_param;
