//! Shared page chrome and reusable fragments.

pub mod event_card;
pub mod footer;
pub mod loading;
pub mod nav;
pub mod toast;

pub use event_card::{render_event_card, ButtonStyle, CardState, EventCardView};
pub use footer::{current_year, render_footer, FOOTER_MOUNT_ID};
pub use loading::{show_loading, LOADING_HTML};
pub use nav::{render_nav, MountedNav, NavView, NAV_MOUNT_ID};
pub use toast::{show_toast, show_toast_with, ToastKind, ToastTiming};
