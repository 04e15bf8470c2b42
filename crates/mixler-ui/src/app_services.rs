//! Application services shared by every page.
//!
//! Built once at startup from configuration and passed around explicitly.
//! There is no global instance.

use std::sync::Arc;

use parking_lot::Mutex;

use mixler_auth::{AuthHelper, Location};
use mixler_backend::{BackendClient, FileSessionStorage, Subscription};
use mixler_calendar::{DownloadSink, ExportSettings, IcsDownload};
use mixler_core::{AppError, Config, EventRecord};

use crate::bootstrap::PageBehavior;
use crate::components::{
    current_year, render_footer, render_nav, show_toast_with, MountedNav, ToastKind, ToastTiming,
};
use crate::dom::{NodeId, SharedDocument};
use crate::error_mapping::IntoAppError;

/// Links for the "Add to calendar" menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarLinks {
    pub google: String,
    pub outlook: String,
}

pub struct AppServices {
    config: Config,
    backend: Arc<BackendClient>,
    auth: Arc<AuthHelper>,
    document: SharedDocument,
    export: ExportSettings,
    auth_subscription: Mutex<Option<Subscription>>,
}

impl AppServices {
    /// Services backed by the configured backend, with the session kept in
    /// the config directory.
    pub fn new(
        config: Config,
        location: Arc<dyn Location>,
        document: SharedDocument,
    ) -> Result<Self, AppError> {
        let storage = Arc::new(FileSessionStorage::new(config.config_dir.join("session.json")));
        let backend = BackendClient::from_config(&config.backend)
            .map_err(IntoAppError::into_app_error)?
            .with_storage(storage);

        Self::with_backend(config, Arc::new(backend), location, document)
    }

    /// Services over an already constructed backend client.
    pub fn with_backend(
        config: Config,
        backend: Arc<BackendClient>,
        location: Arc<dyn Location>,
        document: SharedDocument,
    ) -> Result<Self, AppError> {
        let export =
            ExportSettings::from_config(&config.site).map_err(IntoAppError::into_app_error)?;
        let auth = Arc::new(
            AuthHelper::new(Arc::clone(&backend), location)
                .with_login_path(config.site.login_path.clone()),
        );

        tracing::info!("AppServices initialized (backend: {})", backend.base_url());

        Ok(Self {
            config,
            backend,
            auth,
            document,
            export,
            auth_subscription: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn backend(&self) -> &Arc<BackendClient> {
        &self.backend
    }

    pub fn auth(&self) -> &Arc<AuthHelper> {
        &self.auth
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    pub fn export_settings(&self) -> &ExportSettings {
        &self.export
    }

    pub fn toast_timing(&self) -> ToastTiming {
        (&self.config.ui).into()
    }

    // =========== Page chrome ===========

    /// Header and footer for the current page.
    pub async fn render_chrome(&self, active_link: &str) -> Option<MountedNav> {
        let nav = render_nav(&self.document, &self.auth, active_link).await;
        render_footer(&self.document, current_year());
        nav
    }

    pub fn attach_page_behavior(&self) -> PageBehavior {
        PageBehavior::attach(Arc::clone(&self.document), &self.config.ui)
    }

    // =========== Notifications ===========

    pub fn toast(&self, message: &str, kind: ToastKind) -> NodeId {
        show_toast_with(&self.document, message, kind, self.toast_timing())
    }

    /// Log `err` and show its user-facing message as an error toast.
    pub fn report_error(&self, err: &AppError) -> NodeId {
        tracing::warn!("Reporting error to user: {}", err);
        self.toast(err.user_message(), ToastKind::Error)
    }

    // =========== Calendar export ===========

    pub fn calendar_links(&self, event: &EventRecord) -> CalendarLinks {
        CalendarLinks {
            google: mixler_calendar::google_calendar_url(event, &self.export),
            outlook: mixler_calendar::outlook_calendar_url(event, &self.export),
        }
    }

    pub fn download_event_ics(
        &self,
        event: &EventRecord,
        sink: &dyn DownloadSink,
    ) -> Result<IcsDownload, AppError> {
        mixler_calendar::download_ics(event, &self.export, sink)
            .map_err(IntoAppError::into_app_error)
    }

    // =========== Auth changes ===========

    /// Log every auth transition until [`shutdown`](Self::shutdown).
    pub fn watch_auth_changes(&self) {
        let subscription = self.auth.on_auth_change(|event, session| {
            let user = session.as_ref().map(|s| s.user.id.as_str()).unwrap_or("-");
            tracing::info!("Auth change: {} (user {})", event, user);
        });
        *self.auth_subscription.lock() = Some(subscription);
    }

    pub fn is_watching_auth(&self) -> bool {
        self.auth_subscription
            .lock()
            .as_ref()
            .is_some_and(Subscription::is_active)
    }

    /// Stop background listeners.
    pub fn shutdown(&self) {
        tracing::info!("AppServices shutdown initiated");
        if let Some(subscription) = self.auth_subscription.lock().take() {
            subscription.unsubscribe();
        }
        tracing::info!("AppServices shutdown complete");
    }
}
