//! Site header: logo, main links and the login-dependent account links.

use std::sync::Arc;

use mixler_auth::AuthHelper;
use mixler_core::{AppError, AuthError as CoreAuthError};

use crate::dom::{Element, NodeId, SharedDocument};
use crate::html::escape_html;

pub const NAV_MOUNT_ID: &str = "site-nav";

const ACTIVE_CLASS: &str = "active";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
    /// Key matched against the page's active link.
    pub key: Option<&'static str>,
    pub class: Option<&'static str>,
    pub id: Option<&'static str>,
}

impl NavLink {
    const fn plain(href: &'static str, label: &'static str) -> Self {
        Self {
            href,
            label,
            key: None,
            class: None,
            id: None,
        }
    }

    const fn keyed(href: &'static str, label: &'static str, key: &'static str) -> Self {
        Self {
            href,
            label,
            key: Some(key),
            class: None,
            id: None,
        }
    }
}

/// Header contents for a given login state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavView {
    pub logged_in: bool,
    pub active_link: String,
    pub links: Vec<NavLink>,
}

impl NavView {
    pub fn new(logged_in: bool, active_link: &str) -> Self {
        let mut links = vec![
            NavLink::keyed("/events.html", "Events", "events"),
            NavLink::plain("/#how-it-works", "How It Works"),
            NavLink::plain("/#about", "About"),
        ];

        if logged_in {
            links.push(NavLink::keyed("/account.html", "My Account", "account"));
            links.push(NavLink {
                class: Some("btn btn-outline"),
                id: Some("nav-logout"),
                ..NavLink::plain("#", "Log Out")
            });
        } else {
            links.push(NavLink::keyed("/login.html", "Log In", "login"));
            links.push(NavLink {
                class: Some("btn btn-primary"),
                ..NavLink::plain("/login.html?tab=signup", "Sign Up")
            });
        }

        Self {
            logged_in,
            active_link: active_link.to_string(),
            links,
        }
    }

    pub fn is_active(&self, link: &NavLink) -> bool {
        link.key.is_some_and(|key| key == self.active_link)
    }

    pub fn to_html(&self) -> String {
        let items: String = self
            .links
            .iter()
            .map(|link| {
                let class = link
                    .class
                    .or_else(|| self.is_active(link).then_some(ACTIVE_CLASS))
                    .unwrap_or("");
                let id = link
                    .id
                    .map(|id| format!(r#" id="{}""#, id))
                    .unwrap_or_default();
                format!(
                    "\n          <li><a href=\"{}\"{} class=\"{}\">{}</a></li>",
                    escape_html(link.href),
                    id,
                    class,
                    escape_html(link.label)
                )
            })
            .collect();

        format!(
            r#"
    <header class="site-header">
      <nav class="nav container">
        <a href="/" class="nav-logo">Mixler<span>.</span></a>
        <ul class="nav-links">{items}
        </ul>
        <button class="mobile-menu-btn" aria-label="Menu">
          <span></span>
          <span></span>
          <span></span>
        </button>
      </nav>
    </header>
  "#
        )
    }
}

/// Header rendered into the page, with its interactive parts.
pub struct MountedNav {
    document: SharedDocument,
    view: NavView,
    header: NodeId,
    links: NodeId,
    menu_button: NodeId,
    logout: Option<Arc<AuthHelper>>,
}

impl std::fmt::Debug for MountedNav {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountedNav")
            .field("view", &self.view)
            .field("header", &self.header)
            .finish_non_exhaustive()
    }
}

impl MountedNav {
    pub fn view(&self) -> &NavView {
        &self.view
    }

    pub fn header(&self) -> NodeId {
        self.header
    }

    /// Mobile menu button: open or close the link list.
    pub fn toggle_menu(&self) -> bool {
        let mut doc = self.document.lock();
        let open = doc.toggle_class(self.links, ACTIVE_CLASS);
        if open {
            doc.add_class(self.menu_button, ACTIVE_CLASS);
        } else {
            doc.remove_class(self.menu_button, ACTIVE_CLASS);
        }
        open
    }

    pub fn is_menu_open(&self) -> bool {
        self.document.lock().has_class(self.links, ACTIVE_CLASS)
    }

    pub fn has_logout(&self) -> bool {
        self.logout.is_some()
    }

    /// "Log Out" click. `None` when the header has no logout link.
    pub async fn click_logout(&self) -> Option<Result<(), AppError>> {
        let auth = self.logout.as_ref()?;
        Some(
            auth.sign_out()
                .await
                .map_err(|e| AppError::Auth(CoreAuthError::SignOutFailed(e.to_string()))),
        )
    }
}

/// Render the header into the `site-nav` mount.
///
/// Login state is read from the backend first; the mount is looked up
/// afterwards and a page without one gets `None`.
pub async fn render_nav(
    document: &SharedDocument,
    auth: &Arc<AuthHelper>,
    active_link: &str,
) -> Option<MountedNav> {
    let logged_in = auth.get_session().await.is_some();
    let view = NavView::new(logged_in, active_link);

    let mut doc = document.lock();
    let mount = doc.get_element_by_id(NAV_MOUNT_ID)?;
    doc.set_inner_html(mount, &view.to_html());

    let header = doc.append(Element::new("header").with_class("site-header"), Some(mount));
    let links = doc.append(Element::new("ul").with_class("nav-links"), Some(header));
    let menu_button = doc.append(
        Element::new("button").with_class("mobile-menu-btn"),
        Some(header),
    );
    if logged_in {
        doc.append(
            Element::new("a")
                .with_id("nav-logout")
                .with_class("btn")
                .with_class("btn-outline"),
            Some(links),
        );
    }
    drop(doc);

    tracing::debug!("Rendered nav (logged in: {}, active: {})", logged_in, active_link);

    Some(MountedNav {
        document: document.clone(),
        view,
        header,
        links,
        menu_button,
        logout: logged_in.then(|| auth.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use mixler_auth::MemoryLocation;
    use mixler_backend::BackendClient;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn helper(server: &MockServer) -> (Arc<AuthHelper>, Arc<MemoryLocation>) {
        let backend = Arc::new(BackendClient::new(&server.uri(), "anon").unwrap());
        let location = Arc::new(MemoryLocation::new("https://mixler.ca/events.html").unwrap());
        (
            Arc::new(AuthHelper::new(backend, location.clone())),
            location,
        )
    }

    async fn sign_in(server: &MockServer, auth: &AuthHelper) {
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "access-1",
                "expires_in": 3600,
                "refresh_token": "refresh-1",
                "user": {"id": "user-1", "email": "sam@example.com"}
            })))
            .mount(server)
            .await;
        auth.sign_in("sam@example.com", "pw").await.unwrap();
    }

    fn nav_html(document: &SharedDocument) -> String {
        let doc = document.lock();
        let mount = doc.get_element_by_id(NAV_MOUNT_ID).unwrap();
        doc.inner_html(mount).unwrap().to_string()
    }

    #[test]
    fn test_signed_out_links() {
        let view = NavView::new(false, "login");
        let labels: Vec<_> = view.links.iter().map(|l| l.label).collect();
        assert_eq!(labels, vec!["Events", "How It Works", "About", "Log In", "Sign Up"]);

        let html = view.to_html();
        assert!(html.contains(r#"<a href="/login.html" class="active">Log In</a>"#));
        assert!(html.contains(r#"<a href="/events.html" class="">Events</a>"#));
        assert!(html.contains(r#"href="/login.html?tab=signup" class="btn btn-primary">Sign Up"#));
        assert!(!html.contains("nav-logout"));
    }

    #[test]
    fn test_signed_in_links() {
        let view = NavView::new(true, "account");
        let html = view.to_html();
        assert!(html.contains(r#"<a href="/account.html" class="active">My Account</a>"#));
        assert!(html.contains(r##"<a href="#" id="nav-logout" class="btn btn-outline">Log Out</a>"##));
        assert!(!html.contains("Sign Up"));
    }

    #[test]
    fn test_unknown_active_link_marks_nothing() {
        let view = NavView::new(false, "admin");
        assert!(view.links.iter().all(|l| !view.is_active(l)));
    }

    #[tokio::test]
    async fn test_render_nav_without_mount_is_noop() {
        let server = MockServer::start().await;
        let (auth, _) = helper(&server);
        let document = Document::with_mounts(&["site-footer"]).into_shared();

        assert!(render_nav(&document, &auth, "events").await.is_none());
        assert!(document.lock().query_class("site-header").is_empty());
    }

    #[tokio::test]
    async fn test_menu_toggle() {
        let server = MockServer::start().await;
        let (auth, _) = helper(&server);
        let document = Document::with_mounts(&[NAV_MOUNT_ID]).into_shared();

        let nav = render_nav(&document, &auth, "events").await.unwrap();
        assert!(nav_html(&document).contains(r#"<a href="/events.html" class="active">"#));
        assert!(!nav.has_logout());
        assert!(nav.click_logout().await.is_none());

        assert!(nav.toggle_menu());
        let button = document.lock().query_first("mobile-menu-btn").unwrap();
        assert!(document.lock().has_class(button, "active"));

        assert!(!nav.toggle_menu());
        assert!(!nav.is_menu_open());
        assert!(!document.lock().has_class(button, "active"));
    }

    #[tokio::test]
    async fn test_logout_from_nav() {
        let server = MockServer::start().await;
        let (auth, location) = helper(&server);
        sign_in(&server, &auth).await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/logout"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let document = Document::with_mounts(&[NAV_MOUNT_ID]).into_shared();
        let nav = render_nav(&document, &auth, "account").await.unwrap();

        assert!(nav.has_logout());
        assert!(nav_html(&document).contains("My Account"));
        assert!(document.lock().get_element_by_id("nav-logout").is_some());

        nav.click_logout().await.unwrap().unwrap();
        assert_eq!(location.last_navigation().as_deref(), Some("/"));
    }

    #[tokio::test]
    async fn test_failed_logout_maps_to_app_error() {
        let server = MockServer::start().await;
        let (auth, location) = helper(&server);
        sign_in(&server, &auth).await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/logout"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let document = Document::with_mounts(&[NAV_MOUNT_ID]).into_shared();
        let nav = render_nav(&document, &auth, "account").await.unwrap();

        let err = nav.click_logout().await.unwrap().unwrap_err();
        assert_eq!(err.user_message(), "Log out failed. Please try again.");
        assert!(location.navigations().is_empty());
    }
}
