use chrono::Datelike;

use crate::dom::SharedDocument;

pub const FOOTER_MOUNT_ID: &str = "site-footer";

/// Calendar year at the time of the call.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

pub fn footer_html(year: i32) -> String {
    format!(
        r##"
    <footer class="site-footer">
      <div class="container">
        <div class="footer-grid">
          <div class="footer-brand">
            <a href="/" class="nav-logo">Mixler<span>.</span></a>
            <p>Calgary's go-to for fun nights out and real connections. Come for the event, stay for the people.</p>
            <div class="footer-social">
              <a href="#" aria-label="Instagram">IG</a>
              <a href="#" aria-label="Facebook">FB</a>
              <a href="#" aria-label="TikTok">TT</a>
            </div>
          </div>
          <div class="footer-col">
            <h4>Quick Links</h4>
            <a href="/events.html">Events</a>
            <a href="/#how-it-works">How It Works</a>
            <a href="/#about">About</a>
          </div>
          <div class="footer-col">
            <h4>Events</h4>
            <a href="/events.html">Social Mixers</a>
            <a href="/events.html">Activity Nights</a>
            <a href="/events.html">Speed Friending</a>
          </div>
          <div class="footer-col">
            <h4>Contact</h4>
            <a href="mailto:hello@mixler.ca">hello@mixler.ca</a>
            <a href="#">Calgary, AB</a>
          </div>
        </div>
        <div class="footer-bottom">
          <span>&copy; {year} Mixler. All rights reserved.</span>
          <span><a href="#">Privacy</a> &bull; <a href="#">Terms</a></span>
        </div>
      </div>
    </footer>
  "##
    )
}

/// Fill the footer mount. Returns false when the page has none.
pub fn render_footer(document: &SharedDocument, year: i32) -> bool {
    let mut doc = document.lock();
    let Some(mount) = doc.get_element_by_id(FOOTER_MOUNT_ID) else {
        return false;
    };
    doc.set_inner_html(mount, &footer_html(year))
}
