use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use mixler_auth::MemoryLocation;
use mixler_ui::components::{FOOTER_MOUNT_ID, NAV_MOUNT_ID};
use mixler_ui::{AppServices, Document};

#[derive(Parser, Debug)]
#[command(name = "mixler")]
#[command(about = "Render the Mixler site header and footer for a page")]
struct Cli {
    /// Page path and query, e.g. `/events.html`
    #[arg(default_value = "/")]
    page: String,

    /// Nav link to highlight (`events`, `account` or `login`)
    #[arg(default_value = "")]
    active_link: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize core
    mixler_core::init()?;

    let (config, _) =
        mixler_core::Config::load_validated().context("Failed to load configuration")?;

    let href = format!("{}{}", config.site.base_url.trim_end_matches('/'), cli.page);
    let location = Arc::new(
        MemoryLocation::new(&href).with_context(|| format!("Invalid page URL: {}", href))?,
    );
    let document = Document::with_mounts(&[NAV_MOUNT_ID, FOOTER_MOUNT_ID]).into_shared();

    let services =
        AppServices::new(config, location, document).context("Failed to start services")?;
    services.watch_auth_changes();

    tracing::info!("Mixler rendering chrome for {}", href);
    services.render_chrome(&cli.active_link).await;

    {
        let doc = services.document().lock();
        for mount_id in [NAV_MOUNT_ID, FOOTER_MOUNT_ID] {
            if let Some(html) = doc
                .get_element_by_id(mount_id)
                .and_then(|node| doc.inner_html(node))
            {
                println!("<!-- #{} -->{}", mount_id, html);
            }
        }
    }

    // Graceful shutdown
    services.shutdown();

    Ok(())
}
