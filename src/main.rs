use std::sync::Arc;

use clap::Parser;
use estate_front::api::{HttpApi, ReelStorage, StorageClient};
use estate_front::config::ClientConfig;
use estate_front::dashboard::{Dashboard, SectionKind};
use estate_front::events::HeroSearch;
use estate_front::layout::{chunk_listings, BreakpointObserver};
use estate_front::listings::ListingController;
use estate_front::models::{RecordId, Viewer};
use estate_front::reels::{MemorySessionCache, ReelScheduler};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "estate-front", about = "Browse marketplace listings, reels and agent dashboards")]
struct Cli {
    /// Listing page to fetch
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Search by location instead of the default listing
    #[arg(long)]
    location: Option<String>,

    /// Signed-in user id, for favourites and personalised reels
    #[arg(long, env = "ESTATE_VIEWER_ID")]
    viewer: Option<RecordId>,

    /// Treat the viewer as an agent, who sees no reels
    #[arg(long, requires = "viewer")]
    as_agent: bool,

    /// Viewport width used to lay out rows
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Also load this agent's dashboard
    #[arg(long, env = "ESTATE_AGENT_ID")]
    agent: Option<RecordId>,

    /// Write the fetched listings to this JSON file
    #[arg(long)]
    save: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;

    info!("🏠 Estate Front");
    info!("API: {}", config.api_url);

    let api = Arc::new(HttpApi::new(&config)?);
    let viewer = match cli.viewer {
        Some(id) if cli.as_agent => Viewer::Agent(id),
        Some(id) => Viewer::User(id),
        None => Viewer::Anonymous,
    };

    // Listings
    let mut listings = ListingController::new(api.clone()).with_viewer(viewer);
    let ok = match &cli.location {
        Some(location) => listings.apply_hero_search(HeroSearch::new(location.clone())).await,
        None => listings.load_home(cli.page).await,
    };
    if !ok {
        warn!("Listings unavailable, showing an empty page");
    }

    let layout = BreakpointObserver::new(cli.width);
    let pagination = listings.pagination();
    info!(
        "✅ {} listings, page {}/{} ({} layout)",
        listings.listings().len(),
        pagination.current,
        pagination.total,
        layout.current().name()
    );

    for (row, chunk) in chunk_listings(listings.listings(), layout.current()).iter().enumerate() {
        println!("Row {}", row + 1);
        for listing in chunk {
            println!("  {} ({})", listing.title, listing.price_label());
            println!("     {} · {}", listing.bedroom_label(), listing.bathroom_label());
            println!("     {}", listing.location.label());
            if !listing.reels.is_empty() {
                println!("     {} reels", listing.reels.len());
            }
        }
    }
    println!();

    if let Some(path) = &cli.save {
        let json = serde_json::to_string_pretty(listings.listings())?;
        tokio::fs::write(path, json).await?;
        info!("💾 Saved listings to {}", path);
    }

    // Reels
    let mut reels = ReelScheduler::new(Arc::new(MemorySessionCache::new()), config.reels);
    let shown = reels.refresh(api.as_ref(), viewer).await;
    info!("🎬 {} reels on display", shown.len());
    for reel in &shown {
        println!("  ▶ {} · {} · {}", reel.title, reel.location, reel.url);
    }

    // Agent dashboard
    if let Some(agent) = cli.agent {
        let mut dashboard = Dashboard::new(api.clone(), agent)
            .with_max_reel_upload_bytes(config.max_reel_upload_bytes);
        if let Some(storage) = config.storage.clone() {
            let storage: Arc<dyn ReelStorage> = Arc::new(StorageClient::new(&config, storage)?);
            dashboard = dashboard.with_storage(storage);
        }
        dashboard
            .load_all_with(|kind, dashboard| match kind {
                SectionKind::Profile => info!("Profile loaded: {}", dashboard.profile().is_some()),
                SectionKind::Listings => info!("{} listings", dashboard.listings().items.len()),
                SectionKind::Applications => {
                    info!("{} applications", dashboard.applications().items.len())
                }
                SectionKind::Bookings => info!("{} bookings", dashboard.bookings().items.len()),
            })
            .await;

        let summary = dashboard.summary();
        println!();
        if let Some(profile) = dashboard.profile() {
            println!("Agent: {} ({})", profile.name, profile.agent_type_label());
        }
        println!("  Listings:     {}", summary.total_listings);
        println!("  Views:        {}", summary.total_views);
        println!("  Reels:        {}", summary.total_reels);
        println!(
            "  Applications: {} ({} pending)",
            summary.total_applications, summary.pending_applications
        );
        println!(
            "  Bookings:     {} ({} pending)",
            summary.total_bookings, summary.pending_bookings
        );
    }

    Ok(())
}
