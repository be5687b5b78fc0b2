use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use realty_desk::config::AppConfig;
use realty_desk::error::AppError;
use realty_desk::models::{Agent, PropertyKind, PropertyListing, ShowingRequest};
use realty_desk::prefs::PreferenceStore;
use realty_desk::remote::RestDataSource;
use realty_desk::repository::{PropertyRepository, DEFAULT_POPULAR_LIMIT};
use realty_desk::store::PropertyStore;
use realty_desk::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "realty-desk",
    about = "Browse hosted property listings and manage local preferences from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List properties, optionally filtered server-side
    Listings(ListingsArgs),
    /// Search the fetched snapshot by title, address, or city
    Search {
        query: String,
    },
    /// Show the most viewed listings
    Popular {
        /// How many listings to show
        #[arg(long, default_value_t = DEFAULT_POPULAR_LIMIT)]
        limit: usize,
    },
    /// List every listing agent
    Agents,
    /// Open one listing: prints details and records the view
    View {
        id: i32,
    },
    /// Manage locally persisted favorites
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommand,
    },
    /// Submit a showing request for a listing
    RequestShowing(RequestShowingArgs),
    /// Showing requests filed for an agent or a property
    Requests(RequestsArgs),
    /// Show or update the locally stored profile
    Profile {
        /// Set the display name before printing the profile
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Args, Debug)]
struct ListingsArgs {
    /// Only listings in this city
    #[arg(long)]
    city: Option<String>,
    /// Only listings of this kind (apartment, house, commercial)
    #[arg(long, value_parser = parse_kind)]
    kind: Option<PropertyKind>,
    /// Lower price bound, inclusive
    #[arg(long, requires = "max_price")]
    min_price: Option<f64>,
    /// Upper price bound, inclusive
    #[arg(long, requires = "min_price")]
    max_price: Option<f64>,
}

#[derive(Args, Debug)]
struct RequestShowingArgs {
    /// Listing to request a showing for
    #[arg(long)]
    property_id: i32,
    /// Client name
    #[arg(long)]
    name: String,
    /// Client phone number
    #[arg(long)]
    phone: String,
    /// Client email address
    #[arg(long)]
    email: String,
    /// Preferred showing date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    date: NaiveDate,
    /// Optional note to the agent
    #[arg(long)]
    message: Option<String>,
}

#[derive(Args, Debug)]
struct RequestsArgs {
    /// Requests assigned to this agent
    #[arg(long, conflicts_with = "property_id", required_unless_present = "property_id")]
    agent_id: Option<i32>,
    /// Requests filed against this property
    #[arg(long, required_unless_present = "agent_id")]
    property_id: Option<i32>,
}

#[derive(Subcommand, Debug)]
enum FavoritesCommand {
    /// Render the favorited listings still present in the snapshot
    List,
    /// Add or remove one listing from the favorites
    Toggle { id: i32 },
    /// Forget every favorite
    Clear,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn parse_kind(raw: &str) -> Result<PropertyKind, String> {
    raw.parse()
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let source = Arc::new(RestDataSource::new(&config.backend)?);
    let repository = Arc::new(PropertyRepository::new(source));
    let prefs = PreferenceStore::new(config.preferences.path.clone());

    match cli.command {
        Command::Listings(args) => run_listings(&repository, args).await,
        Command::Search { query } => run_search(repository, &query).await,
        Command::Popular { limit } => {
            render_listings(&repository.fetch_popular(limit).await);
        }
        Command::Agents => render_agents(&repository.fetch_all_agents().await),
        Command::View { id } => run_view(&repository, &prefs, id).await,
        Command::Favorites { command } => run_favorites(repository, &prefs, command).await,
        Command::RequestShowing(args) => run_request_showing(&repository, args).await,
        Command::Requests(args) => run_requests(&repository, args).await,
        Command::Profile { name } => run_profile(&prefs, name),
    }

    Ok(())
}

async fn run_listings(repository: &PropertyRepository, args: ListingsArgs) {
    let listings = if let Some(city) = args.city {
        repository.fetch_by_city(&city).await
    } else if let Some(kind) = args.kind {
        repository.fetch_by_kind(kind).await
    } else if let (Some(min), Some(max)) = (args.min_price, args.max_price) {
        repository.fetch_by_price_range(min, max).await
    } else {
        repository.fetch_all().await
    };
    render_listings(&listings);
}

async fn run_search(repository: Arc<PropertyRepository>, query: &str) {
    let store = PropertyStore::new(repository);
    store.refresh().await;
    render_listings(&store.search(query));
    if let Some(error) = store.error() {
        println!("\nLast fetch reported: {error}");
    }
}

async fn run_view(repository: &PropertyRepository, prefs: &PreferenceStore, id: i32) {
    let Some(listing) = repository.fetch_by_id(id).await else {
        println!("Listing {id} was not found.");
        return;
    };

    // Best effort on both: the view still renders if the counter write or
    // the agent lookup comes back empty.
    let _ = repository.increment_view_count(id).await;
    prefs.save_last_viewed_property(id);

    render_detail(&listing);
    if let Some(agent) = repository.fetch_agent_by_id(listing.agent_id).await {
        render_agent(&agent);
    }
}

async fn run_favorites(
    repository: Arc<PropertyRepository>,
    prefs: &PreferenceStore,
    command: FavoritesCommand,
) {
    match command {
        FavoritesCommand::Toggle { id } => {
            if prefs.toggle_favorite(id) {
                println!("Listing {id} added to favorites.");
            } else {
                println!("Listing {id} removed from favorites.");
            }
        }
        FavoritesCommand::Clear => {
            prefs.clear_favorites();
            println!("Favorites cleared.");
        }
        FavoritesCommand::List => {
            let store = PropertyStore::new(repository);
            store.refresh().await;
            let favorites = prefs.favorites();
            // Favorited ids that dropped out of the snapshot stay persisted
            // but are not rendered.
            let cards: Vec<PropertyListing> = store
                .properties()
                .into_iter()
                .filter(|listing| favorites.contains(&listing.id))
                .collect();
            if cards.is_empty() {
                println!("No favorites in the current listings.");
            } else {
                render_listings(&cards);
            }
        }
    }
}

async fn run_request_showing(repository: &PropertyRepository, args: RequestShowingArgs) {
    let Some(listing) = repository.fetch_by_id(args.property_id).await else {
        println!("Listing {} was not found.", args.property_id);
        return;
    };

    let request = ShowingRequest::for_property(
        &listing,
        args.name,
        args.phone,
        args.email,
        args.date.to_string(),
        args.message.unwrap_or_default(),
    );

    if repository.submit_showing_request(&request).await {
        println!(
            "Showing request for \"{}\" on {} submitted.",
            listing.title, request.preferred_date
        );
    } else {
        println!("Showing request was not submitted.");
    }
}

async fn run_requests(repository: &PropertyRepository, args: RequestsArgs) {
    let requests = match (args.agent_id, args.property_id) {
        (Some(agent_id), _) => repository.fetch_showing_requests_by_agent(agent_id).await,
        (_, Some(property_id)) => {
            repository
                .fetch_showing_requests_by_property(property_id)
                .await
        }
        (None, None) => Vec::new(),
    };

    if requests.is_empty() {
        println!("No showing requests.");
        return;
    }
    for request in &requests {
        println!(
            "- property {} | {} | {} | preferred {}",
            request.property_id, request.client_name, request.client_phone, request.preferred_date
        );
        if !request.message.is_empty() {
            println!("  note: {}", request.message);
        }
    }
}

fn run_profile(prefs: &PreferenceStore, name: Option<String>) {
    if let Some(name) = name {
        prefs.set_user_name(&name);
    }
    let stored = prefs.user_name();
    if stored.is_empty() {
        println!("No name stored.");
    } else {
        println!("Name: {stored}");
    }
    let last_viewed = prefs.last_viewed_property();
    if last_viewed >= 0 {
        println!("Last viewed listing: {last_viewed}");
    }
}

fn render_listings(listings: &[PropertyListing]) {
    if listings.is_empty() {
        println!("No listings.");
        return;
    }
    for listing in listings {
        println!(
            "{:>5}  {} ({})",
            listing.id,
            listing.title,
            listing.kind.label()
        );
        println!(
            "       {}, {} | price {:.0} | {} rooms, {:.0} sqm | {} views",
            listing.address, listing.city, listing.price, listing.rooms, listing.area,
            listing.views_count
        );
    }
}

fn render_detail(listing: &PropertyListing) {
    println!("{} ({})", listing.title, listing.kind.label());
    println!("{}, {}", listing.address, listing.city);
    println!(
        "Price {:.0} | {} rooms | {:.0} sqm | {} views",
        listing.price, listing.rooms, listing.area, listing.views_count
    );
    if !listing.description.is_empty() {
        println!("\n{}", listing.description);
    }
    if !listing.image_url.is_empty() {
        println!("\nPhoto: {}", listing.image_url);
    }
}

fn render_agent(agent: &Agent) {
    println!("\nListed by {} ({} years of experience)", agent.name, agent.experience_years);
    println!("{} | {}", agent.phone, agent.email);
}
