//! Terminal driver for a nearby-likes session.
//!
//! Runs the same actions a mini-app's buttons would, in order, and prints
//! each status line.
//!
//! # Usage
//!
//! ```bash
//! # Register, send a heartbeat from a fixed point, list who is nearby
//! NEARBY_INIT_DATA='query_id=...' nearby-console --lat 55.75 --lon 37.61
//!
//! # Same, then like user 7 and look at their profile
//! nearby-console --init-data '...' --lat 55.75 --lon 37.61 --like 7 --profile 7
//! ```

use clap::Parser;
use nearby::prelude::*;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Nearby likes console client
#[derive(Parser, Debug)]
#[command(name = "nearby-console")]
#[command(about = "Register, share a location, and like people nearby")]
#[command(version)]
struct Args {
    /// Service root URL
    #[arg(long, env = "NEARBY_BASE_URL", default_value = "http://127.0.0.1:8000")]
    base_url: String,

    /// Identity blob from the host container
    #[arg(long, env = "NEARBY_INIT_DATA", default_value = "")]
    init_data: String,

    /// Latitude to report on heartbeat
    #[arg(long, env = "NEARBY_LAT", requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude to report on heartbeat
    #[arg(long, env = "NEARBY_LON", requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// User ids to like after discovery (repeatable)
    #[arg(long)]
    like: Vec<u64>,

    /// User id whose profile to show at the end
    #[arg(long)]
    profile: Option<u64>,

    /// Seconds to wait for a location fix
    #[arg(long, default_value = "15")]
    locate_timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// The position given on the command line, if any.
struct ArgLocation(Option<Coordinate>);

impl LocationProvider for ArgLocation {
    async fn locate(&self, _options: &LocateOptions) -> Result<Coordinate, LocationError> {
        self.0.ok_or(LocationError::Unsupported)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let position = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)?),
        _ => None,
    };
    if position.is_none() {
        tracing::warn!("no --lat/--lon given; heartbeats will fail");
    }

    let config = ClientConfig::default()
        .base_url(args.base_url)
        .locate_timeout(std::time::Duration::from_secs(args.locate_timeout));
    let client = NearbyClientBuilder::new().config(config).build(
        ArgLocation(position),
        StaticCredential::new(args.init_data),
    )?;
    tracing::info!(base_url = %client.config().base_url, "client ready");

    let mut actions = vec![Action::Register, Action::Heartbeat, Action::Nearby];
    actions.extend(args.like.iter().map(|&id| Action::Like(UserId(id))));
    actions.push(Action::Leaderboard);
    actions.extend(args.profile.map(|id| Action::Profile(UserId(id))));

    for action in actions {
        let outcome = dispatch(&client, action).await;
        println!("{}", outcome.status);
        render(&outcome.view);
    }

    Ok(())
}

fn render(view: &View) {
    match view {
        View::Nearby(snapshot)
        | View::Liked {
            refreshed: Some(snapshot),
            ..
        } => {
            for user in &snapshot.users {
                println!(
                    "  {:>6} {:<24} {:>7.1} m  likes: {}",
                    user.id.to_string(),
                    user.display_name(),
                    user.distance_m,
                    user.likes_received
                );
            }
        }
        View::Leaderboard(board) => {
            for entry in &board.entries {
                println!(
                    "  {:>3}. {:<24} likes: {}",
                    entry.rank,
                    entry.user.display_name(),
                    entry.likes_received
                );
            }
        }
        View::Profile(profile) => {
            if let Some(at) = profile.last_location {
                println!("  last seen at {at}");
            }
            for like in &profile.recent_likes {
                println!(
                    "  {} liked {} at {}",
                    like.from_user_id,
                    like.to_user_id,
                    like.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        _ => {}
    }
}
