mod cli;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Commands, ParamsAction, SessionAction};
use closet::params::{self, QueryParameters};
use closet::prelude::*;

/// Fetch failures go straight to the terminal, once each.
#[derive(Debug, Default, Clone, Copy)]
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify_error(&self, message: &str) {
        eprintln!("Error: {}", message);
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = &cli.endpoint {
        config = config.with_api_url(url)?;
    }

    match cli.command {
        Commands::Browse { query, pricing, keyword, sort, min, max, pages, all, json } => {
            let mut qs = query;
            for option in pricing {
                qs = params::toggle_pricing_filter(&qs, option);
            }
            if let Some(k) = keyword {
                qs = params::set_keyword(&qs, &k);
            }
            if let Some(s) = sort {
                qs = params::set_sort(&qs, &SortKey::from_token(&s));
            }
            if min.is_some() || max.is_some() {
                let current = QueryParameters::from_query_string(&qs);
                if !current.is_paid_filter_active() {
                    warn!("--min/--max only narrow paid items; add `--pricing paid` for paid only");
                }
                let range = current.price_range;
                let range = PriceRange::new(min.unwrap_or(range.min), max.unwrap_or(range.max));
                qs = params::set_price_range(&qs, range);
            }

            let closet = Closet::new(&config)?;
            let mut feed = Feed::new(StderrNotifier);
            let mut next = Some(feed.apply(QueryParameters::from_query_string(&qs)));
            let mut loaded = 0;
            while let Some(ticket) = next.take() {
                closet.settle(&mut feed, &ticket).await;
                loaded += 1;
                if matches!(feed.status(), FeedStatus::Failed(_)) {
                    break;
                }
                if all || loaded < pages {
                    next = feed.load_more();
                }
            }
            render(&feed, &qs, json)?;
            if matches!(feed.status(), FeedStatus::Failed(_)) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Params { query, action } => {
            let qs = match action {
                ParamsAction::Show => {
                    println!("{:#?}", QueryParameters::from_query_string(&query));
                    return Ok(ExitCode::SUCCESS);
                }
                ParamsAction::Toggle { option } => params::toggle_pricing_filter(&query, option),
                ParamsAction::Keyword { value } => {
                    params::set_keyword(&query, value.as_deref().unwrap_or(""))
                }
                ParamsAction::Sort { key } => params::set_sort(&query, &SortKey::from_token(&key)),
                ParamsAction::Range { min, max } => {
                    params::set_price_range(&query, PriceRange::new(min, max))
                }
                ParamsAction::Reset => params::reset_filters(&query),
            };
            println!("{}", qs);
        }
        Commands::Session { action } => {
            let closet = Closet::new(&config)?;
            match action {
                SessionAction::Set { token } => {
                    closet.session().set_token(&token).await?;
                    println!("Token stored");
                }
                SessionAction::Clear => {
                    closet.session().clear().await?;
                    println!("Session cleared");
                }
                SessionAction::Show => match closet.session().token().await? {
                    Some(_) => println!("A token is stored"),
                    None => println!("No token stored"),
                },
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info,closet=debug",
        _ => "debug,closet=trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[derive(Serialize)]
struct BrowseOutput<'a> {
    query: &'a str,
    total_items: usize,
    has_more: bool,
    items: &'a [ContentItem],
}

/// Prints what the feed holds. A failure has already been reported by the
/// feed's notifier, so it only changes the wording here, never the exit path.
fn render<N: Notifier>(feed: &Feed<N>, qs: &str, json: bool) -> Result<()> {
    if matches!(feed.status(), FeedStatus::Failed(_)) && feed.items().is_empty() {
        if !json {
            println!("Failed to load content. Please try again later.");
        }
        return Ok(());
    }

    if json {
        let out = BrowseOutput {
            query: qs,
            total_items: feed.total_items(),
            has_more: feed.has_more(),
            items: feed.items(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Contents List  ?{}", qs);
        println!("{} items found", feed.total_items());
        if matches!(feed.status(), FeedStatus::Empty) {
            println!("No products match your filters. Try adjusting your search criteria.");
        }
        for item in feed.items() {
            let price = item.price_label();
            println!("  {:<40} {:<20} {:>10}  ({})", item.title, item.creator, price, item.id);
        }
        if feed.has_more() {
            println!("... more available (use --pages or --all)");
        }
    }

    if matches!(feed.status(), FeedStatus::Failed(_)) && !json {
        println!("(later pages failed to load; showing what was loaded before)");
    }
    Ok(())
}
