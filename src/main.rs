//! Pokemon Scanner - command-line client
//!
//! Scan cards from photos, review the matches, and manage your collection
//! against the scanner API.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pokemon_scanner::collection::state::LOGIN_REQUIRED;
use pokemon_scanner::formatters::{
    format_candidate, format_card, format_collection, format_item_details, format_leaderboard,
    format_review_card, format_scan_overview,
};
use pokemon_scanner::review::multi::{CardDecision, MultiPhase};
use pokemon_scanner::review::single::{ProcessStep, SingleOutcome, SingleView};
use pokemon_scanner::validation::validate_signup;
use pokemon_scanner::{
    add_accepted, capture_once, fetch_card_cached, open_public_collection, CardCache,
    CollectionAccess, CollectionState, Config, DeletePress, FileCapture, LeaderboardView,
    MultiCardReview, NewUser, Notice, ScanResponse, ScannerApi, Session, SingleCardReview,
    SortKey, SortOrder,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Pokemon card scanner client
#[derive(Parser, Debug)]
#[command(name = "pokemon_scanner")]
#[command(version, about, long_about = None)]
struct Args {
    /// Scanner API root (overrides config file and environment)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Signed-in user id
    #[arg(long, global = true)]
    user_id: Option<String>,

    /// Do not read or write the catalog card cache
    #[arg(long, global = true, default_value_t = false)]
    no_cache: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List your collection
    Collection {
        /// Sort key: name, set, rarity, quantity, hp, type, damage, stage, ability, ex, family, pokedex
        #[arg(short, long, default_value = "name")]
        sort: String,
        /// Sort descending
        #[arg(long, default_value_t = false)]
        desc: bool,
        /// Only cards whose name contains this text
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show one card from your collection, or from the catalog if you don't own it
    Card { card_id: String },
    /// Set how many copies of a card you own
    SetQuantity {
        card_id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a card from your collection (asks for confirmation)
    Delete { card_id: String },
    /// Scan a photo of a single card
    Scan {
        image: PathBuf,
        /// Walk through the detection steps before the matches
        #[arg(long, default_value_t = false)]
        show_process: bool,
    },
    /// Scan a photo with several cards
    ScanMulti {
        image: PathBuf,
        /// Show the detection overview before reviewing
        #[arg(long, default_value_t = false)]
        show_process: bool,
    },
    /// Browse the collector leaderboard
    Leaderboard {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// View another collector's public collection
    ViewUser {
        user_id: String,
        /// Display name used in messages
        #[arg(long, default_value = "This user")]
        name: String,
        #[arg(short, long, default_value = "name")]
        sort: String,
    },
    /// Show or toggle whether your collection is public
    Visibility {
        #[arg(long, default_value_t = false)]
        toggle: bool,
    },
    /// Record a newly created account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
    },
    /// Show the account record of the signed-in user
    Whoami,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logger. Set RUST_LOG environment variable to control log level.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        log::error!("Application error: {e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = Config::load();
    if let Some(url) = &args.api_url {
        config.set_api_url(url);
    }
    if let Some(user_id) = &args.user_id {
        config.user_id = Some(user_id.trim().to_string());
    }
    if args.no_cache {
        config.use_card_cache = false;
    }
    log::info!("Using scanner API at {}", config.api_url);

    let api = ScannerApi::from_config(&config)?;
    let session = config.session();
    let mut cache = if config.use_card_cache {
        CardCache::load()
    } else {
        CardCache::default()
    };

    match args.command {
        Command::Collection { sort, desc, search } => {
            let session = require_session(session.as_ref())?;
            let state = load_collection(&api, &session.user_id).await?;
            let order = if desc {
                SortOrder::Descending
            } else {
                SortOrder::Ascending
            };
            let items = pokemon_scanner::collection::sorted_view_by_label(
                state.items(),
                &sort,
                order,
                &search,
            );
            print!(
                "{}",
                format_collection(&items, state.total_cards(), state.total_quantity())
            );
        }
        Command::Card { card_id } => {
            let owned = match session.as_ref() {
                Some(session) => {
                    let mut state = load_collection(&api, &session.user_id).await?;
                    if state.open(&card_id) {
                        state.selected().map(format_item_details)
                    } else {
                        None
                    }
                }
                None => None,
            };
            match owned {
                Some(details) => print!("{details}"),
                None => {
                    let card = fetch_card_cached(&mut cache, &api, &card_id)
                        .await
                        .with_context(|| format!("Failed to look up {card_id}"))?;
                    print!("{}", format_card(&card));
                }
            }
        }
        Command::SetQuantity { card_id, quantity } => {
            let session = require_session(session.as_ref())?;
            let mut state = load_collection(&api, &session.user_id).await?;
            if state.find(&card_id).is_none() {
                bail!("{card_id} is not in your collection");
            }
            let quantity = state
                .update_quantity(&api, session, &card_id, quantity)
                .await
                .context("Failed to update quantity")?;
            println!(
                "{}",
                Notice::success(format!(
                    "Quantity of {card_id} set to {quantity} ({} cards total)",
                    state.total_quantity()
                ))
            );
        }
        Command::Delete { card_id } => {
            let session = require_session(session.as_ref())?;
            let mut state = load_collection(&api, &session.user_id).await?;
            if !state.open(&card_id) {
                bail!("{card_id} is not in your collection");
            }
            delete_with_confirmation(&api, session, &mut state, &card_id).await?;
        }
        Command::Scan {
            image,
            show_process,
        } => {
            let image = capture_once(FileCapture::new(&image))?;
            run_single_scan(&api, session.as_ref(), &mut cache, image, show_process).await?;
        }
        Command::ScanMulti {
            image,
            show_process,
        } => {
            let image = capture_once(FileCapture::new(&image))?;
            run_multi_scan(&api, session.as_ref(), image, show_process).await?;
        }
        Command::Leaderboard { search, page } => {
            let entries = api
                .leaderboard()
                .await
                .context("Failed to load leaderboard. Please try again")?;
            let mut view = LeaderboardView::new(entries);
            view.set_query(&search);
            if !view.go_to_page(page) {
                log::warn!("Page {} out of range, showing page 1", page);
            }
            print!("{}", format_leaderboard(&view));
        }
        Command::ViewUser {
            user_id,
            name,
            sort,
        } => {
            let entry = pokemon_scanner::LeaderboardEntry {
                user_id,
                name,
                ..Default::default()
            };
            match open_public_collection(&api, &entry)
                .await
                .context("Unable to check collection visibility")?
            {
                CollectionAccess::Public(response) => {
                    let state = CollectionState::from_response(response);
                    let items = state.view(
                        sort.parse::<SortKey>().unwrap_or(SortKey::Name),
                        SortOrder::Ascending,
                        "",
                    );
                    print!(
                        "{}",
                        format_collection(&items, state.total_cards(), state.total_quantity())
                    );
                }
                CollectionAccess::Private(message) => println!("{}", Notice::info(message)),
            }
        }
        Command::Visibility { toggle } => {
            let session = require_session(session.as_ref())?;
            let is_public = if toggle {
                api.toggle_visibility(&session.user_id)
                    .await
                    .context("Failed to toggle public/private")?
            } else {
                api.profile_status(&session.user_id).await?
            };
            let label = if is_public { "Public" } else { "Private" };
            println!(
                "{}",
                Notice::success(format!("Your collection is now {label}"))
            );
        }
        Command::Register { email, name } => {
            let password = prompt("Password: ")?;
            let confirm = prompt("Confirm password: ")?;
            validate_signup(&name, &password, &confirm)?;
            let user_id = match session {
                Some(session) => session.user_id,
                None => uuid::Uuid::new_v4().to_string(),
            };
            api.add_user(&NewUser {
                user_id: user_id.clone(),
                email,
                password,
                name,
            })
            .await
            .context("Failed to record account")?;
            println!("{}", Notice::success(format!("Account recorded as {user_id}")));
        }
        Command::Whoami => {
            let session = require_session(session.as_ref())?;
            let user = api.get_user(&session.user_id).await?;
            println!("{} ({})", user.name, user.id);
            if let Some(email) = user.email {
                println!("  {email}");
            }
        }
    }
    Ok(())
}

fn require_session(session: Option<&Session>) -> Result<&Session> {
    match session {
        Some(session) => Ok(session),
        None => bail!("Not signed in. Pass --user-id or set POKEMON_SCANNER_USER_ID"),
    }
}

async fn load_collection(api: &ScannerApi, user_id: &str) -> Result<CollectionState> {
    let response = api
        .user_collection(user_id)
        .await
        .context("Failed to load collection. Please try again")?;
    Ok(CollectionState::from_response(response))
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

async fn delete_with_confirmation(
    api: &ScannerApi,
    session: &Session,
    state: &mut CollectionState,
    card_id: &str,
) -> Result<()> {
    loop {
        if state.press_delete(card_id) == DeletePress::Armed {
            let answer = prompt("Are you sure? Press Enter within 5 seconds to delete, or type n to keep: ")?;
            if answer.eq_ignore_ascii_case("n") {
                state.close();
                println!("Kept {card_id}");
                return Ok(());
            }
            if state.poll_confirm() {
                println!("Confirmation expired");
            }
            continue;
        }
        let outcome = state.delete_card(api, Some(session), card_id).await;
        println!("{}", outcome.notice);
        return Ok(());
    }
}

fn describe_step(step: ProcessStep, scan: &ScanResponse) -> String {
    let images = scan.process_images();
    let image = images.as_ref().map(|images| match step {
        ProcessStep::CapturedImage => &images.captured,
        ProcessStep::BoundingBox => &images.bounding_box,
        ProcessStep::CroppedImage => &images.cropped,
        ProcessStep::OcrExtracted => &images.ocr_annotated,
    });
    let mut output = format!("{}\n", step.title());
    match image {
        Some(data_url) => output.push_str(&format!("  image: {} bytes\n", data_url.len())),
        None => output.push_str("  image: not available\n"),
    }
    if step == ProcessStep::OcrExtracted {
        if let Some(info) = &scan.card_info {
            output.push_str(&format!("{}\n", info.summary()));
        }
    }
    output
}

async fn run_single_scan(
    api: &ScannerApi,
    session: Option<&Session>,
    cache: &mut CardCache,
    image: Vec<u8>,
    show_process: bool,
) -> Result<()> {
    let mut review = SingleCardReview::new(show_process);
    let scan = match api.scan_card(image, show_process).await {
        Ok(scan) => {
            review.receive(scan.matches());
            scan
        }
        Err(e) => {
            review.fail(e.to_string());
            ScanResponse::default()
        }
    };

    loop {
        match review.view().clone() {
            SingleView::Loading => bail!("Scan response was never received"),
            SingleView::Process(step) => {
                print!("{}", describe_step(step, &scan));
                let answer = prompt("[Enter] continue, [b] back: ")?;
                if answer.eq_ignore_ascii_case("b") {
                    review.go_back();
                } else {
                    review.continue_step();
                }
            }
            SingleView::Confirmation { index } => {
                let Some(candidate) = review.current_candidate().cloned() else {
                    bail!("No candidate at position {index}");
                };
                let card = match candidate.card_id() {
                    Some(card_id) => match fetch_card_cached(cache, api, &card_id).await {
                        Ok(card) => Some(card),
                        Err(e) => {
                            log::warn!("Error fetching card data for {}: {}", card_id, e);
                            None
                        }
                    },
                    None => None,
                };
                print!(
                    "{}",
                    format_candidate(&candidate, index, review.candidates().len(), card.as_ref())
                );
                let answer = prompt("[y] add to collection, [n] show next match, [b] back: ")?;
                match answer.to_ascii_lowercase().as_str() {
                    "y" => {
                        review.accept();
                    }
                    "b" => review.go_back(),
                    _ => {
                        review.reject();
                    }
                }
            }
            SingleView::Finished(outcome) => {
                match outcome {
                    SingleOutcome::Accepted(candidate) => match candidate.card_id() {
                        Some(card_id) => println!("{}", add_accepted(api, session, &card_id).await),
                        None => println!(
                            "{}",
                            Notice::error(format!(
                                "Cannot derive a card id from {}",
                                candidate.card_name
                            ))
                        ),
                    },
                    SingleOutcome::Cancelled => {}
                    other => {
                        if let Some(message) = other.message() {
                            println!("{}", Notice::error(message));
                        }
                    }
                }
                return Ok(());
            }
        }
    }
}

async fn run_multi_scan(
    api: &ScannerApi,
    session: Option<&Session>,
    image: Vec<u8>,
    show_process: bool,
) -> Result<()> {
    let scan = api.scan_multiple_cards(image).await?;
    let mut review = MultiCardReview::new(scan.cards.clone(), show_process);

    loop {
        match review.phase() {
            MultiPhase::Finished(summary) => {
                println!("{}", Notice::info(summary.to_string()));
                return Ok(());
            }
            MultiPhase::Overview => {
                print!("{}", format_scan_overview(&scan));
                if let Some(image) = &scan.detection_image {
                    println!("  detection image: {} bytes", image.len());
                }
                let answer = prompt("[Enter] start reviewing, a card number to jump to it, [q] quit: ")?;
                if answer.eq_ignore_ascii_case("q") {
                    return Ok(());
                }
                match answer.parse::<usize>() {
                    Ok(number) if number >= 1 && review.go_to(number - 1) => {}
                    _ => review.start_reviewing(),
                }
            }
            MultiPhase::Reviewing => {
                print!("{}", format_review_card(&review));
                let answer =
                    prompt("[a]dd, [s]kip, [p]revious, [n]ext, [f]inish, [q]uit: ")?;
                match answer.to_ascii_lowercase().as_str() {
                    "a" => {
                        if review.decision(review.index()) != CardDecision::Pending {
                            println!("{}", Notice::info("This card was already reviewed"));
                            continue;
                        }
                        let Some(variant) = review.current_variant() else {
                            continue;
                        };
                        if session.is_none() {
                            println!("{}", Notice::error(LOGIN_REQUIRED));
                            continue;
                        }
                        let notice = add_accepted(api, session, &variant.card_id).await;
                        if !notice.is_error() {
                            review.accept();
                        }
                        println!("{notice}");
                    }
                    "s" => {
                        review.skip();
                    }
                    "p" => {
                        review.previous();
                    }
                    "n" => {
                        review.next();
                    }
                    "f" => {
                        review.finish();
                    }
                    "q" => return Ok(()),
                    _ => {}
                }
            }
        }
    }
}
