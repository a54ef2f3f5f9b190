mod commands;
mod logger;
mod persistence;

use anyhow::Context;
use commands::{parse_command, Command};
use eventdeck_core::{CursorState, RngState, Session, SessionError};
use eventdeck_data::{load_assets, Assets};
use persistence::{default_state_path, load_state_file, save_state_file};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
struct CliOptions {
    assets: PathBuf,
    save: Option<PathBuf>,
    seed: Option<u64>,
}

fn parse_cli_options(args: &[String]) -> CliOptions {
    let mut options = CliOptions {
        assets: PathBuf::from("assets"),
        save: default_state_path(),
        seed: None,
    };
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--assets" => {
                if let Some(value) = args.get(idx + 1) {
                    options.assets = PathBuf::from(value);
                    idx += 1;
                }
            }
            "--save" => {
                if let Some(value) = args.get(idx + 1) {
                    options.save = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    options.seed = value.parse::<u64>().ok();
                    idx += 1;
                }
            }
            other => log::warn!("ignoring argument {other:?}"),
        }
        idx += 1;
    }
    options
}

fn main() {
    logger::init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_cli_options(&args);
    if let Err(err) = run(options) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(options: CliOptions) -> anyhow::Result<()> {
    let assets = load_assets(&options.assets)
        .with_context(|| format!("load assets from {}", options.assets.display()))?;
    let rng = options
        .seed
        .map_or_else(RngState::from_entropy, RngState::from_seed);
    log::info!("random seed {}", rng.seed());
    let mut session = open_session(&assets, options.save.as_deref(), rng);

    print_help();
    print_deck(&session);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush().context("flush stdout")?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("read stdin")?;
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        if let Some(reloaded) = execute(&mut session, command, &assets, options.save.as_deref()) {
            session = reloaded;
            print_deck(&session);
        }
        // Any queued event means the session changed.
        if !session.drain_events().is_empty() {
            if let Some(path) = options.save.as_deref() {
                if let Err(err) = save_state_file(&session.snapshot(), path) {
                    log::warn!("autosave failed: {err:#}");
                }
            }
        }
    }
    Ok(())
}

fn open_session(assets: &Assets, save: Option<&Path>, rng: RngState) -> Session {
    let fresh = |rng: RngState| {
        Session::new(
            assets.catalog.clone(),
            assets.difficulties.clone(),
            assets.rules.clone(),
            rng,
        )
    };
    let Some(path) = save.filter(|path| path.exists()) else {
        return fresh(rng);
    };
    let restored = load_state_file(path).and_then(|snapshot| {
        Session::restore(
            assets.catalog.clone(),
            assets.difficulties.clone(),
            assets.rules.clone(),
            &snapshot,
            rng.clone(),
        )
        .map_err(anyhow::Error::from)
    });
    match restored {
        Ok(session) => {
            println!("resumed session from {}", path.display());
            session
        }
        Err(err) => {
            println!("could not resume {}: {err:#}", path.display());
            fresh(rng)
        }
    }
}

/// Runs one command. Returns a replacement session when the command loads
/// a saved one.
fn execute(
    session: &mut Session,
    command: Command,
    assets: &Assets,
    save: Option<&Path>,
) -> Option<Session> {
    let result: Result<Option<String>, SessionError> = match command {
        Command::Help => {
            print_help();
            Ok(None)
        }
        Command::Quit => Ok(None),
        Command::Games => {
            print_games(session);
            Ok(None)
        }
        Command::Select(games) => Ok(Some(session.select_games(games).to_string())),
        Command::Count { card_type, count } => {
            let event = session.set_count(&card_type, count);
            print_counts(session);
            Ok(Some(event.to_string()))
        }
        Command::Counts => {
            print_counts(session);
            Ok(None)
        }
        Command::Difficulty(index) => session.select_difficulty(index).map(|event| {
            print_counts(session);
            Some(event.to_string())
        }),
        Command::ReserveRules(enabled) => Ok(Some(session.set_reserve_rules(enabled).to_string())),
        Command::SpecialRules(enabled) => Ok(Some(session.set_special_rules(enabled).to_string())),
        Command::Compose => session.compose_deck().map(|event| Some(event.to_string())),
        Command::Show => {
            print_deck(session);
            Ok(None)
        }
        Command::Next => session.advance().map(|event| Some(event.to_string())),
        Command::Back => Ok(Some(
            session
                .retreat()
                .map_or_else(|| "already at the top of the deck".to_string(), |event| event.to_string()),
        )),
        Command::Clear => Ok(Some(session.clear().to_string())),
        Command::Shuffle => session.shuffle_anywhere().map(|event| Some(event.to_string())),
        Command::ShuffleTop(top) => session.shuffle_top(top).map(|event| Some(event.to_string())),
        Command::Replace => session.replace_same_type().map(|event| Some(event.to_string())),
        Command::Introduce => session.introduce_reserve().map(|event| Some(event.to_string())),
        Command::Insert {
            card_type,
            id,
            position,
        } => session
            .insert_by_type(&card_type, id, position)
            .map(|event| Some(event.to_string())),
        Command::Search(query) => {
            for card in session.search(&query) {
                println!("  {:>4}  {}  [{}]", card.id, card.card, card.kind);
            }
            Ok(None)
        }
        Command::InPlay => {
            for card in session.in_play().cards() {
                println!("  {:>4}  {}", card.id, card.card);
            }
            Ok(None)
        }
        Command::InPlayAdd(id) => session.add_in_play(id).map(|event| {
            Some(event.map_or_else(|| format!("card {id} is already in play"), |event| event.to_string()))
        }),
        Command::InPlayRemove(id) => session.remove_in_play(id).map(|event| Some(event.to_string())),
        Command::InPlayClear => Ok(Some(session.clear_in_play().to_string())),
        Command::Save(path) => {
            let Some(path) = path.as_deref().or(save) else {
                println!("save path unavailable");
                return None;
            };
            match save_state_file(&session.snapshot(), path) {
                Ok(()) => println!("saved to {}", path.display()),
                Err(err) => println!("save failed: {err:#}"),
            }
            return None;
        }
        Command::Load(path) => {
            let Some(path) = path.as_deref().or(save) else {
                println!("load path unavailable");
                return None;
            };
            let loaded = load_state_file(path).and_then(|snapshot| {
                Session::restore(
                    assets.catalog.clone(),
                    assets.difficulties.clone(),
                    assets.rules.clone(),
                    &snapshot,
                    RngState::from_entropy(),
                )
                .map_err(anyhow::Error::from)
            });
            return match loaded {
                Ok(session) => {
                    println!("loaded {}", path.display());
                    Some(session)
                }
                Err(err) => {
                    println!("load failed: {err:#}");
                    None
                }
            };
        }
    };
    match result {
        Ok(Some(message)) => {
            println!("{message}");
            if matches!(
                session.deck().cursor(),
                CursorState::OnCard(_) | CursorState::BeforeStart
            ) {
                print_deck(session);
            }
        }
        Ok(None) => {}
        Err(err) => println!("{err}"),
    }
    None
}

fn print_help() {
    println!("Commands:");
    println!("  games                          list games and the current selection");
    println!("  select <game>[, <game>...]     choose the games to draw from");
    println!("  count <type> <n> | counts      set or show requested card counts");
    println!("  difficulty <index>             apply a difficulty preset");
    println!("  reserve on|off | special on|off  toggle reserve and special rules");
    println!("  compose                        build a new deck");
    println!("  next|n  back|b  clear  show|s  move through the deck");
    println!("  shuffle [top]                  shuffle the current card back in");
    println!("  replace                        swap the current card for one of its type");
    println!("  introduce                      shuffle the reserve deck into the rest");
    println!("  insert <type> [id] [next|bottom|random]  add a card");
    println!("  search <text>                  find cards by name or type");
    println!("  inplay [add <id>|remove <id>|clear]  track in-play cards");
    println!("  save [path]  load [path]       persist the session");
    println!("  help  quit");
}

fn print_games(session: &Session) {
    let selected = &session.settings().selected_games;
    for name in session.catalog().game_names() {
        let mark = if selected.iter().any(|game| game == name) {
            "*"
        } else {
            " "
        };
        let size = session.catalog().game(name).map_or(0, <[_]>::len);
        println!("  {mark} {name} ({size} cards)");
    }
    println!("difficulty levels:");
    for (index, difficulty) in session.difficulties().iter().enumerate() {
        println!(
            "  {index}: {} (novice {}, veteran {}) {}",
            difficulty.name, difficulty.novice, difficulty.veteran, difficulty.description
        );
    }
}

fn print_counts(session: &Session) {
    let counts = session.requested_counts();
    if counts.is_empty() {
        println!("no counts set");
        return;
    }
    let line: Vec<String> = counts
        .iter()
        .map(|(name, count)| format!("{name}={count}"))
        .collect();
    println!("counts: {}", line.join(", "));
}

fn print_deck(session: &Session) {
    let deck = session.deck();
    let progress = session.progress();
    match deck.cursor() {
        CursorState::Empty => println!("no deck built"),
        CursorState::BeforeStart => println!(
            "[deck back] 0/{} (built with {})",
            progress.total, progress.initial
        ),
        CursorState::OnCard(_) => {
            if let Some(card) = deck.current_card() {
                println!(
                    "[{}/{}] {} ({}) {}",
                    progress.shown, progress.total, card.card, card.kind, card.contents
                );
            }
        }
    }
    if !deck.reserve().is_empty() {
        println!("reserve: {} cards waiting", deck.reserve().len());
    }
}
