use eventdeck_core::{CardId, InsertPosition};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Games,
    Select(Vec<String>),
    Count { card_type: String, count: u32 },
    Counts,
    Difficulty(usize),
    ReserveRules(bool),
    SpecialRules(bool),
    Compose,
    Show,
    Next,
    Back,
    Clear,
    Shuffle,
    ShuffleTop(usize),
    Replace,
    Introduce,
    Insert {
        card_type: String,
        id: Option<CardId>,
        position: InsertPosition,
    },
    Search(String),
    InPlay,
    InPlayAdd(CardId),
    InPlayRemove(CardId),
    InPlayClear,
    Save(Option<PathBuf>),
    Load(Option<PathBuf>),
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let input = line.trim();
    if input.is_empty() {
        return Ok(None);
    }
    let (cmd, rest) = match input.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (input, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();
    let command = match cmd {
        "help" | "h" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        "games" => Command::Games,
        "select" => {
            let games: Vec<String> = rest
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
            if games.is_empty() {
                return Err("usage: select <game>[, <game>...]".to_string());
            }
            Command::Select(games)
        }
        "count" => match args.as_slice() {
            [card_type, count] => Command::Count {
                card_type: card_type.to_string(),
                count: parse_number(count)?,
            },
            _ => return Err("usage: count <type> <n>".to_string()),
        },
        "counts" => Command::Counts,
        "difficulty" | "diff" => match args.as_slice() {
            [index] => Command::Difficulty(parse_number(index)?),
            _ => return Err("usage: difficulty <index>".to_string()),
        },
        "reserve" => Command::ReserveRules(parse_toggle(&args)?),
        "special" => Command::SpecialRules(parse_toggle(&args)?),
        "compose" | "build" => Command::Compose,
        "show" | "s" => Command::Show,
        "next" | "n" => Command::Next,
        "back" | "b" => Command::Back,
        "clear" => Command::Clear,
        "shuffle" => match args.as_slice() {
            [] => Command::Shuffle,
            [top] => Command::ShuffleTop(parse_number(top)?),
            _ => return Err("usage: shuffle [top]".to_string()),
        },
        "replace" => Command::Replace,
        "introduce" | "sentry" => Command::Introduce,
        "insert" => parse_insert(&args)?,
        "search" => {
            if rest.is_empty() {
                return Err("usage: search <text>".to_string());
            }
            Command::Search(rest.to_string())
        }
        "inplay" => match args.as_slice() {
            [] | ["list"] => Command::InPlay,
            ["add", id] => Command::InPlayAdd(parse_number(id)?),
            ["remove", id] => Command::InPlayRemove(parse_number(id)?),
            ["clear"] => Command::InPlayClear,
            _ => return Err("usage: inplay [list|add <id>|remove <id>|clear]".to_string()),
        },
        "save" => Command::Save(optional_path(rest)),
        "load" => Command::Load(optional_path(rest)),
        other => return Err(format!("unknown command: {other} (type 'help')")),
    };
    Ok(Some(command))
}

fn parse_insert(args: &[&str]) -> Result<Command, String> {
    let usage = || "usage: insert <type> [id] [next|bottom|random]".to_string();
    let (card_type, rest) = args.split_first().ok_or_else(usage)?;
    if rest.len() > 2 {
        return Err(usage());
    }
    let mut id = None;
    let mut position = InsertPosition::Next;
    for arg in rest {
        if let Ok(value) = arg.parse::<CardId>() {
            id = Some(value);
        } else {
            position = arg.parse()?;
        }
    }
    Ok(Command::Insert {
        card_type: card_type.to_string(),
        id,
        position,
    })
}

fn parse_number<T: std::str::FromStr>(value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("expected a number, got {value:?}"))
}

fn parse_toggle(args: &[&str]) -> Result<bool, String> {
    match args {
        ["on"] => Ok(true),
        ["off"] => Ok(false),
        _ => Err("expected on or off".to_string()),
    }
}

fn optional_path(rest: &str) -> Option<PathBuf> {
    (!rest.is_empty()).then(|| PathBuf::from(rest))
}
