//! Console commands.

use gate_geometry::BlockPos;
use gate_registry::GateId;
use gate_weather::WeatherSelection;

/// Commands that can be sent from the input thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Rename { id: GateId, name: String },
    Unregister(BlockPos),
    Weather(WeatherSelection),
    /// Spawn a test entity in the field of the first gate.
    Spawn,
    Quit,
    Help,
    /// Recognised command with bad arguments.
    Usage(&'static str),
    Unknown(String),
}

pub const HELP: &[&str] = &[
    "  l, list                   - List registered gates",
    "  rename <id> <name>        - Rename a gate",
    "  unregister <x> <y> <z>    - Remove the gate whose core is at x y z",
    "  weather <clear|rain|thunder|0|1|2>",
    "  spawn                     - Spawn an entity in the first gate's field",
    "  q, quit                   - Quit",
    "  help                      - Show this help",
];

pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let (head, rest) = input
        .split_once(char::is_whitespace)
        .map_or((input, ""), |(head, rest)| (head, rest.trim()));

    match head.to_lowercase().as_str() {
        "l" | "list" => Command::List,
        "rename" => parse_rename(rest).unwrap_or(Command::Usage("rename <id> <name>")),
        "unregister" => parse_pos(rest)
            .map_or(Command::Usage("unregister <x> <y> <z>"), Command::Unregister),
        "weather" => WeatherSelection::parse(&rest.to_lowercase()).map_or(
            Command::Usage("weather <clear|rain|thunder|0|1|2>"),
            Command::Weather,
        ),
        "spawn" => Command::Spawn,
        "q" | "quit" | "exit" => Command::Quit,
        "help" | "h" | "?" => Command::Help,
        _ => Command::Unknown(input.to_string()),
    }
}

fn parse_rename(args: &str) -> Option<Command> {
    let (id, name) = args.split_once(char::is_whitespace)?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some(Command::Rename {
        id: GateId::parse(id)?,
        name: name.to_string(),
    })
}

fn parse_pos(args: &str) -> Option<BlockPos> {
    let mut parts = args.split_whitespace().map(|part| part.parse::<i32>().ok());
    let pos = BlockPos::new(parts.next()??, parts.next()??, parts.next()??);
    parts.next().is_none().then_some(pos)
}
