use std::{
    error::Error,
    fmt,
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    thread,
    time::Duration,
};

use clap::{App, Arg, ArgMatches};
use once_cell::sync::Lazy;
use rand::{rngs::StdRng, Rng, SeedableRng};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use broadside::{
    board::{Axis, Cell, CellState, CellStyle, Coordinate, Direction, Gameboard, ShotResult},
    events::{GameEvent, PlacementRecord},
    game::singleplayer::{Match, Player},
    ships::ShipId,
};

/// Everything needed to rebuild a match, as written by `--save`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedMatch {
    first: Player,
    player_placements: Vec<PlacementRecord>,
    computer_placements: Vec<PlacementRecord>,
    events: Vec<GameEvent>,
}

impl SavedMatch {
    fn capture(game: &Match) -> Self {
        Self {
            first: game.first(),
            player_placements: game.player_board().placements().to_vec(),
            computer_placements: game.computer_board().placements().to_vec(),
            events: game.events().to_vec(),
        }
    }
}

fn main() -> io::Result<()> {
    let matches = App::new("Battleship")
        .version("1.0")
        .author("Zachary Stewart <zachary@zstewart.com>")
        .about("Command line battleship against a hunt/target computer opponent.")
        .arg(
            Arg::with_name("first_player")
                .short("f")
                .long("first-player")
                .value_name("FIRST_PLAYER")
                .help("pre-specify which player goes first")
                .takes_value(true)
                .possible_values(&["human", "me", "computer", "bot", "random", "rand"])
                .case_insensitive(true),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .value_name("SEED")
                .help("seed the random number generator for a reproducible match")
                .takes_value(true)
                .validator(|seed| seed.parse::<u64>().map(|_| ()).map_err(|e| e.to_string())),
        )
        .arg(
            Arg::with_name("save")
                .long("save")
                .value_name("PATH")
                .help("write the match to this file after every shot")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("replay")
                .long("replay")
                .value_name("PATH")
                .help("rebuild and print a match written with --save, then exit")
                .takes_value(true)
                .conflicts_with("save"),
        )
        .arg(
            Arg::with_name("delay")
                .long("delay")
                .value_name("MILLIS")
                .help("pause before each computer shot")
                .takes_value(true)
                .default_value("500")
                .validator(|ms| ms.parse::<u64>().map(|_| ()).map_err(|e| e.to_string())),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("log more detail to stderr, repeat for more"),
        )
        .get_matches();

    init_logging(matches.occurrences_of("verbose"));

    if let Some(path) = matches.value_of("replay") {
        return replay(path);
    }

    let mut rng = match matches.value_of("seed").and_then(|seed| seed.parse().ok()) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let delay = Duration::from_millis(
        matches
            .value_of("delay")
            .and_then(|ms| ms.parse().ok())
            .unwrap_or(500),
    );
    let save = matches.value_of("save");

    let stdin = std::io::stdin();
    let mut input = InputReader::new(stdin.lock());

    let mut game = Match::new(choose_player(&matches, &mut input, &mut rng)?);
    loop {
        choose_placements(&mut rng, &mut game, &mut input)?;
        game.start(&mut rng).map_err(to_io)?;
        play(&mut rng, &mut game, &mut input, delay, save)?;

        let again = input.read_input_lower("Play again? (y/N)", |input| match input {
            "yes" | "y" => Some(true),
            "no" | "n" | "" => Some(false),
            _ => {
                println!("Invalid selection.");
                None
            }
        })?;
        if !again {
            break;
        }
        let first = choose_player(&matches, &mut input, &mut rng)?;
        game.rematch(first);
    }
    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` wins over the `-v` count.
fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn to_io<E: Error + Send + Sync + 'static>(err: E) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err)
}

/// Choose who shoots first based on either args or cli input.
fn choose_player<B: BufRead>(
    matches: &ArgMatches,
    input: &mut InputReader<B>,
    rng: &mut impl Rng,
) -> io::Result<Player> {
    Ok(if let Some(clichoice) = matches.value_of("first_player") {
        match clichoice.to_ascii_lowercase().as_str() {
            "human" | "me" => Player::Human,
            "computer" | "bot" => Player::Computer,
            _ if rng.gen() => Player::Human,
            _ => Player::Computer,
        }
    } else {
        input.read_input_lower("Do you want to go first? (Y/n)", |input| match input {
            "yes" | "y" | "first" | "1" | "1st" | "" => Some(Player::Human),
            "no" | "n" | "second" | "2" | "2nd" => Some(Player::Computer),
            _ => {
                println!("Invalid selection.");
                None
            }
        })?
    })
}

/// Matcher for `<x>,<y>` or `<x> <y>`, with the command word stripped.
static COORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<x>[0-9]+)(?:\s*,\s*|\s+)(?P<y>[0-9]+)$").unwrap());

/// Parse the coordinate argument of a command, printing why it was rejected.
fn parse_coord(arg: &str) -> Option<Coordinate> {
    let captures = match COORD.captures(arg) {
        Some(captures) => captures,
        None => {
            println!("invalid coordinate \"{}\", expected <x>,<y>", arg);
            return None;
        }
    };
    let component = |name: &str| match captures[name].parse::<usize>() {
        Ok(v) if v < 10 => Some(v),
        _ => {
            println!("{} must be in range [0,9], got {}", name, &captures[name]);
            None
        }
    };
    let x = component("x")?;
    let y = component("y")?;
    Some(Coordinate::new(x, y))
}

/// Parse a cursor movement word.
fn parse_direction(word: &str) -> Option<Direction> {
    match word {
        "up" | "north" | "u" | "n" | "w" => Some(Direction::Up),
        "down" | "south" | "s" => Some(Direction::Down),
        "left" | "west" | "l" | "a" => Some(Direction::Left),
        "right" | "east" | "r" | "e" | "d" => Some(Direction::Right),
        _ => None,
    }
}

/// Place the human's fleet, one ship at a time from longest to shortest.
fn choose_placements(
    rng: &mut impl Rng,
    game: &mut Match,
    input: &mut InputReader<impl BufRead>,
) -> io::Result<()> {
    enum Command {
        Done,
        Place(Coordinate),
        Preview(Coordinate),
        Rotate,
        Reset,
        Random,
        Help,
    }
    static PLACE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(?:place|put)\s+(?:(?:at|on)\s+)?(?P<arg>.+)$").unwrap());
    static PREVIEW: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(?:preview|show)\s+(?P<arg>.+)$").unwrap());

    println!();
    println!("Place ships. Type help or ? for commands.");
    loop {
        let board = game.player_board_mut().map_err(to_io)?;
        println!();
        match board.ship_length() {
            0 => println!("All ships placed, type done to start the game"),
            len => println!(
                "Next ship: length {}, placed {}",
                len,
                AxisName(board.axis())
            ),
        }
        println!("Your current board setup:");
        show_board(board, true);
        board.clear_styles();
        println!();

        let cmd = input.read_input_lower(">", |input| match input {
            "?" | "help" | "h" => Some(Command::Help),
            "done" | "start" => Some(Command::Done),
            "rotate" | "r" => Some(Command::Rotate),
            "reset" | "clear" => Some(Command::Reset),
            "random" | "rand" | "randomize" => Some(Command::Random),
            other => {
                if let Some(captures) = PLACE.captures(other) {
                    parse_coord(&captures["arg"]).map(Command::Place)
                } else if let Some(captures) = PREVIEW.captures(other) {
                    parse_coord(&captures["arg"]).map(Command::Preview)
                } else {
                    println!("Invalid ship-placement command \"{}\". Use '?' for help", other);
                    None
                }
            }
        })?;

        match cmd {
            Command::Done if board.ship_length() == 0 => break,
            Command::Done => println!("You must place all your ships first!"),
            Command::Place(coord) => {
                board.select(coord);
                if let Err(err) = board.place_ship() {
                    println!("Invalid placement: {}.", err.reason());
                }
            }
            Command::Preview(coord) => {
                let len = board.ship_length();
                if !board.preview_placement(coord, len) {
                    println!("A ship of length {} does not fit there.", len);
                }
            }
            Command::Rotate => board.toggle_axis(),
            Command::Reset => board.reset(),
            Command::Random => {
                if let Err(err) = board.populate_board(rng) {
                    println!("{}", err);
                    board.reset();
                }
            }
            Command::Help => {
                println!(
                    "Available Commands:
    done              if all ships are placed, start the game.
    place <x>,<y>     place the next ship with its first cell at the given coordinate.
    preview <x>,<y>   show where the next ship would go without placing it.
    rotate            switch between horizontal and vertical placement.
    reset             clear all ship placements.
    random            clear the board and place the whole fleet at random.",
                );
            }
        }
    }
    Ok(())
}

/// Alternate turns until somebody wins.
fn play(
    rng: &mut impl Rng,
    game: &mut Match,
    input: &mut InputReader<impl BufRead>,
    delay: Duration,
    save: Option<&str>,
) -> io::Result<()> {
    enum Command {
        Fire(Option<Coordinate>),
        Move(Direction),
        Help,
    }
    static FIRE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(?:fire|shoot|f)(?:\s+(?:at\s+)?(?P<arg>.+))?$").unwrap());

    let mut cursor = Coordinate::new(0, 0);
    println!();
    println!("Battle stations! Type help or ? for commands.");
    while game.winner().is_none() {
        match game.turn() {
            Player::Human => {
                println!();
                show_boards(game, Some(cursor));
                let cmd = input.read_input_lower(">", |input| match input {
                    "?" | "help" | "h" => Some(Command::Help),
                    other => {
                        if let Some(captures) = FIRE.captures(other) {
                            match captures.name("arg") {
                                Some(arg) => parse_coord(arg.as_str()).map(|c| Command::Fire(Some(c))),
                                None => Some(Command::Fire(None)),
                            }
                        } else if let Some(dir) = parse_direction(other) {
                            Some(Command::Move(dir))
                        } else {
                            println!("Invalid command \"{}\". Use '?' for help", other);
                            None
                        }
                    }
                })?;
                match cmd {
                    Command::Fire(target) => {
                        let target = target.unwrap_or(cursor);
                        match game.player_attack(target) {
                            Ok(event) => {
                                cursor = target;
                                report("You", &event);
                            }
                            Err(err) => println!("Cannot fire there: {}", err),
                        }
                    }
                    Command::Move(dir) => cursor = cursor.clamped_offset(dir),
                    Command::Help => {
                        println!(
                            "Available Commands:
    fire <x>,<y>   fire at the given coordinate on the enemy board.
    fire           fire at the cursor, shown as () on the enemy board.
    up/down/left/right (or w/s/a/d) move the cursor."
                        );
                    }
                }
            }
            Player::Computer => {
                thread::sleep(delay);
                let event = game.ai_attack(rng).map_err(to_io)?;
                report("The computer", &event);
            }
        }
        if let Some(path) = save {
            write_save(path, game)?;
        }
    }

    println!();
    show_boards(game, None);
    println!();
    println!("The computer's fleet:");
    show_board(game.computer_board(), true);
    match game.winner() {
        Some(Player::Human) => println!("You win!"),
        Some(Player::Computer) => println!("The computer wins."),
        None => {}
    }
    info!(shots = game.events().len(), "game finished");
    Ok(())
}

/// Print a one-line summary of a resolved shot.
fn report(who: &str, event: &GameEvent) {
    let coord = event.coordinates;
    match event.ship_id {
        Some(ref id) if event.result == ShotResult::ShipSunk => println!(
            "{} fired at {},{}: sunk ship {}!",
            who,
            coord.x,
            coord.y,
            ShipLabel(id)
        ),
        Some(_) => println!("{} fired at {},{}: hit!", who, coord.x, coord.y),
        None => println!("{} fired at {},{}: miss.", who, coord.x, coord.y),
    }
}

fn write_save(path: &str, game: &Match) -> io::Result<()> {
    let out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(out, &SavedMatch::capture(game)).map_err(to_io)?;
    debug!(path, events = game.events().len(), "saved match");
    Ok(())
}

/// Rebuild a saved match and print it.
fn replay(path: &str) -> io::Result<()> {
    let saved: SavedMatch =
        serde_json::from_reader(BufReader::new(File::open(path)?)).map_err(to_io)?;
    let game = Match::restore(
        saved.first,
        &saved.player_placements,
        &saved.computer_placements,
        &saved.events,
    )
    .map_err(to_io)?;
    println!("Replayed {} shots from {}.", saved.events.len(), path);
    show_boards(&game, None);
    println!();
    println!("The computer's fleet:");
    show_board(game.computer_board(), true);
    match game.winner() {
        Some(Player::Human) => println!("You won this match."),
        Some(Player::Computer) => println!("The computer won this match."),
        None => println!("Match in progress, next to shoot: {:?}", game.turn()),
    }
    Ok(())
}

/// Print the human's board followed by their view of the enemy.
fn show_boards(game: &Match, cursor: Option<Coordinate>) {
    println!("Your fleet:");
    show_board(game.player_board(), true);
    println!();
    println!("Enemy waters:");
    show_grid(game.enemy_board().rows().map(|row| {
        row.iter().map(move |cell| BoardCell {
            cell,
            reveal: false,
            cursor: cursor == Some(cell.coord()),
        })
    }));
}

/// Print a board. Ships that have not been hit are only drawn when `reveal` is set.
fn show_board(board: &Gameboard, reveal: bool) {
    show_grid(board.rows().map(|row| {
        row.iter().map(move |cell| BoardCell {
            cell,
            reveal,
            cursor: false,
        })
    }))
}

/// Display helper for a single cell.
struct BoardCell<'a> {
    cell: &'a Cell,
    reveal: bool,
    cursor: bool,
}

impl fmt::Display for BoardCell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let symbol = match (self.cell.style(), self.cell.state()) {
            (CellStyle::Valid, _) => "++",
            (CellStyle::Invalid, _) => "!!",
            (_, CellState::Ship) if self.reveal => "##",
            (_, CellState::Empty) | (_, CellState::Ship) => "~~",
            (_, CellState::ShotMiss) => "x",
            (_, CellState::ShipHit) => "X",
            (_, CellState::ShipSunk) => "XX",
        };
        if self.cursor {
            f.pad(&format!("({})", symbol))
        } else {
            f.pad(symbol)
        }
    }
}

/// Show the board by printing the grid. Takes an iterator over the rows of iterators over
/// the items
fn show_grid(rows: impl Iterator<Item = impl Iterator<Item = impl fmt::Display>>) {
    print!("   ");
    for i in 0..10 {
        print!("{:^4}", i);
    }
    println!();
    for (i, row) in rows.enumerate() {
        print!("{:>2} ", i);
        for cell in row {
            print!("{:^4}", cell);
        }
        println!();
    }
}

/// Display helper that prints a placement axis.
struct AxisName(Axis);

impl fmt::Display for AxisName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(match self.0 {
            Axis::X => "horizontally",
            Axis::Y => "vertically",
        })
    }
}

/// Display helper that shortens a ship id for the terminal.
struct ShipLabel<'a>(&'a ShipId);

impl fmt::Display for ShipLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let id = self.0.as_str();
        f.pad(id.get(..4).unwrap_or(id))
    }
}

/// Helper to read input from the player.
struct InputReader<B> {
    read: B,
    buf: String,
}

impl<B> InputReader<B> {
    fn new(read: B) -> Self {
        Self {
            read,
            buf: String::new(),
        }
    }
}

impl<B: BufRead> InputReader<B> {
    /// Repeatedly tries to read input until the input checker returns `Some`. Converts
    /// to ascii lower before running the checker.
    fn read_input_lower<F, T>(&mut self, prompt: &str, mut checker: F) -> io::Result<T>
    where
        F: FnMut(&str) -> Option<T>,
    {
        loop {
            self.read_line(prompt)?;
            self.buf.make_ascii_lowercase();
            if let Some(val) = checker(self.buf.trim()) {
                return Ok(val);
            }
        }
    }

    /// Print the prompt, clear the buffer and read a line. Exits on end of input.
    fn read_line(&mut self, prompt: &str) -> io::Result<()> {
        print!("{} ", prompt);
        io::stdout().flush()?;
        self.buf.clear();
        if self.read.read_line(&mut self.buf)? == 0 {
            println!();
            std::process::exit(0);
        }
        Ok(())
    }
}
