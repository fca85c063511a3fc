use clap::Parser;
use minefield::{Action, FloodPolicy, Game, GameConfig, GameError, GameStatus, Position};
use std::io::{self, Write};

/// Play minesweeper in the terminal.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[arg(long, default_value_t = 10)]
    rows: usize,
    #[arg(long, default_value_t = 10)]
    cols: usize,
    #[arg(long, default_value_t = 20)]
    mines: usize,
    /// Fixed seed for a reproducible mine layout
    #[arg(long)]
    seed: Option<u64>,
    /// Only open edge-sharing neighbors during flood fill
    #[arg(long)]
    orthogonal: bool,
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();
    log::debug!("args: {:?}", args);
    match run_game(args) {
        Ok(_) => println!("Thanks for playing!"),
        Err(e) => eprintln!("Game error: {}", e),
    }
}

fn run_game(args: Args) -> Result<(), GameError> {
    let flood = if args.orthogonal {
        FloodPolicy::Orthogonal
    } else {
        FloodPolicy::Moore
    };
    let config = GameConfig::new(args.rows, args.cols, args.mines)?.with_flood(flood);
    let mut game = match args.seed {
        Some(seed) => Game::with_seed(config, seed)?,
        None => Game::new(config)?,
    };

    while !game.is_finished() {
        println!("{}", game.snapshot());

        match get_user_input() {
            Some(Command::Act(pos, action)) => {
                if !game.perform_action(pos, action).has_update() {
                    println!("Nothing happened at {} {}", pos.row, pos.col);
                }
            }
            Some(Command::Restart) => game.restart(),
            Some(Command::Quit) => return Ok(()),
            None => println!("Invalid command. Use 'row col r' to reveal, 'row col f' to flag, 'n' or 'q'"),
        }
    }

    println!("{}", game.snapshot());
    match game.status() {
        GameStatus::Won => println!("Congratulations! You won!"),
        GameStatus::Lost => println!("Game Over!"),
        GameStatus::NotStarted | GameStatus::InProgress => unreachable!(),
    }

    Ok(())
}

enum Command {
    Act(Position, Action),
    Restart,
    Quit,
}

fn get_user_input() -> Option<Command> {
    print!("Enter command (row col [r/f], n for new game, q to quit): ");
    io::stdout().flush().ok()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input).ok()? == 0 {
        return Some(Command::Quit);
    }

    let mut parts = input.split_whitespace();
    let first = parts.next()?;
    match first {
        "n" => return Some(Command::Restart),
        "q" => return Some(Command::Quit),
        _ => {}
    }

    let row = first.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    let action = match parts.next()?.chars().next()? {
        'r' => Action::Reveal,
        'f' => Action::Flag,
        _ => return None,
    };

    Some(Command::Act(Position::new(row, col), action))
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::LevelFilter;

    #[test]
    fn test_verbosity_flags_select_log_level() {
        let level = |args: &[&str]| {
            Args::try_parse_from(args)
                .unwrap()
                .verbose
                .log_level_filter()
        };

        assert_eq!(level(&["minefield"]), LevelFilter::Error);
        assert_eq!(level(&["minefield", "-vv"]), LevelFilter::Info);
        assert_eq!(level(&["minefield", "-vvvv"]), LevelFilter::Trace);
        assert_eq!(level(&["minefield", "-q"]), LevelFilter::Off);
    }

    #[test]
    fn test_board_flags_parse() {
        let args = Args::try_parse_from([
            "minefield",
            "--rows",
            "8",
            "--cols",
            "12",
            "--mines",
            "15",
            "--seed",
            "3",
            "--orthogonal",
        ])
        .unwrap();

        assert_eq!((args.rows, args.cols, args.mines), (8, 12, 15));
        assert_eq!(args.seed, Some(3));
        assert!(args.orthogonal);
    }
}
