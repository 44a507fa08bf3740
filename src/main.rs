use std::io::{self, BufRead, Write};

use chess_core::{Board, Color, Position};
use chess_engine::{ChessAi, SearchError};
use log::info;

/// Console driver: the human plays White, the engine answers as Black.
fn main() {
    env_logger::init();

    let mut board = Board::new();
    let ai = ChessAi::default();
    info!("engine ready at depth {}", ai.depth());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("You are white. Enter moves like e2e4; castle by moving the king two files.");
    loop {
        println!("\n{board}\n");
        if board.is_in_check(Color::White) {
            println!("Your king is in check.");
        }
        if !has_legal_move(&mut board, Color::White) {
            if board.is_in_check(Color::White) {
                println!("Checkmate — the engine wins.");
            } else {
                println!("Stalemate.");
            }
            break;
        }

        print!("your move> ");
        if io::stdout().flush().is_err() {
            break;
        }
        let line = match lines.next() {
            Some(Ok(line)) => line,
            _ => break,
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "quit" {
            break;
        }
        let (from, to) = match parse_move(input) {
            Ok(squares) => squares,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        if let Err(err) = board.make_move(from, to, Color::White) {
            println!("{err}");
            continue;
        }

        match ai.select_move(&mut board, Color::Black) {
            Ok((piece, to)) => {
                let from = board.piece(piece).pos;
                board
                    .make_move(from, to, Color::Black)
                    .expect("engine moves are legal");
                println!("engine plays {from}{to}");
                if board.is_in_check(Color::White) {
                    println!("Check.");
                }
            }
            Err(SearchError::NoLegalMoves(_)) => {
                println!("\n{board}\n");
                if board.is_in_check(Color::Black) {
                    println!("Checkmate — you win.");
                } else {
                    println!("Stalemate.");
                }
                break;
            }
        }
    }
}

fn parse_move(input: &str) -> Result<(Position, Position), String> {
    if input.len() != 4 || !input.is_ascii() {
        return Err(format!("could not read \"{input}\": moves look like e2e4"));
    }
    let from = input[..2]
        .parse::<Position>()
        .map_err(|err| err.to_string())?;
    let to = input[2..]
        .parse::<Position>()
        .map_err(|err| err.to_string())?;
    Ok((from, to))
}

fn has_legal_move(board: &mut Board, color: Color) -> bool {
    let pieces: Vec<_> = board
        .piece_moves(color)
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    pieces
        .into_iter()
        .any(|id| !board.legal_destinations(id).is_empty())
}
