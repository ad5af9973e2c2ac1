use chess_referee::{Engine, EngineConfig};
use rand::seq::SliceRandom;
use tracing_subscriber::EnvFilter;

const MAX_PLIES: usize = 60;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let engine = Engine::new(EngineConfig::from_env());
    let mut game = engine.new_game();
    let mut rng = rand::thread_rng();

    for ply in 0..MAX_PLIES {
        let turn = game.current_turn;
        let origins: Vec<(usize, usize)> = game
            .board
            .pieces()
            .filter(|&(_, _, p)| p.color == turn)
            .map(|(r, c, _)| (r, c))
            .collect();

        let mut candidates = Vec::new();
        for (r, c) in origins {
            for d in engine.valid_moves(&mut game, r, c) {
                candidates.push(((r, c), (d.row, d.col)));
            }
        }

        let Some(&(from, to)) = candidates.choose(&mut rng) else {
            eprintln!("{turn} has no moves after {ply} plies");
            break;
        };

        let reply = engine.make_move(&mut game, from.0, from.1, to.0, to.1);
        if ply % 2 == 0 {
            print!("{}. {} ", ply / 2 + 1, reply.outcome.message);
        } else {
            println!("{}", reply.outcome.message);
        }
        if !reply.outcome.success {
            println!();
            break;
        }
    }

    let captured = &game.captured;
    eprintln!(
        "\nwhite took {}, black took {}",
        captured.white.len(),
        captured.black.len()
    );
}
