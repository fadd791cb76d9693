//! nashkit CLI - train a solver on a bundled game and print the result.
//!
//! Builds the selected game tree, runs the requested number of CFR
//! iterations, then reports expected values and (for modest trees) the
//! average strategy of every information set.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use nashkit_engine::{Solver, Variant};
use nashkit_tree::{kuhn, one_card::OneCardPoker, rps, tictactoe};

/// Only dump per-info-set strategies when the registry stays readable.
const STRATEGY_DUMP_LIMIT: usize = 128;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Game {
    Rps,
    Kuhn,
    OneCard,
    Tictactoe,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    Vanilla,
    Plus,
    Discounted,
}

#[derive(Parser, Debug)]
#[command(name = "nashkit", version, about = "CFR equilibrium solver")]
struct Args {
    /// Game to solve.
    #[arg(long, value_enum, default_value_t = Game::Kuhn)]
    game: Game,

    /// Regret-minimization variant.
    #[arg(long, value_enum, default_value_t = Algorithm::Plus)]
    variant: Algorithm,

    /// Number of CFR iterations.
    #[arg(long, default_value_t = 1000)]
    iterations: u64,

    /// DCFR positive-regret exponent.
    #[arg(long, default_value_t = nashkit_engine::variant::DCFR_ALPHA)]
    alpha: f64,

    /// DCFR non-positive-regret exponent.
    #[arg(long, default_value_t = nashkit_engine::variant::DCFR_BETA)]
    beta: f64,

    /// DCFR averaging exponent.
    #[arg(long, default_value_t = nashkit_engine::variant::DCFR_GAMMA)]
    gamma: f64,

    /// One-card poker ante.
    #[arg(long, default_value_t = 1)]
    ante: u32,

    /// One-card poker blinds (small, big).
    #[arg(long, num_args = 2, default_values_t = [1, 2])]
    blinds: Vec<u32>,

    /// One-card poker starting stack (both players).
    #[arg(long, default_value_t = 5)]
    stack: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let variant = match args.variant {
        Algorithm::Vanilla => Variant::Vanilla,
        Algorithm::Plus => Variant::CfrPlus,
        Algorithm::Discounted => Variant::discounted(args.alpha, args.beta, args.gamma)?,
    };

    let tree = match args.game {
        Game::Rps => rps::build_tree()?,
        Game::Kuhn => kuhn::build_tree()?,
        Game::OneCard => {
            let blinds = [args.blinds[0], args.blinds[1]];
            OneCardPoker::new(args.ante, blinds, [args.stack, args.stack])?.build_tree()?
        }
        Game::Tictactoe => tictactoe::build_tree()?,
    };
    log::info!(
        "built tree: {} nodes, {} info sets, {} players",
        tree.len(),
        tree.info_sets().len(),
        tree.player_count()
    );

    let mut solver = Solver::new(tree, variant)?;
    let report_every = (args.iterations / 10).max(1);
    for i in 1..=args.iterations {
        let values = solver.step();
        if i % report_every == 0 {
            log::info!("iteration {}: root values {:?}", i, values);
        }
    }

    println!(
        "expected value after {} iterations: {:?}",
        solver.iterations(),
        solver.expected_value()
    );

    if solver.tree().info_sets().len() <= STRATEGY_DUMP_LIMIT {
        println!("average strategies:");
        for set in solver.tree().info_sets().to_vec() {
            let strategy = solver.query(&set)?;
            let rendered: Vec<String> = strategy.iter().map(|p| format!("{:.4}", p)).collect();
            println!(
                "  player {} [{}]: {}",
                set.player,
                set.payload_text(),
                rendered.join(" ")
            );
        }
    } else {
        // Large games: show the root decision only.
        let root_strategy = solver.query_node(solver.tree().root())?;
        if !root_strategy.is_empty() {
            println!("root strategy: {:?}", root_strategy);
        }
    }

    Ok(())
}
