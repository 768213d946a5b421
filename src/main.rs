use clap::{ArgEnum, Parser};
use rand::SeedableRng;
use std::error::Error;
use turbulent_bandits::logging::{DisplayLogger, StatsLogger};
use turbulent_bandits::{
    Bandit, BanditConfig, BetaPayoffs, EpsilonGreedy, LaplaceBelief, Prng, RandomShock,
    RunSummary, Softmax, Strategy,
};

#[derive(Parser, Debug, Clone, PartialEq)]
#[clap(
    name = "turbulent-bandits",
    author,
    about = "Simulate a gambler playing a multi-armed bandit with turbulent payoffs"
)]
pub struct Args {
    /// Number of bandit arms
    #[clap(short = 'n', long, default_value_t = 10)]
    pub arms: usize,

    /// Number of turns to simulate
    #[clap(short = 't', long, default_value_t = 500)]
    pub turns: usize,

    /// Probability of a payoff shock on each turn
    #[clap(long, default_value_t = 0.0)]
    pub turbulence: f64,

    /// Arm selection strategy
    #[clap(short, long, arg_enum, default_value_t = StrategyType::Softmax)]
    pub strategy: StrategyType,

    /// Strategy parameter: the softmax temperature or the exploration rate
    #[clap(long, default_value_t = 0.5)]
    pub tau: f64,

    /// Redraw each arm with this fixed probability during a shock
    /// instead of with the turbulence probability
    #[clap(long)]
    pub shock_arm_probability: Option<f64>,

    /// Random seed
    #[clap(long)]
    pub seed: Option<u64>,

    /// Display running summaries every this many turns
    #[clap(long)]
    pub log_interval: Option<u64>,

    /// Enable verbose output
    #[clap(short, long)]
    pub verbose: bool,
}

/// Strategy type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ArgEnum)]
pub enum StrategyType {
    /// Softmax with temperature `tau`
    Softmax,
    /// Epsilon-greedy with exploration rate `tau`
    EpsilonGreedy,
}

impl StrategyType {
    fn run(
        self,
        args: &Args,
        logger: &mut dyn StatsLogger,
    ) -> Result<Option<RunSummary>, Box<dyn Error>> {
        match self {
            Self::Softmax => run_bandit(args, Softmax, logger),
            Self::EpsilonGreedy => run_bandit(args, EpsilonGreedy, logger),
        }
    }
}

fn run_bandit<S: Strategy>(
    args: &Args,
    strategy: S,
    logger: &mut dyn StatsLogger,
) -> Result<Option<RunSummary>, Box<dyn Error>> {
    let config = BanditConfig::new(args.arms, args.turns)
        .with_turbulence(args.turbulence)
        .with_strategy_parameter(args.tau);
    if args.verbose {
        println!("{config:#?}");
    }
    let turbulence = RandomShock {
        arm_probability: args.shock_arm_probability,
    };

    let mut bandit = Bandit::new(
        config,
        BetaPayoffs::default(),
        turbulence,
        strategy,
        LaplaceBelief,
        new_prng(args.seed),
    )?;
    bandit.simulate(logger)?;
    if args.verbose {
        println!("final payoffs {:?}", bandit.payoffs());
        println!("final beliefs {:?}", bandit.beliefs());
    }
    Ok(bandit.summary())
}

fn run_logged(args: &Args, turn_interval: u64) -> Result<Option<RunSummary>, Box<dyn Error>> {
    // The logger is dropped before the summary is printed so that the flushed outputs appear
    // in order.
    let mut logger = DisplayLogger::new(turn_interval);
    args.strategy.run(args, &mut logger)
}

fn new_prng(seed: Option<u64>) -> Prng {
    match seed {
        None => Prng::from_entropy(),
        Some(s) => Prng::seed_from_u64(s),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    if args.verbose {
        println!("{args:#?}");
    }

    let summary = match args.log_interval {
        Some(interval) => run_logged(&args, interval)?,
        None => args.strategy.run(&args, &mut ())?,
    };

    match summary {
        Some(summary) if args.verbose => println!("\n{summary:.4}"),
        Some(summary) => {
            println!("final asset stock: {}", summary.metrics.score);
            println!("simulation time: {:?}", summary.elapsed);
        }
        None => println!("final asset stock: unavailable (no turns simulated)"),
    }
    Ok(())
}
