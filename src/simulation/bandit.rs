use super::{BanditConfig, History, RunSummary, TurnMetrics};
use crate::error::{PolicyError, SimulationError};
use crate::logging::{LogError, Loggable, StatsLogger, TURN_COUNTER};
use crate::payoffs::{BetaPayoffs, PayoffGenerator};
use crate::policies::{
    sample_index, BeliefUpdate, LaplaceBelief, RandomShock, Softmax, Strategy, Turbulence,
};
use crate::Prng;
use rand::Rng;
use std::time::{Duration, Instant};

/// Tolerance on the total of the choice probabilities.
const NORMALIZATION_TOLERANCE: f64 = 1e-9;

/// Maximum number of turns of history reserved up front.
const MAX_RESERVED_TURNS: usize = 4096;

/// Description of a single simulated turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    /// Turn number, starting from 0.
    pub index: usize,
    /// Arm selection probabilities used for the turn.
    pub choice_probabilities: Vec<f64>,
    /// The chosen arm.
    pub choice: usize,
    /// Whether the chosen arm paid off.
    pub win: bool,
    /// Metrics recorded at the end of the turn.
    pub metrics: TurnMetrics,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
enum RunState {
    Running,
    Complete,
    Aborted,
}

/// A single run of a multi-armed bandit simulation.
///
/// Each turn:
/// 1. the turbulence policy may redraw some true arm payoffs,
/// 2. the strategy maps the current beliefs to arm selection probabilities,
/// 3. an arm is sampled from those probabilities,
/// 4. the arm pays off (+1 asset stock) with probability equal to its payoff, otherwise the
///     asset stock decreases by 1,
/// 5. the beliefs are updated from the cumulative tries and wins of each arm,
/// 6. the turn metrics are appended to the history.
///
/// A simulation is single-use. Once all turns have run it is complete and any further attempt
/// to run it fails with [`SimulationError::AlreadyComplete`]. Any error raised while running a
/// turn aborts the run for good.
#[derive(Debug, Clone)]
pub struct Bandit<
    G = BetaPayoffs,
    T = RandomShock,
    S = Softmax,
    B = LaplaceBelief,
    R = Prng,
> {
    config: BanditConfig,
    generator: G,
    turbulence: T,
    strategy: S,
    belief: B,
    rng: R,

    payoffs: Vec<f64>,
    beliefs: Vec<f64>,
    tries: Vec<u64>,
    wins: Vec<u64>,
    asset_stock: i64,
    history: History,

    state: RunState,
    elapsed: Duration,
}

impl<G, T, S, B, R> Bandit<G, T, S, B, R>
where
    G: PayoffGenerator,
    T: Turbulence,
    S: Strategy,
    B: BeliefUpdate,
    R: Rng,
{
    /// Initialize a new simulation.
    ///
    /// Draws one initial payoff per arm from `generator`. All beliefs start at 0.5.
    ///
    /// # Errors
    /// * [`SimulationError::InvalidConfig`] if `config` is invalid.
    /// * [`SimulationError::InvalidPolicy`] if the generator produces a payoff outside `[0, 1]`
    ///     or the strategy rejects the initial beliefs and strategy parameter.
    pub fn new(
        config: BanditConfig,
        mut generator: G,
        turbulence: T,
        strategy: S,
        belief: B,
        mut rng: R,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        let arm_count = config.arm_count;

        let payoffs: Vec<f64> = (0..arm_count)
            .map(|_| generator.draw_payoff(&mut rng))
            .collect();
        check_payoffs(&payoffs).map_err(SimulationError::InvalidPolicy)?;

        let beliefs = vec![0.5; arm_count];
        strategy
            .choice_probabilities(&beliefs, config.strategy_parameter)
            .and_then(|p| check_probabilities(&p, arm_count))
            .map_err(SimulationError::InvalidPolicy)?;

        Ok(Self {
            config,
            generator,
            turbulence,
            strategy,
            belief,
            rng,
            payoffs,
            beliefs,
            tries: vec![0; arm_count],
            wins: vec![0; arm_count],
            asset_stock: 0,
            history: History::with_capacity(config.turn_count.min(MAX_RESERVED_TURNS)),
            state: RunState::Running,
            elapsed: Duration::ZERO,
        })
    }

    /// Run all remaining turns.
    ///
    /// # Returns
    /// The total wall time of the simulation, including any turns previously run with
    /// [`Bandit::step`].
    ///
    /// # Errors
    /// * [`SimulationError::AlreadyComplete`] if the simulation has already completed.
    /// * [`SimulationError::Aborted`] if an earlier turn failed.
    /// * [`SimulationError::Policy`] if a policy fails or returns a malformed result.
    ///     The run is aborted.
    /// * [`SimulationError::Log`] with the first logging error. All turns still run and the
    ///     simulation completes.
    pub fn simulate(&mut self, logger: &mut dyn StatsLogger) -> Result<Duration, SimulationError> {
        self.check_running()?;
        let start = Instant::now();
        let previous = self.elapsed;
        let mut log_error = None;
        while self.turns_executed() < self.config.turn_count {
            match self.step(logger) {
                Ok(_) => {}
                Err(SimulationError::Log(err)) => {
                    log_error.get_or_insert(err);
                }
                Err(err) => return Err(err),
            }
        }
        self.elapsed = previous + start.elapsed();
        self.state = RunState::Complete;

        let logged = logger.log_duration("run_time", self.elapsed);
        match log_error.or_else(|| logged.err()) {
            Some(err) => Err(err.into()),
            None => Ok(self.elapsed),
        }
    }

    /// Run a single turn.
    ///
    /// The simulation completes when its final turn has run.
    ///
    /// # Errors
    /// * [`SimulationError::AlreadyComplete`] if no turns remain. The simulation is marked
    ///     complete if it was not already.
    /// * [`SimulationError::Aborted`] if an earlier turn failed.
    /// * [`SimulationError::Policy`] if a policy fails or returns a malformed result.
    ///     The run is aborted.
    /// * [`SimulationError::Log`] if logging fails. The turn is still recorded.
    ///
    /// A failed turn leaves the simulation state as it was before the turn.
    pub fn step(&mut self, logger: &mut dyn StatsLogger) -> Result<Turn, SimulationError> {
        self.check_running()?;
        if self.turns_executed() >= self.config.turn_count {
            self.state = RunState::Complete;
            return Err(SimulationError::AlreadyComplete(self.config.turn_count));
        }

        let start = Instant::now();
        let turn = match self.run_turn() {
            Ok(turn) => turn,
            Err(source) => {
                self.state = RunState::Aborted;
                return Err(SimulationError::Policy {
                    turn: self.turns_executed(),
                    source,
                });
            }
        };
        if self.turns_executed() == self.config.turn_count {
            self.state = RunState::Complete;
        }

        logger.group_start();
        let logged = log_turn(logger, &turn);
        logger.group_end();
        self.elapsed += start.elapsed();
        logged?;

        Ok(turn)
    }

    /// Run one turn, committing its effects only if every policy output is valid.
    fn run_turn(&mut self) -> Result<Turn, PolicyError> {
        let arm_count = self.config.arm_count;

        let mut payoffs = self.payoffs.clone();
        self.turbulence.perturb(
            &mut payoffs,
            &mut self.generator,
            self.config.turbulence_intensity,
            &mut self.rng,
        )?;
        check_payoffs(&payoffs)?;

        let choice_probabilities = self
            .strategy
            .choice_probabilities(&self.beliefs, self.config.strategy_parameter)?;
        check_probabilities(&choice_probabilities, arm_count)?;
        let choice = sample_index(&choice_probabilities, self.rng.gen())
            .ok_or_else(|| PolicyError::NotNormalized(choice_probabilities.iter().sum()))?;
        let win = self.rng.gen::<f64>() < payoffs[choice];

        // Belief updates see the counts including this turn
        self.tries[choice] += 1;
        if win {
            self.wins[choice] += 1;
        }
        let mut beliefs = self.beliefs.clone();
        self.belief.update(&mut beliefs, &self.tries, &self.wins);
        if let Err(err) = check_beliefs(&beliefs, arm_count) {
            self.tries[choice] -= 1;
            if win {
                self.wins[choice] -= 1;
            }
            return Err(err);
        }

        self.payoffs = payoffs;
        self.beliefs = beliefs;
        self.asset_stock += if win { 1 } else { -1 };

        let metrics = TurnMetrics::measure(
            self.asset_stock,
            &self.beliefs,
            &self.payoffs,
            &choice_probabilities,
        );
        let index = self.history.len();
        self.history.push(metrics);
        Ok(Turn {
            index,
            choice_probabilities,
            choice,
            win,
            metrics,
        })
    }
}

impl<G, T, S, B, R> Bandit<G, T, S, B, R> {
    fn check_running(&self) -> Result<(), SimulationError> {
        match self.state {
            RunState::Running => Ok(()),
            RunState::Complete => Err(SimulationError::AlreadyComplete(self.config.turn_count)),
            RunState::Aborted => Err(SimulationError::Aborted),
        }
    }

    pub const fn config(&self) -> &BanditConfig {
        &self.config
    }

    /// Whether all turns have run.
    pub fn is_complete(&self) -> bool {
        self.state == RunState::Complete
    }

    /// Whether the run was aborted by an error.
    pub fn is_aborted(&self) -> bool {
        self.state == RunState::Aborted
    }

    /// Number of turns executed so far.
    pub fn turns_executed(&self) -> usize {
        self.history.len()
    }

    /// True arm payoffs, as of the most recent turn.
    pub fn payoffs(&self) -> &[f64] {
        &self.payoffs
    }

    /// Current gambler beliefs about the arm payoffs.
    pub fn beliefs(&self) -> &[f64] {
        &self.beliefs
    }

    /// Number of times each arm has been chosen.
    pub fn tries(&self) -> &[u64] {
        &self.tries
    }

    /// Number of times each arm has paid off.
    pub fn wins(&self) -> &[u64] {
        &self.wins
    }

    pub const fn asset_stock(&self) -> i64 {
        self.asset_stock
    }

    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Metrics of the final turn. `None` until the run completes or if it had no turns.
    fn final_metrics(&self) -> Option<TurnMetrics> {
        if self.is_complete() {
            self.history.last()
        } else {
            None
        }
    }

    /// Final asset stock, once complete.
    pub fn score(&self) -> Option<i64> {
        self.final_metrics().map(|m| m.score)
    }

    /// Final knowledge, once complete.
    pub fn knowledge(&self) -> Option<f64> {
        self.final_metrics().map(|m| m.knowledge)
    }

    /// Final opinion, once complete.
    pub fn opinion(&self) -> Option<f64> {
        self.final_metrics().map(|m| m.opinion)
    }

    /// Final explore probability, once complete.
    pub fn explore_probability(&self) -> Option<f64> {
        self.final_metrics().map(|m| m.explore_probability)
    }

    /// Wall time spent running turns, once complete.
    pub fn elapsed(&self) -> Option<Duration> {
        if self.is_complete() {
            Some(self.elapsed)
        } else {
            None
        }
    }

    /// Summary of the final metrics, once complete.
    pub fn summary(&self) -> Option<RunSummary> {
        Some(RunSummary {
            turns: self.turns_executed(),
            metrics: self.final_metrics()?,
            elapsed: self.elapsed()?,
        })
    }
}

fn check_payoffs(payoffs: &[f64]) -> Result<(), PolicyError> {
    match payoffs
        .iter()
        .position(|p| !(0.0..=1.0).contains(p))
    {
        Some(arm) => Err(PolicyError::PayoffOutOfRange {
            arm,
            value: payoffs[arm],
        }),
        None => Ok(()),
    }
}

fn check_beliefs(beliefs: &[f64], arm_count: usize) -> Result<(), PolicyError> {
    if beliefs.len() != arm_count {
        return Err(PolicyError::WrongLength {
            expected: arm_count,
            actual: beliefs.len(),
        });
    }
    match beliefs.iter().position(|b| !(0.0..=1.0).contains(b)) {
        Some(arm) => Err(PolicyError::BeliefOutOfRange {
            arm,
            value: beliefs[arm],
        }),
        None => Ok(()),
    }
}

fn check_probabilities(probabilities: &[f64], arm_count: usize) -> Result<(), PolicyError> {
    if probabilities.len() != arm_count {
        return Err(PolicyError::WrongLength {
            expected: arm_count,
            actual: probabilities.len(),
        });
    }
    if let Some(arm) = probabilities
        .iter()
        .position(|p| !(p.is_finite() && *p >= 0.0))
    {
        return Err(PolicyError::InvalidProbability {
            arm,
            value: probabilities[arm],
        });
    }
    let total: f64 = probabilities.iter().sum();
    if (total - 1.0).abs() > NORMALIZATION_TOLERANCE {
        return Err(PolicyError::NotNormalized(total));
    }
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn log_turn(logger: &mut dyn StatsLogger, turn: &Turn) -> Result<(), LogError> {
    logger.group_log(
        "choice",
        Loggable::Index {
            value: turn.choice,
            size: turn.choice_probabilities.len(),
        },
    )?;
    logger.group_log("score", Loggable::Scalar(turn.metrics.score as f64))?;
    logger.group_log("knowledge", Loggable::Scalar(turn.metrics.knowledge))?;
    logger.group_log("opinion", Loggable::Scalar(turn.metrics.opinion))?;
    logger.group_log(
        "explore_probability",
        Loggable::Scalar(turn.metrics.explore_probability),
    )?;
    // Counter last so that chunking by turn includes this turn's values
    logger.group_log(TURN_COUNTER, Loggable::CounterIncrement(1))
}
