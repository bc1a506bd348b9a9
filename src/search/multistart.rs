use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::SearchError;
use crate::graph::{AdjacencyGraph, Clique};
use crate::search::best_clique::BestResult;
use crate::search::greedy_clique::{greedy_clique, is_clique};
use crate::search::ordering::{DegreeTable, MAX_NOISE_WIDTH, OrderingStrategy, StrategyKind};


/** parameters of a multi-start run */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// number of greedy trials (the first one always uses the degree order)
    pub nb_trials: usize,
    /// number of worker threads (0: all available cores)
    pub nb_workers: usize,
    /// strategies of trials 1.., assigned round-robin
    pub strategies: Vec<StrategyKind>,
    /// noise amplitude of noisy strategies (None: mean degree / 10)
    pub noise_width: Option<f64>,
    /// neighborhood trials sort by noisy degree (true) or shuffle (false)
    pub neighborhood_noise: bool,
    /// base random seed (None: drawn at each run)
    pub seed: Option<u64>,
    /// time limit in seconds. Checked before starting each trial.
    pub time_limit: Option<f32>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            nb_trials: 10_000,
            nb_workers: 0,
            strategies: vec![StrategyKind::Weighted],
            noise_width: None,
            neighborhood_noise: true,
            seed: None,
            time_limit: None,
        }
    }
}

impl SearchConfig {
    /// rejects configurations that cannot run
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.nb_trials == 0 {
            return Err(SearchError::InvalidConfig("at least one trial is required".to_string()));
        }
        if self.strategies.is_empty() {
            return Err(SearchError::InvalidConfig("no ordering strategy given".to_string()));
        }
        if let Some(w) = self.noise_width {
            if !w.is_finite() || w < 0. || w > MAX_NOISE_WIDTH {
                return Err(SearchError::InvalidConfig(format!("invalid noise width {}", w)));
            }
        }
        if let Some(t) = self.time_limit {
            if Duration::try_from_secs_f32(t).is_err() {
                return Err(SearchError::InvalidConfig(format!("invalid time limit {}", t)));
            }
        }
        Ok(())
    }
}


/// lifecycle of a run. Between two calls, only `Idle` and `Collected` can be observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchPhase {
    /// graph loaded, degrees computed
    Idle,
    /// worker pool being created
    Dispatching,
    /// trials executing
    Running,
    /// all trials finished, the result is available
    Collected,
}


/** outcome of a run */
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    /// best clique found
    pub clique: Clique,
    /// number of trials requested
    pub nb_trials: usize,
    /// number of trials executed
    pub nb_trials_completed: usize,
    /// number of times the best clique was replaced
    pub nb_improvements: usize,
    /// number of worker threads used
    pub nb_workers: usize,
    /// true if the time limit prevented some trials from starting
    pub stopped_early: bool,
    /// wall-clock time of the run (seconds)
    pub time_searched: f32,
}

impl SearchReport {
    /// size of the best clique
    pub fn size(&self) -> usize { self.clique.len() }
}


/** runs many independent greedy constructions in parallel and keeps the largest clique.

Trial 0 always uses the degree order. Trials are claimed from a shared counter by the workers
of a dedicated thread pool; each worker owns a random generator seeded once, reused for all the
trials it executes. Trials only communicate through a [`BestResult`].
*/
#[derive(Debug)]
pub struct MultiStartSearcher {
    /// graph, read-only during runs
    graph: Arc<AdjacencyGraph>,
    /// degrees, computed once
    degrees: DegreeTable,
    /// run parameters
    config: SearchConfig,
    /// resolved strategies for trials 1..
    strategies: Vec<OrderingStrategy>,
    /// resolved noise amplitude
    noise_width: f64,
    /// current phase
    phase: SearchPhase,
}

impl MultiStartSearcher {

    /** creates a searcher (Idle phase). Fails if the configuration is invalid. */
    pub fn new(graph:Arc<AdjacencyGraph>, config:SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let degrees = DegreeTable::new(&graph);
        let noise_width = config.noise_width.unwrap_or_else(|| degrees.default_noise_width());
        let strategies = config.strategies.iter()
            .map(|k| k.resolve(noise_width, config.neighborhood_noise))
            .collect();
        Ok(Self { graph, degrees, config, strategies, noise_width, phase: SearchPhase::Idle })
    }

    /// current phase
    pub fn phase(&self) -> SearchPhase { self.phase }

    /// graph searched
    pub fn graph(&self) -> &AdjacencyGraph { &self.graph }

    /// run parameters
    pub fn config(&self) -> &SearchConfig { &self.config }

    /// noise amplitude used by the noisy strategies
    pub fn noise_width(&self) -> f64 { self.noise_width }

    /// strategy used by a given trial
    pub fn trial_strategy(&self, trial:usize) -> OrderingStrategy {
        if trial == 0 {
            OrderingStrategy::DegreeDescending
        } else {
            self.strategies[(trial-1) % self.strategies.len()]
        }
    }

    /// number of workers of a run, between 1 and the number of trials
    pub fn nb_workers(&self) -> usize {
        let requested = match self.config.nb_workers {
            0 => std::thread::available_parallelism().map(std::num::NonZeroUsize::get).unwrap_or(1),
            w => w,
        };
        requested.clamp(1, self.config.nb_trials)
    }

    /** runs one trial: builds an order, extends it greedily, offers the clique.
    Returns the size of the clique built.
    */
    pub fn run_trial<R:Rng + ?Sized>(&self, trial:usize, rng:&mut R, best:&BestResult<Clique>) -> usize {
        let strategy = self.trial_strategy(trial);
        let order = strategy.generate(&self.graph, &self.degrees, rng);
        let clique = greedy_clique(&self.graph, &order);
        debug_assert!(is_clique(&self.graph, &clique));
        let size = clique.len();
        if best.offer(clique) {
            debug!(trial, size, strategy = %strategy, "new best clique");
        }
        size
    }

    /// runs all trials with a random base seed (or the configured one)
    pub fn run(&mut self) -> Result<SearchReport, SearchError> {
        let base_seed = self.config.seed.unwrap_or_else(rand::random);
        self.run_seeded(base_seed)
    }

    /** runs all trials. Worker i seeds its generator from `base_seed` and i.
    Which worker executes which trial is not deterministic.
    Ends in `Collected`, or back in `Idle` if the worker pool cannot be built.
    */
    pub fn run_seeded(&mut self, base_seed:u64) -> Result<SearchReport, SearchError> {
        let t_start = Instant::now();
        self.phase = SearchPhase::Dispatching;
        let nb_workers = self.nb_workers();
        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(nb_workers)
            .thread_name(|i| format!("clique-worker-{}", i))
            .build() {
            Ok(pool) => pool,
            Err(e) => {
                self.phase = SearchPhase::Idle;
                return Err(e.into());
            }
        };
        // a deadline beyond what Instant can represent means no limit
        let deadline = self.config.time_limit
            .and_then(|t| Duration::try_from_secs_f32(t).ok())
            .and_then(|d| t_start.checked_add(d));
        let best:BestResult<Clique> = BestResult::new();
        let next_trial = AtomicUsize::new(0);
        info!(
            trials = self.config.nb_trials,
            workers = nb_workers,
            noise_width = self.noise_width,
            strategies = ?self.strategies,
            "dispatching multi-start search"
        );
        self.phase = SearchPhase::Running;
        let searcher = &*self;
        let per_worker:Vec<usize> = pool.broadcast(|ctx| {
            searcher.run_worker(ctx.index(), base_seed, deadline, &next_trial, &best)
        });
        let nb_trials_completed = per_worker.iter().sum();
        self.phase = SearchPhase::Collected;
        let nb_improvements = best.nb_improvements();
        let clique = best.into_inner();
        let report = SearchReport {
            clique,
            nb_trials: self.config.nb_trials,
            nb_trials_completed,
            nb_improvements,
            nb_workers,
            stopped_early: nb_trials_completed < self.config.nb_trials,
            time_searched: t_start.elapsed().as_secs_f32(),
        };
        info!(
            size = report.size(),
            completed = report.nb_trials_completed,
            stopped_early = report.stopped_early,
            time = report.time_searched,
            "multi-start search collected"
        );
        Ok(report)
    }

    /// claims and runs trials until none is left or the deadline is reached
    fn run_worker(
        &self,
        worker_id:usize,
        base_seed:u64,
        deadline:Option<Instant>,
        next_trial:&AtomicUsize,
        best:&BestResult<Clique>,
    ) -> usize {
        let mut rng = SmallRng::seed_from_u64(splitmix64(base_seed ^ worker_id as u64));
        let mut nb_done = 0;
        loop {
            let trial = next_trial.fetch_add(1, Ordering::Relaxed);
            if trial >= self.config.nb_trials {
                break;
            }
            // the degree-order trial always runs
            if trial > 0 && deadline.map_or(false, |d| Instant::now() >= d) {
                break;
            }
            self.run_trial(trial, &mut rng, best);
            nb_done += 1;
        }
        nb_done
    }
}

/// seed mixer (SplitMix64 finalizer)
pub(crate) fn splitmix64(mut x:u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
