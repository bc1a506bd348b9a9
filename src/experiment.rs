use serde::Serialize;
use tracing::info;

use crate::error::SearchError;
use crate::graph::Clique;
use crate::search::multistart::{MultiStartSearcher, splitmix64};

/** statistics over repeated independent runs */
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentSummary {
    /// best clique size of each run
    pub sizes: Vec<usize>,
    /// duration of each run (milliseconds)
    pub times_ms: Vec<f64>,
    /// trials executed by each run
    pub trials_completed: Vec<usize>,
    /// largest size over the runs
    pub max_size: usize,
    /// smallest size over the runs
    pub min_size: usize,
    /// average size
    pub avg_size: f64,
    /// average duration (milliseconds)
    pub avg_time_ms: f64,
    /// best clique over all runs
    pub best: Clique,
}

/** repeats `nb_runs` independent runs of the searcher (fresh best clique each time).
With a configured seed, run i uses a seed derived from it and i.
*/
pub fn run_experiments(searcher:&mut MultiStartSearcher, nb_runs:usize) -> Result<ExperimentSummary, SearchError> {
    if nb_runs == 0 {
        return Err(SearchError::InvalidConfig("at least one run is required".to_string()));
    }
    let mut sizes = Vec::with_capacity(nb_runs);
    let mut times_ms = Vec::with_capacity(nb_runs);
    let mut trials_completed = Vec::with_capacity(nb_runs);
    let mut best:Clique = Vec::new();
    let base_seed = searcher.config().seed;
    for run in 0..nb_runs {
        let report = match base_seed {
            Some(seed) => searcher.run_seeded(splitmix64(seed ^ run as u64))?,
            None => searcher.run()?,
        };
        let time_ms = report.time_searched as f64 * 1000.;
        info!(run = run+1, size = report.size(), time_ms, "run finished");
        sizes.push(report.size());
        times_ms.push(time_ms);
        trials_completed.push(report.nb_trials_completed);
        if report.size() > best.len() {
            best = report.clique;
        }
    }
    let max_size = sizes.iter().copied().max().unwrap_or(0);
    let min_size = sizes.iter().copied().min().unwrap_or(0);
    let avg_size = sizes.iter().sum::<usize>() as f64 / nb_runs as f64;
    let avg_time_ms = times_ms.iter().sum::<f64>() / nb_runs as f64;
    Ok(ExperimentSummary { sizes, times_ms, trials_completed, max_size, min_size, avg_size, avg_time_ms, best })
}


#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use crate::generator::gnp;
    use crate::search::greedy_clique::is_clique;
    use crate::search::multistart::SearchConfig;
    use crate::search::ordering::StrategyKind;

    #[test]
    fn test_repeated_runs() {
        let g = Arc::new(gnp(120, 0.5, &mut SmallRng::seed_from_u64(10)).unwrap());
        let config = SearchConfig {
            nb_trials: 200,
            nb_workers: 2,
            strategies: vec![StrategyKind::Weighted, StrategyKind::Neighborhood],
            seed: Some(3),
            ..SearchConfig::default()
        };
        let mut searcher = MultiStartSearcher::new(g.clone(), config).unwrap();
        let summary = run_experiments(&mut searcher, 4).unwrap();
        assert_eq!(summary.sizes.len(), 4);
        assert_eq!(summary.times_ms.len(), 4);
        assert_eq!(summary.trials_completed, vec![200; 4]);
        assert!(summary.min_size <= summary.max_size);
        assert!(summary.avg_size >= summary.min_size as f64 && summary.avg_size <= summary.max_size as f64);
        assert_eq!(summary.best.len(), summary.max_size);
        assert!(is_clique(&g, &summary.best));
    }

    #[test]
    fn test_no_run() {
        let g = Arc::new(gnp(5, 0.5, &mut SmallRng::seed_from_u64(0)).unwrap());
        let mut searcher = MultiStartSearcher::new(g, SearchConfig::default()).unwrap();
        assert!(run_experiments(&mut searcher, 0).is_err());
    }
}
