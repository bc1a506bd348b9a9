use std::fmt::Display;
use std::fs;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::dimacs;
use crate::generator::gnp;
use crate::graph::{AdjacencyGraph, VertexId};
use crate::search::multistart::SearchConfig;
use crate::search::ordering::StrategyKind;

/// graphs up to this size get a dense adjacency matrix when requested
pub const MAX_DENSE_VERTICES:usize = 20_000;

/** parameters read from the command line */
#[derive(Debug)]
pub struct RunParams {
    /// instance file name (or description of the generated graph)
    pub inst_name: String,
    /// graph to search
    pub graph: Arc<AdjacencyGraph>,
    /// search parameters
    pub config: SearchConfig,
    /// number of repeated runs
    pub nb_runs: usize,
    /// where to write the best clique
    pub sol_file: Option<String>,
    /// where to write the performance statistics
    pub perf_file: Option<String>,
    /// where to write the adjacency dump
    pub dump_file: Option<String>,
    /// check the best clique before exporting it
    pub check: bool,
}

/// installs the log subscriber (RUST_LOG, "info" by default)
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// parses an optional argument
pub fn parse_arg<T>(main_args:&ArgMatches, name:&str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match main_args.value_of(name) {
        None => Ok(None),
        Some(s) => s.parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("unable to parse --{} '{}': {}", name, s, e)),
    }
}

/// parses a comma-separated strategy list
pub fn parse_strategies(s:&str) -> Result<Vec<StrategyKind>> {
    let res = s.split(',')
        .filter(|e| !e.trim().is_empty())
        .map(|e| e.parse::<StrategyKind>())
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(res)
}

/** reads command line input: loads or generates the graph and builds the search configuration.
Loading errors are returned before any search starts.
*/
pub fn read_params(main_args:&ArgMatches) -> Result<RunParams> {
    let mut graph = match (main_args.value_of("instance"), parse_arg::<usize>(main_args, "random")?) {
        (Some(inst_filename), _) => {
            dimacs::read_from_file(inst_filename)
                .with_context(|| format!("unable to load instance {}", inst_filename))?
        }
        (None, Some(n)) => {
            let p = parse_arg::<f64>(main_args, "p")?.unwrap_or(0.5);
            let mut rng = match parse_arg::<u64>(main_args, "graph-seed")? {
                Some(s) => SmallRng::seed_from_u64(s),
                None => SmallRng::from_entropy(),
            };
            gnp(n, p, &mut rng)?
        }
        (None, None) => bail!("either an instance file or --random <n> is required"),
    };
    let inst_name = match main_args.value_of("instance") {
        Some(f) => f.to_string(),
        None => format!("gnp_{}_{}", graph.nb_vertices(), main_args.value_of("p").unwrap_or("0.5")),
    };
    if main_args.is_present("dense") {
        if graph.nb_vertices() <= MAX_DENSE_VERTICES {
            graph.populate_adj_matrix();
        } else {
            info!(vertices = graph.nb_vertices(), "graph too large for a dense matrix, skipping");
        }
    }
    graph.display_statistics();
    let defaults = SearchConfig::default();
    let config = SearchConfig {
        nb_trials: parse_arg(main_args, "trials")?.unwrap_or(defaults.nb_trials),
        nb_workers: parse_arg(main_args, "workers")?.unwrap_or(defaults.nb_workers),
        strategies: match main_args.value_of("strategies") {
            None => defaults.strategies,
            Some(s) => parse_strategies(s)?,
        },
        noise_width: parse_arg(main_args, "width")?,
        neighborhood_noise: !main_args.is_present("shuffle-neighborhood"),
        seed: parse_arg(main_args, "seed")?,
        time_limit: parse_arg(main_args, "time")?,
    };
    config.validate()?;
    let sol_file = main_args.value_of("solution").map(|e| {
        info!("printing solutions in: {}", e);
        e.to_string()
    });
    let perf_file = main_args.value_of("perf").map(|e| {
        info!("printing perfs in: {}", e);
        e.to_string()
    });
    Ok(RunParams {
        inst_name,
        graph: Arc::new(graph),
        config,
        nb_runs: parse_arg(main_args, "runs")?.unwrap_or(1),
        sol_file,
        perf_file,
        dump_file: main_args.value_of("dump").map(str::to_string),
        check: main_args.is_present("check"),
    })
}

/// 1-based vertex list of a clique, separated by spaces
pub fn clique_to_string(clique:&[VertexId]) -> String {
    let mut sorted = clique.to_vec();
    sorted.sort_unstable();
    sorted.iter().map(|v| (v+1).to_string()).collect::<Vec<_>>().join(" ")
}

/// `limit` smallest vertices of a clique (1-based, increasing), "..." if truncated
pub fn clique_preview(clique:&[VertexId], limit:usize) -> String {
    let mut sorted = clique.to_vec();
    sorted.sort_unstable();
    let mut res = sorted.iter().take(limit).map(|v| (v+1).to_string()).collect::<Vec<_>>().join(" ");
    if clique.len() > limit {
        res += " ...";
    }
    res
}

/// exports search results to files
pub fn export_results(
    clique:&[VertexId],
    stats:&Value,
    perf_file:Option<&str>,
    sol_file:Option<&str>,
) -> Result<()> {
    if let Some(filename) = perf_file {
        let content = serde_json::to_string(stats)?;
        fs::write(filename, content).with_context(|| format!("couldn't write {}", filename))?;
    }
    if let Some(filename) = sol_file {
        fs::write(filename, clique_to_string(clique) + "\n")
            .with_context(|| format!("couldn't write {}", filename))?;
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_preview() {
        let clique:Vec<VertexId> = (0..25).collect();
        let preview = clique_preview(&clique, 20);
        assert!(preview.starts_with("1 2 3"));
        assert!(preview.ends_with("20 ..."));
        assert_eq!(clique_preview(&[4,0], 20), "1 5");
        let reversed:Vec<VertexId> = (0..25).rev().collect();
        assert_eq!(clique_preview(&reversed, 20), preview);
        assert_eq!(clique_preview(&[9,2,7], 2), "3 8 ...");
    }

    #[test]
    fn test_parse_strategies() {
        assert_eq!(
            parse_strategies("weighted, neighborhood").unwrap(),
            vec![StrategyKind::Weighted, StrategyKind::Neighborhood]
        );
        assert!(parse_strategies("weighted,greedy").is_err());
    }

    #[test]
    fn test_export() {
        let dir = tempfile::tempdir().unwrap();
        let perf = dir.path().join("perf.json");
        let sol = dir.path().join("sol.txt");
        let stats = json!({"primal_list": [3], "inst_name": "scenario_a"});
        export_results(&[2,0,1], &stats, perf.to_str(), sol.to_str()).unwrap();
        assert_eq!(fs::read_to_string(&sol).unwrap(), "1 2 3\n");
        let read:Value = serde_json::from_str(&fs::read_to_string(&perf).unwrap()).unwrap();
        assert_eq!(read, stats);
    }
}
