use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{App, load_yaml};
use serde_json::json;

use clique_multistart::dimacs::write_adjacency;
use clique_multistart::experiment::run_experiments;
use clique_multistart::search::greedy_clique::is_clique;
use clique_multistart::search::multistart::MultiStartSearcher;
use clique_multistart::util::{clique_preview, export_results, init_logging, read_params};


/** approximates the maximum clique by running many greedy constructions in parallel. */
pub fn main() -> Result<()> {
    init_logging();
    // parse arguments
    let yaml = load_yaml!("multistart_clique.yml");
    let main_args = App::from_yaml(yaml).get_matches();
    let params = read_params(&main_args)?;
    if let Some(filename) = &params.dump_file {
        write_adjacency(&params.graph, filename)
            .with_context(|| format!("couldn't write {}", filename))?;
    }

    // solve it
    let t_start = Instant::now();
    let mut searcher = MultiStartSearcher::new(params.graph.clone(), params.config.clone())?;
    let summary = run_experiments(&mut searcher, params.nb_runs)?;
    let duration = t_start.elapsed().as_secs_f32();
    println!("----------------------------------------------------");
    println!("Summary ({} runs of {} trials):", params.nb_runs, params.config.nb_trials);
    println!("  Max Size : {}", summary.max_size);
    println!("  Min Size : {}", summary.min_size);
    println!("  Avg Size : {:.2}", summary.avg_size);
    println!("  Avg Time : {:.1} ms", summary.avg_time_ms);
    println!("  Clique   : {}", clique_preview(&summary.best, 20));
    println!("----------------------------------------------------");

    if params.check && !is_clique(&params.graph, &summary.best) {
        bail!("invalid solution: {:?} is not a clique", summary.best);
    }
    let stats = json!({
        "primal_list": &summary.sizes,
        "time_searched": duration,
        "inst_name": &params.inst_name,
        "summary": &summary,
        "config": &params.config,
    });

    // export results
    export_results(&summary.best, &stats, params.perf_file.as_deref(), params.sol_file.as_deref())
}
