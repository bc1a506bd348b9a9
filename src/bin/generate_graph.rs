use anyhow::{Context, Result};
use clap::{App, load_yaml};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use clique_multistart::dimacs::{write_adjacency, write_to_file};
use clique_multistart::generator::gnp;
use clique_multistart::util::{init_logging, parse_arg};


/** generates a G(n,p) random graph and writes it in the DIMACS format. */
pub fn main() -> Result<()> {
    init_logging();
    let yaml = load_yaml!("generate_graph.yml");
    let main_args = App::from_yaml(yaml).get_matches();
    let n:usize = parse_arg(&main_args, "vertices")?.context("missing number of vertices")?;
    let p:f64 = parse_arg(&main_args, "p")?.context("missing edge probability")?;
    let output = main_args.value_of("output").context("missing output file")?;
    let mut rng = match parse_arg::<u64>(&main_args, "seed")? {
        Some(s) => SmallRng::seed_from_u64(s),
        None => SmallRng::from_entropy(),
    };
    let graph = gnp(n, p, &mut rng)?;
    graph.display_statistics();
    write_to_file(&graph, output).with_context(|| format!("couldn't write {}", output))?;
    if let Some(filename) = main_args.value_of("dump") {
        write_adjacency(&graph, filename).with_context(|| format!("couldn't write {}", filename))?;
    }
    Ok(())
}
