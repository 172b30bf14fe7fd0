//! modus - symbolic logical-inference engine
//!
//! Command-line interface over the library surface: entailment queries,
//! satisfiability checks, CNF printing, first-order backward chaining,
//! and boot-order scheduling.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use indexmap::IndexMap;
use tracing_subscriber::EnvFilter;

use modus::{
    assoc, boot_order, conjuncts, dpll_satisfiable_with, parse_expr, pl_resolution_with, to_cnf,
    tt_entails, walk_sat_seeded, Expr, FolKb, LogLevel, ModusConfig,
};

#[derive(Parser)]
#[command(name = "modus")]
#[command(version)]
#[command(about = "Symbolic logical-inference engine", long_about = None)]
struct Cli {
    /// Input files with one sentence per line ('#' starts a comment)
    #[arg(value_name = "FILE")]
    inputs: Vec<PathBuf>,

    /// Read sentences from stdin
    #[arg(long)]
    stdin: bool,

    /// Decide whether the loaded sentences entail this query
    #[arg(long, value_name = "EXPR")]
    ask: Option<String>,

    /// Entailment method used by --ask
    #[arg(long, value_enum, default_value = "tt")]
    method: Method,

    /// Check satisfiability of this sentence (DPLL)
    #[arg(long, value_name = "EXPR")]
    satisfiable: Option<String>,

    /// Print the conjunctive normal form of this sentence
    #[arg(long, value_name = "EXPR")]
    cnf: Option<String>,

    /// Backward-chain this first-order query over the loaded clauses
    #[arg(long, value_name = "EXPR")]
    query: Option<String>,

    /// Maximum answers printed for --query (its search can be unbounded)
    #[arg(long, value_name = "N", default_value = "10")]
    max_answers: usize,

    /// Treat input lines as 'service: dep dep ...' and print a boot order
    #[arg(long)]
    boot_order: bool,

    /// Seed for WalkSAT (overrides the configured seed)
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Configuration file (defaults to the standard search path)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (suppress info messages)
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Method {
    /// Truth-table enumeration (exact)
    Tt,
    /// Resolution refutation (exact)
    Resolution,
    /// DPLL on premises & ~query (exact)
    Dpll,
    /// WalkSAT on premises & ~query (incomplete, refutes only)
    Walksat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ModusConfig::load_from(path)?,
        None => ModusConfig::load()?,
    };
    if cli.verbose {
        config.general.log_level = LogLevel::Verbose;
    }
    if cli.quiet {
        config.general.log_level = LogLevel::Quiet;
    }
    if let Some(seed) = cli.seed {
        config.walksat.seed = Some(seed);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.general.log_level.as_filter())),
        )
        .with_writer(io::stderr)
        .init();

    let lines = read_input_lines(&cli)?;

    if cli.boot_order {
        return run_boot_order(&lines);
    }

    if let Some(expr) = &cli.cnf {
        let parsed = parse_expr(expr)?;
        println!("{}", to_cnf(&parsed));
        return Ok(());
    }

    if let Some(expr) = &cli.satisfiable {
        let parsed = parse_expr(expr)?;
        match dpll_satisfiable_with(&parsed, config.dpll.max_decisions)? {
            Some(model) => {
                let mut entries: Vec<String> = model
                    .iter()
                    .map(|(symbol, value)| format!("{}: {}", symbol, value))
                    .collect();
                entries.sort();
                println!("satisfiable: {{{}}}", entries.join(", "));
            }
            None => println!("unsatisfiable"),
        }
        return Ok(());
    }

    let sentences = parse_sentences(&lines)?;

    if let Some(query) = &cli.query {
        return run_fol_query(&sentences, query, cli.max_answers);
    }

    if let Some(query) = &cli.ask {
        return run_ask(&sentences, query, cli.method, &config);
    }

    bail!("nothing to do; pass --ask, --satisfiable, --cnf, --query, or --boot-order");
}

/// Gather input lines from files and/or stdin, dropping blanks and
/// '#' comments.
fn read_input_lines(cli: &Cli) -> Result<Vec<String>> {
    let mut content = String::new();

    if cli.stdin {
        io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read from stdin")?;
    }
    for path in &cli.inputs {
        let file_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        content.push_str(&file_content);
        content.push('\n');
    }

    Ok(content
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect())
}

fn parse_sentences(lines: &[String]) -> Result<Vec<Expr>> {
    lines
        .iter()
        .map(|line| {
            parse_expr(line)
                .map_err(|e| anyhow::anyhow!("parse error in sentence {:?}: {}", line, e))
        })
        .collect()
}

fn run_ask(sentences: &[Expr], query: &str, method: Method, config: &ModusConfig) -> Result<()> {
    let query = parse_expr(query)?;
    let premises = assoc("&", sentences.to_vec());

    match method {
        Method::Tt => {
            let entailed = tt_entails(&premises, &query)?;
            println!("{}", if entailed { "entailed" } else { "not entailed" });
        }
        Method::Resolution => {
            let clauses: Vec<Expr> = sentences
                .iter()
                .flat_map(|s| conjuncts(&to_cnf(s)))
                .collect();
            let entailed = pl_resolution_with(&clauses, &query, config.resolution.max_rounds)?;
            println!("{}", if entailed { "entailed" } else { "not entailed" });
        }
        Method::Dpll => {
            // premises |= query iff premises & ~query is unsatisfiable
            let refutation = premises & !query;
            let entailed =
                dpll_satisfiable_with(&refutation, config.dpll.max_decisions)?.is_none();
            println!("{}", if entailed { "entailed" } else { "not entailed" });
        }
        Method::Walksat => {
            let refutation = premises & !query;
            let clauses = conjuncts(&to_cnf(&refutation));
            let seed = config.walksat.seed.unwrap_or(0);
            match walk_sat_seeded(&clauses, config.walksat.p, config.walksat.max_flips, seed)? {
                Some(_) => println!("not entailed (counterexample found)"),
                None => println!("unknown (WalkSAT is incomplete; no counterexample found)"),
            }
        }
    }
    Ok(())
}

fn run_fol_query(sentences: &[Expr], query: &str, max_answers: usize) -> Result<()> {
    let query = parse_expr(query)?;
    let kb = FolKb::with_clauses(sentences.iter().cloned())?;

    let vars = query.variables();
    let mut found = 0usize;
    for theta in kb.ask_iter(&query).take(max_answers) {
        found += 1;
        if vars.is_empty() {
            println!("proved");
        } else {
            println!("{}", theta.restrict(vars.iter()));
        }
    }
    if found == 0 {
        println!("no answers");
    }
    Ok(())
}

fn run_boot_order(lines: &[String]) -> Result<()> {
    let mut table: IndexMap<String, Vec<String>> = IndexMap::new();
    for line in lines {
        let (service, deps) = line
            .split_once(':')
            .with_context(|| format!("expected 'service: dep dep ...', got {:?}", line))?;
        table.insert(
            service.trim().to_string(),
            deps.split_whitespace().map(str::to_string).collect(),
        );
    }

    match boot_order(table) {
        Ok(order) => {
            for service in order {
                println!("{}", service);
            }
            Ok(())
        }
        Err(e) => bail!("{}", e),
    }
}
