use annotrace::assembly::build_groups;
use annotrace::model::StepCollectionReport;
use annotrace::prelude::*;
use annotrace::stats::compute_stats;
use clap::{Parser, ValueEnum};
use std::fs;
use std::io::{self, Write};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// What to print for the loaded step collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ViewCli {
    Report,
    Tree,
    Graph,
    Dot,
    All,
}

/// Reconstructs and inspects agent traces from a step collection
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a step collection (JSON array or JSONL). Uses a built-in sample if omitted.
    steps_path: Option<String>,

    /// What to print
    #[arg(short, long, value_enum, default_value_t = ViewCli::All)]
    view: ViewCli,

    /// Horizontal distance between graph columns
    #[arg(long, default_value_t = 300.0)]
    column_spacing: f64,

    /// Vertical distance between graph rows
    #[arg(long, default_value_t = 120.0)]
    row_spacing: f64,

    /// Optional path to a JSON array of test cases to summarize agreement statistics for
    #[arg(long)]
    test_cases: Option<String>,

    /// Run in interactive mode to be prompted for inputs
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.human {
        run_interactive(cli);
    } else {
        run(cli);
    }
}

fn run(cli: Cli) {
    let total_start = Instant::now();

    // --- 1. Loading ---
    let load_start = Instant::now();
    let collection = match &cli.steps_path {
        Some(path) => StepCollection::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load steps: {}", e))),
        None => {
            println!("No step collection provided. Using the built-in sample trace.");
            StepCollection::sample()
        }
    };
    let report = collection
        .validate()
        .unwrap_or_else(|e| exit_with_error(&format!("Step collection rejected: {}", e)));
    let load_duration = load_start.elapsed();

    // --- 2. Tree ---
    let tree_start = Instant::now();
    let tree = build_tree(collection.steps());
    let tree_duration = tree_start.elapsed();

    // --- 3. Graph ---
    let graph_start = Instant::now();
    let graph = GraphBuilder::new()
        .with_layout(LayoutConfig::new(cli.column_spacing, cli.row_spacing))
        .build(collection.steps());
    let graph_duration = graph_start.elapsed();

    let show = |v: ViewCli| cli.view == v || cli.view == ViewCli::All;

    if show(ViewCli::Report) {
        print_report(&report, &collection);
        let detached = tree.detached_ids();
        if !detached.is_empty() {
            println!("Detached (cyclic) steps: {}", detached.join(", "));
        }
    }
    if show(ViewCli::Tree) {
        println!("\n--- Execution Tree ---");
        print!("{}", TreeFormatter::format(&tree));
    }
    if show(ViewCli::Graph) {
        print_graph(&graph);
    }
    if show(ViewCli::Dot) {
        println!("\n--- DOT ---");
        println!("{}", graph.to_dot());
    }

    if let Some(path) = &cli.test_cases {
        print_test_case_stats(path);
    }

    let total_duration = total_start.elapsed();
    println!("\n--- Performance Summary ---");
    println!("Loading + Validation: {:?}", load_duration);
    println!("Tree Build:           {:?}", tree_duration);
    println!("Graph Build:          {:?}", graph_duration);
    println!("-----------------------------");
    println!("Total Execution:      {:?}", total_duration);
    println!();
}

fn print_report(report: &StepCollectionReport, collection: &StepCollection) {
    println!("\n--- Step Collection Summary ---");
    println!("Steps:            {}", report.total_steps);
    println!("Root Steps:       {}", report.root_steps);
    println!("LLM Calls:        {}", report.llm_calls);
    for (model, calls) in &report.models_used {
        println!("  -> {}: {}", model, calls);
    }
    println!("Interactions:     {}", report.interactions);
    println!("Groups:           {}", report.groups);
    if !report.dangling_parents.is_empty() {
        println!("Dangling Parents: {}", report.dangling_parents.join(", "));
    }

    for group in build_groups(collection.steps()) {
        println!("Group '{}':", group.id);
        for interaction in &group.interactions {
            let duration = interaction
                .duration_ns
                .map_or_else(|| "-".to_string(), TreeFormatter::format_duration);
            println!(
                "  -> Interaction '{}': {} step(s), {}",
                interaction.id,
                interaction.steps.len(),
                duration
            );
        }
    }
}

fn print_graph(graph: &TraceGraph<'_>) {
    println!("\n--- Call Graph ---");
    for node in &graph.nodes {
        println!(
            "[{}] {} x{} at ({:.0}, {:.0})",
            node.kind,
            node.name,
            node.invocations(),
            node.position.0,
            node.position.1
        );
    }
    for edge in &graph.edges {
        match &edge.label {
            Some(label) => println!("  {} -> {} ({})", edge.source, edge.target, label),
            None => println!("  {} -> {}", edge.source, edge.target),
        }
    }
}

fn print_test_case_stats(path: &str) {
    let json = fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read test cases '{}': {}", path, e))
    });
    let test_cases: Vec<TestCase> = serde_json::from_str(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse test cases: {}", e)));
    let Some(first) = test_cases.first() else {
        println!("\nNo test cases in '{}'.", path);
        return;
    };
    let spec = first.meta().feedback_config.feedback_spec.clone();

    let stats = compute_stats(&test_cases, &spec)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to compute statistics: {}", e)));
    println!("\n--- Agreement ({}) ---", spec.type_name());
    println!("Test Cases:       {}", stats.total_test_cases);
    println!("Human Annotated:  {}", stats.human_annotated);
    if let Some(rate) = stats.agreement_rate {
        println!("Agreement Rate:   {:.1}%", rate * 100.0);
    }
    if let Some(mae) = stats.mean_absolute_error {
        println!("Mean Abs. Error:  {:.3}", mae);
    }
    if let Some(corr) = stats.correlation {
        println!("Correlation:      {:.3}", corr);
    }
    if !stats.disagreed_test_case_ids.is_empty() {
        println!("Disagreed:        {}", stats.disagreed_test_case_ids.join(", "));
    }
}

/// Runs the CLI in an interactive, human-friendly mode with prompts.
fn run_interactive(mut cli: Cli) {
    println!("--- Annotrace Interactive Mode ---");

    let path = prompt_for_input("Enter step collection path (optional)", None);
    cli.steps_path = (!path.is_empty()).then_some(path);

    cli.view = loop {
        println!("\nPlease select what to print:");
        println!("  1: Everything");
        println!("  2: Validation report");
        println!("  3: Execution tree");
        println!("  4: Call graph");
        println!("  5: DOT");
        match prompt_for_input("Enter choice", Some("1")).as_str() {
            "1" => break ViewCli::All,
            "2" => break ViewCli::Report,
            "3" => break ViewCli::Tree,
            "4" => break ViewCli::Graph,
            "5" => break ViewCli::Dot,
            _ => println!("Invalid choice. Please enter a number from 1 to 5."),
        }
    };

    run(cli);
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let mut line = String::new();
    let default_prompt = default.map_or(String::new(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    if let Err(e) = io::stdout().flush() {
        exit_with_error(&format!("Failed to flush stdout: {}", e));
    }
    if let Err(e) = io::stdin().read_line(&mut line) {
        exit_with_error(&format!("Failed to read line: {}", e));
    }

    let trimmed = line.trim();
    if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed.to_string()
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
