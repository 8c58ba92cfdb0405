use annotrace::model::{Message, Step, TokenUsage};
use clap::Parser;
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;
use rand::{Rng, rng};
use serde_json::json;
use std::fs;

const TOOLS: [&str; 5] = ["search", "retrieve", "calculator", "browse", "sql_query"];
const MODELS: [&str; 3] = ["gpt-4o-mini", "claude-3-5-haiku", "llama-3.1-8b"];

/// A CLI tool to generate synthetic agent traces for annotrace
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated step collection to
    #[arg(short, long, default_value = "generated_steps.json")]
    output: String,

    /// Number of interactions to generate
    #[arg(long, default_value_t = 5)]
    interactions: usize,

    /// Number of interactions per group (session)
    #[arg(long, default_value_t = 2)]
    per_group: usize,

    /// The minimum number of child steps under each agent
    #[arg(long, default_value_t = 1)]
    min: usize,

    /// The maximum number of child steps under each agent
    #[arg(long, default_value_t = 8)]
    max: usize,

    /// Write one step per line instead of a JSON array
    #[arg(long)]
    jsonl: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rng();

    if cli.min > cli.max {
        eprintln!(
            "Error: --min ({}) cannot be greater than --max ({})",
            cli.min, cli.max
        );
        std::process::exit(1);
    }
    let per_group = cli.per_group.max(1);

    println!(
        "Generating {} interaction(s) with {} to {} child steps each...",
        cli.interactions, cli.min, cli.max
    );

    let mut steps = Vec::new();
    let mut clock: i64 = 1_700_000_000_000_000_000;
    for i in 0..cli.interactions {
        let group_id = format!("session-{}", i / per_group);
        let generated = generate_interaction(&mut rng, i, &group_id, &mut clock, cli.min, cli.max);
        println!(
            "-> Generated interaction-{} with {} step(s).",
            i,
            generated.len()
        );
        steps.extend(generated);
    }

    let output = if cli.jsonl {
        steps
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?
            .join("\n")
    } else {
        serde_json::to_string_pretty(&steps)?
    };
    fs::write(&cli.output, output)?;

    println!(
        "Successfully generated and saved {} steps to '{}'",
        steps.len(),
        cli.output
    );
    Ok(())
}

/// One agent root with a mix of LLM calls, tool calls and unnamed sub-steps beneath it.
fn generate_interaction(
    rng: &mut ThreadRng,
    index: usize,
    group_id: &str,
    clock: &mut i64,
    min_children: usize,
    max_children: usize,
) -> Vec<Step> {
    let interaction_id = format!("interaction-{}", index);
    let base = |id: String, parent: Option<&str>, name: Option<&str>, start: i64| Step {
        parent_step_id: parent.map(str::to_string),
        interaction_id: Some(interaction_id.clone()),
        group_id: Some(group_id.to_string()),
        name: name.map(str::to_string),
        start_ns: Some(start),
        ..Step::new(id)
    };

    let agent_id = format!("{}-agent", interaction_id);
    let mut agent = base(agent_id.clone(), None, Some("agent"), *clock);
    let mut steps = Vec::new();

    let mut cursor = *clock + rng.random_range(10_000..100_000);
    let children = rng.random_range(min_children..=max_children);
    for c in 0..children {
        let id = format!("{}-step-{}", interaction_id, c);
        let duration = rng.random_range(50_000..5_000_000);

        let mut step = if rng.random_bool(0.4) {
            let mut llm = base(id.clone(), Some(&agent_id), Some("chat"), cursor);
            let model = MODELS.choose(rng).copied().unwrap_or("gpt-4o-mini");
            llm.model = Some(model.to_string());
            llm.input_messages = Some(vec![Message {
                role: "user".to_string(),
                content: json!(format!("Question #{}", c)),
            }]);
            let input_tokens = rng.random_range(20..2_000);
            let output_tokens = rng.random_range(5..500);
            llm.usage = Some(TokenUsage {
                input_tokens: Some(input_tokens),
                output_tokens: Some(output_tokens),
                total_tokens: Some(input_tokens + output_tokens),
            });
            llm
        } else {
            let tool = TOOLS.choose(rng).copied().unwrap_or("search");
            let mut tool_step = base(id.clone(), Some(&agent_id), Some(tool), cursor);
            tool_step.input_data = Some(json!({ "query": format!("lookup {}", c) }));
            tool_step
        };
        step.duration_ns = Some(duration);

        // Occasionally nest an unnamed sub-step, and sometimes drop its timestamp.
        if rng.random_bool(0.25) {
            let mut sub = base(format!("{}-sub", id), Some(&id), None, cursor + duration / 4);
            if rng.random_bool(0.3) {
                sub.start_ns = None;
            }
            sub.duration_ns = Some(duration / 2);
            steps.push(step);
            steps.push(sub);
        } else {
            steps.push(step);
        }
        cursor += duration + rng.random_range(1_000..50_000);
    }

    agent.duration_ns = Some(cursor - *clock);
    *clock = cursor + rng.random_range(1_000_000..10_000_000);

    let mut all = Vec::with_capacity(steps.len() + 1);
    all.push(agent);
    all.extend(steps);
    all
}
