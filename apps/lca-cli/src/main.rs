use clap::{Args, Parser, Subcommand};
use lca_sim::{
    GaussianNoise, LcaConfig, SimError, SimResult, run_trial_traced, simulate, summarize,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "lca-cli")]
#[command(about = "LCA race simulator - leaky competing accumulator decision model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a batch of race trials and export per-trial outcomes
    Run {
        #[command(flatten)]
        model: ModelArgs,
        /// Number of trials
        #[arg(long, default_value_t = 1000)]
        trials: usize,
        /// RNG seed for the batch noise stream
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the batch summary as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Simulate one trial and dump its trajectory as CSV
    Trace {
        #[command(flatten)]
        model: ModelArgs,
        /// RNG seed for the trial noise stream
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Model parameters shared by both subcommands. The accumulator count
/// is implied by the number of `--input` flags.
#[derive(Args)]
struct ModelArgs {
    /// Input drive, one flag per accumulator (repeat)
    #[arg(long = "input", required = true)]
    input: Vec<f64>,
    /// Leak rate
    #[arg(long, default_value_t = 0.0)]
    kappa: f64,
    /// Lateral inhibition strength
    #[arg(long, default_value_t = 0.0)]
    beta: f64,
    /// Decision threshold
    #[arg(long)]
    threshold: f64,
    /// Noise scale (std dev of the Wiener-like noise)
    #[arg(long, default_value_t = 1.0)]
    noise: f64,
    /// Step size in seconds
    #[arg(long, default_value_t = 1e-3)]
    dt: f64,
    /// Maximum steps per trial
    #[arg(long, default_value_t = 10_000)]
    max_iter: usize,
    /// Rectify negative activations back to zero each step
    #[arg(long)]
    non_linear: bool,
    /// Starting point, one flag per accumulator (defaults to zeros)
    #[arg(long = "x0")]
    x0: Vec<f64>,
}

impl ModelArgs {
    fn to_config(&self) -> LcaConfig {
        let n_acc = self.input.len();
        let x0 = if self.x0.is_empty() {
            vec![0.0; n_acc]
        } else {
            self.x0.clone()
        };
        LcaConfig {
            n_acc,
            input: self.input.clone(),
            kappa: self.kappa,
            beta: self.beta,
            threshold: self.threshold,
            noise_scale: self.noise,
            dt: self.dt,
            max_iter: self.max_iter,
            non_linear: self.non_linear,
            x0,
        }
    }
}

fn main() -> SimResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            model,
            trials,
            seed,
            output,
            json,
        } => cmd_run(&model, trials, seed, output.as_deref(), json),
        Commands::Trace {
            model,
            seed,
            output,
        } => cmd_trace(&model, seed, output.as_deref()),
    }
}

fn cmd_run(
    model: &ModelArgs,
    trials: usize,
    seed: u64,
    output: Option<&Path>,
    json: bool,
) -> SimResult<()> {
    let cfg = model.to_config();
    let mut noise = GaussianNoise::from_seed(seed);

    // simulate() validates before entering the core drivers.
    let (responses, rts) = simulate(&cfg, trials, &mut noise)?;

    // Build CSV
    let mut csv = String::from("trial,response,rt_s\n");
    for (i, (&resp, &rt)) in responses.iter().zip(rts.iter()).enumerate() {
        csv.push_str(&format!("{},{},{}\n", i, resp, rt));
    }
    write_output(&csv, output)?;

    let summary = summarize(cfg.n_acc, &responses, &rts);
    if json {
        let text = serde_json::to_string_pretty(&summary).map_err(|e| SimError::Backend {
            message: e.to_string(),
        })?;
        println!("{}", text);
        return Ok(());
    }

    println!("✓ Simulated {} trials ({} accumulators)", trials, cfg.n_acc);
    for (z, count) in summary.response_counts.iter().enumerate() {
        let share = if trials > 0 {
            100.0 * *count as f64 / trials as f64
        } else {
            0.0
        };
        println!("  Accumulator {}: {} wins ({:.1}%)", z + 1, count, share);
    }
    println!("  No response:   {}", summary.no_response_count);
    if let Some(mean) = summary.mean_rt_s {
        println!(
            "  RT (responded): mean {:.4} s, min {:.4} s, max {:.4} s",
            mean,
            summary.min_rt_s.unwrap_or(mean),
            summary.max_rt_s.unwrap_or(mean),
        );
    }
    Ok(())
}

fn cmd_trace(model: &ModelArgs, seed: u64, output: Option<&Path>) -> SimResult<()> {
    let cfg = model.to_config();
    cfg.validate()?;

    let mut noise = GaussianNoise::from_seed(seed);
    let trace = run_trial_traced(&cfg, &mut noise);

    // Build CSV: one activation column per accumulator
    let mut csv = String::from("t_s");
    for z in 0..cfg.n_acc {
        csv.push_str(&format!(",x{}", z + 1));
    }
    csv.push('\n');
    for (t, x) in trace.t.iter().zip(trace.x.iter()) {
        csv.push_str(&format!("{}", t));
        for v in x {
            csv.push_str(&format!(",{}", v));
        }
        csv.push('\n');
    }
    write_output(&csv, output)?;

    eprintln!(
        "✓ Trial finished: response={} rt={:.4}s steps={}",
        trace.outcome.response, trace.outcome.rt, trace.outcome.steps
    );
    Ok(())
}

fn write_output(csv: &str, output: Option<&Path>) -> SimResult<()> {
    if let Some(path) = output {
        std::fs::write(path, csv).map_err(|e| SimError::Backend {
            message: e.to_string(),
        })?;
        println!("✓ Wrote {}", path.display());
    } else {
        print!("{}", csv);
    }
    Ok(())
}
