//! The `wdx eval` command: prompt × image evaluation against a hosted model.

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use std::time::Instant;

use wdx_core::eval::{
    is_error_label, EvalOptions, EvalRecord, EvalRunner, EvalSummary, ImageSet, PromptSet,
    ResultsWriter,
};
use wdx_core::{Config, LlmProviderFactory, PricingTable};

/// Arguments for the `eval` command. Unset options fall back to `[eval]` config.
#[derive(Args, Debug, Default)]
pub struct EvalArgs {
    /// YAML file mapping prompt ids to prompt text
    #[arg(short, long)]
    pub prompts: Option<PathBuf>,

    /// Directory of evaluation images (.png, .jpg, .jpeg, .webp)
    #[arg(short, long)]
    pub images: Option<PathBuf>,

    /// Model identifier, e.g. gemini/gemini-2.0-flash
    #[arg(short, long)]
    pub model: Option<String>,

    /// Directory for the results CSV
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Maximum output tokens per call
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f32>,
}

impl EvalArgs {
    /// Fold CLI overrides into the loaded config.
    fn apply(&self, config: &mut Config) {
        if let Some(ref p) = self.prompts {
            config.eval.prompts_file = p.clone();
        }
        if let Some(ref dir) = self.images {
            config.eval.image_dir = dir.clone();
        }
        if let Some(ref model) = self.model {
            config.eval.model = model.clone();
        }
        if let Some(ref dir) = self.output_dir {
            config.eval.output_dir = dir.clone();
        }
        if let Some(max_tokens) = self.max_tokens {
            config.eval.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.eval.temperature = temperature;
        }
    }
}

/// Execute the eval command.
pub async fn execute(args: EvalArgs, mut config: Config) -> anyhow::Result<()> {
    args.apply(&mut config);
    config.validate()?;

    // Everything that can abort the run is checked before the first call.
    let prompts = PromptSet::load(&config.prompts_file())?;
    let images = ImageSet::discover(&config.image_dir(), &config.eval.supported_formats)?;
    let provider = LlmProviderFactory::create(&config.eval.model, &config)?;

    let options = EvalOptions {
        model: config.eval.model.clone(),
        max_tokens: config.eval.max_tokens,
        temperature: config.eval.temperature,
    };
    let runner = EvalRunner::new(provider, PricingTable::new(config.pricing.clone()), options);

    println!("Starting evaluation for model: {}", config.eval.model);
    println!("Found {} prompts and {} images.", prompts.len(), images.len());

    let (mut sink, results_path) =
        ResultsWriter::create_in(&config.output_dir(), &config.eval.model, chrono::Local::now())
            .context("Failed to create results file")?;
    tracing::info!("Writing results to {}", results_path.display());

    let progress = create_progress_bar((prompts.len() * images.len()) as u64);
    let start_time = Instant::now();

    let summary = runner
        .run(&prompts, &images, &mut sink, |record: &EvalRecord| {
            progress.inc(1);
            progress.set_message(format!("{} / {}", record.prompt_id, record.image_file));
            if is_error_label(&record.predicted_label) {
                progress.println(format!(
                    "  {} [{}]: {}",
                    record.image_file, record.prompt_id, record.predicted_label
                ));
            }
        })
        .await?;

    progress.finish_and_clear();
    print_summary(&summary, start_time.elapsed());
    println!("Evaluation finished. Results saved to '{}'", results_path.display());

    Ok(())
}

/// Create a progress bar for the evaluation loop.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
    ) {
        pb.set_style(style.progress_chars("##-"));
    }
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after the run.
fn print_summary(summary: &EvalSummary, elapsed: std::time::Duration) {
    let mean_latency = summary.mean_latency_ms().unwrap_or(0.0);

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Succeeded:    {:>8}", summary.succeeded);
    if summary.failed > 0 {
        eprintln!("    Failed:       {:>8}", summary.failed);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", summary.rows);
    eprintln!("    Duration:     {:>7.1}s", elapsed.as_secs_f64());
    eprintln!("    Mean latency: {:>6.0}ms", mean_latency);
    eprintln!("    Cost:       ${:>9.6}", summary.total_cost_usd);
    eprintln!("  ====================================");
}
