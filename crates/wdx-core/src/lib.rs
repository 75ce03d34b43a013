//! wdx core - evaluation and seeding utilities for WorldDex.
//!
//! Two independent tool sets share this crate's config, errors and logging:
//!
//! - **eval**: run every prompt in a YAML prompt set against every image in
//!   a directory through a hosted multimodal model, recording label, latency
//!   and cost per call to a timestamped CSV file.
//! - **usernames**: turn plaintext username lists into batched
//!   `INSERT ... ON CONFLICT DO NOTHING` SQL for the `username_pool` table.
//!
//! # Usage
//!
//! ```rust,ignore
//! use wdx_core::eval::{EvalOptions, EvalRunner, ImageSet, PromptSet, ResultsWriter};
//! use wdx_core::{Config, LlmProviderFactory, PricingTable};
//!
//! #[tokio::main]
//! async fn main() -> wdx_core::Result<()> {
//!     let config = Config::load()?;
//!     let prompts = PromptSet::load(&config.prompts_file())?;
//!     let images = ImageSet::discover(&config.image_dir(), &config.eval.supported_formats)?;
//!
//!     let provider = LlmProviderFactory::create(&config.eval.model, &config)?;
//!     let runner = EvalRunner::new(
//!         provider,
//!         PricingTable::new(config.pricing.clone()),
//!         EvalOptions::default(),
//!     );
//!     let (mut sink, path) =
//!         ResultsWriter::create_in(&config.output_dir(), &config.eval.model, chrono::Local::now())?;
//!     let summary = runner.run(&prompts, &images, &mut sink, |_| {}).await?;
//!     println!("{} rows written to {}", summary.rows, path.display());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod eval;
pub mod llm;
pub mod usernames;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, InputError, LlmError, Result, WdxError};
pub use llm::{LlmProvider, LlmProviderFactory, PricingTable};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
