//! Prompt evaluation harness.
//!
//! Loads a prompt set and an image directory, calls the completion API for
//! every pair and records label, latency and cost to CSV:
//!
//! ```text
//! prompts.yaml × eval_images/ → LlmProvider → evaluation_results_<model>_<ts>.csv
//! ```

pub mod images;
pub mod prompts;
pub mod results;
pub mod runner;

pub use images::{ImageFile, ImageSet};
pub use prompts::{Prompt, PromptSet};
pub use results::{results_file_name, EvalRecord, ResultsWriter};
pub use runner::{is_error_label, EvalOptions, EvalRunner, EvalSummary, ERROR_LABEL_PREFIX};
