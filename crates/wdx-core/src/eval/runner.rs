//! Sequential prompt × image evaluation.
//!
//! Every pair produces exactly one [`EvalRecord`]. A failed call is recorded
//! with an `ERROR: <kind>` label and zero cost, and the run moves on.

use super::images::{ImageFile, ImageSet};
use super::prompts::{Prompt, PromptSet};
use super::results::{EvalRecord, ResultsWriter};
use crate::error::{LlmError, Result};
use crate::llm::{ImageInput, LlmProvider, LlmRequest, PricingTable};
use std::io::Write;
use std::time::{Duration, Instant};

/// Prefix of the label recorded for failed pairs.
pub const ERROR_LABEL_PREFIX: &str = "ERROR";

/// Fixed decoding parameters for a run.
#[derive(Debug, Clone)]
pub struct EvalOptions {
    /// Model identifier recorded in every row
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            model: "gemini/gemini-2.0-flash".to_string(),
            max_tokens: 100,
            temperature: 0.0,
        }
    }
}

/// Totals for a finished run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvalSummary {
    pub rows: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total_cost_usd: f64,
    /// Sum over rows whose call actually started
    pub total_latency_ms: i64,
    /// Rows with a measured latency
    pub timed_rows: usize,
}

impl EvalSummary {
    fn record(&mut self, record: &EvalRecord, failed: bool) {
        self.rows += 1;
        if failed {
            self.failed += 1;
        } else {
            self.succeeded += 1;
        }
        self.total_cost_usd += record.cost_usd;
        if record.latency_ms >= 0 {
            self.total_latency_ms += record.latency_ms;
            self.timed_rows += 1;
        }
    }

    /// Mean latency over timed rows, `None` if no call started.
    pub fn mean_latency_ms(&self) -> Option<f64> {
        (self.timed_rows > 0).then(|| self.total_latency_ms as f64 / self.timed_rows as f64)
    }
}

/// Whether a recorded label has the `ERROR: <kind>` shape of a failed call.
pub fn is_error_label(label: &str) -> bool {
    label
        .strip_prefix(ERROR_LABEL_PREFIX)
        .is_some_and(|rest| rest.starts_with(": "))
}

/// Runs every prompt against every image, one call at a time.
pub struct EvalRunner {
    provider: Box<dyn LlmProvider>,
    pricing: PricingTable,
    options: EvalOptions,
}

impl EvalRunner {
    pub fn new(
        provider: Box<dyn LlmProvider>,
        pricing: PricingTable,
        options: EvalOptions,
    ) -> Self {
        Self {
            provider,
            pricing,
            options,
        }
    }

    pub fn options(&self) -> &EvalOptions {
        &self.options
    }

    /// Evaluate all pairs, prompts outer and images inner, writing each row
    /// to `sink` as soon as it is known.
    ///
    /// `on_record` is called after each row is written. Only sink failures
    /// abort the run.
    pub async fn run<W, F>(
        &self,
        prompts: &PromptSet,
        images: &ImageSet,
        sink: &mut ResultsWriter<W>,
        mut on_record: F,
    ) -> Result<EvalSummary>
    where
        W: Write,
        F: FnMut(&EvalRecord),
    {
        let mut summary = EvalSummary::default();

        for prompt in prompts.iter() {
            tracing::info!("Testing prompt: {}", prompt.id);
            for image in images.iter() {
                let (record, failed) = self.evaluate(prompt, image).await;
                sink.write(&record)?;
                summary.record(&record, failed);
                on_record(&record);
            }
        }

        Ok(summary)
    }

    /// Evaluate one (prompt, image) pair. Never fails: errors become the label.
    pub async fn evaluate_pair(&self, prompt: &Prompt, image: &ImageFile) -> EvalRecord {
        self.evaluate(prompt, image).await.0
    }

    /// The record for one pair, and whether the call failed.
    async fn evaluate(&self, prompt: &Prompt, image: &ImageFile) -> (EvalRecord, bool) {
        tracing::debug!("Processing {} with prompt {}", image.file_name, prompt.id);

        let (predicted_label, latency_ms, cost_usd, failed) = match self.call(prompt, image).await {
            Ok((label, latency, cost)) => (label, millis(latency), cost, false),
            Err((e, latency)) => {
                tracing::error!(
                    "Call failed for {} (prompt {}): {e}",
                    image.file_name,
                    prompt.id
                );
                (
                    format!("{ERROR_LABEL_PREFIX}: {}", e.kind()),
                    latency.map(millis).unwrap_or(-1),
                    0.0,
                    true,
                )
            }
        };

        let record = EvalRecord {
            prompt_id: prompt.id.clone(),
            image_file: image.file_name.clone(),
            model: self.options.model.clone(),
            predicted_label,
            latency_ms,
            cost_usd,
        };
        (record, failed)
    }

    /// Returns `(label, latency, cost)`, or the error plus latency if the call started.
    async fn call(
        &self,
        prompt: &Prompt,
        image: &ImageFile,
    ) -> std::result::Result<(String, Duration, f64), (LlmError, Option<Duration>)> {
        let input = ImageInput::from_path(&image.path).map_err(|e| (e, None))?;
        let request = LlmRequest::classify(
            input,
            &prompt.text,
            self.options.max_tokens,
            self.options.temperature,
        );

        let start = Instant::now();
        let response = self
            .provider
            .generate(&request)
            .await
            .map_err(|e| (e, Some(start.elapsed())))?;
        let latency = start.elapsed();

        let cost = self
            .pricing
            .completion_cost(&self.options.model, response.usage)
            .map_err(|e| (e, Some(latency)))?;

        Ok((response.text, latency, cost))
    }
}

fn millis(d: Duration) -> i64 {
    (d.as_secs_f64() * 1000.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EvalConfig;
    use crate::llm::{LlmResponse, TokenUsage};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::path::Path;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    type ResponseFn =
        dyn Fn(u32, &str) -> std::result::Result<LlmResponse, LlmError> + Send + Sync;

    /// Scripted provider: answers from a closure over (call index, prompt text).
    struct MockProvider {
        response_fn: Box<ResponseFn>,
        call_count: Arc<AtomicU32>,
    }

    impl MockProvider {
        fn new<F>(f: F) -> Self
        where
            F: Fn(u32, &str) -> std::result::Result<LlmResponse, LlmError> + Send + Sync + 'static,
        {
            Self {
                response_fn: Box::new(f),
                call_count: Arc::new(AtomicU32::new(0)),
            }
        }

        fn answering(text: &str) -> Self {
            let text = text.to_string();
            Self::new(move |_, _| Ok(response(&text, Some((1000, 5)))))
        }
    }

    #[async_trait]
    impl LlmProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn generate(
            &self,
            request: &LlmRequest,
        ) -> std::result::Result<LlmResponse, LlmError> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            (self.response_fn)(idx, &request.prompt)
        }
    }

    fn response(text: &str, usage: Option<(u32, u32)>) -> LlmResponse {
        LlmResponse {
            text: text.to_string(),
            model: "mock-v1".to_string(),
            usage: usage.map(|(p, c)| TokenUsage {
                prompt_tokens: p,
                completion_tokens: c,
            }),
        }
    }

    fn runner(provider: MockProvider) -> EvalRunner {
        EvalRunner::new(
            Box::new(provider),
            PricingTable::default(),
            EvalOptions::default(),
        )
    }

    fn fixtures(prompts: &str, images: &[&str]) -> (tempfile::TempDir, PromptSet, ImageSet) {
        let dir = tempfile::tempdir().unwrap();
        let prompt_set = PromptSet::parse(prompts, Path::new("prompts.yaml")).unwrap();
        let image_dir = dir.path().join("eval_images");
        std::fs::create_dir(&image_dir).unwrap();
        for name in images {
            std::fs::write(image_dir.join(name), [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
        }
        let image_set =
            ImageSet::discover(&image_dir, &EvalConfig::default().supported_formats).unwrap();
        (dir, prompt_set, image_set)
    }

    fn read_rows(bytes: Vec<u8>) -> Vec<Vec<String>> {
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect()
    }

    #[tokio::test]
    async fn test_one_row_per_pair() {
        let (_dir, prompts, images) = fixtures(
            "simple: What is this?\ndetailed: Give the species.\n",
            &["a.jpg", "b.png", "c.webp"],
        );
        let runner = runner(MockProvider::answering("fox"));
        let mut sink = ResultsWriter::new(Vec::new()).unwrap();

        let summary = runner.run(&prompts, &images, &mut sink, |_| {}).await.unwrap();
        assert_eq!(summary.rows, 6);
        assert_eq!(summary.succeeded, 6);
        assert_eq!(summary.failed, 0);

        let rows = read_rows(sink.into_inner().unwrap());
        assert_eq!(rows.len(), 6);
        let keys: HashSet<(String, String)> =
            rows.iter().map(|r| (r[0].clone(), r[1].clone())).collect();
        assert_eq!(keys.len(), 6);

        // Prompts outer, images inner
        assert_eq!(rows[0][0], "simple");
        assert_eq!(rows[0][1], "a.jpg");
        assert_eq!(rows[3][0], "detailed");
        assert_eq!(rows[0][2], "gemini/gemini-2.0-flash");
        assert_eq!(rows[0][3], "fox");
    }

    #[tokio::test]
    async fn test_success_records_cost() {
        let (_dir, prompts, images) = fixtures("p: label it\n", &["a.jpg"]);
        let runner = runner(MockProvider::answering("Golden Gate Bridge"));

        let prompt = prompts.iter().next().unwrap();
        let image = images.iter().next().unwrap();
        let record = runner.evaluate_pair(prompt, image).await;

        assert_eq!(record.predicted_label, "Golden Gate Bridge");
        assert!(record.latency_ms >= 0);
        // 1000 prompt tokens at $0.10/M + 5 completion tokens at $0.40/M
        assert!((record.cost_usd - 0.000102).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_failure_is_recorded_and_run_continues() {
        let (_dir, prompts, images) = fixtures("p: label it\n", &["a.jpg", "b.jpg", "c.jpg"]);
        let provider = MockProvider::new(|idx, _| {
            if idx == 1 {
                Err(LlmError::Status {
                    provider: "mock".to_string(),
                    code: 503,
                    body: "unavailable".to_string(),
                })
            } else {
                Ok(response("owl", Some((10, 1))))
            }
        });
        let runner = runner(provider);
        let mut sink = ResultsWriter::new(Vec::new()).unwrap();

        let mut seen = Vec::new();
        let summary = runner
            .run(&prompts, &images, &mut sink, |r| seen.push(r.image_file.clone()))
            .await
            .unwrap();

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(seen, vec!["a.jpg", "b.jpg", "c.jpg"]);

        let rows = read_rows(sink.into_inner().unwrap());
        assert_eq!(rows[1][1], "b.jpg");
        assert_eq!(rows[1][3], "ERROR: StatusError");
        assert_eq!(rows[1][5], "0.0");
        assert!(rows[1][4].parse::<i64>().unwrap() >= 0);
        assert_eq!(rows[2][3], "owl");
    }

    #[tokio::test]
    async fn test_empty_response_becomes_error_row() {
        let (_dir, prompts, images) = fixtures("p: label it\n", &["a.jpg"]);
        let runner = runner(MockProvider::new(|_, _| {
            Err(LlmError::EmptyResponse {
                provider: "mock".to_string(),
            })
        }));

        let record = runner
            .evaluate_pair(prompts.iter().next().unwrap(), images.iter().next().unwrap())
            .await;
        assert_eq!(record.predicted_label, "ERROR: EmptyResponse");
        assert_eq!(record.cost_usd, 0.0);
    }

    #[tokio::test]
    async fn test_missing_usage_is_error_not_zero_cost() {
        let (_dir, prompts, images) = fixtures("p: label it\n", &["a.jpg"]);
        let runner = runner(MockProvider::new(|_, _| Ok(response("cat", None))));

        let record = runner
            .evaluate_pair(prompts.iter().next().unwrap(), images.iter().next().unwrap())
            .await;
        assert_eq!(record.predicted_label, "ERROR: CostUnavailable");
        assert_eq!(record.cost_usd, 0.0);
        assert!(record.latency_ms >= 0);
    }

    #[tokio::test]
    async fn test_unreadable_image_has_no_latency() {
        let (dir, prompts, images) = fixtures("p: label it\n", &["a.jpg"]);
        std::fs::remove_file(dir.path().join("eval_images").join("a.jpg")).unwrap();
        let provider = MockProvider::answering("never");
        let calls = provider.call_count.clone();
        let runner = runner(provider);

        let record = runner
            .evaluate_pair(prompts.iter().next().unwrap(), images.iter().next().unwrap())
            .await;
        assert_eq!(record.predicted_label, "ERROR: ImageError");
        assert_eq!(record.latency_ms, -1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_prompt_text_is_sent() {
        let (_dir, prompts, images) = fixtures("p: Which landmark?\n", &["a.png"]);
        let runner = runner(MockProvider::new(|_, prompt| {
            Ok(response(&format!("echo {prompt}"), Some((1, 1))))
        }));

        let record = runner
            .evaluate_pair(prompts.iter().next().unwrap(), images.iter().next().unwrap())
            .await;
        assert_eq!(record.predicted_label, "echo Which landmark?");
    }

    #[tokio::test]
    async fn test_error_like_answer_counts_as_success() {
        let (_dir, prompts, images) = fixtures("p: What does the sign say?\n", &["a.jpg"]);
        let runner = runner(MockProvider::answering("ERROR 404 page"));
        let mut sink = ResultsWriter::new(Vec::new()).unwrap();

        let summary = runner.run(&prompts, &images, &mut sink, |_| {}).await.unwrap();
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 0);
    }

    #[tokio::test]
    async fn test_mean_latency_skips_untimed_rows() {
        let (dir, prompts, images) = fixtures("p: label it\n", &["a.jpg", "b.jpg"]);
        std::fs::remove_file(dir.path().join("eval_images").join("a.jpg")).unwrap();
        let runner = runner(MockProvider::answering("fox"));
        let mut sink = ResultsWriter::new(Vec::new()).unwrap();

        let summary = runner.run(&prompts, &images, &mut sink, |_| {}).await.unwrap();
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.timed_rows, 1);
        assert_eq!(
            summary.mean_latency_ms(),
            Some(summary.total_latency_ms as f64)
        );
    }

    #[test]
    fn test_mean_latency_without_timed_rows() {
        assert_eq!(EvalSummary::default().mean_latency_ms(), None);
    }

    #[test]
    fn test_is_error_label() {
        assert!(is_error_label("ERROR: RequestError"));
        assert!(!is_error_label("ERROR 404 page"));
        assert!(!is_error_label("Red fox"));
    }
}
