//! Language-model analysis of the curated selection.
//!
//! After selection and enrichment, the top articles can be handed to an
//! OpenAI-compatible model (for example a local Ollama server) together with
//! editorial criteria. The model's reply is advisory: it is logged and carried
//! in the run outcome but never changes ranking or the rendered newsletter.
//!
//! # Architecture
//!
//! - [`AskAsync`]: Core trait defining async model interaction
//! - [`AskFnWrapper`]: Wraps the `awful_aj` library's `ask` function
//! - [`RetryAsk`]: Retries any `AskAsync` implementation with backoff
//! - [`analyze_articles`]: Builds the prompt and asks once through the stack
//!
//! Only the model call is retried. Feed and page requests are single-shot.

use crate::models::Article;
use awful_aj::api::ask;
use awful_aj::{config::AwfulJadeConfig, template::ChatTemplate};
use rand::{Rng, rng};
use std::error::Error;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// Trait for async model interaction.
///
/// Implementors send a prompt and return the model's reply. Test doubles and
/// decorators such as [`RetryAsk`] implement it too.
pub trait AskAsync {
    /// The type of response returned by the model.
    type Response;

    /// Send `text` to the model and receive a response.
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>>;
}

/// Retries the model call with doubling delays plus up to 250ms of jitter.
pub struct RetryAsk<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
}

impl<T> RetryAsk<T>
where
    T: AskAsync,
{
    /// Wrap `inner`, retrying up to `max_retries` times after the first attempt.
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
        }
    }

    /// Pause before retry number `retry` (1-based): `base_delay * 2^(retry-1)`
    /// capped at [`MAX_BACKOFF`], plus jitter.
    fn backoff(&self, retry: usize) -> StdDuration {
        let exponent = u32::try_from(retry.saturating_sub(1)).unwrap_or(u32::MAX).min(16);
        let delay = self
            .base_delay
            .saturating_mul(1 << exponent)
            .min(MAX_BACKOFF);
        delay + StdDuration::from_millis(rng().random_range(0..=250))
    }
}

/// Longest pause between two model attempts, before jitter.
const MAX_BACKOFF: StdDuration = StdDuration::from_secs(30);

impl<T> AskAsync for RetryAsk<T>
where
    T: AskAsync,
{
    type Response = T::Response;

    #[instrument(level = "info", skip_all)]
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let mut retry = 0;
        loop {
            match self.inner.ask(text).await {
                Ok(reply) => return Ok(reply),
                Err(e) if retry >= self.max_retries => return Err(e),
                Err(e) => {
                    retry += 1;
                    let delay = self.backoff(retry);
                    warn!(retry, max_retries = self.max_retries, ?delay, error = %e, "Model call failed; retrying");
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Adapter from `awful_aj::api::ask` to [`AskAsync`].
///
/// The template carries the curator persona's system prompt.
pub struct AskFnWrapper<'a> {
    pub config: &'a AwfulJadeConfig,
    pub template: &'a ChatTemplate,
}

impl AskAsync for AskFnWrapper<'_> {
    type Response = String;

    async fn ask(&self, text: &str) -> Result<String, Box<dyn Error>> {
        ask(self.config, text.to_string(), self.template, None, None).await
    }
}

/// Build the editorial prompt for the first `sample` selected articles.
///
/// The articles are embedded as a pretty-printed JSON array.
pub fn build_analysis_prompt(articles: &[Article], sample: usize) -> Result<String, Box<dyn Error>> {
    let shown = &articles[..articles.len().min(sample)];
    let data = serde_json::to_string_pretty(shown)?;
    Ok(format!(
        "Analyze these {count} articles and help me create a newsletter.\n\
Consider factors like:\n\
- Novelty and impact of the story\n\
- Relevance to AI and technology trends\n\
- Quality of the source\n\
- Potential interest to tech professionals\n\
\n\
Articles data: {data}\n\
\n\
Please suggest the top 5 articles for the newsletter and provide brief explanations for why each is significant.",
        count = articles.len()
    ))
}

/// Ask `analyst` for editorial commentary on the selected articles.
///
/// # Returns
///
/// The model's free-text reply, or an error if the prompt could not be built
/// or the model call failed.
#[instrument(level = "info", skip_all, fields(articles = articles.len(), sample = sample))]
pub async fn analyze_articles<A>(
    analyst: &A,
    articles: &[Article],
    sample: usize,
) -> Result<String, Box<dyn Error>>
where
    A: AskAsync<Response = String>,
{
    let t0 = Instant::now();
    let prompt = build_analysis_prompt(articles, sample)?;
    let res = analyst.ask(&prompt).await;
    match &res {
        Ok(reply) => info!(
            elapsed_ms_total = t0.elapsed().as_millis(),
            reply_chars = reply.chars().count(),
            "Analysis completed"
        ),
        Err(e) => error!(elapsed_ms_total = t0.elapsed().as_millis(), error = %e, "Analysis failed"),
    }
    res
}
