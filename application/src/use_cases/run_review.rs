//! Run Review use case
//!
//! The deliberation engine: runs the four council stages for one document.
//!
//! ```text
//! Stage 1  fan-out over every reviewer          (document)
//!    │ barrier
//! Stage 2  fan-out over every reviewer          (stage 1 text)
//!    │ barrier
//! Stage 3  fan-out over addressed reviewers     (stage 1+2 text, routed questions)
//!    │ barrier
//! Stage 4  single synthesizer call              (document, stages 1-3)
//! ```
//!
//! Each stage waits for all of its calls before the next one is built,
//! because later prompts embed the complete text of earlier stages. Output
//! order always follows the roster, never completion order.

use crate::ports::generation::{GenerationGateway, ProviderError};
use crate::ports::progress::{NoProgress, ProgressSink, SYNTHESIS_STEP};
use council_domain::{
    ModelId, PromptContext, PromptTemplate, ReviewConfig, ReviewResult, Role, Stage,
    StageProgress, StageRecord, StageTemperatures, addressed_roles, extract_for,
    format_responses, format_stage,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Errors that can occur during a review run
#[derive(Error, Debug)]
pub enum RunReviewError {
    #[error("No reviewer roles configured")]
    NoReviewers,

    #[error("{stage} failed for {step}: {source}")]
    Provider {
        stage: Stage,
        step: String,
        #[source]
        source: ProviderError,
    },

    #[error("Generation task failed: {0}")]
    TaskFailed(String),
}

/// Input for the RunReview use case
#[derive(Debug, Clone)]
pub struct RunReviewInput {
    /// The document under review
    pub document: String,
    /// Council roster, models and instructions
    pub config: ReviewConfig,
}

impl RunReviewInput {
    pub fn new(document: impl Into<String>, config: ReviewConfig) -> Self {
        Self {
            document: document.into(),
            config,
        }
    }
}

/// Use case for running a council review
pub struct RunReviewUseCase<G: GenerationGateway + 'static> {
    gateway: Arc<G>,
    temperatures: StageTemperatures,
}

impl<G: GenerationGateway + 'static> RunReviewUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            temperatures: StageTemperatures::default(),
        }
    }

    pub fn with_temperatures(mut self, temperatures: StageTemperatures) -> Self {
        self.temperatures = temperatures;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunReviewInput) -> Result<ReviewResult, RunReviewError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case, reporting every call to `progress`
    pub async fn execute_with_progress(
        &self,
        input: RunReviewInput,
        progress: &dyn ProgressSink,
    ) -> Result<ReviewResult, RunReviewError> {
        let config = &input.config;
        if config.reviewers.is_empty() {
            return Err(RunReviewError::NoReviewers);
        }

        info!(
            "Starting council review with {} reviewers (executive: {}, ceo: {})",
            config.reviewers.len(),
            config.executive_model,
            config.ceo_model
        );

        // Stage 1: Independent reviews
        let calls = config
            .reviewers
            .iter()
            .map(|role| {
                let prompt =
                    PromptTemplate::independent_review(prompt_context(config, role), &input.document);
                (role.clone(), prompt)
            })
            .collect();
        let stage1 = self
            .fan_out(Stage::IndependentReview, &config.executive_model, calls, progress)
            .await?;
        let stage1_text = format_stage(Stage::IndependentReview, &stage1);

        // Stage 2: Cross-domain questions
        let calls = config
            .reviewers
            .iter()
            .map(|role| {
                let prompt =
                    PromptTemplate::cross_domain_questions(prompt_context(config, role), &stage1_text);
                (role.clone(), prompt)
            })
            .collect();
        let stage2 = self
            .fan_out(Stage::CrossDomainQuestions, &config.executive_model, calls, progress)
            .await?;
        let stage2_text = format_stage(Stage::CrossDomainQuestions, &stage2);

        // Stage 3: Responses from addressed roles only
        let addressed = addressed_roles(&stage2, &config.reviewers);
        let calls: Vec<(Role, String)> = config
            .reviewers
            .iter()
            .filter(|role| addressed.contains(*role))
            .map(|role| {
                let questions = extract_for(&stage2, role);
                let prompt = PromptTemplate::targeted_response(
                    prompt_context(config, role),
                    &stage1_text,
                    &stage2_text,
                    &questions,
                );
                (role.clone(), prompt)
            })
            .collect();
        if calls.is_empty() {
            info!("No questions directed to specific roles, stage 3 has no calls");
        }
        let stage3 = self
            .fan_out(Stage::TargetedResponses, &config.executive_model, calls, progress)
            .await?;
        let stage3_text = format_responses(&stage3);

        // Stage 4: Synthesis
        let prompt = PromptTemplate::synthesis(
            prompt_context(config, &config.synthesizer),
            &input.document,
            &stage1_text,
            &stage2_text,
            &stage3_text,
        );
        let synthesis = self.synthesize(&config.ceo_model, &prompt, progress).await?;

        Ok(ReviewResult {
            stage1,
            stage2,
            stage3,
            synthesis,
        })
    }

    /// Issue one call per `(role, prompt)` concurrently and wait for all of them.
    ///
    /// Records come back in the order of `calls`. The first failure aborts
    /// the remaining in-flight calls and fails the stage.
    async fn fan_out(
        &self,
        stage: Stage,
        model: &ModelId,
        calls: Vec<(Role, String)>,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<StageRecord>, RunReviewError> {
        info!("{}", stage);
        progress.on_stage_start(stage, calls.len());

        let temperature = self.temperatures.for_stage(stage);
        let mut slots: Vec<Option<StageRecord>> = vec![None; calls.len()];
        let mut join_set = JoinSet::new();

        for (index, (role, prompt)) in calls.into_iter().enumerate() {
            progress.on_call_start(&StageProgress::new(stage, role.as_str()));

            let gateway = Arc::clone(&self.gateway);
            let model = model.clone();

            join_set.spawn(async move {
                let result = gateway.generate(&prompt, &model, temperature).await;
                (index, role, result)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, role, Ok(text))) => {
                    debug!("{} responded in {} ({} bytes)", role, stage, text.len());
                    progress.on_call_complete(stage, role.as_str(), true);
                    slots[index] = Some(StageRecord::new(role, text));
                }
                Ok((_, role, Err(e))) => {
                    warn!("{} failed in {}: {}", role, stage, e);
                    progress.on_call_complete(stage, role.as_str(), false);
                    join_set.abort_all();
                    return Err(RunReviewError::Provider {
                        stage,
                        step: role.to_string(),
                        source: e,
                    });
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                    join_set.abort_all();
                    return Err(RunReviewError::TaskFailed(e.to_string()));
                }
            }
        }

        progress.on_stage_complete(stage);
        Ok(slots.into_iter().flatten().collect())
    }

    /// Stage 4: a single call, no concurrency
    async fn synthesize(
        &self,
        model: &ModelId,
        prompt: &str,
        progress: &dyn ProgressSink,
    ) -> Result<String, RunReviewError> {
        let stage = Stage::Synthesis;
        info!("{}", stage);
        progress.on_stage_start(stage, 1);
        progress.on_call_start(&StageProgress::new(stage, SYNTHESIS_STEP));

        let result = self
            .gateway
            .generate(prompt, model, self.temperatures.for_stage(stage))
            .await;

        progress.on_call_complete(stage, SYNTHESIS_STEP, result.is_ok());
        let synthesis = result.map_err(|e| {
            warn!("Synthesis failed: {}", e);
            RunReviewError::Provider {
                stage,
                step: SYNTHESIS_STEP.to_string(),
                source: e,
            }
        })?;

        progress.on_stage_complete(stage);
        Ok(synthesis)
    }
}

fn prompt_context<'a>(config: &'a ReviewConfig, role: &'a Role) -> PromptContext<'a> {
    PromptContext {
        role,
        role_instructions: config.instructions_for(role),
        operational_context: &config.operational_context,
    }
}
