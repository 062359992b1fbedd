//! Composition executor — runs a declared workflow pattern to completion.
//!
//! The executor dispatches on the four `WorkflowDescriptor` variants:
//!
//! 1. Chain — strictly sequential steps, optional cumulative context
//! 2. Parallel — concurrent fan-out, join, optional fan-in aggregator
//! 3. Router — one routing decision, exactly one candidate executed
//! 4. EvaluatorOptimizer — generate/rate loop bounded by a quality
//!    threshold and a refinement cap
//!
//! Steps naming a workflow recurse back through the executor; steps naming
//! an agent go out through the `AgentRuntime`. A per-invocation context
//! carries the original request text and the set of in-progress workflow
//! names so reference cycles fail instead of recursing.

use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};

use crate::error::WorkflowError;
use crate::models::{AgentDescriptor, RatingLevel, WorkflowDescriptor, DEFAULT_MODEL};
use crate::registry::{resolve_target, AgentRegistry, Target, WorkflowRegistry};
use crate::runtime::AgentRuntime;

/// One step's raw invocation result, attributed to its producer.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StepRecord {
    pub target: String,
    pub output: String,
}

/// Final result of one top-level `execute` call.
#[derive(Debug, serde::Serialize)]
pub struct ExecutionResult {
    pub output: String,
    pub transcript: Vec<StepRecord>,
}

/// Transient per-invocation state. Owned by one in-flight execution;
/// parallel branches each get an independent clone.
#[derive(Clone)]
struct ExecutionContext {
    /// The original top-level input, for `include_request` branches.
    request: Arc<String>,
    /// In-progress workflow names on this execution path.
    active: Vec<String>,
}

impl ExecutionContext {
    fn new(request: &str) -> Self {
        Self {
            request: Arc::new(request.to_string()),
            active: Vec::new(),
        }
    }

    /// Mark a workflow as entered, failing on a reference cycle.
    fn enter(&self, workflow: &str) -> Result<Self, WorkflowError> {
        if self.active.iter().any(|name| name == workflow) {
            return Err(WorkflowError::CompositionCycle(workflow.to_string()));
        }
        let mut next = self.clone();
        next.active.push(workflow.to_string());
        Ok(next)
    }
}

/// Render the original input plus attributed step outputs as one text block.
///
/// Used both for cumulative chain inputs and for the "full transcript"
/// chain output mode, so the two stay consistent.
fn render_transcript(original: &str, transcript: &[StepRecord]) -> String {
    let mut text = original.to_string();
    for record in transcript {
        text.push_str(&format!("\n\n### {}\n{}", record.target, record.output));
    }
    text
}

/// Concatenate fan-out outputs in declared order with attribution headers.
fn render_branches(records: &[StepRecord]) -> String {
    records
        .iter()
        .map(|r| format!("### {}\n{}", r.target, r.output))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Executes declared workflow compositions against registered agents.
pub struct CompositionExecutor {
    agents: Arc<AgentRegistry>,
    workflows: Arc<WorkflowRegistry>,
    runtime: Arc<dyn AgentRuntime>,
}

impl CompositionExecutor {
    pub fn new(
        agents: Arc<AgentRegistry>,
        workflows: Arc<WorkflowRegistry>,
        runtime: Arc<dyn AgentRuntime>,
    ) -> Self {
        Self {
            agents,
            workflows,
            runtime,
        }
    }

    /// Run the named workflow to completion against the given input.
    pub async fn execute(
        &self,
        workflow_name: &str,
        input: &str,
    ) -> Result<ExecutionResult, WorkflowError> {
        let workflow = self.workflows.resolve(workflow_name)?;
        let execution_id = uuid::Uuid::new_v4();
        tracing::info!(workflow = %workflow_name, %execution_id, "executing workflow");
        let ctx = ExecutionContext::new(input);
        self.run_workflow(workflow, input.to_string(), ctx).await
    }

    /// Invoke one step target: nested workflows recurse through the
    /// executor, bare agents go out through the runtime.
    fn invoke_target<'a>(
        &'a self,
        name: &'a str,
        input: String,
        ctx: &'a ExecutionContext,
    ) -> BoxFuture<'a, Result<String, WorkflowError>> {
        async move {
            match resolve_target(&self.workflows, &self.agents, name)? {
                Target::Workflow(workflow) => {
                    let result = self.run_workflow(workflow, input, ctx.clone()).await?;
                    Ok(result.output)
                }
                Target::Agent(agent) => self.runtime.invoke(agent, &input).await,
            }
        }
        .boxed()
    }

    fn run_workflow<'a>(
        &'a self,
        workflow: &'a WorkflowDescriptor,
        input: String,
        ctx: ExecutionContext,
    ) -> BoxFuture<'a, Result<ExecutionResult, WorkflowError>> {
        async move {
            let ctx = ctx.enter(workflow.name())?;
            match workflow {
                WorkflowDescriptor::Chain {
                    name,
                    steps,
                    cumulative,
                    continue_with_final,
                } => {
                    self.run_chain(name, steps, *cumulative, *continue_with_final, input, &ctx)
                        .await
                }
                WorkflowDescriptor::Parallel {
                    name,
                    fan_out,
                    fan_in,
                    include_request,
                } => {
                    self.run_parallel(name, fan_out, fan_in.as_deref(), *include_request, input, &ctx)
                        .await
                }
                WorkflowDescriptor::Router {
                    name,
                    candidates,
                    routing_model,
                } => {
                    self.run_router(name, candidates, routing_model.as_deref(), input, &ctx)
                        .await
                }
                WorkflowDescriptor::EvaluatorOptimizer {
                    name,
                    generator,
                    evaluator,
                    min_rating,
                    max_refinements,
                } => {
                    self.run_evaluator_optimizer(
                        name,
                        generator,
                        evaluator,
                        *min_rating,
                        *max_refinements,
                        input,
                        &ctx,
                    )
                    .await
                }
            }
        }
        .boxed()
    }

    async fn run_chain(
        &self,
        name: &str,
        steps: &[String],
        cumulative: bool,
        continue_with_final: bool,
        input: String,
        ctx: &ExecutionContext,
    ) -> Result<ExecutionResult, WorkflowError> {
        let mut transcript: Vec<StepRecord> = Vec::new();

        for (index, step) in steps.iter().enumerate() {
            let step_input = if cumulative {
                render_transcript(&input, &transcript)
            } else {
                transcript
                    .last()
                    .map(|record| record.output.clone())
                    .unwrap_or_else(|| input.clone())
            };

            tracing::debug!(chain = %name, step = %step, index, "running chain step");
            let output = match self.invoke_target(step, step_input, ctx).await {
                Ok(output) => output,
                Err(WorkflowError::Runtime(message)) => {
                    // First failure aborts the chain, tagged with the step.
                    return Err(WorkflowError::Runtime(format!(
                        "chain '{}' step {} ('{}'): {}",
                        name, index, step, message
                    )));
                }
                Err(other) => return Err(other),
            };

            transcript.push(StepRecord {
                target: step.clone(),
                output,
            });
        }

        let output = if continue_with_final {
            transcript
                .last()
                .map(|record| record.output.clone())
                .unwrap_or_default()
        } else {
            render_transcript(&input, &transcript)
        };

        Ok(ExecutionResult { output, transcript })
    }

    async fn run_parallel(
        &self,
        name: &str,
        fan_out: &[String],
        fan_in: Option<&str>,
        include_request: bool,
        input: String,
        ctx: &ExecutionContext,
    ) -> Result<ExecutionResult, WorkflowError> {
        let branch_input = if include_request && ctx.request.as_str() != input {
            format!("{}\n\n{}", ctx.request, input)
        } else {
            input.clone()
        };

        tracing::debug!(parallel = %name, branches = fan_out.len(), "fanning out");

        // try_join_all keeps declared order in its output and fails fast,
        // so branch completion order never leaks into the result.
        let branches = fan_out
            .iter()
            .map(|target| self.invoke_target(target, branch_input.clone(), ctx));
        let outputs = future::try_join_all(branches).await?;

        let mut transcript: Vec<StepRecord> = fan_out
            .iter()
            .zip(outputs)
            .map(|(target, output)| StepRecord {
                target: target.clone(),
                output,
            })
            .collect();

        let combined = render_branches(&transcript);

        let output = match fan_in {
            Some(aggregator) => {
                let aggregate_input = if include_request {
                    format!("{}\n\n{}", ctx.request, combined)
                } else {
                    combined
                };
                let output = self.invoke_target(aggregator, aggregate_input, ctx).await?;
                transcript.push(StepRecord {
                    target: aggregator.to_string(),
                    output: output.clone(),
                });
                output
            }
            None => combined,
        };

        Ok(ExecutionResult { output, transcript })
    }

    async fn run_router(
        &self,
        name: &str,
        candidates: &[String],
        routing_model: Option<&str>,
        input: String,
        ctx: &ExecutionContext,
    ) -> Result<ExecutionResult, WorkflowError> {
        let decision = self.routing_decision(name, candidates, routing_model, &input).await?;

        // Exact match first; otherwise the earliest candidate name that
        // appears in the decision text (models tend to add prose).
        let trimmed = decision.trim();
        let chosen = candidates
            .iter()
            .find(|candidate| candidate.as_str() == trimmed)
            .or_else(|| {
                candidates
                    .iter()
                    .filter_map(|candidate| decision.find(candidate.as_str()).map(|idx| (idx, candidate)))
                    .min_by_key(|(idx, _)| *idx)
                    .map(|(_, candidate)| candidate)
            })
            .ok_or_else(|| WorkflowError::InvalidRoute {
                router: name.to_string(),
                choice: trimmed.to_string(),
            })?;

        tracing::info!(router = %name, choice = %chosen, "routing decision");

        // The selected candidate runs with the original input unmodified.
        let output = self.invoke_target(chosen, input, ctx).await?;
        let transcript = vec![StepRecord {
            target: chosen.clone(),
            output: output.clone(),
        }];
        Ok(ExecutionResult { output, transcript })
    }

    /// Ask the model to pick one candidate. The decision travels through
    /// the same runtime boundary as any other agent invocation.
    async fn routing_decision(
        &self,
        router: &str,
        candidates: &[String],
        routing_model: Option<&str>,
        input: &str,
    ) -> Result<String, WorkflowError> {
        let listing = candidates
            .iter()
            .map(|candidate| format!("- {}", candidate))
            .collect::<Vec<_>>()
            .join("\n");
        let routing_agent = AgentDescriptor {
            name: format!("{}_routing", router),
            instruction: format!(
                "You are a routing classifier. Given the request, select exactly one \
                 of the following targets and respond with that target's name only.\n\n\
                 Targets:\n{}",
                listing
            ),
            capabilities: Vec::new(),
            model: routing_model.unwrap_or(DEFAULT_MODEL).to_string(),
            human_input: false,
        };
        self.runtime.invoke(&routing_agent, input).await
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_evaluator_optimizer(
        &self,
        name: &str,
        generator: &str,
        evaluator: &str,
        min_rating: RatingLevel,
        max_refinements: u32,
        input: String,
        ctx: &ExecutionContext,
    ) -> Result<ExecutionResult, WorkflowError> {
        let mut transcript: Vec<StepRecord> = Vec::new();
        // Best candidate so far; strict comparison keeps the earliest on ties.
        let mut best: Option<(RatingLevel, String)> = None;
        let mut generator_input = input.clone();

        for attempt in 1..=(max_refinements + 1) {
            let candidate = self
                .invoke_target(generator, generator_input.clone(), ctx)
                .await?;
            transcript.push(StepRecord {
                target: generator.to_string(),
                output: candidate.clone(),
            });

            let evaluation = self.invoke_target(evaluator, candidate.clone(), ctx).await?;
            let rating = RatingLevel::parse_from_text(&evaluation);
            transcript.push(StepRecord {
                target: evaluator.to_string(),
                output: evaluation.clone(),
            });

            tracing::debug!(
                workflow = %name,
                attempt,
                rating = %rating,
                "evaluator verdict"
            );

            if rating >= min_rating {
                return Ok(ExecutionResult {
                    output: candidate,
                    transcript,
                });
            }

            if best.as_ref().map_or(true, |(held, _)| rating > *held) {
                best = Some((rating, candidate));
            }

            generator_input = format!(
                "{}\n\nFeedback on the previous attempt:\n{}",
                input, evaluation
            );
        }

        // Refinement exhaustion is a quality ceiling, not an error.
        tracing::warn!(
            workflow = %name,
            attempts = max_refinements + 1,
            "refinement budget exhausted below minimum rating"
        );
        let output = best.map(|(_, candidate)| candidate).unwrap_or_default();
        Ok(ExecutionResult { output, transcript })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet, VecDeque};
    use std::sync::Mutex;

    use super::*;

    /// Scripted stand-in for the external agent runtime.
    #[derive(Default)]
    struct MockRuntime {
        /// Per-agent queues of canned responses; exhausted queues (and
        /// unscripted agents) fall back to echoing `name(input)`.
        scripts: Mutex<HashMap<String, VecDeque<String>>>,
        /// Artificial per-agent latency, for completion-order tests.
        delays_ms: HashMap<String, u64>,
        /// Agents that fail on invocation.
        failing: HashSet<String>,
        /// Every invocation, in call order.
        calls: Mutex<Vec<(String, String)>>,
    }

    impl MockRuntime {
        fn script(self, agent: &str, responses: &[&str]) -> Self {
            self.scripts.lock().unwrap().insert(
                agent.to_string(),
                responses.iter().map(|r| r.to_string()).collect(),
            );
            self
        }

        fn delay(mut self, agent: &str, ms: u64) -> Self {
            self.delays_ms.insert(agent.to_string(), ms);
            self
        }

        fn fail_on(mut self, agent: &str) -> Self {
            self.failing.insert(agent.to_string());
            self
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }

        fn calls_to(&self, agent: &str) -> usize {
            self.calls().iter().filter(|(name, _)| name == agent).count()
        }
    }

    #[async_trait::async_trait]
    impl AgentRuntime for MockRuntime {
        async fn invoke(
            &self,
            agent: &AgentDescriptor,
            input: &str,
        ) -> Result<String, WorkflowError> {
            self.calls
                .lock()
                .unwrap()
                .push((agent.name.clone(), input.to_string()));
            if let Some(ms) = self.delays_ms.get(&agent.name) {
                tokio::time::sleep(std::time::Duration::from_millis(*ms)).await;
            }
            if self.failing.contains(&agent.name) {
                return Err(WorkflowError::Runtime(format!("{} exploded", agent.name)));
            }
            if let Some(queue) = self.scripts.lock().unwrap().get_mut(&agent.name) {
                if let Some(response) = queue.pop_front() {
                    return Ok(response);
                }
            }
            Ok(format!("{}({})", agent.name, input))
        }
    }

    fn agent(name: &str) -> AgentDescriptor {
        AgentDescriptor::new(name, "test instruction", &[])
    }

    fn chain(name: &str, steps: &[&str], cumulative: bool, final_only: bool) -> WorkflowDescriptor {
        WorkflowDescriptor::Chain {
            name: name.to_string(),
            steps: steps.iter().map(|s| s.to_string()).collect(),
            cumulative,
            continue_with_final: final_only,
        }
    }

    fn executor(
        agents: &[&str],
        workflows: Vec<WorkflowDescriptor>,
        runtime: Arc<MockRuntime>,
    ) -> CompositionExecutor {
        let mut agent_registry = AgentRegistry::new();
        for name in agents {
            agent_registry.register(agent(name)).unwrap();
        }
        let mut workflow_registry = WorkflowRegistry::new();
        for wf in workflows {
            workflow_registry.register(wf).unwrap();
        }
        CompositionExecutor::new(
            Arc::new(agent_registry),
            Arc::new(workflow_registry),
            runtime,
        )
    }

    #[tokio::test]
    async fn test_cumulative_chain_accumulates_prior_outputs() {
        let runtime = Arc::new(
            MockRuntime::default()
                .script("drafter", &["DRAFT"])
                .script("reviewer", &["REVIEW"]),
        );
        let exec = executor(
            &["drafter", "reviewer", "publisher"],
            vec![chain("pipeline", &["drafter", "reviewer", "publisher"], true, false)],
            runtime.clone(),
        );

        exec.execute("pipeline", "the request").await.unwrap();

        let calls = runtime.calls();
        assert_eq!(calls[0].1, "the request");
        assert_eq!(calls[1].1, "the request\n\n### drafter\nDRAFT");
        assert_eq!(
            calls[2].1,
            "the request\n\n### drafter\nDRAFT\n\n### reviewer\nREVIEW"
        );
    }

    #[tokio::test]
    async fn test_non_cumulative_chain_passes_previous_output_only() {
        let runtime = Arc::new(MockRuntime::default().script("drafter", &["DRAFT"]));
        let exec = executor(
            &["drafter", "reviewer"],
            vec![chain("pipeline", &["drafter", "reviewer"], false, false)],
            runtime.clone(),
        );

        exec.execute("pipeline", "the request").await.unwrap();

        let calls = runtime.calls();
        assert_eq!(calls[0].1, "the request");
        assert_eq!(calls[1].1, "DRAFT");
    }

    #[tokio::test]
    async fn test_continue_with_final_returns_last_raw_result() {
        let runtime = Arc::new(MockRuntime::default().script("closer", &["FINAL ANSWER"]));
        let exec = executor(
            &["opener", "middle", "closer"],
            vec![chain("pipeline", &["opener", "middle", "closer"], true, true)],
            runtime,
        );

        let result = exec.execute("pipeline", "req").await.unwrap();
        assert_eq!(result.output, "FINAL ANSWER");
        assert_eq!(result.transcript.len(), 3);
    }

    #[tokio::test]
    async fn test_chain_without_final_renders_full_transcript() {
        let runtime = Arc::new(
            MockRuntime::default()
                .script("a", &["one"])
                .script("b", &["two"]),
        );
        let exec = executor(&["a", "b"], vec![chain("pipeline", &["a", "b"], true, false)], runtime);

        let result = exec.execute("pipeline", "req").await.unwrap();
        assert_eq!(result.output, "req\n\n### a\none\n\n### b\ntwo");
    }

    #[tokio::test]
    async fn test_chain_aborts_on_step_failure() {
        let runtime = Arc::new(MockRuntime::default().fail_on("middle"));
        let exec = executor(
            &["opener", "middle", "closer"],
            vec![chain("pipeline", &["opener", "middle", "closer"], false, false)],
            runtime.clone(),
        );

        let err = exec.execute("pipeline", "req").await.unwrap_err();
        match err {
            WorkflowError::Runtime(message) => {
                assert!(message.contains("step 1"));
                assert!(message.contains("middle"));
            }
            other => panic!("expected runtime error, got {:?}", other),
        }
        // The chain stopped: no call ever reached the third step.
        assert_eq!(runtime.calls_to("closer"), 0);
    }

    #[tokio::test]
    async fn test_parallel_output_order_matches_declared_order() {
        // Branches complete in reverse declared order; the combined output
        // must still follow declared order.
        let runtime = Arc::new(
            MockRuntime::default()
                .script("alpha", &["first"])
                .script("beta", &["second"])
                .script("gamma", &["third"])
                .delay("alpha", 60)
                .delay("beta", 30),
        );
        let exec = executor(
            &["alpha", "beta", "gamma"],
            vec![WorkflowDescriptor::Parallel {
                name: "fanout".into(),
                fan_out: vec!["alpha".into(), "beta".into(), "gamma".into()],
                fan_in: None,
                include_request: false,
            }],
            runtime,
        );

        let result = exec.execute("fanout", "req").await.unwrap();
        assert_eq!(
            result.output,
            "### alpha\nfirst\n\n### beta\nsecond\n\n### gamma\nthird"
        );
    }

    #[tokio::test]
    async fn test_parallel_fan_in_receives_ordered_outputs() {
        let runtime = Arc::new(
            MockRuntime::default()
                .script("alpha", &["A"])
                .script("beta", &["B"])
                .script("agg", &["MERGED"]),
        );
        let exec = executor(
            &["alpha", "beta", "agg"],
            vec![WorkflowDescriptor::Parallel {
                name: "fanout".into(),
                fan_out: vec!["alpha".into(), "beta".into()],
                fan_in: Some("agg".into()),
                include_request: false,
            }],
            runtime.clone(),
        );

        let result = exec.execute("fanout", "req").await.unwrap();
        assert_eq!(result.output, "MERGED");

        let calls = runtime.calls();
        let agg_input = &calls.iter().find(|(name, _)| name == "agg").unwrap().1;
        let alpha_pos = agg_input.find("### alpha").unwrap();
        let beta_pos = agg_input.find("### beta").unwrap();
        assert!(alpha_pos < beta_pos);
    }

    #[tokio::test]
    async fn test_parallel_fails_fast_on_branch_failure() {
        let runtime = Arc::new(MockRuntime::default().fail_on("bad"));
        let exec = executor(
            &["good", "bad"],
            vec![WorkflowDescriptor::Parallel {
                name: "fanout".into(),
                fan_out: vec!["good".into(), "bad".into()],
                fan_in: None,
                include_request: false,
            }],
            runtime,
        );

        let err = exec.execute("fanout", "req").await.unwrap_err();
        assert!(matches!(err, WorkflowError::Runtime(_)));
    }

    #[tokio::test]
    async fn test_include_request_prefixes_original_request() {
        // Parallel nested in a chain: the branch sees the original request
        // even though the chain handed it the previous step's output.
        let runtime = Arc::new(MockRuntime::default().script("prep", &["PREPPED"]));
        let exec = executor(
            &["prep", "writer"],
            vec![
                chain("pipeline", &["prep", "fanout"], false, false),
                WorkflowDescriptor::Parallel {
                    name: "fanout".into(),
                    fan_out: vec!["writer".into()],
                    fan_in: None,
                    include_request: true,
                },
            ],
            runtime.clone(),
        );

        exec.execute("pipeline", "the request").await.unwrap();

        let calls = runtime.calls();
        let writer_input = &calls.iter().find(|(name, _)| name == "writer").unwrap().1;
        assert_eq!(writer_input, "the request\n\nPREPPED");
    }

    #[tokio::test]
    async fn test_router_executes_selected_candidate_with_original_input() {
        let runtime = Arc::new(
            MockRuntime::default().script("docs_router_routing", &["premium_flow"]),
        );
        let exec = executor(
            &["basic_flow", "premium_flow"],
            vec![WorkflowDescriptor::Router {
                name: "docs_router".into(),
                candidates: vec!["basic_flow".into(), "premium_flow".into()],
                routing_model: None,
            }],
            runtime.clone(),
        );

        let result = exec.execute("docs_router", "make a plan").await.unwrap();
        assert_eq!(result.output, "premium_flow(make a plan)");
        assert_eq!(runtime.calls_to("basic_flow"), 0);
    }

    #[tokio::test]
    async fn test_router_accepts_decision_embedded_in_prose() {
        let runtime = Arc::new(MockRuntime::default().script(
            "docs_router_routing",
            &["The best target for this request is basic_flow."],
        ));
        let exec = executor(
            &["basic_flow", "premium_flow"],
            vec![WorkflowDescriptor::Router {
                name: "docs_router".into(),
                candidates: vec!["basic_flow".into(), "premium_flow".into()],
                routing_model: None,
            }],
            runtime,
        );

        let result = exec.execute("docs_router", "req").await.unwrap();
        assert_eq!(result.output, "basic_flow(req)");
    }

    #[tokio::test]
    async fn test_router_rejects_undeclared_candidate_without_invoking() {
        let runtime = Arc::new(
            MockRuntime::default().script("docs_router_routing", &["nonexistent_target"]),
        );
        let exec = executor(
            &["basic_flow", "premium_flow"],
            vec![WorkflowDescriptor::Router {
                name: "docs_router".into(),
                candidates: vec!["basic_flow".into(), "premium_flow".into()],
                routing_model: None,
            }],
            runtime.clone(),
        );

        let err = exec.execute("docs_router", "req").await.unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidRoute { .. }));
        assert_eq!(runtime.calls_to("basic_flow"), 0);
        assert_eq!(runtime.calls_to("premium_flow"), 0);
    }

    #[tokio::test]
    async fn test_evaluator_optimizer_stops_at_threshold() {
        // Ratings improve monotonically; with max_refinements=3 the loop
        // stops exactly at the 4th attempt.
        let runtime = Arc::new(
            MockRuntime::default()
                .script("writer", &["draft1", "draft2", "draft3", "draft4"])
                .script(
                    "critic",
                    &[
                        "POOR: start over",
                        "FAIR: getting there",
                        "GOOD: almost",
                        "EXCELLENT: ship it",
                    ],
                ),
        );
        let exec = executor(
            &["writer", "critic"],
            vec![WorkflowDescriptor::EvaluatorOptimizer {
                name: "refine".into(),
                generator: "writer".into(),
                evaluator: "critic".into(),
                min_rating: RatingLevel::Excellent,
                max_refinements: 3,
            }],
            runtime.clone(),
        );

        let result = exec.execute("refine", "req").await.unwrap();
        assert_eq!(result.output, "draft4");
        assert_eq!(runtime.calls_to("writer"), 4);
        assert_eq!(runtime.calls_to("critic"), 4);
        // Every (candidate, rating) pair is on the transcript.
        assert_eq!(result.transcript.len(), 8);
    }

    #[tokio::test]
    async fn test_evaluator_optimizer_exhaustion_returns_earliest_best() {
        // Ratings never exceed FAIR; after 3 attempts the first FAIR wins.
        let runtime = Arc::new(
            MockRuntime::default()
                .script("writer", &["draft1", "draft2", "draft3"])
                .script("critic", &["FAIR: meh", "POOR: worse", "FAIR: meh again"]),
        );
        let exec = executor(
            &["writer", "critic"],
            vec![WorkflowDescriptor::EvaluatorOptimizer {
                name: "refine".into(),
                generator: "writer".into(),
                evaluator: "critic".into(),
                min_rating: RatingLevel::Excellent,
                max_refinements: 2,
            }],
            runtime.clone(),
        );

        let result = exec.execute("refine", "req").await.unwrap();
        assert_eq!(result.output, "draft1");
        assert_eq!(runtime.calls_to("writer"), 3);
    }

    #[tokio::test]
    async fn test_refinement_feedback_appended_to_original_input() {
        let runtime = Arc::new(
            MockRuntime::default()
                .script("writer", &["draft1", "draft2"])
                .script("critic", &["POOR: add numbers", "EXCELLENT: done"]),
        );
        let exec = executor(
            &["writer", "critic"],
            vec![WorkflowDescriptor::EvaluatorOptimizer {
                name: "refine".into(),
                generator: "writer".into(),
                evaluator: "critic".into(),
                min_rating: RatingLevel::Excellent,
                max_refinements: 1,
            }],
            runtime.clone(),
        );

        exec.execute("refine", "the request").await.unwrap();

        let calls = runtime.calls();
        let second_gen_input = &calls
            .iter()
            .filter(|(name, _)| name == "writer")
            .nth(1)
            .unwrap()
            .1;
        assert!(second_gen_input.starts_with("the request"));
        assert!(second_gen_input.contains("POOR: add numbers"));
    }

    #[tokio::test]
    async fn test_direct_cycle_detected() {
        let runtime = Arc::new(MockRuntime::default());
        let exec = executor(&[], vec![chain("loop", &["loop"], false, false)], runtime);

        let err = exec.execute("loop", "req").await.unwrap_err();
        assert!(matches!(err, WorkflowError::CompositionCycle(name) if name == "loop"));
    }

    #[tokio::test]
    async fn test_transitive_cycle_detected() {
        let runtime = Arc::new(MockRuntime::default());
        let exec = executor(
            &[],
            vec![
                chain("ping", &["pong"], false, false),
                chain("pong", &["ping"], false, false),
            ],
            runtime,
        );

        let err = exec.execute("ping", "req").await.unwrap_err();
        assert!(matches!(err, WorkflowError::CompositionCycle(name) if name == "ping"));
    }

    #[tokio::test]
    async fn test_nested_workflow_step_resolves() {
        let runtime = Arc::new(MockRuntime::default().script("inner_agent", &["INNER"]));
        let exec = executor(
            &["inner_agent", "outer_agent"],
            vec![
                chain("outer", &["inner", "outer_agent"], false, true),
                chain("inner", &["inner_agent"], false, true),
            ],
            runtime,
        );

        let result = exec.execute("outer", "req").await.unwrap();
        assert_eq!(result.output, "outer_agent(INNER)");
    }

    #[tokio::test]
    async fn test_unknown_step_target_fails() {
        let runtime = Arc::new(MockRuntime::default());
        let exec = executor(&[], vec![chain("pipeline", &["ghost"], false, false)], runtime);

        let err = exec.execute("pipeline", "req").await.unwrap_err();
        assert!(matches!(err, WorkflowError::UnknownTarget(name) if name == "ghost"));
    }

    #[tokio::test]
    async fn test_unknown_workflow_name_fails() {
        let runtime = Arc::new(MockRuntime::default());
        let exec = executor(&[], vec![], runtime);
        let err = exec.execute("nothing_here", "req").await.unwrap_err();
        assert!(matches!(err, WorkflowError::UnknownTarget(_)));
    }
}
