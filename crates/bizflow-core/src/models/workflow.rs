//! Workflow descriptor — one of four closed composition patterns.
//!
//! A workflow references agents (or other workflows) purely by name;
//! names are resolved lazily at execution time so declarations may
//! forward-reference each other. YAML form:
//!
//! ```yaml
//! type: chain
//! name: "invoice_workflow"
//! steps: ["invoice_clerk", "pdf_creator"]
//! cumulative: true
//! continue_with_final: true
//! ```

use serde::{Deserialize, Serialize};

/// Ordered quality rating produced by evaluator agents.
///
/// The total order makes "meets or exceeds the minimum rating" well-defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RatingLevel {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl RatingLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RatingLevel::Poor => "POOR",
            RatingLevel::Fair => "FAIR",
            RatingLevel::Good => "GOOD",
            RatingLevel::Excellent => "EXCELLENT",
        }
    }

    /// Extract a rating from free-form evaluator output.
    ///
    /// The earliest level keyword in the text wins; an evaluator that
    /// names no level at all is treated as `Poor`.
    pub fn parse_from_text(text: &str) -> RatingLevel {
        let upper = text.to_uppercase();
        let mut found: Option<(usize, RatingLevel)> = None;
        for level in [
            RatingLevel::Poor,
            RatingLevel::Fair,
            RatingLevel::Good,
            RatingLevel::Excellent,
        ] {
            if let Some(idx) = upper.find(level.as_str()) {
                if found.map_or(true, |(best_idx, _)| idx < best_idx) {
                    found = Some((idx, level));
                }
            }
        }
        found.map(|(_, level)| level).unwrap_or(RatingLevel::Poor)
    }
}

impl std::fmt::Display for RatingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered workflow declaration. Immutable after registration.
///
/// The variant set is closed; the executor dispatches on it directly
/// rather than through a trait object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowDescriptor {
    /// Sequential composition with optional cumulative context.
    Chain {
        name: String,
        /// Agent or workflow names, executed in declared order.
        steps: Vec<String>,
        /// When true, each step sees the original input plus every prior
        /// step's attributed output; otherwise only the previous output.
        #[serde(default)]
        cumulative: bool,
        /// When true, the overall output is the last step's raw result;
        /// otherwise the full transcript rendered as text.
        #[serde(default)]
        continue_with_final: bool,
    },

    /// Concurrent fan-out joined into one result.
    Parallel {
        name: String,
        fan_out: Vec<String>,
        /// Optional aggregator invoked once with all fan-out outputs.
        #[serde(default)]
        fan_in: Option<String>,
        /// Prefix each branch's input with the original request text.
        #[serde(default)]
        include_request: bool,
    },

    /// Single-candidate selection based on a model routing decision.
    Router {
        name: String,
        candidates: Vec<String>,
        /// Model used for the routing decision itself.
        #[serde(default)]
        routing_model: Option<String>,
    },

    /// Generate-then-rate refinement loop bounded by an iteration cap
    /// and a quality threshold.
    EvaluatorOptimizer {
        name: String,
        generator: String,
        evaluator: String,
        min_rating: RatingLevel,
        max_refinements: u32,
    },
}

impl WorkflowDescriptor {
    pub fn name(&self) -> &str {
        match self {
            WorkflowDescriptor::Chain { name, .. }
            | WorkflowDescriptor::Parallel { name, .. }
            | WorkflowDescriptor::Router { name, .. }
            | WorkflowDescriptor::EvaluatorOptimizer { name, .. } => name,
        }
    }

    /// All names this workflow references (used for startup validation).
    pub fn referenced_names(&self) -> Vec<&str> {
        match self {
            WorkflowDescriptor::Chain { steps, .. } => steps.iter().map(String::as_str).collect(),
            WorkflowDescriptor::Parallel { fan_out, fan_in, .. } => {
                let mut refs: Vec<&str> = fan_out.iter().map(String::as_str).collect();
                if let Some(agg) = fan_in {
                    refs.push(agg);
                }
                refs
            }
            WorkflowDescriptor::Router { candidates, .. } => {
                candidates.iter().map(String::as_str).collect()
            }
            WorkflowDescriptor::EvaluatorOptimizer {
                generator, evaluator, ..
            } => vec![generator, evaluator],
        }
    }

    /// Parse a workflow declaration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse workflow YAML: {}", e))
    }
}
