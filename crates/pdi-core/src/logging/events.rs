//! Structured event vocabulary for logging.
//!
//! Every pipeline event carries the run id and the stage it belongs to so
//! that JSONL output from several invocations can be told apart.

use serde::{Deserialize, Serialize};

/// Processing stages of an estimation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and configuration.
    Init,
    /// Reading the persistence diagram.
    Load,
    /// Method-of-moments point estimation.
    Estimate,
    /// Prior range construction.
    Prior,
    /// Posterior grid scoring.
    Posterior,
    /// MAP selection.
    Select,
    /// Joint surface sampling.
    Surface,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Load => "load",
            Stage::Estimate => "estimate",
            Stage::Prior => "prior",
            Stage::Posterior => "posterior",
            Stage::Select => "select",
            Stage::Surface => "surface",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    // Config
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";

    // Input
    pub const DIAGRAM_LOADED: &str = "diagram.loaded";

    // Estimation
    pub const POINT_ESTIMATE: &str = "estimate.point";
    pub const PRIOR_RANGE_BUILT: &str = "estimate.prior_range";
    pub const POSTERIOR_SCORED: &str = "estimate.posterior_scored";
    pub const MAP_SELECTED: &str = "estimate.map_selected";

    // Surface
    pub const SURFACE_SAMPLED: &str = "surface.sampled";

    // Errors
    pub const RUN_FAILED: &str = "run.failed";
}

/// Correlation context shared by all events of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogContext {
    pub run_id: String,
    /// Diagram file being processed, when there is one.
    pub input: Option<String>,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
            input: None,
        }
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Stage::Posterior).unwrap(), "\"posterior\"");
        assert_eq!(Stage::Select.to_string(), "select");
    }

    #[test]
    fn context_builder() {
        let ctx = LogContext::new("run-abc").with_input("diagram.txt");
        assert_eq!(ctx.run_id, "run-abc");
        assert_eq!(ctx.input.as_deref(), Some("diagram.txt"));
    }

    #[test]
    fn event_names_are_dotted() {
        for name in [
            event_names::RUN_STARTED,
            event_names::POINT_ESTIMATE,
            event_names::MAP_SELECTED,
            event_names::SURFACE_SAMPLED,
        ] {
            assert!(name.contains('.'), "{name}");
        }
    }
}
