//! AWS Lambda handler for scenario previews
//!
//! Accepts a baseline plan, saved scenario cards and an optional draft batch
//! as JSON and returns the materialized per-year inputs for the composed
//! scenario. When nothing is enabled the baseline rows are returned with
//! `outcome: "baseline"`.

use household_projection::{
    MaterializedInputs, PlanState, ScenarioCard, ScenarioComposer, ScenarioOutcome,
    TargetedOverride, YearInputs,
};
use household_projection::materialize::MaterializedSummary;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input for one preview
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub plan: PlanState,

    /// Saved cards; disabled ones are ignored
    #[serde(default)]
    pub cards: Vec<ScenarioCard>,

    /// Unsaved batch applied after every card
    #[serde(default)]
    pub draft: Option<Vec<TargetedOverride>>,
}

/// Output from the preview
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<MaterializedSummary>,
    pub years: Vec<YearInputs>,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PreviewResponse {
    fn rows(outcome: &'static str, inputs: MaterializedInputs) -> Self {
        Self {
            outcome: Some(outcome),
            summary: Some(inputs.summary()),
            years: inputs.years,
            ..Self::default()
        }
    }

    fn failed(message: String) -> Self {
        Self {
            error: Some(message),
            ..Self::default()
        }
    }
}

fn preview(request: PreviewRequest) -> PreviewResponse {
    let composer = ScenarioComposer::new(request.plan);
    let composed = composer.compose(&request.cards, request.draft.as_deref());
    let resolved = composed.and_then(|outcome| match outcome {
        ScenarioOutcome::Baseline => composer.baseline().map(|rows| ("baseline", rows)),
        ScenarioOutcome::Modified(rows) => Ok(("modified", rows)),
    });
    match resolved {
        Ok((outcome, rows)) => PreviewResponse::rows(outcome, rows),
        Err(e) => {
            log::warn!("preview rejected ({:?}): {}", e.category(), e);
            PreviewResponse::failed(e.to_string())
        }
    }
}

/// Lambda handler function
async fn handler(event: LambdaEvent<Value>) -> Result<PreviewResponse, Error> {
    let start = std::time::Instant::now();

    let mut response = match serde_json::from_value::<PreviewRequest>(event.payload) {
        Ok(request) => preview(request),
        Err(e) => PreviewResponse::failed(format!("Invalid JSON: {}", e)),
    };

    response.execution_time_ms = start.elapsed().as_millis() as u64;
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
