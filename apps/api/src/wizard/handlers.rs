use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::wizard::{transition, WizardStep};

#[derive(Debug, Deserialize)]
pub struct WizardQuery {
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub from: WizardStep,
    pub to: WizardStep,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct WizardStepView {
    pub step: WizardStep,
    pub number: u8,
    pub title: &'static str,
    pub path: &'static str,
    /// Path of the following step.
    pub next: Option<&'static str>,
    pub previous: Option<&'static str>,
}

impl From<WizardStep> for WizardStepView {
    fn from(step: WizardStep) -> Self {
        Self {
            step,
            number: step.number(),
            title: step.title(),
            path: step.path(),
            next: step.next().map(WizardStep::path),
            previous: step.previous().map(WizardStep::path),
        }
    }
}

/// GET /api/v1/wizard?path=
pub async fn handle_wizard_step(
    Query(query): Query<WizardQuery>,
) -> Result<Json<WizardStepView>, AppError> {
    WizardStep::from_path(&query.path)
        .map(|step| Json(step.into()))
        .ok_or_else(|| AppError::NotFound(format!("No wizard step for path '{}'", query.path)))
}

/// POST /api/v1/wizard/transition
pub async fn handle_wizard_transition(
    Json(req): Json<TransitionRequest>,
) -> Result<Json<WizardStepView>, AppError> {
    let step = transition(req.from, req.to).map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(Json(step.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_step_view_links_neighbours() {
        let Json(view) = handle_wizard_step(Query(WizardQuery {
            path: "/match-suppliers/abc".to_string(),
        }))
        .await
        .unwrap();
        assert_eq!(view.number, 3);
        assert_eq!(view.next, Some("/score-results"));
        assert_eq!(view.previous, Some("/review-requirements"));
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let result = handle_wizard_step(Query(WizardQuery {
            path: "/billing".to_string(),
        }))
        .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_skipping_steps_is_rejected() {
        let result = handle_wizard_transition(Json(TransitionRequest {
            from: WizardStep::Upload,
            to: WizardStep::Send,
        }))
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
