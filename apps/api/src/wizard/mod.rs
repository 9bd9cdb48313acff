//! The five-step procurement workflow as an explicit state machine:
//! upload, review, match, score, send.

pub mod handlers;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Upload,
    Review,
    Match,
    Score,
    Send,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot move from {from:?} to {to:?}")]
pub struct InvalidTransition {
    pub from: WizardStep,
    pub to: WizardStep,
}

const ORDER: [WizardStep; 5] = [
    WizardStep::Upload,
    WizardStep::Review,
    WizardStep::Match,
    WizardStep::Score,
    WizardStep::Send,
];

impl WizardStep {
    /// 1-based position in the workflow.
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    pub fn path(self) -> &'static str {
        match self {
            WizardStep::Upload => "/upload-rfq",
            WizardStep::Review => "/review-requirements",
            WizardStep::Match => "/match-suppliers",
            WizardStep::Score => "/score-results",
            WizardStep::Send => "/send-proposals",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Upload => "Upload RFQ",
            WizardStep::Review => "Review Requirements",
            WizardStep::Match => "Match Suppliers",
            WizardStep::Score => "Score Results",
            WizardStep::Send => "Send Proposals",
        }
    }

    /// Step for a route path. Only the first segment counts, so
    /// `/review/3f2a…` resolves to `Review`.
    pub fn from_path(path: &str) -> Option<Self> {
        let segment = path
            .trim()
            .trim_start_matches('/')
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match segment.as_str() {
            "" | "upload" | "upload-rfq" => Some(WizardStep::Upload),
            "review" | "review-requirements" => Some(WizardStep::Review),
            "match" | "match-suppliers" => Some(WizardStep::Match),
            "score" | "score-results" => Some(WizardStep::Score),
            "send" | "send-proposals" => Some(WizardStep::Send),
            _ => None,
        }
    }

    pub fn next(self) -> Option<Self> {
        ORDER.get(self as usize + 1).copied()
    }

    pub fn previous(self) -> Option<Self> {
        (self as usize).checked_sub(1).and_then(|i| ORDER.get(i).copied())
    }
}

/// One step forward, one step back, or back to the start.
pub fn transition(from: WizardStep, to: WizardStep) -> Result<WizardStep, InvalidTransition> {
    let allowed = to == WizardStep::Upload || from.next() == Some(to) || from.previous() == Some(to);
    if allowed {
        Ok(to)
    } else {
        Err(InvalidTransition { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_follow_order() {
        let numbers: Vec<u8> = ORDER.iter().map(|s| s.number()).collect();
        assert_eq!(numbers, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_from_path_variants() {
        assert_eq!(WizardStep::from_path("/"), Some(WizardStep::Upload));
        assert_eq!(WizardStep::from_path(""), Some(WizardStep::Upload));
        assert_eq!(WizardStep::from_path("/review"), Some(WizardStep::Review));
        assert_eq!(WizardStep::from_path("/review-requirements/42"), Some(WizardStep::Review));
        assert_eq!(WizardStep::from_path("/match-suppliers?rfq=7"), Some(WizardStep::Match));
        assert_eq!(WizardStep::from_path("/Score-Results"), Some(WizardStep::Score));
        assert_eq!(WizardStep::from_path("/send-proposals"), Some(WizardStep::Send));
        assert_eq!(WizardStep::from_path("/settings"), None);
    }

    #[test]
    fn test_path_round_trips() {
        for step in ORDER {
            assert_eq!(WizardStep::from_path(step.path()), Some(step));
        }
    }

    #[test]
    fn test_no_movement_past_the_ends() {
        assert_eq!(WizardStep::Upload.previous(), None);
        assert_eq!(WizardStep::Send.next(), None);
        assert_eq!(WizardStep::Match.next(), Some(WizardStep::Score));
        assert_eq!(WizardStep::Match.previous(), Some(WizardStep::Review));
    }

    #[test]
    fn test_transition_rules() {
        assert_eq!(transition(WizardStep::Review, WizardStep::Match), Ok(WizardStep::Match));
        assert_eq!(transition(WizardStep::Review, WizardStep::Upload), Ok(WizardStep::Upload));
        assert_eq!(transition(WizardStep::Send, WizardStep::Upload), Ok(WizardStep::Upload));
        assert_eq!(transition(WizardStep::Score, WizardStep::Match), Ok(WizardStep::Match));

        let err = transition(WizardStep::Upload, WizardStep::Score).unwrap_err();
        assert_eq!(err.from, WizardStep::Upload);
        assert_eq!(err.to, WizardStep::Score);
        assert!(transition(WizardStep::Send, WizardStep::Review).is_err());
        assert!(transition(WizardStep::Match, WizardStep::Match).is_err());
    }
}
