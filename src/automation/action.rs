//! Automation host actions.
//!
//! Each action validates its input, drives the [`ConnectionManager`] and
//! reports an [`ActionOutcome`]. Actions never return `Err`; every failure
//! becomes a numbered outcome the host can branch on.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::manager::ConnectionManager;
use crate::pattern::{Grid, decode_strict};

use super::outcome::ActionOutcome;

// ============================================================================
// Constants
// ============================================================================

/// Characters of the pattern shown in an action summary.
const SUMMARY_PREVIEW_LEN: usize = 30;

// ============================================================================
// HostAction
// ============================================================================

/// An action the automation host can run against the display.
#[async_trait]
pub trait HostAction: Send + Sync {
    /// Action name for logs.
    fn name(&self) -> &'static str;

    /// One-line description shown in the host's action list.
    fn summary(&self) -> String;

    /// Runs the action.
    async fn run(&self, manager: &ConnectionManager) -> ActionOutcome;
}

/// Logs an outcome in a uniform way.
fn report(action: &'static str, outcome: ActionOutcome) -> ActionOutcome {
    match outcome.code {
        None => info!(action, "Host action succeeded"),
        Some(code) => warn!(
            action,
            %code,
            message = outcome.message.as_deref().unwrap_or_default(),
            "Host action failed"
        ),
    }
    outcome
}

// ============================================================================
// UpdatePatternAction
// ============================================================================

/// Shows a pattern given as text.
///
/// Input is deserialized from the host's `{"pattern": "..."}` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdatePatternAction {
    /// 625 hex digits, whitespace allowed.
    pub pattern: Option<String>,
}

impl UpdatePatternAction {
    /// Creates an action for `pattern`.
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
        }
    }

    /// Checks and decodes the input without touching the display.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyInput`] if the pattern is missing or blank
    /// - [`Error::InvalidPattern`] if it fails strict validation
    pub fn prepare(&self) -> Result<Grid> {
        let pattern = self.pattern.as_deref().ok_or(Error::EmptyInput)?;
        decode_strict(pattern)
    }
}

#[async_trait]
impl HostAction for UpdatePatternAction {
    fn name(&self) -> &'static str {
        "update_pattern"
    }

    fn summary(&self) -> String {
        match self.pattern.as_deref() {
            Some(p) if !p.is_empty() => {
                if p.chars().count() > SUMMARY_PREVIEW_LEN {
                    let preview: String = p.chars().take(SUMMARY_PREVIEW_LEN).collect();
                    format!("Pattern: {preview}...")
                } else {
                    format!("Pattern: {p}")
                }
            }
            _ => "No pattern set".to_string(),
        }
    }

    async fn run(&self, manager: &ConnectionManager) -> ActionOutcome {
        let result = match self.prepare() {
            Ok(grid) => manager.send(&grid).await,
            Err(e) => Err(e),
        };
        report(self.name(), result.into())
    }
}

// ============================================================================
// ClearPatternAction
// ============================================================================

/// Turns the display off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearPatternAction;

#[async_trait]
impl HostAction for ClearPatternAction {
    fn name(&self) -> &'static str {
        "clear_pattern"
    }

    fn summary(&self) -> String {
        "Turn off the LED matrix display".to_string()
    }

    async fn run(&self, manager: &ConnectionManager) -> ActionOutcome {
        report(self.name(), manager.clear().await.into())
    }
}

// ============================================================================
// ExportPatternAction
// ============================================================================

/// Encodes a grid for a host variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportPatternAction {
    /// Break the encoding into 25 lines.
    pub with_line_breaks: bool,
}

impl ExportPatternAction {
    /// Encodes `grid`; the outcome's `output` holds the text.
    #[must_use]
    pub fn run(&self, grid: &Grid) -> ActionOutcome {
        report("export_pattern", ActionOutcome::with_output(grid.encode(self.with_line_breaks)))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use crate::automation::FailureCode;
    use crate::pattern::{TOTAL_PIXELS, encode_compact};
    use crate::transport::{ConnectBehavior, LoopbackService};

    fn manager(service: &LoopbackService) -> ConnectionManager {
        ConnectionManager::builder()
            .service(service.clone())
            .connect_timeout(Duration::from_millis(100))
            .build()
            .expect("build manager")
    }

    #[tokio::test]
    async fn test_update_shows_pattern() {
        let service = LoopbackService::new();
        let text = "F".repeat(TOTAL_PIXELS);

        let outcome = UpdatePatternAction::new(text).run(&manager(&service)).await;

        assert!(outcome.success);
        assert_eq!(service.last_frame(), Some(Grid::filled(255)));
    }

    #[tokio::test]
    async fn test_update_empty_input() {
        let service = LoopbackService::new();
        let manager = manager(&service);

        for action in [UpdatePatternAction::default(), UpdatePatternAction::new("  \n ")] {
            let outcome = action.run(&manager).await;
            assert_eq!(outcome.code, Some(FailureCode::EmptyInput));
        }
        assert_eq!(service.init_calls(), 0);
    }

    #[tokio::test]
    async fn test_update_invalid_pattern_skips_connect() {
        let service = LoopbackService::new();
        let outcome = UpdatePatternAction::new("0".repeat(624))
            .run(&manager(&service))
            .await;

        assert_eq!(outcome.code, Some(FailureCode::InvalidPattern));
        assert_eq!(
            outcome.message.as_deref(),
            Some("Not enough hex digits: found 624, need 625 (25x25 grid).")
        );
        assert_eq!(service.init_calls(), 0);
    }

    #[tokio::test]
    async fn test_update_connection_failure() {
        let service = LoopbackService::new().with_behavior(ConnectBehavior::Silent);
        let outcome = UpdatePatternAction::new("0".repeat(TOTAL_PIXELS))
            .run(&manager(&service))
            .await;

        assert_eq!(outcome.code, Some(FailureCode::ConnectionFailed));
    }

    #[tokio::test]
    async fn test_clear_reports_connection_failure() {
        let service = LoopbackService::new().with_behavior(ConnectBehavior::Refuse);
        let outcome = ClearPatternAction.run(&manager(&service)).await;
        assert_eq!(outcome.code, Some(FailureCode::ConnectionFailed));
    }

    #[tokio::test]
    async fn test_clear_turns_display_off() {
        let service = LoopbackService::new();
        let outcome = ClearPatternAction.run(&manager(&service)).await;
        assert!(outcome.success);
        assert_eq!(service.close_display_calls(), 1);
    }

    #[test]
    fn test_update_input_from_host_json() {
        let action: UpdatePatternAction =
            serde_json::from_str(r#"{"pattern":"0F"}"#).expect("parse");
        assert_eq!(action.pattern.as_deref(), Some("0F"));

        let empty: UpdatePatternAction = serde_json::from_str("{}").expect("parse");
        assert!(empty.pattern.is_none());
    }

    #[test]
    fn test_summary() {
        assert_eq!(UpdatePatternAction::default().summary(), "No pattern set");
        assert_eq!(UpdatePatternAction::new("0F0").summary(), "Pattern: 0F0");

        let long = UpdatePatternAction::new("A".repeat(40)).summary();
        assert_eq!(long, format!("Pattern: {}...", "A".repeat(30)));
    }

    #[test]
    fn test_export_outputs_encoding() {
        let grid = Grid::filled(255).with_pixel(0, 0);
        let outcome = ExportPatternAction::default().run(&grid);

        assert!(outcome.success);
        assert_eq!(outcome.output, Some(encode_compact(&grid)));

        let lined = ExportPatternAction { with_line_breaks: true }.run(&grid);
        assert_eq!(lined.output.map(|o| o.lines().count()), Some(25));
    }
}
