//! Phase machine and event stream shared by the screen orchestrators.

use std::future::Future;

use tokio::sync::broadcast;

use crate::error::{ChainStep, DataResult, ScreenError};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    Invitation,
    Artefacts,
    AccountSettings,
    Profile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Error(ScreenError),
}

impl Phase {
    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::Loading)
    }

    pub fn error(&self) -> Option<&ScreenError> {
        match self {
            Phase::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Transition table shared by every screen. Everything not listed is rejected.
    pub fn can_transition_to(&self, next: &Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Idle, Phase::Loading)
                | (Phase::Ready, Phase::Loading)
                | (Phase::Error(_), Phase::Loading)
                | (Phase::Loading, Phase::Ready)
                | (Phase::Loading, Phase::Error(_))
                | (Phase::Loading, Phase::Idle)
                | (Phase::Idle, Phase::Error(_))
                | (Phase::Ready, Phase::Error(_))
                | (Phase::Error(_), Phase::Error(_))
        )
    }
}

/// User-facing alert, dismissed manually.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: Option<String>,
    pub message: String,
}

impl Alert {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            title: None,
            message: message.into(),
        }
    }

    pub fn titled(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    PhaseChanged { screen: ScreenKind, phase: Phase },
    Alert { screen: ScreenKind, alert: Alert },
}

/// Current phase and pending alert of one orchestrator instance.
pub struct ScreenState {
    kind: ScreenKind,
    phase: Phase,
    alert: Option<Alert>,
    events: broadcast::Sender<ScreenEvent>,
}

impl ScreenState {
    pub fn new(kind: ScreenKind) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            kind,
            phase: Phase::Idle,
            alert: None,
            events,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ScreenEvent> {
        self.events.subscribe()
    }

    /// Applies `next` if the transition table allows it. Returns whether it did.
    pub fn transition(&mut self, next: Phase) -> bool {
        if !self.phase.can_transition_to(&next) {
            tracing::warn!(
                screen = ?self.kind,
                from = ?self.phase,
                to = ?next,
                "screen: rejected phase transition"
            );
            return false;
        }
        self.phase = next.clone();
        // No subscribers is fine.
        let _ = self.events.send(ScreenEvent::PhaseChanged {
            screen: self.kind,
            phase: next,
        });
        true
    }

    pub fn fail(&mut self, err: ScreenError) {
        self.transition(Phase::Error(err));
    }

    pub fn raise(&mut self, alert: Alert) {
        let _ = self.events.send(ScreenEvent::Alert {
            screen: self.kind,
            alert: alert.clone(),
        });
        self.alert = Some(alert);
    }

    pub fn dismiss_alert(&mut self) -> Option<Alert> {
        self.alert.take()
    }
}

/// Awaits one remote step of a chain, converting its failure into a
/// `ScreenError` tagged with the step.
pub(crate) async fn run_step<T, F>(step: ChainStep, fut: F) -> Result<T, ScreenError>
where
    F: Future<Output = DataResult<T>>,
{
    tracing::debug!(%step, "chain: step started");
    fut.await.map_err(|err| {
        tracing::warn!(%step, error = %err, "chain: step failed");
        ScreenError::remote(step, &err)
    })
}

#[cfg(test)]
#[path = "tests/screen_tests.rs"]
mod tests;
