//! Single in-flight generation session.

use std::future::Future;
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::oneshot::{self, error::TryRecvError};

use super::notice::Notice;
use crate::adapter::SceneAdapter;
use crate::controller::InteractionController;
use crate::error::GeneratorError;
use crate::generator::GeneratorClient;

pub type GenerationResult = Result<Value, GeneratorError>;

/// Message shown when a generation round trip fails for any reason
pub const SYNC_ERROR_NOTICE: &str = "AI Engine Sync Error";

/// Result of a finished generation, as seen by the caller of `poll`
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// Layout ingested; number of masses now in the scene
    Applied(usize),
    Failed(String),
}

/// Generation state: busy flag, pending response and the current notice
#[derive(Default)]
pub struct GenerationState {
    pending: Option<oneshot::Receiver<GenerationResult>>,
    notice: Option<Notice>,
}

impl GenerationState {
    /// True while a request is in flight; the synthesize action is disabled.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Send `prompt` to the generator. Returns `Ok(false)` for an empty prompt.
    pub fn submit(
        &mut self,
        runtime: &tokio::runtime::Handle,
        client: &GeneratorClient,
        prompt: &str,
    ) -> Result<bool, GeneratorError> {
        let prompt = prompt.trim().to_string();
        if prompt.is_empty() {
            return Ok(false);
        }
        let client = client.clone();
        tracing::info!(endpoint = client.endpoint(), "requesting layout");
        self.submit_with(runtime, async move { client.generate(&prompt).await })?;
        Ok(true)
    }

    /// Run `request` as the in-flight generation.
    pub fn submit_with<F>(
        &mut self,
        runtime: &tokio::runtime::Handle,
        request: F,
    ) -> Result<(), GeneratorError>
    where
        F: Future<Output = GenerationResult> + Send + 'static,
    {
        if self.is_busy() {
            return Err(GeneratorError::Busy);
        }
        let (tx, rx) = oneshot::channel();
        runtime.spawn(async move {
            let _ = tx.send(request.await);
        });
        self.pending = Some(rx);
        Ok(())
    }

    /// Apply a finished response, if any. Never blocks.
    pub fn poll<A: SceneAdapter>(
        &mut self,
        controller: &mut InteractionController<A>,
    ) -> Option<GenerationOutcome> {
        let rx = self.pending.as_mut()?;
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => Err(GeneratorError::Cancelled),
        };
        self.pending = None;

        let outcome = match result {
            Ok(layout) => match controller.ingest_generated_layout(&layout) {
                Ok(count) => GenerationOutcome::Applied(count),
                Err(e) => GenerationOutcome::Failed(e.to_string()),
            },
            Err(e) => GenerationOutcome::Failed(e.to_string()),
        };
        if let GenerationOutcome::Failed(reason) = &outcome {
            tracing::error!("Generation failed: {reason}");
            self.notice = Some(Notice::new(SYNC_ERROR_NOTICE));
        }
        Some(outcome)
    }

    /// Poll until the pending request finishes or `timeout` elapses.
    pub fn poll_blocking<A: SceneAdapter>(
        &mut self,
        controller: &mut InteractionController<A>,
        timeout: Duration,
    ) -> Option<GenerationOutcome> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(outcome) = self.poll(controller) {
                return Some(outcome);
            }
            if !self.is_busy() || Instant::now() >= deadline {
                return None;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Replace the current notice
    pub fn raise_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice::new(message));
    }

    /// Drop the notice once it has been shown for `ttl`
    pub fn expire_notice(&mut self, ttl: Duration) {
        if self
            .notice
            .as_ref()
            .is_some_and(|n| n.is_expired(ttl, Instant::now()))
        {
            self.notice = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::HeadlessScene;
    use serde_json::json;
    use shared::MassParams;

    const WAIT: Duration = Duration::from_secs(5);

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn test_successful_generation_replaces_scene() {
        let rt = runtime();
        let mut controller = InteractionController::new(HeadlessScene::new());
        controller.add_mass(MassParams::default()).unwrap();
        let mut session = GenerationState::default();

        session
            .submit_with(rt.handle(), async {
                Ok(json!({ "masses": [{ "w": 70, "d": 30 }, { "w": 30, "d": 70 }] }))
            })
            .unwrap();
        assert!(session.is_busy());

        let outcome = session.poll_blocking(&mut controller, WAIT);
        assert_eq!(outcome, Some(GenerationOutcome::Applied(2)));
        assert!(!session.is_busy());
        assert_eq!(controller.registry().len(), 2);
        assert!(session.notice().is_none());
    }

    #[test]
    fn test_second_submit_refused_while_busy() {
        let rt = runtime();
        let mut controller = InteractionController::new(HeadlessScene::new());
        let mut session = GenerationState::default();
        let (release, gate) = oneshot::channel::<()>();

        session
            .submit_with(rt.handle(), async move {
                let _ = gate.await;
                Ok(json!([]))
            })
            .unwrap();
        let second = session.submit_with(rt.handle(), async { Ok(json!([])) });
        assert!(matches!(second, Err(GeneratorError::Busy)));
        assert!(session.poll(&mut controller).is_none());

        release.send(()).unwrap();
        assert_eq!(
            session.poll_blocking(&mut controller, WAIT),
            Some(GenerationOutcome::Applied(0))
        );
    }

    #[test]
    fn test_malformed_response_raises_notice_and_keeps_scene() {
        let rt = runtime();
        let mut controller = InteractionController::new(HeadlessScene::new());
        controller.add_mass(MassParams::default()).unwrap();
        let mut session = GenerationState::default();

        session
            .submit_with(rt.handle(), async { Ok(json!("not an array")) })
            .unwrap();
        let outcome = session.poll_blocking(&mut controller, WAIT);
        assert!(matches!(outcome, Some(GenerationOutcome::Failed(_))));
        assert_eq!(
            session.notice().map(|n| n.message.as_str()),
            Some(SYNC_ERROR_NOTICE)
        );
        assert_eq!(controller.registry().len(), 1);
    }

    #[test]
    fn test_transport_error_raises_notice() {
        let rt = runtime();
        let mut controller = InteractionController::new(HeadlessScene::new());
        let mut session = GenerationState::default();

        session
            .submit_with(rt.handle(), async {
                Err(GeneratorError::Status(reqwest::StatusCode::BAD_GATEWAY))
            })
            .unwrap();
        let outcome = session.poll_blocking(&mut controller, WAIT);
        assert!(matches!(outcome, Some(GenerationOutcome::Failed(_))));
        assert!(session.notice().is_some());
        assert!(!session.is_busy());
    }

    #[test]
    fn test_empty_prompt_not_sent() {
        let rt = runtime();
        let client = GeneratorClient::new(&Default::default()).unwrap();
        let mut session = GenerationState::default();
        assert!(!session.submit(rt.handle(), &client, "   ").unwrap());
        assert!(!session.is_busy());
    }

    #[test]
    fn test_expire_notice() {
        let mut session = GenerationState::default();
        session.raise_notice("Exporting...");
        session.expire_notice(Duration::from_secs(60));
        assert!(session.notice().is_some());
        session.expire_notice(Duration::ZERO);
        assert!(session.notice().is_none());
    }
}
