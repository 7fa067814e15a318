//! Bridge between the async analysis client and the UI thread.
//!
//! Each submission gets a fresh request token; the state machine compares
//! tokens so a stale response can never overwrite a newer request's state.

use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::analysis::AnalysisClient;
use crate::capture::EncodedImage;
use crate::domain::AnalysisResult;
use crate::error::AnalysisError;

const OUTCOME_CHANNEL_CAPACITY: usize = 4;

#[derive(Debug)]
pub struct AnalysisOutcome {
    pub token: Uuid,
    pub result: Result<AnalysisResult, AnalysisError>,
}

pub struct AnalysisHandle {
    client: Arc<dyn AnalysisClient>,
    outcome_tx: mpsc::Sender<AnalysisOutcome>,
    outcome_rx: mpsc::Receiver<AnalysisOutcome>,
}

impl AnalysisHandle {
    pub fn new(client: Arc<dyn AnalysisClient>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel(OUTCOME_CHANNEL_CAPACITY);
        Self {
            client,
            outcome_tx,
            outcome_rx,
        }
    }

    /// Spawns one analysis call and returns its token. Exactly one outcome
    /// per submission arrives via [`try_recv`](Self::try_recv).
    pub fn submit(&self, image: EncodedImage) -> Uuid {
        let token = Uuid::new_v4();
        let client = self.client.clone();
        let tx = self.outcome_tx.clone();

        tokio::spawn(async move {
            let result = client.analyze(&image).await;
            match &result {
                Ok(result) => {
                    tracing::info!(%token, shape = result.face_shape.label(), "analysis resolved")
                }
                Err(e) => tracing::error!(%token, "analysis failed: {e}"),
            }

            if tx.send(AnalysisOutcome { token, result }).await.is_err() {
                tracing::warn!(%token, "analysis outcome dropped, UI receiver gone");
            }
        });

        token
    }

    /// Non-blocking drain, called once per UI frame.
    pub fn try_recv(&mut self) -> Option<AnalysisOutcome> {
        self.outcome_rx.try_recv().ok()
    }
}
