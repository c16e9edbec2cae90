//! Replaying adapter for the `InferenceClient` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::inference::{InferenceClient, InferenceFuture};

/// Serves recorded inference results from a cassette.
pub struct ReplayingInferenceClient {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingInferenceClient {
    /// Creates a replaying inference client backed by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl InferenceClient for ReplayingInferenceClient {
    fn infer(&self, _descriptions: &[String]) -> InferenceFuture<'_> {
        let output = next_output(&self.replayer, "inference", "infer");
        Box::pin(async move { replay_result(output, "inference", "infer") })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    #[tokio::test]
    async fn serves_recorded_mapping() {
        let key = "Section: Apex Classes | Display: Created class A";
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            interactions: vec![Interaction {
                seq: 0,
                port: "inference".into(),
                method: "infer".into(),
                input: json!([key]),
                output: json!({"Ok": {key: "A"}}),
            }],
        };
        let client = ReplayingInferenceClient::new(CassetteReplayer::new(&cassette));
        let mapping = client.infer(&[key.to_string()]).await.unwrap();
        assert_eq!(mapping.get(key).map(String::as_str), Some("A"));
    }
}
