use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::{core::LowLevelClient, error::AIError};

/// Scripted reply for [`MockClient`].
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success(String),
    Failure(String),
}

#[derive(Debug, Default)]
struct MockState {
    queue: VecDeque<MockResponse>,
    fallback: Option<String>,
    prompts: Vec<String>,
}

/// Control handle shared with a [`MockClient`]: queue replies and inspect the
/// prompts the client received.
#[derive(Debug, Default)]
pub struct MockHandle {
    state: Mutex<MockState>,
}

impl MockHandle {
    pub fn add_response(&self, response: MockResponse) {
        self.lock().queue.push_back(response);
    }

    /// Reply used once the queue is empty.
    pub fn set_fallback(&self, text: impl Into<String>) {
        self.lock().fallback = Some(text.into());
    }

    pub fn prompts(&self) -> Vec<String> {
        self.lock().prompts.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().prompts.len()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Mock completion client for tests and offline runs.
#[derive(Debug, Clone)]
pub struct MockClient {
    handle: Arc<MockHandle>,
}

impl MockClient {
    pub fn new() -> (Self, Arc<MockHandle>) {
        let handle = Arc::new(MockHandle::default());
        (Self { handle: handle.clone() }, handle)
    }

    pub fn with_responses(responses: Vec<MockResponse>) -> (Self, Arc<MockHandle>) {
        let (client, handle) = Self::new();
        for response in responses {
            handle.add_response(response);
        }
        (client, handle)
    }

    /// A client that always answers with a fixed three-question set.
    pub fn demo() -> Self {
        let (client, handle) = Self::new();
        handle.set_fallback(DEMO_RESPONSE);
        client
    }
}

#[async_trait]
impl LowLevelClient for MockClient {
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError> {
        let mut state = self.handle.lock();
        state.prompts.push(prompt);

        let reply = match state.queue.pop_front() {
            Some(MockResponse::Success(text)) => Ok(text),
            Some(MockResponse::Failure(message)) => Err(AIError::Mock(message)),
            None => state
                .fallback
                .clone()
                .ok_or_else(|| AIError::Mock("No scripted response left".to_string())),
        };
        debug!(ok = reply.is_ok(), "Mock client replied");
        reply
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }
}

const DEMO_RESPONSE: &str = r#"```json
[
  {
    "question": "A bacterium shifted from 37 °C to 15 °C would most likely adjust its membrane by",
    "options": {
      "A": "Increasing the proportion of saturated fatty acids",
      "B": "Increasing the proportion of cis-unsaturated fatty acids",
      "C": "Increasing average acyl chain length",
      "D": "Removing hopanoids from the membrane"
    },
    "correct": "B",
    "explanation": "Homeoviscous adaptation: cis double bonds lower Tm and keep the membrane fluid in the cold."
  },
  {
    "question": "Annexin V binding to intact cells in culture most directly reports",
    "options": {
      "A": "Exposure of phosphatidylserine on the outer leaflet",
      "B": "Loss of cardiolipin from mitochondria",
      "C": "Increased sphingomyelin synthesis",
      "D": "Activation of floppases only"
    },
    "correct": "A",
    "explanation": "PS is normally confined to the inner leaflet; its exposure is an early apoptotic 'eat me' signal."
  },
  {
    "question": "Which lipid would be the best marker for purified inner mitochondrial membranes?",
    "options": {
      "A": "Plasmalogen",
      "B": "GM1 ganglioside",
      "C": "Sphingomyelin",
      "D": "Cardiolipin"
    },
    "correct": "D",
    "explanation": "Cardiolipin is characteristic of the inner mitochondrial membrane."
  }
]
```"#;
