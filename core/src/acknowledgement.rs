use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
}

/// Response returned to the invoking runtime: `{"result": "success"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Acknowledgement {
    pub result: Outcome,
}

impl Acknowledgement {
    pub fn success() -> Self {
        Self {
            result: Outcome::Success,
        }
    }
}
