//! # Recognition protocol
//!
//! Wire types of the remote recognition service and the trait the dispatcher talks to it through.
//! Transport lives outside this crate.

use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RecognitionRequest {
    /// PNG data URL of the surface.
    pub image: String,
    /// Known variables at the time of submission.
    pub dict_of_vars: BTreeMap<String, String>,
}

/// One recognized expression. If `assign` is set, `expr` is a variable name and `result` its value.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Recognized {
    pub expr: String,
    pub result: String,
    #[serde(default)]
    pub assign: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct RecognitionResponse {
    pub data: Vec<Recognized>,
}

#[async_trait::async_trait]
pub trait Recognizer {
    /// Recognize the drawing in `request`. Any failure is reported, never retried.
    async fn recognize(&self, request: RecognitionRequest) -> anyhow::Result<RecognitionResponse>;
}
