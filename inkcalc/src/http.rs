use inkcalc_core::recognize::{RecognitionRequest, RecognitionResponse, Recognizer};

/// Talks to the recognition service over HTTP. One POST per submission, no retries.
pub struct HttpRecognizer {
    client: reqwest::Client,
    endpoint: String,
}
impl HttpRecognizer {
    /// `api_url` is the service base, `/calculate` is appended.
    pub fn new(api_url: &str, timeout: Option<std::time::Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint(api_url),
        })
    }
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
fn endpoint(api_url: &str) -> String {
    format!("{}/calculate", api_url.trim_end_matches('/'))
}

#[async_trait::async_trait]
impl Recognizer for HttpRecognizer {
    async fn recognize(&self, request: RecognitionRequest) -> anyhow::Result<RecognitionResponse> {
        log::debug!(
            "POST {} ({} bytes of image, {} variables)",
            self.endpoint,
            request.image.len(),
            request.dict_of_vars.len()
        );
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}
