use crate::{
    api::{Envelope, StudentApi},
    config::ApiConfig,
    data::student::Student,
    error::{
        BuildUrlSnafu, DecodeEnvelopeSnafu, EncodeBodySnafu, JoinBlockingSnafu, RollbookResult,
        TransportSnafu,
    },
};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use snafu::ResultExt;
use std::{io::BufReader, sync::Arc};
use url::Url;

/// One-shot JSON calls against the student API. No retries, no timeouts.
#[derive(Clone, Debug)]
pub struct ApiClient {
    config: Arc<ApiConfig>,
    agent: ureq::Agent,
}

impl ApiClient {
    pub fn new(config: Arc<ApiConfig>) -> Self {
        Self {
            config,
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    pub async fn get<T>(&self, url: Url) -> RollbookResult<Envelope<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.send("GET", url, None).await
    }

    pub async fn post<B, T>(&self, url: Url, body: &B) -> RollbookResult<Envelope<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Send + 'static,
    {
        let payload = serde_json::to_string(body).context(EncodeBodySnafu)?;
        self.send("POST", url, Some(payload)).await
    }

    pub async fn put<B, T>(&self, url: Url, body: &B) -> RollbookResult<Envelope<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Send + 'static,
    {
        let payload = serde_json::to_string(body).context(EncodeBodySnafu)?;
        self.send("PUT", url, Some(payload)).await
    }

    pub async fn delete<T>(&self, url: Url) -> RollbookResult<Envelope<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.send("DELETE", url, None).await
    }

    /// `{base}{path}`, plus `/{id}` percent-encoded as a single segment when given.
    fn url(&self, path: &str, id: Option<&str>) -> RollbookResult<Url> {
        let mut url = self.config.endpoint(path)?;
        if let Some(id) = id {
            let base = url.clone();
            url.path_segments_mut()
                .map_err(|()| BuildUrlSnafu { base }.build())?
                .pop_if_empty()
                .push(id);
        }
        Ok(url)
    }

    async fn send<T>(
        &self,
        method: &'static str,
        url: Url,
        payload: Option<String>,
    ) -> RollbookResult<Envelope<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        debug!(%method, %url, "calling student api");
        let agent = self.agent.clone();

        tokio::task::spawn_blocking(move || {
            let request = agent
                .request_url(method, &url)
                .set("Accept", "application/json");
            let response = match payload {
                Some(payload) => request
                    .set("Content-Type", "application/json")
                    .send_string(&payload),
                None => request.call(),
            };

            // a non-2xx answer can still carry an envelope
            let response = match response {
                Ok(response) | Err(ureq::Error::Status(_, response)) => response,
                Err(ureq::Error::Transport(transport)) => {
                    return Err(transport).context(TransportSnafu);
                }
            };

            // streamed, so findAll is not capped by `into_string`'s 10MB limit
            serde_json::from_reader(BufReader::new(response.into_reader()))
                .context(DecodeEnvelopeSnafu)
        })
        .await
        .context(JoinBlockingSnafu)?
    }
}

#[async_trait]
impl StudentApi for ApiClient {
    async fn find_all(&self) -> RollbookResult<Envelope<Vec<Student>>> {
        self.get(self.url(&self.config.find_all, None)?).await
    }

    async fn insert_one(&self, student: &Student) -> RollbookResult<Envelope<Value>> {
        self.post(self.url(&self.config.insert_one, None)?, student)
            .await
    }

    async fn update_by_id(&self, id: &str, student: &Student) -> RollbookResult<Envelope<Value>> {
        self.put(self.url(&self.config.update_by_id, Some(id))?, student)
            .await
    }

    async fn delete_by_id(&self, id: &str) -> RollbookResult<Envelope<Value>> {
        self.delete(self.url(&self.config.delete_by_id, Some(id))?)
            .await
    }
}
