use log::{debug, warn};
use reqwest::{multipart, Client, Response};

use super::{
    wire::{ErrorBody, PredictBody, TrainBody},
    CleanupReport, DatasetFile, Prediction, TrainingReport, TrainingService, UploadReceipt,
};
use crate::{
    configs::{ClientConfig, PredictionRequest, TrainingConfig},
    error::ServiceError,
};

/// `TrainingService` over HTTP.
///
/// No timeout is configured: a call lasts until the transport resolves.
pub struct HttpService {
    config: ClientConfig,
    client: Client,
}

impl HttpService {
    /// Creates a new `HttpService`.
    ///
    /// # Args
    /// * `config` - Where the service lives.
    ///
    /// # Errors
    /// Returns `ServiceError::Transport` if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ServiceError> {
        let client = Client::builder().build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Lets 2xx responses through and turns the rest into `ServiceError::Rejected`.
    ///
    /// # Args
    /// * `resp` - The raw response.
    /// * `with_detail` - Whether the failure body carries a `{detail}` object.
    async fn accept(resp: Response, with_detail: bool) -> Result<Response, ServiceError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let url = resp.url().clone();

        let detail = if with_detail {
            resp.json::<ErrorBody>().await.ok().map(ErrorBody::into_detail)
        } else {
            None
        };

        warn!("{url} answered {status}");
        Err(ServiceError::Rejected {
            status: status.as_u16(),
            detail,
        })
    }
}

#[async_trait::async_trait]
impl TrainingService for HttpService {
    async fn upload(&self, file: DatasetFile) -> Result<UploadReceipt, ServiceError> {
        let url = self.config.endpoint("/upload/");
        debug!("POST {url} ({} bytes, name={})", file.bytes.len(), file.name);

        let part = multipart::Part::bytes(file.bytes).file_name(file.name);
        let form = multipart::Form::new().part("file", part);

        let resp = self.client.post(&url).multipart(form).send().await?;
        let resp = Self::accept(resp, false).await?;
        Ok(resp.json().await?)
    }

    async fn train(&self, config: TrainingConfig) -> Result<TrainingReport, ServiceError> {
        let url = self.config.endpoint("/train/");
        debug!("POST {url} (file_id={})", config.dataset_id);

        let resp = self
            .client
            .post(&url)
            .json(&TrainBody::from(&config))
            .send()
            .await?;
        let resp = Self::accept(resp, true).await?;
        Ok(resp.json().await?)
    }

    async fn predict(&self, request: PredictionRequest) -> Result<Prediction, ServiceError> {
        let url = self.config.endpoint("/predict/");
        debug!("POST {url} (file_id={})", request.dataset_id);

        let resp = self
            .client
            .post(&url)
            .json(&PredictBody::from(&request))
            .send()
            .await?;
        let resp = Self::accept(resp, true).await?;
        Ok(resp.json().await?)
    }

    async fn cleanup(&self) -> Result<CleanupReport, ServiceError> {
        let url = self.config.endpoint("/cleanup");
        debug!("DELETE {url}");

        let resp = self.client.delete(&url).send().await?;
        let resp = Self::accept(resp, false).await?;
        Ok(resp.json().await?)
    }
}
