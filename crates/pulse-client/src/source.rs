use async_trait::async_trait;
use pulse_core::Batch;
use pulse_stream::{RecordSource, StreamError};

use crate::client::PulseClient;

#[async_trait]
impl RecordSource for PulseClient {
    async fn fetch_batch(&self, term: &str) -> Result<Batch, StreamError> {
        self.fetch_records(term)
            .await
            .map_err(|e| StreamError::Fetch(e.to_string()))
    }
}
