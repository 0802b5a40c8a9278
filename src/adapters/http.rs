use crate::config::FetchConfig;
use crate::domain::ports::{HttpRequest, HttpResponse, HttpTransport, Method};
use crate::utils::error::TransportError;
use reqwest::blocking::Client;

/// Default transport: a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Without `timeout_seconds` reqwest's own default timeout applies.
    pub fn new(config: &FetchConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl HttpTransport for ReqwestTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
        };

        let response = self.client.request(method, request.url).send()?;
        let status = response.status().as_u16();

        // 非 2xx 也照常回傳，由呼叫端決定如何處理
        Ok(HttpResponse::new(status, response))
    }
}
