use reqwest::{Client, Response, RequestBuilder};
use http::header::HeaderMap;
use http::StatusCode;
use crate::error::{Error, Result};
use tracing::debug;

const BODY_EXCERPT_BYTES: usize = 512;

pub struct HttpClient {
    client: Client,
    headers: HeaderMap,  // applied to every request
}

impl HttpClient {
    pub fn new(headers: HeaderMap) -> Result<Self> {
        for (key, value) in headers.iter() {
            debug!(
                header_key = key.as_str(),
                sensitive = value.is_sensitive(),
                "Adding default header"
            );
        }

        let client = Client::builder().build()?;

        Ok(Self { client, headers })
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        let mut request = self.client.post(url);

        for (key, value) in self.headers.iter() {
            request = request.header(key, value);
        }

        debug!(url = url, "Creating POST request");

        request
    }

    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();

        debug!(
            status = status.as_u16(),
            url = %response.url(),
            "Response received"
        );

        match status {
            StatusCode::TOO_MANY_REQUESTS => {
                debug!("Rate limit exceeded");
                Err(Error::RateLimit)
            }
            StatusCode::UNAUTHORIZED => Err(Error::Unauthorized),
            StatusCode::FORBIDDEN => {
                debug!(url = %response.url(), "Received 403 Forbidden");
                Err(Error::Forbidden)
            }
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                Err(Error::Status {
                    status: status.as_u16(),
                    body: excerpt(&body).to_string(),
                })
            }
            _ => Ok(response),
        }
    }
}

/// Truncates an error body at a character boundary.
fn excerpt(body: &str) -> &str {
    if body.len() <= BODY_EXCERPT_BYTES {
        return body;
    }
    let mut end = BODY_EXCERPT_BYTES;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
