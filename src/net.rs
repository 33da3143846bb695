use thiserror::Error;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; KorailStationScraper/1.0)";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Anything that can hand back the HTML of a page
pub trait PageSource {
    fn fetch_page(&self, url: &str) -> Result<String, FetchError>;
}

/// Plain blocking HTTP client. One attempt per request, no caching.
pub struct PageClient {
    client: reqwest::blocking::Client,
}

impl PageClient {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

impl PageSource for PageClient {
    fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().map_err(request_error)
    }
}
