use log::debug;
use once_cell::sync::OnceCell;
use reqwest::redirect::Policy;
use reqwest::{Client, Url};
use snafu::ResultExt;
use tokio::task::JoinHandle;

use crate::mtg::error::{BuildClientSnafu, DecodeSnafu, FetchError, StatusSnafu, TransportSnafu};
use crate::mtg::models::CardResponse;
use crate::mtg::status::StatusKind;

pub const DEFAULT_HOST: &str = "api.magicthegathering.io";
pub const DEFAULT_PATH: &str = "/v1/cards";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Redirects are not followed so that 3xx answers reach the status table.
fn shared_client() -> Result<Client, FetchError> {
    CLIENT
        .get_or_try_init(|| {
            Client::builder()
                .user_agent(USER_AGENT)
                .redirect(Policy::none())
                .build()
        })
        .map(Client::clone)
        .context(BuildClientSnafu)
}

#[derive(Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self::with_client(shared_client()?))
    }

    pub fn with_client(client: Client) -> Self {
        Fetcher { client }
    }

    /// Performs one GET against `url`. Only 2xx bodies are read and decoded,
    /// every other status comes back as `FetchError::Status`.
    pub async fn fetch(&self, url: Url) -> Result<CardResponse, FetchError> {
        debug!("GET {}", url);
        let res = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context(TransportSnafu { url: url.clone() })?;

        let code = res.status().as_u16();
        let kind = StatusKind::classify(code);
        debug!("{} answered {} ({:?})", url, code, kind);

        match kind {
            StatusKind::Success => {
                let body = res
                    .bytes()
                    .await
                    .map_err(reqwest::Error::without_url)
                    .context(TransportSnafu { url })?;
                serde_json::from_slice(&body).context(DecodeSnafu)
            }
            _ => StatusSnafu { code, kind }.fail(),
        }
    }

    /// Fires the request on the runtime and returns immediately. `on_complete`
    /// runs exactly once with the outcome; separate dispatches finish in no
    /// particular order.
    pub fn dispatch<F>(&self, url: Url, on_complete: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<CardResponse, FetchError>) + Send + 'static,
    {
        let fetcher = self.clone();
        tokio::spawn(async move {
            let outcome = fetcher.fetch(url).await;
            on_complete(outcome);
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::mtg::query::CardQuery;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    pub(crate) const BLACK_LOTUS: &str = r#"{"cards":[{"name":"Black Lotus","manaCost":"{0}","cmc":0,"type":"Artifact","rarity":"Special","set":"LEA","setName":"Limited Edition Alpha","artist":"Christopher Rush"}]}"#;

    /// Answers a single request with `status` and `body`, handing back the
    /// request line it saw.
    pub(crate) async fn serve_once(
        status: u16,
        body: &'static str,
    ) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            let head = String::from_utf8_lossy(&head).into_owned();
            let request_line = head.lines().next().unwrap_or_default().to_string();
            let _ = tx.send(request_line);

            let response = format!(
                "HTTP/1.1 {} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nlocation: /elsewhere\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        (addr.to_string(), rx)
    }

    pub(crate) fn stub_url(host: &str, name: &str) -> Url {
        CardQuery::new("http", host, DEFAULT_PATH, Some(name.to_string()))
            .to_url()
            .unwrap()
    }

    #[tokio::test]
    async fn decodes_success_body() {
        let (host, request) = serve_once(200, BLACK_LOTUS).await;
        let fetcher = Fetcher::new().unwrap();

        let response = fetcher.fetch(stub_url(&host, "Black Lotus")).await.unwrap();

        assert_eq!(response.cards.len(), 1);
        assert_eq!(response.cards[0].name.as_deref(), Some("Black Lotus"));
        assert_eq!(
            request.await.unwrap(),
            "GET /v1/cards?name=Black+Lotus HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn empty_card_list_is_still_success() {
        let (host, _) = serve_once(200, r#"{"cards":[]}"#).await;
        let fetcher = Fetcher::new().unwrap();

        let response = fetcher.fetch(stub_url(&host, "Nothing")).await.unwrap();
        assert!(response.cards.is_empty());
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let (host, _) = serve_once(200, "{\"cards\":[{\"name\":").await;
        let fetcher = Fetcher::new().unwrap();

        let err = fetcher.fetch(stub_url(&host, "Opt")).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }), "{:?}", err);
    }

    #[tokio::test]
    async fn not_found_carries_code() {
        let (host, _) = serve_once(404, r#"{"error":"not found"}"#).await;
        let fetcher = Fetcher::new().unwrap();

        let err = fetcher.fetch(stub_url(&host, "Opt")).await.unwrap_err();
        match err {
            FetchError::Status { code, kind } => {
                assert_eq!(code, 404);
                assert_eq!(kind, StatusKind::NotFound);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn redirect_is_not_followed() {
        let (host, _) = serve_once(301, "").await;
        let fetcher = Fetcher::new().unwrap();

        let err = fetcher.fetch(stub_url(&host, "Opt")).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Status {
                code: 301,
                kind: StatusKind::Redirect
            }
        ));
    }

    #[tokio::test]
    async fn unlisted_status_is_unclassified() {
        let (host, _) = serve_once(429, "").await;
        let fetcher = Fetcher::new().unwrap();

        let err = fetcher.fetch(stub_url(&host, "Opt")).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Status {
                code: 429,
                kind: StatusKind::Unclassified
            }
        ));
    }

    #[tokio::test]
    async fn refused_connection_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let host = listener.local_addr().unwrap().to_string();
        drop(listener);
        let fetcher = Fetcher::new().unwrap();

        let err = fetcher.fetch(stub_url(&host, "Opt")).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }), "{:?}", err);
        assert_eq!(err.to_string().matches(host.as_str()).count(), 1, "{}", err);
    }

    #[tokio::test]
    async fn dispatch_delivers_outcome_to_callback() {
        let (host, _) = serve_once(503, "").await;
        let fetcher = Fetcher::new().unwrap();
        let (tx, rx) = oneshot::channel();

        let handle = fetcher.dispatch(stub_url(&host, "Opt"), move |outcome| {
            let _ = tx.send(outcome);
        });

        let outcome = rx.await.unwrap();
        handle.await.unwrap();
        assert!(matches!(
            outcome,
            Err(FetchError::Status {
                code: 503,
                kind: StatusKind::ServiceUnavailable
            })
        ));
    }

    #[tokio::test]
    async fn concurrent_dispatches_are_independent() {
        let (lotus_host, _) = serve_once(200, BLACK_LOTUS).await;
        let (missing_host, _) = serve_once(404, "").await;
        let fetcher = Fetcher::new().unwrap();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let handles = vec![
            {
                let tx = tx.clone();
                fetcher.dispatch(stub_url(&lotus_host, "Black Lotus"), move |outcome| {
                    let _ = tx.send(outcome.is_ok());
                })
            },
            fetcher.dispatch(stub_url(&missing_host, "Opt"), move |outcome| {
                let _ = tx.send(outcome.is_ok());
            }),
        ];
        for handle in handles {
            handle.await.unwrap();
        }

        let mut results = Vec::new();
        while let Some(ok) = rx.recv().await {
            results.push(ok);
        }
        results.sort();
        assert_eq!(results, vec![false, true]);
    }
}
