use reqwest::Url;
use snafu::Snafu;

use crate::mtg::status::StatusKind;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum QueryError {
    #[snafu(display("cannot build a card query without a host"))]
    EmptyHost,

    #[snafu(display("host {:?} must not contain a path, query or fragment", host))]
    InvalidHost { host: String },

    #[snafu(display("host {:?} is not in canonical form, use {:?}", host, canonical))]
    NonCanonicalHost { host: String, canonical: String },

    #[snafu(display("path {:?} must start with '/' and need no percent-encoding", path))]
    InvalidPath { path: String },

    #[snafu(display("could not form a URL from {}://{}: {}", scheme, host, source))]
    InvalidUrl {
        scheme: String,
        host: String,
        source: url::ParseError,
    },
}

/// Every variant is terminal for its request; nothing is retried.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FetchError {
    #[snafu(display("could not build the HTTP client: {}", source))]
    BuildClient { source: reqwest::Error },

    #[snafu(display("request to {} failed: {}", url, source))]
    Transport { url: Url, source: reqwest::Error },

    #[snafu(display("could not decode the card response: {}", source))]
    Decode { source: serde_json::Error },

    #[snafu(display("{}. Code: {}", kind, code))]
    Status { code: u16, kind: StatusKind },
}
