use reqwest::Url;
use snafu::{ensure, ResultExt};

use crate::mtg::error::{
    EmptyHostSnafu, InvalidHostSnafu, InvalidPathSnafu, InvalidUrlSnafu, NonCanonicalHostSnafu,
    QueryError,
};
use crate::platform::ApiConfig;

const NAME_PARAM: &str = "name";

/// One card lookup. `name` may hold several alternatives joined by `|`,
/// which the API treats as an OR-pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardQuery {
    scheme: String,
    host: String,
    path: String,
    name: Option<String>,
}

impl CardQuery {
    pub fn new(
        scheme: impl Into<String>,
        host: impl Into<String>,
        path: impl Into<String>,
        name: Option<String>,
    ) -> Self {
        CardQuery {
            scheme: scheme.into(),
            host: host.into(),
            path: path.into(),
            name,
        }
    }

    pub fn for_name(config: &ApiConfig, name: &str) -> Self {
        Self::new(
            config.scheme.as_str(),
            config.host.as_str(),
            config.path.as_str(),
            Some(name.to_string()),
        )
    }

    /// `host` may carry a `:port` suffix. Host and path must already be in
    /// the form the URL would store them in; they are rejected rather than
    /// rewritten. The name goes out form-encoded, so `Black Lotus|Opt`
    /// becomes `name=Black+Lotus%7COpt`.
    pub fn to_url(&self) -> Result<Url, QueryError> {
        ensure!(!self.host.is_empty(), EmptyHostSnafu);
        ensure!(
            !self.host.contains(&['/', '?', '#', '@'][..]),
            InvalidHostSnafu {
                host: self.host.as_str()
            }
        );

        let mut url = Url::parse(&format!("{}://{}", self.scheme, self.host)).context(
            InvalidUrlSnafu {
                scheme: self.scheme.as_str(),
                host: self.host.as_str(),
            },
        )?;
        let canonical = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        };
        ensure!(
            canonical == self.host,
            NonCanonicalHostSnafu {
                host: self.host.as_str(),
                canonical
            }
        );

        ensure!(
            self.path.starts_with('/'),
            InvalidPathSnafu {
                path: self.path.as_str()
            }
        );
        url.set_path(&self.path);
        ensure!(
            url.path() == self.path,
            InvalidPathSnafu {
                path: self.path.as_str()
            }
        );
        if let Some(name) = &self.name {
            url.query_pairs_mut().append_pair(NAME_PARAM, name);
        }
        Ok(url)
    }
}
