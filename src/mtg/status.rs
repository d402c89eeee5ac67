use std::fmt;

/// How a response status is handled. Anything not listed in `classify`
/// is `Unclassified` and produces no output; 429 lands there too, so rate
/// limiting is only reported when the API answers 403.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    Informational,
    Success,
    Redirect,
    BadRequest,
    Forbidden,
    NotFound,
    InternalServerError,
    ServiceUnavailable,
    Unclassified,
}

impl StatusKind {
    pub fn classify(code: u16) -> Self {
        match code {
            100..=103 => Self::Informational,
            200..=299 => Self::Success,
            300..=399 => Self::Redirect,
            400 => Self::BadRequest,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            500 => Self::InternalServerError,
            503 => Self::ServiceUnavailable,
            _ => Self::Unclassified,
        }
    }

    /// Console line for a response of this kind, if it is reported at all.
    pub fn report(self, code: u16) -> Option<String> {
        match self {
            Self::Success | Self::Unclassified => None,
            Self::Informational => Some(format!("Informational status code: {}", code)),
            Self::Redirect => Some(format!("Redirect status code: {}", code)),
            Self::BadRequest
            | Self::Forbidden
            | Self::NotFound
            | Self::InternalServerError
            | Self::ServiceUnavailable => Some(format!("{}. Code: {}", self, code)),
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Informational => "Informational response",
            Self::Success => "Success",
            Self::Redirect => "Redirect",
            Self::BadRequest => "Bad request: we could not process that action",
            Self::Forbidden => "Forbidden: you have exceeded the rate limit",
            Self::NotFound => "Not found: the requested resource could not be found",
            Self::InternalServerError => {
                "Internal server error: we had a problem with our server. Please try again later"
            }
            Self::ServiceUnavailable => {
                "Service unavailable: we are temporarily offline for maintenance. Please try again later"
            }
            Self::Unclassified => "Unclassified status",
        };
        f.write_str(text)
    }
}
