//! Verification of candidate redirect targets.
//!
//! Before a link is persisted (or followed), its origin URL is checked against
//! a short list of rules: it must be an absolute HTTP(S) URL, it must not be a
//! path local to this deployment, and it must not point back into one of the
//! service's own forwarding endpoints on the same host. The last rule is what
//! keeps a forwarding link from redirecting into itself.
//!
//! The verifier knows nothing about HTTP frameworks. Callers hand it a
//! [`LocalUrlCheck`] capability and the [`RequestOrigin`] of the inbound request.

use percent_encoding::percent_decode_str;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use url::Url;

/// Endpoint forwarding by token: `/fw/{token}`.
pub const TOKEN_ENDPOINT: &str = "fw";

/// Endpoint forwarding by aka name: `/aka/{name}`.
pub const AKA_ENDPOINT: &str = "aka";

/// Path segments the service itself uses to execute redirects.
pub const DEFAULT_FORWARD_ENDPOINTS: &[&str] = &[TOKEN_ENDPOINT, AKA_ENDPOINT];

/// Outcome of verifying a candidate origin URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkVerifyResult {
    Valid,
    InvalidFormat,
    InvalidLocal,
    InvalidSelfReference,
}

impl LinkVerifyResult {
    pub fn is_valid(self) -> bool {
        self == Self::Valid
    }

    /// Stable machine-readable code, used in API error details and metrics labels.
    pub fn code(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::InvalidFormat => "invalid_format",
            Self::InvalidLocal => "invalid_local",
            Self::InvalidSelfReference => "invalid_self_reference",
        }
    }

    /// User-facing message for the outcome.
    pub fn message(self) -> &'static str {
        match self {
            Self::Valid => "URL is valid",
            Self::InvalidFormat => "Not a valid URL, only absolute http and https URLs are accepted",
            Self::InvalidLocal => "Can not use local URL",
            Self::InvalidSelfReference => "Can not use URL pointing to this site's forward endpoints",
        }
    }
}

impl fmt::Display for LinkVerifyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Answers whether a URL is local to this deployment by its path form.
///
/// Implemented for any `Fn(&str) -> bool`, so closures can be passed directly.
pub trait LocalUrlCheck {
    fn is_local_url(&self, url: &str) -> bool;
}

impl<F> LocalUrlCheck for F
where
    F: Fn(&str) -> bool,
{
    fn is_local_url(&self, url: &str) -> bool {
        self(url)
    }
}

/// Immutable set of forward endpoint names, stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardEndpoints {
    names: HashSet<String>,
}

impl ForwardEndpoints {
    /// Builds the set, trimming slashes and lower-casing each name. Empty names are ignored.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|name| name.as_ref().trim().trim_matches('/').to_ascii_lowercase())
            .filter(|name| !name.is_empty())
            .collect();

        Self { names }
    }

    /// Case-insensitive membership test for a single path segment.
    pub fn contains(&self, segment: &str) -> bool {
        self.names.contains(&segment.to_ascii_lowercase())
    }

    /// Endpoint names in alphabetical order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for ForwardEndpoints {
    fn default() -> Self {
        Self::new(DEFAULT_FORWARD_ENDPOINTS)
    }
}

/// Scheme and authority of the inbound request that triggered a verification.
///
/// The host is kept lower-cased and the scheme's default port is dropped, so
/// `example.com:443` over `https` compares equal to `example.com`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl RequestOrigin {
    /// Creates an origin from an authority (`host[:port]`) and a scheme.
    pub fn new(authority: &str, scheme: &str) -> Self {
        let scheme = scheme.trim().to_ascii_lowercase();
        let (host, port) = split_authority(authority.trim());
        let port = port.filter(|p| Some(*p) != default_port(&scheme));

        Self {
            scheme,
            host: host.to_ascii_lowercase(),
            port,
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// `host[:port]`, without the default port.
    pub fn authority(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        }
    }

    /// Base URL of this origin, e.g. `https://s.example.com`.
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.authority())
    }

    /// True when `url` has the same scheme and authority, ignoring case.
    pub fn same_authority(&self, url: &Url) -> bool {
        url.scheme().eq_ignore_ascii_case(&self.scheme)
            && url
                .host_str()
                .is_some_and(|host| host.eq_ignore_ascii_case(&self.host))
            && url.port() == self.port
    }
}

impl fmt::Display for RequestOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_url())
    }
}

fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    }
}

/// Splits `host[:port]`, keeping brackets on IPv6 literals.
fn split_authority(authority: &str) -> (&str, Option<u16>) {
    if let Some(rest) = authority.strip_prefix('[') {
        return match rest.find(']') {
            Some(end) => {
                let host = &authority[..end + 2];
                let port = rest[end + 1..]
                    .strip_prefix(':')
                    .and_then(|p| p.parse().ok());
                (host, port)
            }
            None => (authority, None),
        };
    }

    match authority.rsplit_once(':') {
        Some((host, port)) => match port.parse() {
            Ok(port) => (host, Some(port)),
            Err(_) => (authority, None),
        },
        None => (authority, None),
    }
}

/// Rule engine deciding whether a URL may be registered as a redirect target.
///
/// Stateless apart from the endpoint set; share one instance behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct LinkVerifier {
    endpoints: ForwardEndpoints,
}

impl LinkVerifier {
    pub fn new(endpoints: ForwardEndpoints) -> Self {
        Self { endpoints }
    }

    pub fn endpoints(&self) -> &ForwardEndpoints {
        &self.endpoints
    }

    /// Classifies a candidate origin URL.
    ///
    /// Rules are evaluated in order and the first failing one wins:
    ///
    /// 1. missing or blank input is [`LinkVerifyResult::InvalidFormat`]
    /// 2. anything but an absolute `http`/`https` URL is `InvalidFormat`,
    ///    except relative input the local check recognizes, which is `InvalidLocal`
    /// 3. a URL the local check recognizes is [`LinkVerifyResult::InvalidLocal`]
    /// 4. unless `allow_self_redirection` is set, a URL on the request's own
    ///    scheme and authority whose first path segment is a forward endpoint is
    ///    [`LinkVerifyResult::InvalidSelfReference`]
    ///
    /// Local URLs are rejected even when self-redirection is allowed.
    pub fn verify<L>(
        &self,
        url: Option<&str>,
        local: &L,
        origin: &RequestOrigin,
        allow_self_redirection: bool,
    ) -> LinkVerifyResult
    where
        L: LocalUrlCheck + ?Sized,
    {
        let Some(url) = url.filter(|u| !u.trim().is_empty()) else {
            return LinkVerifyResult::InvalidFormat;
        };

        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(url::ParseError::RelativeUrlWithoutBase) if local.is_local_url(url) => {
                return LinkVerifyResult::InvalidLocal;
            }
            Err(_) => return LinkVerifyResult::InvalidFormat,
        };

        if !matches!(parsed.scheme(), "http" | "https") {
            return LinkVerifyResult::InvalidFormat;
        }

        if local.is_local_url(url) {
            return LinkVerifyResult::InvalidLocal;
        }

        if !allow_self_redirection && self.is_self_reference(&parsed, origin) {
            return LinkVerifyResult::InvalidSelfReference;
        }

        LinkVerifyResult::Valid
    }

    fn is_self_reference(&self, url: &Url, origin: &RequestOrigin) -> bool {
        if !origin.same_authority(url) {
            return false;
        }

        url.path_segments()
            .and_then(|mut segments| segments.next())
            .map(|segment| percent_decode_str(segment).decode_utf8_lossy())
            .filter(|segment| !segment.is_empty())
            .is_some_and(|segment| self.endpoints.contains(&segment))
    }
}
