//! Retry Eligibility
//!
//! Decides which requests may take part in a session refresh. Requests to
//! the credential endpoints themselves never do, otherwise a failing refresh
//! would try to refresh itself.

use url::Url;

use crate::types::ClientConfig;

/// Set of endpoint paths excluded from session refresh.
#[derive(Clone, Debug, Default)]
pub struct RetryEligibility {
    exempt: Vec<String>,
}

impl RetryEligibility {
    /// Exempt the given paths. Leading and trailing slashes are ignored.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let exempt = paths
            .into_iter()
            .map(|p| p.as_ref().trim_matches('/').to_string())
            .filter(|p| !p.is_empty())
            .collect();
        Self { exempt }
    }

    /// Login and refresh endpoints plus the configured extra paths.
    pub fn from_config(config: &ClientConfig) -> Self {
        let mut paths = vec![config.session.login.clone(), config.session.refresh.clone()];
        paths.extend(config.exempt_paths.iter().cloned());
        Self::new(paths)
    }

    /// Whether `url` targets an exempt endpoint.
    ///
    /// Matches whole trailing path segments, so `auth/login` exempts
    /// `http://host/api/v1/auth/login` but not `.../auth/login-history`.
    pub fn is_exempt(&self, url: &str) -> bool {
        let path = request_path(url);
        self.exempt.iter().any(|exempt| {
            path == *exempt
                || path
                    .strip_suffix(exempt.as_str())
                    .is_some_and(|prefix| prefix.ends_with('/'))
        })
    }

    /// Whether a 401 on `url` may trigger a refresh.
    pub fn is_eligible(&self, url: &str) -> bool {
        !self.is_exempt(url)
    }

    /// Exempt paths, normalized.
    pub fn exempt_paths(&self) -> &[String] {
        &self.exempt
    }
}

fn request_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().trim_matches('/').to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_matches('/')
            .to_string(),
    }
}
