//! Read-only request environment
//!
//! The public URIs of the site are derived once, when the settings store is
//! built, from the scheme, host and script path of the request being served.

use serde::Serialize;
use std::collections::HashMap;

/// Source of CGI-style environment variables
pub trait EnvSource: Send + Sync {
    /// Value of `key`, or `None` if unset
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// The parts of the current request the site URIs are built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// `http` or `https`
    pub scheme: String,
    /// Server name, e.g. `example.com`
    pub host: String,
    /// Path of the front controller, e.g. `/app` (may be empty)
    pub script_name: String,
}

impl RequestContext {
    pub fn new(
        scheme: impl Into<String>,
        host: impl Into<String>,
        script_name: impl Into<String>,
    ) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            script_name: script_name.into(),
        }
    }

    /// Build the context from `REQUEST_SCHEME` (or `HTTPS`), `SERVER_NAME`
    /// and `SCRIPT_NAME`.
    ///
    /// Missing variables fall back to `http`, `localhost` and an empty path.
    pub fn from_env(source: &dyn EnvSource) -> Self {
        let scheme = source.var("REQUEST_SCHEME").unwrap_or_else(|| {
            match source.var("HTTPS") {
                Some(v) if !v.is_empty() && !v.eq_ignore_ascii_case("off") => "https".into(),
                _ => "http".into(),
            }
        });
        let host = source
            .var("SERVER_NAME")
            .unwrap_or_else(|| "localhost".into());
        let script_name = source.var("SCRIPT_NAME").unwrap_or_default();

        Self {
            scheme,
            host,
            script_name,
        }
    }
}

/// Public URIs of the site
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteUris {
    pub public: String,
    pub js: String,
    pub css: String,
    pub favicon: String,
    pub image: String,
}

/// Values computed from the request, looked up before core settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Environment {
    uri: SiteUris,
}

impl Environment {
    pub fn from_context(context: &RequestContext) -> Self {
        let public = format!(
            "{}://{}{}",
            context.scheme, context.host, context.script_name
        );
        let uri = SiteUris {
            js: format!("{public}/js/"),
            css: format!("{public}/css/"),
            favicon: format!("{public}/css/favicon.ico"),
            image: format!("{public}/images/"),
            public,
        };
        Self { uri }
    }

    pub fn uri(&self) -> &SiteUris {
        &self.uri
    }

    /// Look up an environment value by dotted name (e.g., `uri.public`)
    pub fn get(&self, name: &str) -> Option<&str> {
        let value = match name {
            "uri.public" => &self.uri.public,
            "uri.js" => &self.uri.js,
            "uri.css" => &self.uri.css,
            "uri.favicon" => &self.uri.favicon,
            "uri.image" => &self.uri.image,
            _ => return None,
        };
        Some(value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_uris_derived_from_context() {
        let env = Environment::from_context(&RequestContext::new("https", "example.com", "/app"));

        assert_eq!(env.uri().public, "https://example.com/app");
        assert_eq!(env.uri().js, "https://example.com/app/js/");
        assert_eq!(env.uri().css, "https://example.com/app/css/");
        assert_eq!(env.uri().favicon, "https://example.com/app/css/favicon.ico");
        assert_eq!(env.uri().image, "https://example.com/app/images/");
    }

    #[test]
    fn test_dotted_lookup() {
        let env = Environment::from_context(&RequestContext::new("http", "localhost", ""));

        assert_eq!(env.get("uri.public"), Some("http://localhost"));
        assert_eq!(env.get("uri.image"), Some("http://localhost/images/"));
        assert!(env.contains("uri.css"));
        assert!(!env.contains("uri"));
        assert!(!env.contains("site_title"));
    }

    #[test]
    fn test_context_from_env_vars() {
        let source = vars(&[
            ("REQUEST_SCHEME", "https"),
            ("SERVER_NAME", "forum.example.org"),
            ("SCRIPT_NAME", "/index.php"),
        ]);

        assert_eq!(
            RequestContext::from_env(&source),
            RequestContext::new("https", "forum.example.org", "/index.php")
        );
    }

    #[test]
    fn test_context_https_flag_and_fallbacks() {
        let secure = RequestContext::from_env(&vars(&[("HTTPS", "on")]));
        assert_eq!(secure.scheme, "https");
        assert_eq!(secure.host, "localhost");
        assert_eq!(secure.script_name, "");

        let plain = RequestContext::from_env(&vars(&[("HTTPS", "off")]));
        assert_eq!(plain.scheme, "http");
    }
}
