use serde::Deserialize;
use strum::{Display, EnumString};

use crate::config::RewriteConfig;
use crate::event::Request;
use crate::utils::{is_directory, join_index};

/// Which URIs, besides directory URIs, get the index document appended
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RewritePolicy {
    /// Any URI without a `.` is treated as a directory
    #[default]
    DirectoryIndex,
    /// Only URIs listed exactly in the allowlist are treated as directories
    Allowlist,
}

/// Maps directory-style request URIs onto their index document.
///
/// A `Rewriter` is immutable once built, so a single instance can serve any
/// number of concurrent requests.
#[derive(Debug, Clone)]
pub struct Rewriter {
    policy: RewritePolicy,
    index_document: String,
    allowlist: Vec<String>,
}

impl Default for Rewriter {
    fn default() -> Self {
        Self::new(&RewriteConfig::default())
    }
}

impl Rewriter {
    pub fn new(config: &RewriteConfig) -> Self {
        Self {
            policy: config.policy,
            index_document: config.index_document.clone(),
            allowlist: config.allowlist.clone(),
        }
    }

    pub fn policy(&self) -> RewritePolicy {
        self.policy
    }

    /// Returns the rewritten URI, or `None` when the URI is left as is.
    ///
    /// `uri` must start with `/`. A trailing slash always wins over the
    /// policy check, so `/a.b/` still resolves to `/a.b/index.html`.
    pub fn rewrite_uri(&self, uri: &str) -> Option<String> {
        debug_assert!(uri.starts_with('/'), "request uri must start with '/'");

        if is_directory(uri) || self.is_bare_directory(uri) {
            Some(join_index(uri, &self.index_document))
        } else {
            None
        }
    }

    /// Rewrites `request.uri` in place and hands the same request back
    pub fn rewrite(&self, mut request: Request) -> Request {
        if let Some(uri) = self.rewrite_uri(&request.uri) {
            request.uri = uri;
        }
        request
    }

    fn is_bare_directory(&self, uri: &str) -> bool {
        match self.policy {
            RewritePolicy::DirectoryIndex => !uri.contains('.'),
            RewritePolicy::Allowlist => self.allowlist.iter().any(|entry| entry == uri),
        }
    }
}
