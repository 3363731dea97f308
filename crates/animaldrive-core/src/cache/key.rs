use std::collections::BTreeMap;
use std::fmt;

use crate::config::{api, params};
use crate::models::FolderId;

/// Canonical cache key: an endpoint plus its sorted parameter set.
///
/// Keys compare structurally, so two keys built from the same endpoint and
/// parameters address the same entry no matter how they were assembled.
/// Root-scoped reads carry no parameter at all.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    endpoint: String,
    params: BTreeMap<String, String>,
}

impl QueryKey {
    pub fn new<I, K, V>(endpoint: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            endpoint: endpoint.into(),
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Key with no parameters.
    pub fn endpoint_only(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            params: BTreeMap::new(),
        }
    }

    /// Folders under `parent_id` (`None` = root folders).
    pub fn folders(parent_id: Option<FolderId>) -> Self {
        match parent_id {
            Some(id) => Self::new(api::FOLDERS, [(params::PARENT_ID, id.to_string())]),
            None => Self::endpoint_only(api::FOLDERS),
        }
    }

    /// Files in `folder_id` (`None` = root).
    pub fn files(folder_id: Option<FolderId>) -> Self {
        match folder_id {
            Some(id) => Self::new(api::FILES, [(params::FOLDER_ID, id.to_string())]),
            None => Self::endpoint_only(api::FILES),
        }
    }

    /// Search results for `query`.
    pub fn search(query: &str) -> Self {
        Self::new(api::SEARCH, [(params::QUERY, query)])
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether an invalidation of `prefix` covers this key.
    ///
    /// Matching is on the endpoint string alone: `/api/files` covers
    /// `/api/files?folderId=5` and `/api/files/search?q=a` alike.
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        self.endpoint.starts_with(prefix)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.endpoint)?;
        for (i, (k, v)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, k, v)?;
        }
        Ok(())
    }
}
