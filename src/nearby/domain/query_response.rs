use serde::Deserialize;
use std::collections::HashMap;

// API: https://www.mediawiki.org/wiki/Extension:GeoData#list=geosearch
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    pub query: Option<Query>,
}

#[derive(Debug, Deserialize)]
pub struct Query {
    /// Keyed by page id.
    pub pages: HashMap<String, PageGet>,
}

#[derive(Debug, Deserialize)]
pub struct PageGet {
    pub pageid: u64,
    pub title: String,
    pub terms: Option<HashMap<String, Vec<String>>>,
}
