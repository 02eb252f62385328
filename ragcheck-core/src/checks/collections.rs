//! Collection inspection against `GET /collections`.

use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

use super::{decode, require_ok, unreachable};
use crate::error::CheckError;
use crate::transport::HttpTransport;

/// What the vector database holds.
///
/// `Empty` is not a request failure: the server answered, but nothing has
/// been ingested yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionListing {
    Empty,
    Populated(Vec<String>),
}

impl CollectionListing {
    pub fn names(&self) -> &[String] {
        match self {
            CollectionListing::Empty => &[],
            CollectionListing::Populated(names) => names,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CollectionListing::Empty)
    }
}

impl From<Vec<String>> for CollectionListing {
    fn from(names: Vec<String>) -> Self {
        if names.is_empty() {
            CollectionListing::Empty
        } else {
            CollectionListing::Populated(names)
        }
    }
}

#[derive(Deserialize)]
struct CollectionsBody {
    collections: Vec<String>,
}

/// GET the collections endpoint once.
pub async fn inspect_collections(
    transport: &dyn HttpTransport,
    url: &str,
    timeout: Duration,
) -> Result<CollectionListing, CheckError> {
    let response = transport
        .get(url, timeout)
        .await
        .map_err(|e| unreachable(url, e))?;
    require_ok(url, &response)?;
    let body: CollectionsBody = decode(url, &response)?;
    let listing = CollectionListing::from(body.collections);
    match &listing {
        CollectionListing::Empty => warn!("No collections found"),
        CollectionListing::Populated(names) => info!(collections = ?names, "Collections found"),
    }
    Ok(listing)
}
