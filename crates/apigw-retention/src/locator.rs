//! Resolve the REST API id of a deployed service by paging through every API
//! in the account.

use tracing::{debug, warn};

use crate::backend::{ApiGatewayBackend, RestApiSummary, REST_API_PAGE_LIMIT};
use crate::error::{RemoteError, RetentionError};

/// Lazily walks `GetRestApis`, one request per page.
///
/// Pages are fetched strictly in order since each request carries the cursor
/// returned by the previous one. Iteration ends once a page arrives without a
/// cursor.
pub struct RestApiPages<'a> {
    backend: &'a dyn ApiGatewayBackend,
    limit: i32,
    position: Option<String>,
    finished: bool,
}

impl<'a> RestApiPages<'a> {
    pub fn new(backend: &'a dyn ApiGatewayBackend) -> Self {
        Self::with_limit(backend, REST_API_PAGE_LIMIT)
    }

    pub fn with_limit(backend: &'a dyn ApiGatewayBackend, limit: i32) -> Self {
        Self {
            backend,
            limit,
            position: None,
            finished: false,
        }
    }

    /// Fetch the next page, or `None` once the listing is exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Vec<RestApiSummary>>, RemoteError> {
        if self.finished {
            return Ok(None);
        }

        let page = self
            .backend
            .get_rest_apis(self.position.take(), self.limit)
            .await?;

        debug!(
            items = page.items.len(),
            has_more = page.position.is_some(),
            "fetched rest api page"
        );

        match page.position {
            Some(position) if !position.is_empty() => self.position = Some(position),
            _ => self.finished = true,
        }

        Ok(Some(page.items))
    }

    /// Drain every remaining page into one list, preserving listing order.
    pub async fn collect_all(mut self) -> Result<Vec<RestApiSummary>, RemoteError> {
        let mut apis = Vec::new();
        while let Some(items) = self.next_page().await? {
            apis.extend(items);
        }
        Ok(apis)
    }
}

/// Return the id of the first REST API named exactly `api_name`.
///
/// Listing order decides between duplicates; every additional match is
/// reported with a warning.
pub async fn locate_rest_api(
    backend: &dyn ApiGatewayBackend,
    api_name: &str,
) -> Result<String, RetentionError> {
    let apis = RestApiPages::new(backend).collect_all().await?;
    debug!(total = apis.len(), api_name, "searching rest apis");

    let mut matches = apis.into_iter().filter(|api| api.name == api_name);
    let Some(first) = matches.next() else {
        return Err(RetentionError::ApiNotFound {
            api_name: api_name.to_string(),
        });
    };

    let ignored: Vec<String> = matches.map(|api| api.id).collect();
    if !ignored.is_empty() {
        warn!(
            api_name,
            selected = %first.id,
            ignored = ?ignored,
            "multiple rest apis share this name; using the first one listed"
        );
    }

    Ok(first.id)
}
