//! Chained-property filter
//!
//! A chained reference like `Author.Employer` has no true join in the engine.
//! It is approximated by resolving the chain back-to-front with one sub-query
//! per link: the inner filter selects pages, their document ids become a
//! value-set filter over the predecessor's page field, and so on until the
//! chain terminates. Correctness is bounded by the result-window cap on each
//! sub-query.

use serde_json::Value;
use tracing::debug;

use crate::client::SearchClient;
use crate::error::Result;
use crate::mapping::PropertyFieldMapper;
use crate::query::engine::QueryEngine;
use crate::query::filters::{Filter, ValuesFilter};
use crate::query::types::Occur;

/// Filter over a chained property, wrapping an inner filter on the chain's
/// rightmost property
///
/// Compiling a chained filter directly is an error; it must first be resolved
/// into its terminal filter via [`ChainedFilter::resolve`], which executes one
/// search round-trip per chain link.
#[derive(Clone, Debug)]
pub struct ChainedFilter {
    property: PropertyFieldMapper,
    inner: Box<Filter>,
}

impl ChainedFilter {
    /// Create a new chained filter
    ///
    /// `property` is the chain's rightmost mapper; `inner` is the filter built
    /// against it.
    pub fn new(property: PropertyFieldMapper, inner: Filter) -> Self {
        Self {
            property,
            inner: Box::new(inner),
        }
    }

    pub fn property(&self) -> &PropertyFieldMapper {
        &self.property
    }

    /// Name of the chain's leftmost property, which the terminal filter targets
    pub fn terminal_property(&self) -> &PropertyFieldMapper {
        let mut mapper = &self.property;
        while let Some(predecessor) = mapper.chained() {
            mapper = predecessor;
        }
        mapper
    }

    /// Resolve the chain into its terminal filter
    ///
    /// Executes one capped sub-query per chain link, strictly sequentially. A
    /// failed sub-query fails the whole resolution; there is no retry.
    pub fn resolve(
        &self,
        client: &dyn SearchClient,
        index: &str,
        max_size: u64,
    ) -> Result<Filter> {
        let mut filter = (*self.inner).clone();
        let mut link = self.property.chained().cloned();
        while let Some(predecessor) = link {
            let ids = run_link_query(client, index, &filter, max_size)?;
            debug!(
                property = predecessor.name(),
                hits = ids.len(),
                "resolved chain link"
            );
            filter = Filter::from(ValuesFilter::on_page_id_field(predecessor.clone(), ids));
            link = predecessor.chained().cloned();
        }
        Ok(filter)
    }
}

/// Execute one link's sub-query and collect the document id of every hit
fn run_link_query(
    client: &dyn SearchClient,
    index: &str,
    filter: &Filter,
    max_size: u64,
) -> Result<Vec<Value>> {
    let mut engine = QueryEngine::new(index);
    engine.set_limit(max_size);
    engine.add_constant_score_filter(filter.clone(), Occur::Must)?;
    let query = engine.to_query()?;
    let response = client.search(&query)?;
    Ok(response
        .hits
        .hits
        .into_iter()
        .map(|hit| match hit.id.parse::<i64>() {
            Ok(id) => Value::from(id),
            Err(_) => Value::String(hit.id),
        })
        .collect())
}
