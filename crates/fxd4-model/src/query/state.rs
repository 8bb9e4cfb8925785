//! Accumulated read directives.

use url::Url;

use crate::query::clause::{Filter, OrderClause};

/// Filters, sort keys and row limit waiting to be executed.
///
/// Owned by exactly one [`super::QueryBuilder`]; it disappears with the
/// builder when a terminal fetch consumes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    filters: Vec<Filter>,
    orders: Vec<OrderClause>,
    limit: Option<u32>,
}

impl QueryState {
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn orders(&self) -> &[OrderClause] {
        &self.orders
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.orders.is_empty() && self.limit.is_none()
    }

    pub(crate) fn push_filter(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    pub(crate) fn push_order(&mut self, order: OrderClause) {
        self.orders.push(order);
    }

    pub(crate) fn set_limit(&mut self, limit: u32) {
        self.limit = Some(limit);
    }

    /// Appends the state to `url` as query parameters, filters first in call
    /// order, then `order`, then `limit`.
    pub fn apply_to(&self, url: &mut Url) {
        let mut pairs = url.query_pairs_mut();

        for filter in &self.filters {
            let (key, value) = filter.to_param();
            pairs.append_pair(&key, &value);
        }

        if !self.orders.is_empty() {
            let order = self
                .orders
                .iter()
                .map(OrderClause::to_param)
                .collect::<Vec<_>>()
                .join(",");
            pairs.append_pair("order", &order);
        }

        if let Some(limit) = self.limit {
            pairs.append_pair("limit", &limit.to_string());
        }
    }
}
