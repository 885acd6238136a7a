/*
 *  Copyright 2025 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! Search query descriptors and result pages.
//!
//! A [`FacetFilter`] describes one search against the document store:
//! keyword, pagination window, sort keys, exact-match field filters, and
//! the fields to aggregate facets over. A [`Paging`] is the corresponding
//! result page.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Hard cap on a single page, mirroring the store's max window.
pub const MAX_QUANTITY: usize = 10_000;

/// Default page size when none is requested.
pub const DEFAULT_QUANTITY: usize = 10;

/// Sort direction for an order-by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

/// Values an exact-match field filter can take: a single value matches
/// equality (or membership for array fields), several values match any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Match documents whose field equals (or contains) this value
    One(String),
    /// Match documents whose field equals (or contains) any of these
    Many(Vec<String>),
}

impl FilterValue {
    /// The candidate values of this filter.
    pub fn values(&self) -> &[String] {
        match self {
            FilterValue::One(value) => std::slice::from_ref(value),
            FilterValue::Many(values) => values,
        }
    }
}

/// A search-query descriptor sent to the document store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacetFilter {
    /// Free-text keyword, matched case-insensitively over string fields
    #[serde(default)]
    pub keyword: Option<String>,
    /// Offset of the first result
    #[serde(default)]
    pub from: usize,
    /// Page size; clamped to [`MAX_QUANTITY`]
    #[serde(default)]
    pub quantity: Option<usize>,
    /// Sort keys, applied in order
    #[serde(default)]
    pub order_by: Vec<(String, SortOrder)>,
    /// Exact-match field filters; keys are document fields
    #[serde(default)]
    pub filters: BTreeMap<String, FilterValue>,
    /// Fields to aggregate facet counts over
    #[serde(default)]
    pub browse_by: Vec<String>,
}

impl FacetFilter {
    /// Creates an empty filter with default paging.
    pub fn new() -> Self {
        FacetFilter::default()
    }

    /// Sets the free-text keyword.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        self.keyword = (!keyword.is_empty()).then_some(keyword);
        self
    }

    /// Adds a single-valued exact-match filter.
    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters
            .insert(field.into(), FilterValue::One(value.into()));
        self
    }

    /// Adds a multi-valued (match-any) filter.
    pub fn with_filter_values(mut self, field: impl Into<String>, values: Vec<String>) -> Self {
        self.filters.insert(field.into(), FilterValue::Many(values));
        self
    }

    /// Sets the paging window.
    pub fn with_paging(mut self, from: usize, quantity: usize) -> Self {
        self.from = from;
        self.quantity = Some(quantity);
        self
    }

    /// Appends a sort key.
    pub fn with_order(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.order_by.push((field.into(), order));
        self
    }

    /// Requests facet aggregation over a field.
    pub fn with_browse_by(mut self, field: impl Into<String>) -> Self {
        self.browse_by.push(field.into());
        self
    }

    /// The effective page size after defaulting and clamping.
    pub fn effective_quantity(&self) -> usize {
        self.quantity.unwrap_or(DEFAULT_QUANTITY).min(MAX_QUANTITY)
    }
}

/// One value bucket of a facet aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetValue {
    /// The field value
    pub value: String,
    /// Number of matching documents carrying it
    pub count: usize,
}

/// A facet aggregation over one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    /// The aggregated field
    pub field: String,
    /// Display label
    pub label: String,
    /// Buckets, ordered by descending count
    pub values: Vec<FacetValue>,
}

/// One page of search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging<T> {
    /// Total number of matching documents
    pub total: usize,
    /// Offset of the first returned result
    pub from: usize,
    /// Offset one past the last returned result
    pub to: usize,
    /// The page of results
    pub results: Vec<T>,
    /// Facet aggregations, when requested
    pub facets: Vec<Facet>,
}

impl<T> Paging<T> {
    /// An empty page.
    pub fn empty() -> Self {
        Paging {
            total: 0,
            from: 0,
            to: 0,
            results: Vec::new(),
            facets: Vec::new(),
        }
    }

    /// Maps the result type, preserving paging and facets. Items whose
    /// conversion fails are dropped from the page (the total is kept).
    pub fn filter_map_results<U>(self, f: impl FnMut(T) -> Option<U>) -> Paging<U> {
        Paging {
            total: self.total,
            from: self.from,
            to: self.to,
            results: self.results.into_iter().filter_map(f).collect(),
            facets: self.facets,
        }
    }
}
