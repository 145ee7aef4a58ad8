//! # Catalog Queries
//!
//! Filtering, price sorting and pagination for catalog listings. Everything here is pure: the
//! catalog hands over its records (already in id order) and [`paginate`] returns one page and
//! its metadata. Identical inputs always produce identical pages.

use crate::model::Product;
use serde::Serialize;

/// Page size used when the requested limit is not positive.
pub const DEFAULT_LIMIT: u64 = 10;

/// Price ordering for a listing. Ties are always broken by ascending product id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriceSort {
    #[default]
    Unsorted,
    Asc,
    Desc,
}

impl PriceSort {
    /// Parses the `sort` query parameter. Anything but `asc`/`desc` leaves the listing unsorted.
    pub fn from_param(value: &str) -> Self {
        match value {
            "asc" => PriceSort::Asc,
            "desc" => PriceSort::Desc,
            _ => PriceSort::Unsorted,
        }
    }

    fn as_param(self) -> Option<&'static str> {
        match self {
            PriceSort::Unsorted => None,
            PriceSort::Asc => Some("asc"),
            PriceSort::Desc => Some("desc"),
        }
    }
}

/// Which products a listing includes. Price bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        self.category
            .as_deref()
            .map_or(true, |category| product.category == category)
            && self.min_price.map_or(true, |min| product.price >= min)
            && self.max_price.map_or(true, |max| product.price <= max)
    }
}

/// A listing request. `page` and `limit` are taken as given and normalized by [`paginate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub filter: ProductFilter,
    pub sort: PriceSort,
    pub page: i64,
    pub limit: i64,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            filter: ProductFilter::default(),
            sort: PriceSort::Unsorted,
            page: 1,
            limit: DEFAULT_LIMIT as i64,
        }
    }
}

impl ListingQuery {
    pub fn page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn sort(mut self, sort: PriceSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.filter.category = Some(category.into());
        self
    }

    pub fn price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.filter.min_price = min;
        self.filter.max_price = max;
        self
    }

    fn normalized(&self) -> (u64, u64) {
        let page = if self.page <= 0 { 1 } else { self.page as u64 };
        let limit = if self.limit <= 0 {
            DEFAULT_LIMIT
        } else {
            self.limit as u64
        };
        (page, limit)
    }

    /// Query string for `page`, carrying the active filter and sort. Values are form-encoded.
    fn link(&self, page: u64, limit: u64) -> String {
        let mut params = form_urlencoded::Serializer::new(String::from("?"));
        params
            .append_pair("limit", &limit.to_string())
            .append_pair("page", &page.to_string());
        if let Some(category) = &self.filter.category {
            params.append_pair("query", category);
        }
        if let Some(min) = self.filter.min_price {
            params.append_pair("minPrice", &min.to_string());
        }
        if let Some(max) = self.filter.max_price {
            params.append_pair("maxPrice", &max.to_string());
        }
        if let Some(sort) = self.sort.as_param() {
            params.append_pair("sort", sort);
        }
        params.finish()
    }
}

/// A numbered link for page navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub text: u64,
    pub link: String,
}

/// One page of a listing plus its metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(rename = "payload")]
    pub items: Vec<T>,
    pub total_docs: u64,
    pub limit: u64,
    pub total_pages: u64,
    pub page: u64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<u64>,
    pub next_page: Option<u64>,
    pub prev_link: Option<String>,
    pub next_link: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub page_links: Vec<PageLink>,
}

/// Filters, orders and slices `products` according to `query`.
///
/// Non-positive `limit` becomes [`DEFAULT_LIMIT`], non-positive `page` becomes 1. There is
/// always at least one page; a page past the end is empty with no next page.
pub fn paginate(products: Vec<Product>, query: &ListingQuery) -> Page<Product> {
    let (page, limit) = query.normalized();

    let mut matching: Vec<Product> = products
        .into_iter()
        .filter(|p| query.filter.matches(p))
        .collect();
    match query.sort {
        PriceSort::Unsorted => matching.sort_by(|a, b| a.id.cmp(&b.id)),
        PriceSort::Asc => {
            matching.sort_by(|a, b| a.price.total_cmp(&b.price).then(a.id.cmp(&b.id)))
        }
        PriceSort::Desc => {
            matching.sort_by(|a, b| b.price.total_cmp(&a.price).then(a.id.cmp(&b.id)))
        }
    }

    let total_docs = matching.len() as u64;
    let total_pages = total_docs.div_ceil(limit).max(1);
    let has_prev_page = page > 1;
    let has_next_page = page < total_pages;
    let prev_page = has_prev_page.then(|| page - 1);
    let next_page = has_next_page.then(|| page + 1);

    let items = matching
        .into_iter()
        .skip(((page - 1).saturating_mul(limit)) as usize)
        .take(limit as usize)
        .collect();

    Page {
        items,
        total_docs,
        limit,
        total_pages,
        page,
        has_prev_page,
        has_next_page,
        prev_page,
        next_page,
        prev_link: prev_page.map(|p| query.link(p, limit)),
        next_link: next_page.map(|p| query.link(p, limit)),
        page_links: (1..=total_pages)
            .map(|p| PageLink {
                text: p,
                link: query.link(p, limit),
            })
            .collect(),
    }
}
