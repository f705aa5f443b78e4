//! Abstractions for offset/limit pagination.

use crate::query::{Encode, Encoder};

/// Page size of a list query.
///
/// Only the values `10`, `20`, `50` and `100` are representable.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Limit {
    /// 10 items per page.
    #[default]
    Ten,

    /// 20 items per page.
    Twenty,

    /// 50 items per page.
    Fifty,

    /// 100 items per page.
    Hundred,
}

impl Limit {
    /// Creates a new [`Limit`] from the provided number, if it represents an
    /// allowed page size.
    #[must_use]
    pub fn new(num: usize) -> Option<Self> {
        Some(match num {
            10 => Self::Ten,
            20 => Self::Twenty,
            50 => Self::Fifty,
            100 => Self::Hundred,
            _ => return None,
        })
    }

    /// Returns the number of items per page this [`Limit`] allows.
    #[must_use]
    pub const fn get(self) -> usize {
        match self {
            Self::Ten => 10,
            Self::Twenty => 20,
            Self::Fifty => 50,
            Self::Hundred => 100,
        }
    }
}

/// Offset of a list query, counted in items from the start of the whole
/// result set.
///
/// Stays a multiple of the current [`Limit`] as long as it's only moved with
/// [`Offset::advanced`]/[`Offset::receded`] and reset on [`Limit`] changes.
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd,
)]
pub struct Offset(usize);

impl Offset {
    /// Creates a new [`Offset`] with the provided value.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Returns the value of this [`Offset`].
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Returns this [`Offset`] moved one page forward.
    #[must_use]
    pub fn advanced(self, limit: Limit) -> Self {
        Self(self.0.saturating_add(limit.get()))
    }

    /// Returns this [`Offset`] moved one page backward, clamped at `0`.
    #[must_use]
    pub fn receded(self, limit: Limit) -> Self {
        Self(self.0.saturating_sub(limit.get()))
    }

    /// Indicates whether this [`Offset`] points at the first page.
    #[must_use]
    pub const fn is_start(self) -> bool {
        self.0 == 0
    }
}

/// Order of sorting.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Order {
    /// Ascending order.
    #[default]
    Ascending,

    /// Descending order.
    Descending,
}

impl Order {
    /// Returns the opposite [`Order`].
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Returns the prefix representing this [`Order`] in an `ordering` query
    /// parameter.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Ascending => "",
            Self::Descending => "-",
        }
    }
}

/// Sorting of a list query: a sort field paired with its [`Order`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Ordering<S> {
    /// Field to sort by.
    pub by: S,

    /// [`Order`] to sort in.
    pub order: Order,
}

impl<S> Ordering<S> {
    /// Creates a new [`Ordering`] by the provided field in
    /// [`Order::Ascending`].
    #[must_use]
    pub fn ascending(by: S) -> Self {
        Self {
            by,
            order: Order::Ascending,
        }
    }

    /// Creates a new [`Ordering`] by the provided field in
    /// [`Order::Descending`].
    #[must_use]
    pub fn descending(by: S) -> Self {
        Self {
            by,
            order: Order::Descending,
        }
    }
}

/// Search term of a list query.
///
/// Guaranteed to be non-empty and carrying no leading or trailing
/// whitespace.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Search(String);

impl Search {
    /// Creates a new [`Search`] from the provided input, returning [`None`]
    /// if it contains no searchable text.
    #[must_use]
    pub fn new(input: impl AsRef<str>) -> Option<Self> {
        let term = input.as_ref().trim();
        (!term.is_empty()).then(|| Self(term.into()))
    }

    /// Returns the term of this [`Search`].
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// State of a list query: page size, page position and optional refinements.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Params<S> {
    /// Page size.
    limit: Limit,

    /// Position of the page.
    offset: Offset,

    /// Sorting applied to the list.
    ordering: Option<Ordering<S>>,

    /// Search term refining the list.
    search: Option<Search>,
}

impl<S> Params<S> {
    /// Creates new default [`Params`]: the first page of the smallest
    /// [`Limit`], unsorted and unsearched.
    #[must_use]
    pub fn new() -> Self {
        Self {
            limit: Limit::default(),
            offset: Offset::default(),
            ordering: None,
            search: None,
        }
    }

    /// Returns the page size of these [`Params`].
    #[must_use]
    pub const fn limit(&self) -> Limit {
        self.limit
    }

    /// Returns the page position of these [`Params`].
    #[must_use]
    pub const fn offset(&self) -> Offset {
        self.offset
    }

    /// Returns the sorting of these [`Params`], if any.
    #[must_use]
    pub const fn ordering(&self) -> Option<&Ordering<S>> {
        self.ordering.as_ref()
    }

    /// Returns the search term of these [`Params`], if any.
    #[must_use]
    pub const fn search(&self) -> Option<&Search> {
        self.search.as_ref()
    }

    /// Changes the page size of these [`Params`].
    ///
    /// Always returns to the first page, as the old position may be out of
    /// range for the new page size.
    pub fn set_limit(&mut self, limit: Limit) {
        self.limit = limit;
        self.offset = Offset::default();
    }

    /// Changes the sorting of these [`Params`].
    pub fn set_ordering(&mut self, ordering: Option<Ordering<S>>) {
        self.ordering = ordering;
    }

    /// Changes the search term of these [`Params`].
    pub fn set_search(&mut self, search: Option<Search>) {
        self.search = search;
    }

    /// Moves these [`Params`] one page forward.
    pub fn advance(&mut self) {
        self.offset = self.offset.advanced(self.limit);
    }

    /// Moves these [`Params`] one page backward, stopping at the first page.
    pub fn recede(&mut self) {
        self.offset = self.offset.receded(self.limit);
    }

    /// Returns these [`Params`] to the first page.
    pub fn rewind(&mut self) {
        self.offset = Offset::default();
    }
}

impl<S> Default for Params<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: AsRef<str>> Encode for Params<S> {
    fn encode(&self, to: &mut Encoder) {
        to.param("limit", self.limit.get());
        to.param("offset", self.offset.get());
        if let Some(Ordering { by, order }) = &self.ordering {
            to.param("ordering", format!("{}{}", order.prefix(), by.as_ref()));
        }
        if let Some(search) = &self.search {
            to.param("search", search.as_str());
        }
    }
}

/// Selector of a list query: pagination [`Params`] plus a resource-specific
/// filter.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Selector<S, F> {
    /// Pagination parameters.
    pub params: Params<S>,

    /// Filter being applied to the list.
    pub filter: F,
}

impl<S, F: Default> Default for Selector<S, F> {
    fn default() -> Self {
        Self {
            params: Params::new(),
            filter: F::default(),
        }
    }
}

impl<S: AsRef<str>, F: Encode> Encode for Selector<S, F> {
    fn encode(&self, to: &mut Encoder) {
        self.params.encode(to);
        self.filter.encode(to);
    }
}

/// Opaque cursor pointing at a neighboring [`Page`].
///
/// Carried exactly as returned by a listing endpoint, never interpreted.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Cursor(String);

impl Cursor {
    /// Creates a new [`Cursor`] from the provided raw value.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw value of this [`Cursor`].
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of a list query result, as returned by a listing endpoint.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Page<T> {
    /// Total number of items matching the query.
    pub count: u64,

    /// [`Cursor`] of the next [`Page`], if it exists.
    pub next: Option<Cursor>,

    /// [`Cursor`] of the previous [`Page`], if it exists.
    pub previous: Option<Cursor>,

    /// Items of this [`Page`].
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Creates a new empty [`Page`].
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }

    /// Indicates whether a [`Page`] exists after this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Indicates whether a [`Page`] exists before this one.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Returns this [`Page`] with its results truncated to the provided
    /// [`Limit`].
    ///
    /// A well-behaved endpoint never exceeds the requested page size, but
    /// the [`Page`] invariant shouldn't depend on that.
    #[must_use]
    pub fn clamped(mut self, limit: Limit) -> Self {
        self.results.truncate(limit.get());
        self
    }

    /// Returns the 1-based [`Window`] of the whole result set this [`Page`]
    /// displays at the provided [`Offset`], or [`None`] if the [`Page`] is
    /// empty.
    #[must_use]
    pub fn window(&self, offset: Offset) -> Option<Window> {
        let len = u64::try_from(self.results.len()).ok().filter(|l| *l > 0)?;
        let from = u64::try_from(offset.get()).ok()?.saturating_add(1);
        Some(Window {
            from,
            to: from + len - 1,
            of: self.count,
        })
    }

    /// Maps the results of this [`Page`] with the provided function.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

/// 1-based display window of a [`Page`], as in "showing 1 to 10 of 42".
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Window {
    /// Number of the first displayed item.
    pub from: u64,

    /// Number of the last displayed item.
    pub to: u64,

    /// Total number of items matching the query.
    pub of: u64,
}

/// Direction of page navigation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    /// Navigation to the next [`Page`].
    Forward,

    /// Navigation to the previous [`Page`].
    Backward,
}

/// Defines pagination types.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($sort:ty, $filter:ty, $node:ty) => {
        #[doc = "Pagination parameters of a list query."]
        pub type Params = $crate::pagination::Params<$sort>;

        #[doc = "Sorting of a list query."]
        pub type Ordering = $crate::pagination::Ordering<$sort>;

        #[doc = "Selector of a list query."]
        pub type Selector = $crate::pagination::Selector<$sort, $filter>;

        #[doc = "One [`Page`] of a list query result."]
        pub type Page = $crate::pagination::Page<$node>;
    };
}

#[cfg(test)]
mod spec {
    use super::{Limit, Offset, Order, Ordering, Page, Params, Search};

    #[test]
    fn limit_allows_known_page_sizes_only() {
        assert_eq!(Limit::new(10), Some(Limit::Ten));
        assert_eq!(Limit::new(20), Some(Limit::Twenty));
        assert_eq!(Limit::new(50), Some(Limit::Fifty));
        assert_eq!(Limit::new(100), Some(Limit::Hundred));
        for num in [0, 1, 11, 25, 99, 101, 1000] {
            assert_eq!(Limit::new(num), None, "{num} must not be a page size");
        }
    }

    #[test]
    fn offset_recedes_clamped_at_zero() {
        let offset = Offset::new(10);
        assert_eq!(offset.receded(Limit::Ten), Offset::new(0));
        assert_eq!(offset.receded(Limit::Fifty), Offset::new(0));
        assert_eq!(Offset::new(0).receded(Limit::Ten), Offset::new(0));
    }

    #[test]
    fn offset_advances_by_page_size() {
        let offset = Offset::new(0).advanced(Limit::Ten);
        assert_eq!(offset, Offset::new(10));
        assert_eq!(offset.advanced(Limit::Ten), Offset::new(20));
    }

    #[test]
    fn changing_limit_resets_offset() {
        let mut params = Params::<&str>::new();
        params.advance();
        params.advance();
        assert_eq!(params.offset(), Offset::new(20));

        params.set_limit(Limit::Fifty);
        assert_eq!(params.limit(), Limit::Fifty);
        assert_eq!(params.offset(), Offset::new(0));
    }

    #[test]
    fn search_trims_and_rejects_empty_input() {
        let search = Search::new("  flu  ").unwrap();
        assert_eq!(search.as_str(), "flu");

        assert_eq!(Search::new(""), None);
        assert_eq!(Search::new("   "), None);
        assert_eq!(Search::new("\t\n"), None);
    }

    #[test]
    fn ordering_prefixes_descending_fields() {
        assert_eq!(Order::Ascending.prefix(), "");
        assert_eq!(Order::Descending.prefix(), "-");
        assert_eq!(Order::Ascending.reversed(), Order::Descending);

        let ordering = Ordering::descending("created_at");
        assert_eq!(ordering.order, Order::Descending);
    }

    #[test]
    fn page_clamps_results_to_limit() {
        let page = Page {
            count: 42,
            next: None,
            previous: None,
            results: (0..15).collect::<Vec<_>>(),
        };

        let clamped = page.clamped(Limit::Ten);
        assert_eq!(clamped.results.len(), 10);
        assert_eq!(clamped.count, 42);
    }

    #[test]
    fn page_window_is_one_based() {
        let page = Page {
            count: 42,
            next: None,
            previous: None,
            results: (0..10).collect::<Vec<_>>(),
        };

        let first = page.window(Offset::new(0)).unwrap();
        assert_eq!((first.from, first.to, first.of), (1, 10, 42));

        let second = page.window(Offset::new(10)).unwrap();
        assert_eq!((second.from, second.to, second.of), (11, 20, 42));
    }

    #[test]
    fn empty_page_has_no_window() {
        let page = Page::<u8>::empty();
        assert_eq!(page.window(Offset::new(0)), None);
    }
}
