//! [`Provider`]-related definitions.

use std::collections::HashMap;

use common::{
    pagination::{
        Direction, Limit, Offset, Ordering, Page, Search, Selector, Window,
    },
    query::Encode,
    Canonical,
};

/// State of one paginated list: its query [`Selector`], the responses cached
/// for this list's lifetime, and the fetch currently in flight.
///
/// A [`Provider`] is pure state driven by its consumer: mutators move the
/// [`Selector`], [`Provider::plan`] says whether a fetch is due, and
/// [`Provider::resolve`]/[`Provider::fail`] feed the outcome back. Responses
/// are keyed by the [`Canonical`] form of the [`Selector`], so equal query
/// states never fetch twice.
#[derive(Debug)]
pub struct Provider<S, F, N> {
    /// Current query state.
    selector: Selector<S, F>,

    /// [`Canonical`] key of the [`Provider::selector`].
    key: Canonical,

    /// Responses received so far, keyed by the query they answer.
    cache: HashMap<Canonical, Cached<N>>,

    /// Key of the fetch currently in flight, if any.
    in_flight: Option<Canonical>,

    /// Key of the last resolved response, kept on display while a newer
    /// query loads.
    shown: Option<Canonical>,
}

/// Cached response of a [`Provider`].
#[derive(Debug)]
struct Cached<N> {
    /// [`Offset`] the response was requested at.
    offset: Offset,

    /// Received [`Page`].
    page: Page<N>,
}

/// One fetch planned by a [`Provider`].
#[derive(Debug)]
pub struct Plan<S, F> {
    /// [`Canonical`] key identifying the planned fetch.
    pub key: Canonical,

    /// [`Selector`] to perform the fetch with.
    pub selector: Selector<S, F>,
}

impl<S, F, N> Provider<S, F, N>
where
    S: AsRef<str>,
    F: Encode,
{
    /// Creates a new [`Provider`] starting from the provided [`Selector`].
    #[must_use]
    pub fn new(selector: Selector<S, F>) -> Self {
        let key = Canonical::of(&selector);
        Self {
            selector,
            key,
            cache: HashMap::new(),
            in_flight: None,
            shown: None,
        }
    }

    /// Returns the current [`Selector`] of this [`Provider`].
    #[must_use]
    pub fn selector(&self) -> &Selector<S, F> {
        &self.selector
    }

    /// Plans the fetch answering the current query, if one is due.
    ///
    /// A fetch is due only when the current key is neither cached nor
    /// already in flight, so a [`Provider`] never has more than one request
    /// outstanding and never re-requests an answered query.
    pub fn plan(&mut self) -> Option<Plan<S, F>>
    where
        S: Clone,
        F: Clone,
    {
        if self.cache.contains_key(&self.key) || self.in_flight.is_some() {
            return None;
        }
        self.in_flight = Some(self.key.clone());
        Some(Plan {
            key: self.key.clone(),
            selector: self.selector.clone(),
        })
    }

    /// Accepts the [`Page`] answering the fetch planned under `key`.
    ///
    /// A response whose `key` no longer matches the current query is
    /// discarded: it answers a superseded state and must not overwrite a
    /// newer one.
    pub fn resolve(&mut self, key: Canonical, page: Page<N>) {
        if self.in_flight.as_ref() == Some(&key) {
            self.in_flight = None;
        }
        if key != self.key {
            return;
        }

        let _ = self.cache.insert(
            key.clone(),
            Cached {
                offset: self.selector.params.offset(),
                page,
            },
        );
        self.shown = Some(key);
    }

    /// Reports the failure of the fetch planned under `key`, making a retry
    /// plannable again.
    pub fn fail(&mut self, key: &Canonical) {
        if self.in_flight.as_ref() == Some(key) {
            self.in_flight = None;
        }
    }

    /// Returns the [`Page`] to display.
    ///
    /// While the current query is still loading, the previously displayed
    /// [`Page`] keeps answering, so the list never blanks out on a query
    /// change.
    #[must_use]
    pub fn page(&self) -> Option<&Page<N>> {
        self.entry().map(|cached| &cached.page)
    }

    /// Returns the 1-based display [`Window`] of the displayed [`Page`].
    #[must_use]
    pub fn window(&self) -> Option<Window> {
        self.entry()
            .and_then(|cached| cached.page.window(cached.offset))
    }

    /// Indicates whether the current query is still unanswered.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        !self.cache.contains_key(&self.key)
    }

    /// Moves the current query one page in the provided [`Direction`].
    ///
    /// No-op (returning `false`) if the current query's [`Page`] has no
    /// cursor in that [`Direction`], or when moving backward from the first
    /// page.
    ///
    /// While the current query is still loading, only the superseded
    /// [`Page`] is on display, and its cursors say nothing about the new
    /// one, so navigation stays a no-op until the answer arrives.
    pub fn navigate(&mut self, direction: Direction) -> bool {
        let (has_next, has_previous) = match self.cache.get(&self.key) {
            Some(cached) => {
                (cached.page.has_next(), cached.page.has_previous())
            }
            None => return false,
        };

        match direction {
            Direction::Forward if has_next => self.selector.params.advance(),
            Direction::Backward
                if has_previous
                    && !self.selector.params.offset().is_start() =>
            {
                self.selector.params.recede();
            }
            Direction::Forward | Direction::Backward => return false,
        }
        self.rekey();
        true
    }

    /// Changes the page size of the current query, returning to the first
    /// page.
    pub fn set_limit(&mut self, limit: Limit) {
        self.selector.params.set_limit(limit);
        self.rekey();
    }

    /// Changes the search term of the current query, returning to the first
    /// page, as the old position is meaningless in the refined list.
    pub fn set_search(&mut self, search: Option<Search>) {
        self.selector.params.set_search(search);
        self.selector.params.rewind();
        self.rekey();
    }

    /// Changes the sorting of the current query, keeping the page position.
    pub fn set_ordering(&mut self, ordering: Option<Ordering<S>>) {
        self.selector.params.set_ordering(ordering);
        self.rekey();
    }

    /// Replaces the filter of the current query, returning to the first
    /// page.
    pub fn set_filter(&mut self, filter: F) {
        self.selector.filter = filter;
        self.selector.params.rewind();
        self.rekey();
    }

    /// Evicts the cached answer of the current query, making a fresh fetch
    /// plannable.
    pub fn refetch(&mut self) {
        let _ = self.cache.remove(&self.key);
        if self.shown.as_ref() == Some(&self.key) {
            self.shown = None;
        }
        if self.in_flight.as_ref() == Some(&self.key) {
            self.in_flight = None;
        }
    }

    /// Returns the cached entry to display: the current one, or the last
    /// shown one while the current is loading.
    fn entry(&self) -> Option<&Cached<N>> {
        self.cache.get(&self.key).or_else(|| {
            self.shown.as_ref().and_then(|key| self.cache.get(key))
        })
    }

    /// Recomputes the [`Canonical`] key after a [`Selector`] change.
    fn rekey(&mut self) {
        self.key = Canonical::of(&self.selector);
    }
}

#[cfg(test)]
mod spec {
    use common::{
        pagination::{
            Cursor, Direction, Limit, Offset, Page, Search, Selector,
        },
        query::{Encode, Encoder},
    };

    use super::Provider;

    #[derive(Clone)]
    struct Filter(Option<&'static str>);

    impl Encode for Filter {
        fn encode(&self, to: &mut Encoder) {
            if let Some(gender) = self.0 {
                to.param("gender", gender);
            }
        }
    }

    fn provider() -> Provider<&'static str, (), u8> {
        Provider::new(Selector::<&'static str, ()>::default())
    }

    fn page(results: usize, next: bool, previous: bool) -> Page<u8> {
        Page {
            count: 42,
            next: next.then(|| Cursor::new("next")),
            previous: previous.then(|| Cursor::new("previous")),
            results: vec![0; results],
        }
    }

    #[test]
    fn plans_fetch_once_per_key() {
        let mut provider = provider();

        let plan = provider.plan().expect("first fetch must be planned");
        assert!(
            provider.plan().is_none(),
            "must not double-issue while in flight",
        );

        provider.resolve(plan.key, page(10, true, false));
        assert!(
            provider.plan().is_none(),
            "answered query must not be re-requested",
        );
    }

    #[test]
    fn failed_fetch_may_be_retried() {
        let mut provider = provider();

        let plan = provider.plan().unwrap();
        provider.fail(&plan.key);

        assert!(provider.plan().is_some());
    }

    #[test]
    fn discards_response_of_superseded_key() {
        let mut provider = provider();

        let stale = provider.plan().unwrap();
        provider.set_search(Search::new("flu"));
        provider.resolve(stale.key, page(10, false, false));

        assert!(provider.page().is_none(), "stale response must not show");
        assert!(
            provider.plan().is_some(),
            "the current key must still be fetchable",
        );
    }

    #[test]
    fn keeps_previous_page_while_new_key_loads() {
        let mut provider = provider();

        let plan = provider.plan().unwrap();
        provider.resolve(plan.key, page(10, true, false));

        provider.set_search(Search::new("flu"));
        assert!(provider.is_loading());
        assert!(
            provider.page().is_some(),
            "previous page must stay on display",
        );
    }

    #[test]
    fn navigation_requires_cursor() {
        let mut provider = provider();

        assert!(
            !provider.navigate(Direction::Forward),
            "nothing to navigate before the first page arrives",
        );

        let plan = provider.plan().unwrap();
        provider.resolve(plan.key, page(10, false, false));

        assert!(!provider.navigate(Direction::Forward));
        assert!(!provider.navigate(Direction::Backward));
        assert_eq!(provider.selector().params.offset(), Offset::new(0));
    }

    #[test]
    fn navigation_moves_offset_one_page() {
        let mut provider = provider();

        let plan = provider.plan().unwrap();
        provider.resolve(plan.key, page(10, true, false));

        let first = provider.window().unwrap();
        assert_eq!((first.from, first.to, first.of), (1, 10, 42));

        assert!(provider.navigate(Direction::Forward));
        assert_eq!(provider.selector().params.offset(), Offset::new(10));

        let plan = provider.plan().unwrap();
        provider.resolve(plan.key, page(10, true, true));

        let second = provider.window().unwrap();
        assert_eq!((second.from, second.to, second.of), (11, 20, 42));
    }

    #[test]
    fn navigation_waits_for_the_loading_page() {
        let mut provider = provider();

        let plan = provider.plan().unwrap();
        provider.resolve(plan.key, page(10, true, false));

        provider.set_search(Search::new("flu"));
        assert!(provider.is_loading());
        assert!(
            provider.page().is_some(),
            "superseded page must stay on display",
        );

        assert!(
            !provider.navigate(Direction::Forward),
            "displayed cursors must not move the loading query",
        );
        assert_eq!(provider.selector().params.offset(), Offset::new(0));
    }

    #[test]
    fn backward_navigation_stops_at_start() {
        let mut provider = provider();

        let plan = provider.plan().unwrap();
        // A misbehaving endpoint may report a `previous` cursor on the
        // first page; the offset gate must still hold.
        provider.resolve(plan.key, page(10, false, true));

        assert!(!provider.navigate(Direction::Backward));
        assert_eq!(provider.selector().params.offset(), Offset::new(0));
    }

    #[test]
    fn changing_limit_rewinds_to_first_page() {
        let mut provider = provider();

        let plan = provider.plan().unwrap();
        provider.resolve(plan.key, page(10, true, false));
        assert!(provider.navigate(Direction::Forward));

        provider.set_limit(Limit::Fifty);
        assert_eq!(provider.selector().params.limit(), Limit::Fifty);
        assert_eq!(provider.selector().params.offset(), Offset::new(0));
    }

    #[test]
    fn changing_filter_rewinds_to_first_page() {
        let mut provider = Provider::<&'static str, Filter, u8>::new(
            Selector {
                params: common::pagination::Params::new(),
                filter: Filter(None),
            },
        );

        let plan = provider.plan().unwrap();
        provider.resolve(plan.key, page(10, true, false));
        assert!(provider.navigate(Direction::Forward));

        provider.set_filter(Filter(Some("FEMALE")));
        assert_eq!(provider.selector().params.offset(), Offset::new(0));
        assert!(provider.plan().is_some(), "narrowed key must fetch anew");
    }

    #[test]
    fn returning_to_cached_key_skips_fetch() {
        let mut provider = provider();

        let plan = provider.plan().unwrap();
        provider.resolve(plan.key, page(10, true, false));

        provider.set_search(Search::new("flu"));
        let refined = provider.plan().unwrap();
        provider.resolve(refined.key, page(3, false, false));

        provider.set_search(None);
        assert!(
            provider.plan().is_none(),
            "the original page is already cached",
        );
        assert_eq!(provider.page().unwrap().results.len(), 10);
    }

    #[test]
    fn refetch_evicts_and_plans_anew() {
        let mut provider = provider();

        let plan = provider.plan().unwrap();
        provider.resolve(plan.key, page(10, true, false));
        assert!(provider.plan().is_none());

        provider.refetch();
        assert!(provider.is_loading());
        assert!(provider.plan().is_some());
    }
}
