//! Displayed user list with paging, filtering and sorting state.
//!
//! Fetching is split into `begin_fetch` / `complete_fetch` so the caller owns
//! the network call. A ticket is only handed out when no fetch is in flight
//! and more data is available. Every filter change bumps the generation, and
//! tickets from an older generation are discarded on completion.

use crate::api::UserSource;
use crate::filter::FilterState;
use crate::model::{Gender, User, UsersPage, PAGE_SIZE};
use crate::sort::{sort_users, SortField, SortState};
use anyhow::Result;

/// Permission to fetch one page, issued by `UserList::begin_fetch`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub page: usize,
    generation: u64,
}

impl FetchTicket {
    pub fn limit(&self) -> usize {
        PAGE_SIZE
    }

    pub fn skip(&self) -> usize {
        self.page * PAGE_SIZE
    }
}

/// Result of applying a completed fetch
#[derive(Debug)]
pub enum FetchOutcome {
    Loaded { page: usize, raw: usize, kept: usize },
    Failed(anyhow::Error),
    /// Filters changed while the request was in flight
    Stale,
}

#[derive(Debug, Default)]
pub struct UserList {
    users: Vec<User>,
    cursor: usize,
    has_more: bool,
    in_flight: bool,
    generation: u64,
    filters: FilterState,
    sort: SortState,
    /// Set once the user picks a sort; until then rows stay in API order
    sort_active: bool,
}

impl UserList {
    pub fn new(filters: FilterState) -> Self {
        Self {
            has_more: true,
            filters,
            ..Default::default()
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn sort_active(&self) -> bool {
        self.sort_active
    }

    /// Hand out a ticket for the page at the cursor, if allowed
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        if self.in_flight || !self.has_more {
            return None;
        }
        self.in_flight = true;
        Some(FetchTicket {
            page: self.cursor,
            generation: self.generation,
        })
    }

    /// Apply the result of a fetch started with `begin_fetch`
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Result<UsersPage>) -> FetchOutcome {
        if ticket.generation != self.generation {
            return FetchOutcome::Stale;
        }
        self.in_flight = false;

        let page = match result {
            Ok(page) => page,
            Err(e) => return FetchOutcome::Failed(e),
        };

        let raw = page.users.len();
        let batch = self.filters.apply(page.users);
        let kept = batch.len();

        if ticket.page == 0 {
            self.users = batch;
        } else {
            self.users.extend(batch);
        }
        if self.sort_active {
            sort_users(&mut self.users, &self.sort);
        }

        self.cursor = ticket.page + 1;
        if raw < PAGE_SIZE {
            self.has_more = false;
        }

        FetchOutcome::Loaded {
            page: ticket.page,
            raw,
            kept,
        }
    }

    /// Fetch the page at the cursor through `source`. Returns `None` when no
    /// fetch was allowed.
    pub fn fetch_next(&mut self, source: &dyn UserSource) -> Option<FetchOutcome> {
        let ticket = self.begin_fetch()?;
        let result = source.fetch_page(ticket.limit(), ticket.skip());
        Some(self.complete_fetch(ticket, result))
    }

    /// Header click on a sortable column
    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort.toggle(field);
        self.sort_active = true;
        sort_users(&mut self.users, &self.sort);
    }

    /// Apply a sort chosen up front (e.g. from the command line)
    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
        self.sort_active = true;
        sort_users(&mut self.users, &self.sort);
    }

    pub fn set_gender(&mut self, gender: Option<Gender>) {
        let mut filters = self.filters.clone();
        filters.gender = gender;
        self.set_filters(filters);
    }

    pub fn set_country(&mut self, text: &str) {
        let mut filters = self.filters.clone();
        filters.set_country(text);
        self.set_filters(filters);
    }

    /// Start a new filter session: cursor 0, empty list, pagination re-enabled.
    /// Any in-flight fetch becomes stale.
    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
        self.cursor = 0;
        self.users.clear();
        self.has_more = true;
        self.in_flight = false;
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_user;
    use crate::sort::SortOrder;
    use anyhow::anyhow;
    use std::cell::RefCell;

    /// Serves pages out of a fixed record set, like `/users?limit&skip`
    struct MockSource {
        records: Vec<User>,
        calls: RefCell<Vec<(usize, usize)>>,
        fail: RefCell<bool>,
    }

    impl MockSource {
        fn new(count: u64) -> Self {
            let countries = ["United States", "Germany", "United Kingdom"];
            let names = ["zoe", "Adam", "mia", "Liam", "emma", "Noah", "ava"];
            let records = (1..=count)
                .map(|id| {
                    let gender = if id % 2 == 0 {
                        Gender::Female
                    } else {
                        Gender::Male
                    };
                    test_user(
                        id,
                        names[(id as usize) % names.len()],
                        20 + ((id * 7) % 30) as u32,
                        gender,
                        countries[(id as usize) % countries.len()],
                    )
                })
                .collect();
            Self {
                records,
                calls: RefCell::new(Vec::new()),
                fail: RefCell::new(false),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl UserSource for MockSource {
        fn fetch_page(&self, limit: usize, skip: usize) -> Result<UsersPage> {
            self.calls.borrow_mut().push((limit, skip));
            if *self.fail.borrow() {
                return Err(anyhow!("Request failed: connection reset"));
            }
            let users = self.records.iter().skip(skip).take(limit).cloned().collect();
            Ok(UsersPage::new(users))
        }
    }

    fn ids(list: &UserList) -> Vec<u64> {
        list.users().iter().map(|u| u.id).collect()
    }

    #[test]
    fn test_first_page_in_api_order() {
        let source = MockSource::new(30);
        let mut list = UserList::new(FilterState::default());

        let outcome = list.fetch_next(&source).unwrap();
        assert!(matches!(outcome, FetchOutcome::Loaded { page: 0, raw: 10, kept: 10 }));
        assert_eq!(ids(&list), (1..=10).collect::<Vec<_>>());
        assert_eq!(list.cursor(), 1);
        assert!(list.has_more());
        assert_eq!(source.calls.borrow()[0], (10, 0));
    }

    #[test]
    fn test_scroll_appends_next_page() {
        let source = MockSource::new(30);
        let mut list = UserList::new(FilterState::default());
        list.fetch_next(&source);
        list.fetch_next(&source);

        assert_eq!(ids(&list), (1..=20).collect::<Vec<_>>());
        assert_eq!(source.calls.borrow()[1], (10, 10));
        assert_eq!(list.cursor(), 2);
    }

    #[test]
    fn test_short_page_disables_pagination() {
        // 17 records: second page returns 7
        let source = MockSource::new(17);
        let mut list = UserList::new(FilterState::default());
        list.fetch_next(&source);
        assert!(list.has_more());
        list.fetch_next(&source);
        assert!(!list.has_more());
        assert_eq!(list.users().len(), 17);

        assert!(list.fetch_next(&source).is_none());
        assert!(list.fetch_next(&source).is_none());
        assert_eq!(source.call_count(), 2);
    }

    #[test]
    fn test_short_page_uses_raw_count_not_filtered_count() {
        let source = MockSource::new(30);
        let mut list = UserList::new(FilterState::new(Some(Gender::Female), None));
        list.fetch_next(&source);
        // Only 5 of 10 survive the filter, but the raw page was full
        assert_eq!(list.users().len(), 5);
        assert!(list.has_more());
    }

    #[test]
    fn test_gender_filter_resets_session() {
        let source = MockSource::new(30);
        let mut list = UserList::new(FilterState::default());
        list.fetch_next(&source);
        list.fetch_next(&source);
        assert_eq!(list.cursor(), 2);

        list.set_gender(Some(Gender::Female));
        assert_eq!(list.cursor(), 0);
        assert!(list.users().is_empty());

        list.fetch_next(&source);
        assert_eq!(source.calls.borrow().last(), Some(&(10, 0)));
        assert!(!list.users().is_empty());
        assert!(list.users().iter().all(|u| u.gender == Gender::Female));
    }

    #[test]
    fn test_filter_change_re_enables_pagination() {
        let source = MockSource::new(7);
        let mut list = UserList::new(FilterState::default());
        list.fetch_next(&source);
        assert!(!list.has_more());

        list.set_country("germany");
        assert!(list.has_more());
        list.fetch_next(&source);
        assert!(list
            .users()
            .iter()
            .all(|u| u.address.country.to_lowercase().contains("germany")));
    }

    #[test]
    fn test_in_flight_guard() {
        let mut list = UserList::new(FilterState::default());
        let ticket = list.begin_fetch().unwrap();
        assert!(list.is_loading());
        assert!(list.begin_fetch().is_none());

        list.complete_fetch(ticket, Ok(UsersPage::new(vec![])));
        assert!(!list.is_loading());
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut list = UserList::new(FilterState::default());
        let ticket = list.begin_fetch().unwrap();
        list.set_gender(Some(Gender::Male));

        let page = UsersPage::new(vec![test_user(1, "Ann", 30, Gender::Female, "Peru")]);
        let outcome = list.complete_fetch(ticket, Ok(page));
        assert!(matches!(outcome, FetchOutcome::Stale));
        assert!(list.users().is_empty());
        assert!(list.has_more());
        assert_eq!(list.cursor(), 0);
    }

    #[test]
    fn test_failure_leaves_state_intact() {
        let source = MockSource::new(30);
        let mut list = UserList::new(FilterState::default());
        list.fetch_next(&source);

        *source.fail.borrow_mut() = true;
        let outcome = list.fetch_next(&source).unwrap();
        assert!(matches!(outcome, FetchOutcome::Failed(_)));
        assert_eq!(ids(&list), (1..=10).collect::<Vec<_>>());
        assert_eq!(list.cursor(), 1);
        assert!(list.has_more());
        assert!(!list.is_loading());

        // The same page is requested again on the next scroll
        *source.fail.borrow_mut() = false;
        list.fetch_next(&source);
        assert_eq!(source.calls.borrow().last(), Some(&(10, 10)));
        assert_eq!(list.users().len(), 20);
    }

    #[test]
    fn test_name_header_clicked_twice() {
        let source = MockSource::new(10);
        let mut list = UserList::new(FilterState::default());
        list.fetch_next(&source);

        list.toggle_sort(SortField::FirstName);
        assert_eq!(list.sort(), SortState::new(SortField::FirstName, SortOrder::Asc));
        let names: Vec<String> = list.users().iter().map(|u| u.first_name.to_lowercase()).collect();
        assert!(names.windows(2).all(|w| w[0] <= w[1]));

        list.toggle_sort(SortField::FirstName);
        assert_eq!(list.sort().order, SortOrder::Desc);
        let names: Vec<String> = list.users().iter().map(|u| u.first_name.to_lowercase()).collect();
        assert!(names.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_appended_page_keeps_active_sort() {
        let source = MockSource::new(30);
        let mut list = UserList::new(FilterState::default());
        list.fetch_next(&source);
        list.toggle_sort(SortField::Age);
        list.toggle_sort(SortField::Age);
        list.fetch_next(&source);

        let ages: Vec<u32> = list.users().iter().map(|u| u.age).collect();
        assert_eq!(ages.len(), 20);
        assert!(ages.windows(2).all(|w| w[0] >= w[1]));
    }
}
