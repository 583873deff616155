//! Session state: which view is shown, pagination and winners sort
//!
//! This is pure state. Fetching pages is done by the client crate, which then
//! hands the results back through [`Session::apply_garage`] and
//! [`Session::apply_winners`].

use serde::Serialize;

use crate::config::Config;
use crate::types::{Car, Page, SortField, View, Winner, WinnersSort};

/// Enabled/disabled state of the navigation controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavState {
    pub garage_enabled: bool,
    pub winners_enabled: bool,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

/// Pagination and sort state for the garage and winners views
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    view: View,
    garage_page: u32,
    winners_page: u32,
    cars_count: u64,
    winners_count: u64,
    cars: Vec<Car>,
    winners: Vec<Winner>,
    sort: WinnersSort,
    garage_limit: u32,
    winners_limit: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            view: View::Garage,
            garage_page: 1,
            winners_page: 1,
            cars_count: 0,
            winners_count: 0,
            cars: Vec::new(),
            winners: Vec::new(),
            sort: WinnersSort::default(),
            garage_limit: config.garage_limit.max(1),
            winners_limit: config.winners_limit.max(1),
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn garage_page(&self) -> u32 {
        self.garage_page
    }

    pub fn winners_page(&self) -> u32 {
        self.winners_page
    }

    pub fn cars_count(&self) -> u64 {
        self.cars_count
    }

    pub fn winners_count(&self) -> u64 {
        self.winners_count
    }

    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn winners(&self) -> &[Winner] {
        &self.winners
    }

    pub fn sort(&self) -> WinnersSort {
        self.sort
    }

    pub fn garage_limit(&self) -> u32 {
        self.garage_limit
    }

    pub fn winners_limit(&self) -> u32 {
        self.winners_limit
    }

    /// Current page of the given view
    pub fn page(&self, view: View) -> u32 {
        match view {
            View::Garage => self.garage_page,
            View::Winners => self.winners_page,
        }
    }

    fn count_and_limit(&self, view: View) -> (u64, u32) {
        match view {
            View::Garage => (self.cars_count, self.garage_limit),
            View::Winners => (self.winners_count, self.winners_limit),
        }
    }

    /// Number of pages in a view; an empty listing still has one page
    pub fn total_pages(&self, view: View) -> u32 {
        let (count, limit) = self.count_and_limit(view);
        let pages = count.div_ceil(u64::from(limit)).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn can_prev(&self) -> bool {
        self.page(self.view) > 1
    }

    pub fn can_next(&self) -> bool {
        let (count, limit) = self.count_and_limit(self.view);
        u64::from(self.page(self.view)) * u64::from(limit) < count
    }

    /// Move the current view one page forward. Returns whether the page changed.
    pub fn next_page(&mut self) -> bool {
        if !self.can_next() {
            return false;
        }
        *self.page_mut() += 1;
        true
    }

    /// Move the current view one page back. Returns whether the page changed.
    pub fn prev_page(&mut self) -> bool {
        if !self.can_prev() {
            return false;
        }
        *self.page_mut() -= 1;
        true
    }

    /// Jump to a page of the current view, clamped to the known page range
    pub fn go_to_page(&mut self, page: u32) -> u32 {
        let last = self.total_pages(self.view);
        let page = page.clamp(1, last);
        *self.page_mut() = page;
        page
    }

    fn page_mut(&mut self) -> &mut u32 {
        match self.view {
            View::Garage => &mut self.garage_page,
            View::Winners => &mut self.winners_page,
        }
    }

    pub fn switch_view(&mut self, view: View) {
        self.view = view;
    }

    /// Sort the winners by `field`.
    ///
    /// The order always flips, even when the field changes.
    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort = WinnersSort::new(field, self.sort.order.flipped());
    }

    pub fn set_sort(&mut self, sort: WinnersSort) {
        self.sort = sort;
    }

    /// 1-based position of a winners row across all pages
    pub fn row_number(&self, index: usize) -> u64 {
        u64::from(self.winners_page - 1) * u64::from(self.winners_limit) + index as u64 + 1
    }

    /// Store a fetched garage page.
    ///
    /// Returns `true` when the current page no longer exists (e.g. its last car
    /// was removed) and was moved back; the caller should fetch again.
    pub fn apply_garage(&mut self, page: Page<Car>) -> bool {
        self.cars = page.items;
        self.cars_count = page.total;
        let last = self.total_pages(View::Garage);
        if self.garage_page > last {
            self.garage_page = last;
            return true;
        }
        false
    }

    /// Store a fetched winners page. Same clamping contract as [`Session::apply_garage`].
    pub fn apply_winners(&mut self, page: Page<Winner>) -> bool {
        self.winners = page.items;
        self.winners_count = page.total;
        let last = self.total_pages(View::Winners);
        if self.winners_page > last {
            self.winners_page = last;
            return true;
        }
        false
    }

    pub fn nav_state(&self) -> NavState {
        NavState {
            garage_enabled: self.view != View::Garage,
            winners_enabled: self.view != View::Winners,
            prev_enabled: self.can_prev(),
            next_enabled: self.can_next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SortOrder, WinnerRecord};
    use test_case::test_case;

    fn cars(n: u64) -> Vec<Car> {
        (1..=n)
            .map(|id| Car {
                id,
                name: format!("car {}", id),
                color: "#000000".to_string(),
            })
            .collect()
    }

    fn session_with_cars(total: u64) -> Session {
        let mut session = Session::default();
        session.apply_garage(Page::new(cars(total.min(7)), total));
        session
    }

    #[test_case(0, 1 ; "empty garage has one page")]
    #[test_case(7, 1 ; "exactly one page")]
    #[test_case(8, 2 ; "one car spills over")]
    #[test_case(100, 15 ; "generated garage")]
    fn test_total_pages(total: u64, pages: u32) {
        assert_eq!(session_with_cars(total).total_pages(View::Garage), pages);
    }

    #[test]
    fn test_paging_bounds() {
        let mut session = session_with_cars(15);
        assert!(!session.can_prev());
        assert!(session.can_next());
        assert!(!session.prev_page());

        assert!(session.next_page());
        assert!(session.next_page());
        assert_eq!(session.garage_page(), 3);
        assert!(!session.can_next());
        assert!(!session.next_page());
        assert_eq!(session.garage_page(), 3);

        assert!(session.prev_page());
        assert_eq!(session.garage_page(), 2);
    }

    #[test]
    fn test_views_page_independently() {
        let mut session = session_with_cars(30);
        session.next_page();
        session.switch_view(View::Winners);
        session.apply_winners(Page::new(Vec::new(), 25));
        session.next_page();
        session.next_page();

        assert_eq!(session.garage_page(), 2);
        assert_eq!(session.winners_page(), 3);
        assert!(!session.can_next());
    }

    #[test]
    fn test_toggle_sort_always_flips_order() {
        let mut session = Session::default();
        assert_eq!(session.sort(), WinnersSort::new(SortField::Time, SortOrder::Asc));

        session.toggle_sort(SortField::Wins);
        assert_eq!(session.sort(), WinnersSort::new(SortField::Wins, SortOrder::Desc));

        session.toggle_sort(SortField::Time);
        assert_eq!(session.sort(), WinnersSort::new(SortField::Time, SortOrder::Asc));

        session.toggle_sort(SortField::Time);
        assert_eq!(session.sort(), WinnersSort::new(SortField::Time, SortOrder::Desc));
    }

    #[test]
    fn test_row_numbers_continue_across_pages() {
        let mut session = Session::default();
        session.switch_view(View::Winners);
        let rows = vec![Winner::new(WinnerRecord::first(1, 2.0), None)];
        session.apply_winners(Page::new(rows, 35));
        assert_eq!(session.row_number(0), 1);

        session.next_page();
        session.next_page();
        assert_eq!(session.row_number(0), 21);
        assert_eq!(session.row_number(4), 25);
    }

    #[test]
    fn test_apply_clamps_vanished_page() {
        let mut session = session_with_cars(8);
        session.next_page();
        assert_eq!(session.garage_page(), 2);

        // The only car on page 2 was removed
        let refetch = session.apply_garage(Page::new(Vec::new(), 7));
        assert!(refetch);
        assert_eq!(session.garage_page(), 1);

        assert!(!session.apply_garage(Page::new(cars(7), 7)));
    }

    #[test]
    fn test_nav_state() {
        let mut session = session_with_cars(10);
        assert_eq!(
            session.nav_state(),
            NavState {
                garage_enabled: false,
                winners_enabled: true,
                prev_enabled: false,
                next_enabled: true,
            }
        );

        session.switch_view(View::Winners);
        let nav = session.nav_state();
        assert!(nav.garage_enabled);
        assert!(!nav.winners_enabled);
        assert!(!nav.next_enabled);
    }

    #[test]
    fn test_go_to_page_clamps() {
        let mut session = session_with_cars(20);
        assert_eq!(session.go_to_page(10), 3);
        assert_eq!(session.go_to_page(0), 1);
    }}
