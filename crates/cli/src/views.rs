//! Garage and winners page rendering

use async_race_common::{Car, NavState, Session, SortOrder, View, Winner};
use colored::Colorize;
use serde::Serialize;

use crate::output::{color_swatch, print_list, print_value, OutputFormat, TableDisplay};

/// Car row in the garage listing
#[derive(Serialize)]
pub struct CarDisplay {
    pub id: u64,
    pub name: String,
    pub color: String,
}

impl From<&Car> for CarDisplay {
    fn from(car: &Car) -> Self {
        Self {
            id: car.id,
            name: car.name.clone(),
            color: car.color.clone(),
        }
    }
}

impl TableDisplay for CarDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Color", ""]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.color.clone(),
            color_swatch(&self.color),
        ]
    }
}

/// Winners table row, numbered across pages
#[derive(Serialize)]
pub struct WinnerDisplay {
    pub number: u64,
    pub id: u64,
    pub name: Option<String>,
    pub color: Option<String>,
    pub wins: u32,
    pub time: f64,
}

impl WinnerDisplay {
    pub fn new(number: u64, winner: &Winner) -> Self {
        Self {
            number,
            id: winner.id,
            name: winner.car.as_ref().map(|car| car.name.clone()),
            color: winner.car.as_ref().map(|car| car.color.clone()),
            wins: winner.wins,
            time: winner.time,
        }
    }
}

impl TableDisplay for WinnerDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Number", "Car", "Name", "Wins", "Time (sec)"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.number.to_string(),
            self.color.as_deref().map(color_swatch).unwrap_or_default(),
            self.name.clone().unwrap_or_else(|| format!("(removed car {})", self.id)),
            self.wins.to_string(),
            format!("{:.2}", self.time),
        ]
    }
}

/// Machine-readable page wrapper
#[derive(Serialize)]
struct PageView<'a, T> {
    view: View,
    page: u32,
    pages: u32,
    total: u64,
    items: &'a [T],
}

fn sort_marker(session: &Session) -> String {
    let sort = session.sort();
    let arrow = match sort.order {
        SortOrder::Asc => "↑",
        SortOrder::Desc => "↓",
    };
    format!("sorted by {} {}", sort.field, arrow)
}

pub fn render_garage(session: &Session, format: OutputFormat) {
    let cars: Vec<CarDisplay> = session.cars().iter().map(CarDisplay::from).collect();
    let page = PageView {
        view: View::Garage,
        page: session.garage_page(),
        pages: session.total_pages(View::Garage),
        total: session.cars_count(),
        items: &cars,
    };
    print_value(&page, format, |page| {
        println!(
            "{}  {}",
            format!("page: {} / {}", page.page, page.pages).bold(),
            format!("garage: {}", page.total).bold()
        );
        print_list(page.items, format);
        print_nav(session, format);
    });
}

pub fn render_winners(session: &Session, format: OutputFormat) {
    let rows: Vec<WinnerDisplay> = session
        .winners()
        .iter()
        .enumerate()
        .map(|(index, winner)| WinnerDisplay::new(session.row_number(index), winner))
        .collect();
    let page = PageView {
        view: View::Winners,
        page: session.winners_page(),
        pages: session.total_pages(View::Winners),
        total: session.winners_count(),
        items: &rows,
    };
    print_value(&page, format, |page| {
        println!(
            "{}  {}  {}",
            format!("page: {} / {}", page.page, page.pages).bold(),
            format!("number of winners: {}", page.total).bold(),
            sort_marker(session).dimmed()
        );
        print_list(page.items, format);
        print_nav(session, format);
    });
}

/// Controls usable from the current page
fn nav_labels(nav: NavState) -> Vec<&'static str> {
    [
        (nav.prev_enabled, "prev"),
        (nav.next_enabled, "next"),
        (nav.garage_enabled, "garage"),
        (nav.winners_enabled, "winners"),
    ]
    .into_iter()
    .filter_map(|(enabled, label)| enabled.then_some(label))
    .collect()
}

fn print_nav(session: &Session, format: OutputFormat) {
    if format == OutputFormat::Table {
        println!("{}", format!("[{}]", nav_labels(session.nav_state()).join("] [")).dimmed());
    }
}

/// Render whichever view the session is on
pub fn render_current(session: &Session, format: OutputFormat) {
    match session.view() {
        View::Garage => render_garage(session, format),
        View::Winners => render_winners(session, format),
    }
}
