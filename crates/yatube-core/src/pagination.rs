//! Page windowing for post listings.
//!
//! A listing is requested with a raw `page` query value. Anything that is not
//! an integer selects the first page; an integer outside the available range
//! selects the last page. There is always at least one page, so an empty
//! listing renders an empty first page.

use serde::Serialize;

/// Default number of posts per listing page.
pub const POSTS_PER_PAGE: u64 = 10;

/// A requested page, before the total number of items is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    requested: Requested,
    per_page: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Requested {
    Number(i64),
    First,
}

impl PageRequest {
    /// Parse the raw `page` query parameter.
    pub fn parse(raw: Option<&str>, per_page: u64) -> Self {
        let requested = raw
            .and_then(|value| value.trim().parse::<i64>().ok())
            .map(Requested::Number)
            .unwrap_or(Requested::First);

        Self {
            requested,
            per_page: per_page.max(1),
        }
    }

    pub fn first(per_page: u64) -> Self {
        Self::parse(None, per_page)
    }

    pub fn number(number: i64, per_page: u64) -> Self {
        Self {
            requested: Requested::Number(number),
            per_page: per_page.max(1),
        }
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Normalized form of the request, equal for requests that select the
    /// same page regardless of the listing size: garbage reads as `1` and
    /// non-positive numbers as `last`.
    pub fn label(&self) -> String {
        match self.requested {
            Requested::First => "1".to_string(),
            Requested::Number(n) if n >= 1 => n.to_string(),
            Requested::Number(_) => "last".to_string(),
        }
    }

    /// Clamp the request against the number of available items.
    pub fn window(&self, total_items: u64) -> PageWindow {
        let num_pages = total_items.div_ceil(self.per_page).max(1);
        let number = match self.requested {
            Requested::First => 1,
            Requested::Number(n) if n >= 1 && (n as u64) <= num_pages => n as u64,
            Requested::Number(_) => num_pages,
        };

        PageWindow {
            number,
            num_pages,
            per_page: self.per_page,
            total_items,
        }
    }
}

/// The resolved page: which slice of the listing to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub number: u64,
    pub num_pages: u64,
    pub per_page: u64,
    pub total_items: u64,
}

impl PageWindow {
    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.per_page
    }

    pub fn limit(&self) -> u64 {
        self.per_page
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub window: PageWindow,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, window: PageWindow) -> Self {
        Self { items, window }
    }

    /// Slice an in-memory, already ordered listing.
    pub fn from_ordered(all: Vec<T>, request: PageRequest) -> Self {
        let window = request.window(all.len() as u64);
        let items = all
            .into_iter()
            .skip(window.offset() as usize)
            .take(window.limit() as usize)
            .collect();
        Self { items, window }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn number(&self) -> u64 {
        self.window.number
    }

    pub fn num_pages(&self) -> u64 {
        self.window.num_pages
    }

    pub fn total_items(&self) -> u64 {
        self.window.total_items
    }

    pub fn has_previous(&self) -> bool {
        self.window.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.window.number < self.window.num_pages
    }

    pub fn previous_number(&self) -> Option<u64> {
        self.has_previous().then(|| self.window.number - 1)
    }

    pub fn next_number(&self) -> Option<u64> {
        self.has_next().then(|| self.window.number + 1)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            window: self.window,
        }
    }
}
