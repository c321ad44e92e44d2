use yatube_core::domain::PostEntry;
use yatube_core::pagination::Page;
use yatube_core::ports::MediaStorage;

/// How many page links to show on each side of the current page.
const PAGINATOR_SPREAD: u64 = 2;

#[derive(Debug, Clone)]
pub struct GroupLink {
    pub title: String,
    pub slug: String,
}

/// A post as shown in listings and on its detail page.
#[derive(Debug, Clone)]
pub struct PostCard {
    pub id: i32,
    pub text: String,
    pub author: String,
    pub author_url: String,
    pub pub_date: String,
    pub group: Option<GroupLink>,
    pub image_url: Option<String>,
}

impl PostCard {
    pub fn new(entry: PostEntry, media: &dyn MediaStorage) -> Self {
        Self {
            id: entry.post.id,
            image_url: entry.post.image.as_deref().map(|name| media.url(name)),
            pub_date: entry.post.created_at.format("%d %B %Y").to_string(),
            text: entry.post.text,
            author_url: super::profile_url(&entry.author.username),
            author: entry.author.username,
            group: entry.group.map(|g| GroupLink {
                title: g.title,
                slug: g.slug,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PageLink {
    pub number: u64,
    pub current: bool,
}

#[derive(Debug, Clone)]
pub struct PaginatorView {
    pub number: u64,
    pub num_pages: u64,
    pub previous: Option<u64>,
    pub next: Option<u64>,
    /// Page numbers around the current one.
    pub pages: Vec<PageLink>,
}

impl PaginatorView {
    fn new<T>(page: &Page<T>) -> Self {
        let number = page.number();
        let num_pages = page.num_pages();
        let first = number.saturating_sub(PAGINATOR_SPREAD).max(1);
        let last = (number + PAGINATOR_SPREAD).min(num_pages);

        Self {
            number,
            num_pages,
            previous: page.previous_number(),
            next: page.next_number(),
            pages: (first..=last)
                .map(|n| PageLink {
                    number: n,
                    current: n == number,
                })
                .collect(),
        }
    }

    pub fn is_paginated(&self) -> bool {
        self.num_pages > 1
    }
}

/// One page of post cards with its paginator.
#[derive(Debug, Clone)]
pub struct Listing {
    pub posts: Vec<PostCard>,
    pub paginator: PaginatorView,
}

impl Listing {
    pub fn new(page: Page<PostEntry>, media: &dyn MediaStorage) -> Self {
        let paginator = PaginatorView::new(&page);
        Self {
            posts: page.map(|entry| PostCard::new(entry, media)).items,
            paginator,
        }
    }
}
