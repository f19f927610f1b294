//! Catalog-wide constants shared between views.

/// Rows fetched from each collection for the home carousels.
pub const HOME_PAGE_SIZE: u32 = 20;

/// Per-collection row cap on the browse page.
pub const BROWSE_PAGE_SIZE: u32 = 50;

/// Genre selector values offered on the browse page. "all" disables the
/// genre filter.
pub const GENRE_FILTERS: &[&str] = &[
    "all",
    "action",
    "adventure",
    "comedy",
    "drama",
    "horror",
    "thriller",
    "sci-fi",
    "fantasy",
    "romance",
    "documentary",
];

/// Genre options offered by the admin content form.
pub const GENRE_OPTIONS: &[&str] = &[
    "Action",
    "Adventure",
    "Comedy",
    "Drama",
    "Horror",
    "Thriller",
    "Sci-Fi",
    "Fantasy",
    "Romance",
    "Documentary",
    "Animation",
    "Crime",
];
