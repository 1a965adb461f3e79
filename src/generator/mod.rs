//! Site-wide outputs derived from the walk: blog index, sitemap and feed.

pub mod blog;
pub mod rss;
pub mod sitemap;
