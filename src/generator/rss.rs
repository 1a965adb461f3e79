//! rss feed generation.
//!
//! Enabled by an `rss` mapping in the global context:
//!
//! ```yaml
//! hostname: https://example.com
//! rss:
//!   title: My Blog
//!   link: https://example.com
//!   description: Things I wrote
//! ```
//!
//! Without it the feed is skipped. Items come from the blog index, newest
//! first, capped at `feed_len`.

use super::blog::BlogPost;
use crate::{
    context::{Mapping, Value},
    log,
    utils::date,
};
use anyhow::{Context, Result, anyhow, bail};
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder, validation::Validate};
use std::{fs, path::Path};

// ============================================================================
// Public API
// ============================================================================

/// Write the feed to `path` if the global context configures one.
///
/// Returns whether a feed was written.
pub fn build_feed(global: &Mapping, posts: &[BlogPost], feed_len: usize, path: &Path) -> Result<bool> {
    let Some(feed) = RssFeed::from_context(global, posts, feed_len)? else {
        log!("rss"; "no `rss` block in context, skipping feed");
        return Ok(false);
    };

    let xml = feed.into_xml()?;
    fs::write(path, xml).with_context(|| format!("Failed to write feed to {}", path.display()))?;

    log!("rss"; "{}", path.display());
    Ok(true)
}

// ============================================================================
// RssFeed Implementation
// ============================================================================

/// Channel settings plus the posts that make it into the feed.
struct RssFeed<'a> {
    title: String,
    link: String,
    description: String,
    hostname: String,
    posts: &'a [BlogPost],
}

impl<'a> RssFeed<'a> {
    /// `None` when the context has no `rss` key.
    fn from_context(global: &Mapping, posts: &'a [BlogPost], feed_len: usize) -> Result<Option<Self>> {
        let Some(rss) = global.get("rss") else {
            return Ok(None);
        };
        let Some(channel) = rss.as_mapping() else {
            bail!("`rss` in the context must be a mapping with title, link and description");
        };

        let hostname = global
            .get("hostname")
            .and_then(Value::as_str)
            .map(|h| h.trim_end_matches('/').to_owned())
            .filter(|h| !h.is_empty())
            .ok_or_else(|| anyhow!("`hostname` is required in the context for the rss feed"))?;

        let text = |key: &str| channel.get(key).and_then(Value::to_text).unwrap_or_default();

        Ok(Some(Self {
            title: text("title"),
            link: text("link"),
            description: text("description"),
            hostname,
            posts: &posts[..posts.len().min(feed_len)],
        }))
    }

    /// Generate rss xml string
    fn into_xml(self) -> Result<String> {
        let items: Vec<_> = self
            .posts
            .iter()
            .map(|post| post_to_rss_item(post, &self.hostname))
            .collect();

        let channel = ChannelBuilder::default()
            .title(self.title)
            .link(self.link)
            .description(self.description)
            .generator("supernum".to_string())
            .items(items)
            .build();

        channel
            .validate()
            .map_err(|e| anyhow!("rss validation failed: {e}"))?;
        Ok(channel.to_string())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert a blog post to an rss item.
///
/// The item title falls back to the post link so every item has one.
fn post_to_rss_item(post: &BlogPost, hostname: &str) -> rss::Item {
    let link = format!("{hostname}{}", post.href);
    let description = post.field("description").or_else(|| post.field("summary"));

    ItemBuilder::default()
        .title(post.field("title").unwrap_or_else(|| link.clone()))
        .link(Some(link.clone()))
        .guid(GuidBuilder::default().permalink(true).value(link).build())
        .description(description)
        .pub_date(date::to_rfc2822(post.published))
        .build()
}
