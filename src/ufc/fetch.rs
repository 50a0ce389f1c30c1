use std::collections::VecDeque;
use std::sync::Arc;

use anyhow::Context;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, COOKIE, REFERER, USER_AGENT,
};
use tokio::sync::Mutex;

use super::{extract, Event};

pub const BASE_URL: &str = "https://www.ufc.com";

/// Keeps the last few scraped events around so stepping through the pager and
/// re-running the command within a session doesn't hammer the site. Keyed by
/// event URL, oldest entry dropped beyond capacity.
struct EventCache {
    capacity: usize,
    entries: VecDeque<(String, Arc<Event>)>,
}

impl EventCache {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::new(),
        }
    }

    fn get(&self, url: &str) -> Option<Arc<Event>> {
        self.entries
            .iter()
            .find(|(key, _)| key == url)
            .map(|(_, event)| event.clone())
    }

    fn insert(&mut self, url: String, event: Arc<Event>) {
        self.entries.retain(|(key, _)| key != &url);
        self.entries.push_back((url, event));

        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }
}

pub struct EventFetcher {
    client: reqwest::Client,
    cache: Mutex<EventCache>,
}

impl EventFetcher {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            client: build_client()?,
            cache: Mutex::new(EventCache::new(2)),
        })
    }

    /// Two-step scrape: the events listing tells us which event is next, the
    /// event page itself is parsed into an [`Event`]. Only the second step is
    /// memoized; the listing decides what "next" means.
    pub async fn next_event(&self) -> anyhow::Result<Arc<Event>> {
        let listing = self
            .fetch_page(&format!("{BASE_URL}/events"))
            .await
            .context("Failed to fetch events listing")?;

        let path = extract::latest_event_path(&listing)
            .context("Failed to locate the next event on the listing page")?;
        let event_url = resolve_event_url(BASE_URL, &path);

        if let Some(event) = self.cache.lock().await.get(&event_url) {
            log::debug!("Event cache hit: {}", event_url);
            return Ok(event);
        }

        let html = self
            .fetch_page(&event_url)
            .await
            .with_context(|| format!("Failed to fetch event page {event_url}"))?;

        let event = extract::parse_event(&event_url, &html)
            .with_context(|| format!("Failed to parse event page {event_url}"))?;
        let event = Arc::new(event);

        self.cache.lock().await.insert(event_url, event.clone());

        Ok(event)
    }

    async fn fetch_page(&self, url: &str) -> anyhow::Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch")?
            .error_for_status()
            .context("Unexpected response status")?;

        response.text().await.context("Failed to fetch (body)")
    }
}

pub fn resolve_event_url(base: &str, path: &str) -> String {
    if path.starts_with("http") {
        path.to_string()
    } else {
        format!("{base}{path}")
    }
}

// The site returns a bot-detection page unless the request looks like a
// regular browser; the region cookie forces responses into a predictable
// language.
fn build_client() -> anyhow::Result<reqwest::Client> {
    let mut headers = HeaderMap::new();

    headers.insert(
        COOKIE,
        HeaderValue::from_static("STYXKEY_region=LATIN_AMERICA.PT.en.Default"),
    );
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/90.0.4430.85 Safari/537.36",
        ),
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,\
             image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9",
        ),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("pt-PT,pt;q=0.9,en-US;q=0.8,en;q=0.7"),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers.insert(REFERER, HeaderValue::from_static("https://www.ufc.com/events"));
    headers.insert("upgrade-insecure-requests", HeaderValue::from_static("1"));
    headers.insert("sec-ch-ua", HeaderValue::from_static("^\\^"));
    headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?0"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("same-origin"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));
    headers.insert("sec-fetch-user", HeaderValue::from_static("?1"));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .context("Failed to build HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ufc::FightCard;

    fn dummy_event(url: &str) -> Arc<Event> {
        Arc::new(Event {
            url: url.to_string(),
            name: "UFC 300".to_string(),
            image_url: "https://example.com/a.jpg".to_string(),
            main_card: FightCard {
                start_time: 1700000000,
                fights: Vec::new(),
            },
            prelims: None,
            early_prelims: None,
        })
    }

    #[test]
    fn resolves_relative_event_path() {
        assert_eq!(
            resolve_event_url(BASE_URL, "/event/ufc-300"),
            "https://www.ufc.com/event/ufc-300"
        );
    }

    #[test]
    fn absolute_urls_pass_through() {
        assert_eq!(
            resolve_event_url(BASE_URL, "https://www.ufc.com/event/ufc-300"),
            "https://www.ufc.com/event/ufc-300"
        );
    }

    #[test]
    fn cache_evicts_oldest_beyond_capacity() {
        let mut cache = EventCache::new(2);

        cache.insert("a".to_string(), dummy_event("a"));
        cache.insert("b".to_string(), dummy_event("b"));
        cache.insert("c".to_string(), dummy_event("c"));

        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn cache_reinsert_refreshes_entry() {
        let mut cache = EventCache::new(2);

        cache.insert("a".to_string(), dummy_event("a"));
        cache.insert("b".to_string(), dummy_event("b"));
        cache.insert("a".to_string(), dummy_event("a"));
        cache.insert("c".to_string(), dummy_event("c"));

        // "b" was oldest after "a" was refreshed.
        assert!(cache.get("b").is_none());
        assert!(cache.get("a").is_some());
    }

    #[test]
    fn cache_miss_on_distinct_event() {
        let mut cache = EventCache::new(2);
        cache.insert("a".to_string(), dummy_event("a"));

        assert!(cache.get("b").is_none());
        assert_eq!(cache.get("a").unwrap().url, "a");
    }
}
