//! Best-effort article text extraction from publisher pages.
//!
//! Structured data (JSON-LD) is preferred over markup. Pages that hide
//! their text behind a paywall or a consent wall are reported as errors so
//! the caller can keep its placeholder content.

use gn_core::{Error, Result};
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{Client, Response};
use scraper::{Html, Selector};
use serde_json::Value;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use url::{Host, Url};

/// Below this many characters a page showing wall markup is considered walled.
const MIN_BODY_CHARS: usize = 200;

const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;
const MAX_REDIRECTS: usize = 5;

const WALL_MARKERS: [(&str, WallKind); 6] = [
    ("[class*='paywall']", WallKind::Paywall),
    ("[id*='paywall']", WallKind::Paywall),
    ("[class*='subscriber-only']", WallKind::Paywall),
    ("[class*='consent']", WallKind::Consent),
    ("[id*='consent']", WallKind::Consent),
    ("form[action*='consent']", WallKind::Consent),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallKind {
    Paywall,
    Consent,
}

impl fmt::Display for WallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WallKind::Paywall => f.write_str("paywall"),
            WallKind::Consent => f.write_str("consent wall"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub body: String,
    pub description: Option<String>,
    pub author: Option<String>,
}

/// Fetches publisher pages on behalf of callers.
///
/// Only hosts that resolve to public addresses are contacted, and the
/// connection is pinned to the address that was checked. Redirects are
/// followed by hand so every hop goes through the same check.
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    max_body_bytes: usize,
    allow_private_hosts: bool,
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentExtractor {
    pub fn new() -> Self {
        Self {
            max_body_bytes: MAX_BODY_BYTES,
            allow_private_hosts: false,
        }
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Lets the extractor reach loopback and private networks. Only for
    /// trusted callers, such as a local mirror of publisher pages.
    pub fn allow_private_hosts(mut self) -> Self {
        self.allow_private_hosts = true;
        self
    }

    pub async fn extract(&self, url: &str) -> Result<ExtractedContent> {
        let mut target = Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))?;

        for _ in 0..=MAX_REDIRECTS {
            check_scheme(&target)?;
            let addr = self.resolve(&target).await?;
            let response = pinned_client(&target, addr)?.get(target.clone()).send().await?;
            let status = response.status();

            if status.is_redirection() {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|value| value.to_str().ok())
                    .ok_or_else(|| Error::Extraction(format!("redirect without location from {}", target)))?;
                target = target
                    .join(location)
                    .map_err(|e| Error::InvalidUrl(format!("{}: {}", location, e)))?;
                continue;
            }
            if !status.is_success() {
                return Err(Error::Upstream { status: status.as_u16() });
            }

            let html = read_capped(response, self.max_body_bytes).await?;
            return extract_from_html(&html);
        }

        Err(Error::Extraction(format!("more than {} redirects", MAX_REDIRECTS)))
    }

    /// The address to connect to, refusing hosts with any non-public address.
    async fn resolve(&self, url: &Url) -> Result<SocketAddr> {
        let port = url.port_or_known_default().unwrap_or(80);
        let addrs: Vec<SocketAddr> = match url.host() {
            Some(Host::Ipv4(ip)) => vec![SocketAddr::new(IpAddr::V4(ip), port)],
            Some(Host::Ipv6(ip)) => vec![SocketAddr::new(IpAddr::V6(ip), port)],
            Some(Host::Domain(domain)) => tokio::net::lookup_host((domain, port)).await?.collect(),
            None => return Err(Error::InvalidUrl(format!("{}: missing host", url))),
        };

        if !self.allow_private_hosts {
            if let Some(blocked) = addrs.iter().find(|addr| !is_public_ip(addr.ip())) {
                return Err(Error::InvalidUrl(format!(
                    "{} resolves to non-public address {}",
                    url.host_str().unwrap_or_default(),
                    blocked.ip()
                )));
            }
        }

        addrs
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidUrl(format!("{}: host did not resolve", url)))
    }
}

fn check_scheme(url: &Url) -> Result<()> {
    if matches!(url.scheme(), "http" | "https") {
        Ok(())
    } else {
        Err(Error::InvalidUrl(format!("unsupported scheme: {}", url.scheme())))
    }
}

fn pinned_client(url: &Url, addr: SocketAddr) -> Result<Client> {
    let mut builder = Client::builder().redirect(Policy::none());
    if let Some(Host::Domain(domain)) = url.host() {
        builder = builder.resolve(domain, addr);
    }
    Ok(builder.build()?)
}

async fn read_capped(mut response: Response, limit: usize) -> Result<String> {
    let too_large = || Error::Extraction(format!("page is larger than {} bytes", limit));

    if response.content_length().is_some_and(|len| len > limit as u64) {
        return Err(too_large());
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if body.len() + chunk.len() > limit {
            return Err(too_large());
        }
        body.extend_from_slice(&chunk);
    }

    Ok(String::from_utf8_lossy(&body).into_owned())
}

/// Whether an address is reachable on the public internet.
pub fn is_public_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(ip) => is_public_ipv4(ip),
        IpAddr::V6(ip) => match ip.to_ipv4_mapped() {
            Some(mapped) => is_public_ipv4(mapped),
            None => {
                let first = ip.segments()[0];
                !(ip.is_loopback()
                    || ip.is_unspecified()
                    || ip.is_multicast()
                    || (first & 0xfe00) == 0xfc00
                    || (first & 0xffc0) == 0xfe80
                    || (first == 0x2001 && ip.segments()[1] == 0x0db8))
            }
        },
    }
}

fn is_public_ipv4(ip: Ipv4Addr) -> bool {
    let [a, b, ..] = ip.octets();
    !(ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
        || ip.is_multicast()
        || ip.is_documentation()
        || a == 0
        || (a == 100 && (64..128).contains(&b))
        || (a == 198 && (b == 18 || b == 19)))
}

pub fn extract_from_html(html: &str) -> Result<ExtractedContent> {
    let document = Html::parse_document(html);
    let structured = jsonld_objects(&document);

    if structured.iter().any(marked_not_free) {
        return Err(walled(WallKind::Paywall));
    }

    let body = structured
        .iter()
        .find_map(|obj| string_field(obj, "articleBody"))
        .or_else(|| paragraphs(&document, "article p"))
        .or_else(|| paragraphs(&document, "p"));

    let wall = detect_wall_markup(&document);
    let body = match (body, wall) {
        (Some(body), Some(kind)) if body.chars().count() < MIN_BODY_CHARS => return Err(walled(kind)),
        (Some(body), _) => body,
        (None, Some(kind)) => return Err(walled(kind)),
        (None, None) => return Err(Error::Extraction("no article text found".to_string())),
    };

    let description = structured
        .iter()
        .find_map(|obj| string_field(obj, "description"))
        .or_else(|| meta_content(&document, "meta[name='description']"))
        .or_else(|| meta_content(&document, "meta[property='og:description']"));

    let author = structured
        .iter()
        .find_map(author_name)
        .or_else(|| meta_content(&document, "meta[name='author']"));

    Ok(ExtractedContent {
        body,
        description,
        author,
    })
}

fn walled(kind: WallKind) -> Error {
    Error::Extraction(format!("article is behind a {}", kind))
}

/// Every JSON-LD object on the page, with arrays and `@graph` flattened.
fn jsonld_objects(document: &Html) -> Vec<Value> {
    let mut objects = Vec::new();

    if let Ok(script_selector) = Selector::parse("script[type='application/ld+json']") {
        for script in document.select(&script_selector) {
            if let Ok(json) = serde_json::from_str::<Value>(script.text().collect::<String>().trim()) {
                flatten_into(json, &mut objects);
            }
        }
    }

    objects
}

fn flatten_into(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => items.into_iter().for_each(|item| flatten_into(item, out)),
        Value::Object(mut obj) => {
            if let Some(graph) = obj.remove("@graph") {
                flatten_into(graph, out);
            }
            out.push(Value::Object(obj));
        }
        _ => {}
    }
}

fn marked_not_free(obj: &Value) -> bool {
    match obj.get("isAccessibleForFree") {
        Some(Value::Bool(free)) => !free,
        Some(Value::String(free)) => free.eq_ignore_ascii_case("false"),
        _ => false,
    }
}

fn string_field(obj: &Value, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn author_name(obj: &Value) -> Option<String> {
    let author = obj.get("author")?;
    match author {
        Value::Array(authors) => {
            let names: Vec<String> = authors
                .iter()
                .filter_map(|author| string_field(author, "name"))
                .collect();
            (!names.is_empty()).then(|| names.join(", "))
        }
        Value::Object(_) => string_field(author, "name"),
        Value::String(name) => Some(name.trim().to_string()).filter(|s| !s.is_empty()),
        _ => None,
    }
}

fn paragraphs(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let texts: Vec<String> = document
        .select(&selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();

    (!texts.is_empty()).then(|| texts.join("\n\n"))
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
}

fn detect_wall_markup(document: &Html) -> Option<WallKind> {
    WALL_MARKERS.iter().find_map(|(selector, kind)| {
        let selector = Selector::parse(selector).ok()?;
        document.select(&selector).next().map(|_| *kind)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_text() -> String {
        "Lorem ipsum dolor sit amet. ".repeat(20)
    }

    #[test]
    fn test_prefers_jsonld_article_body() {
        let html = r#"
            <html><head>
            <script type="application/ld+json">
            {"@type":"NewsArticle","articleBody":"Structured body","description":"Structured summary",
             "author":[{"name":"Ana Ruiz"},{"name":"Tom Lee"}]}
            </script>
            </head><body><article><p>Markup body</p></article></body></html>
        "#;
        let content = extract_from_html(html).unwrap();

        assert_eq!(content.body, "Structured body");
        assert_eq!(content.description.as_deref(), Some("Structured summary"));
        assert_eq!(content.author.as_deref(), Some("Ana Ruiz, Tom Lee"));
    }

    #[test]
    fn test_reads_graph_entries() {
        let html = r#"
            <script type="application/ld+json">
            {"@context":"https://schema.org","@graph":[{"@type":"WebPage"},{"@type":"NewsArticle","articleBody":"From graph","author":"Kim"}]}
            </script>
        "#;
        let content = extract_from_html(html).unwrap();

        assert_eq!(content.body, "From graph");
        assert_eq!(content.author.as_deref(), Some("Kim"));
    }

    #[test]
    fn test_falls_back_to_article_paragraphs() {
        let html = r#"
            <html><head><meta name="description" content="Meta summary"></head>
            <body>
              <nav><p>Menu</p></nav>
              <article><p>First paragraph.</p><p>  </p><p>Second paragraph.</p></article>
            </body></html>
        "#;
        let content = extract_from_html(html).unwrap();

        assert_eq!(content.body, "First paragraph.\n\nSecond paragraph.");
        assert_eq!(content.description.as_deref(), Some("Meta summary"));
        assert_eq!(content.author, None);
    }

    #[test]
    fn test_jsonld_paywall_flag() {
        let html = r#"
            <script type="application/ld+json">{"@type":"NewsArticle","isAccessibleForFree":false,"articleBody":"Teaser"}</script>
        "#;
        let err = extract_from_html(html).unwrap_err();
        assert!(err.to_string().contains("paywall"));
    }

    #[test]
    fn test_short_text_behind_consent_markup_is_walled() {
        let html = r#"
            <div id="consent-banner"><p>We value your privacy</p></div>
        "#;
        let err = extract_from_html(html).unwrap_err();
        assert!(err.to_string().contains("consent wall"));
    }

    #[test]
    fn test_long_text_with_wall_markup_is_kept() {
        let html = format!(
            r#"<div class="paywall-promo">Subscribe</div><article><p>{}</p></article>"#,
            long_text()
        );
        let content = extract_from_html(&html).unwrap();
        assert!(content.body.starts_with("Lorem ipsum"));
    }

    #[test]
    fn test_empty_page_is_an_error() {
        assert!(extract_from_html("<html><body></body></html>").is_err());
    }

    const STORY: &str = "<html><body><article><p>Served story text.</p></article></body></html>";

    async fn spawn_publisher() -> String {
        use axum::response::{Html as HtmlBody, Redirect};
        use axum::routing::get;

        let router = axum::Router::new()
            .route("/story", get(|| async { HtmlBody(STORY) }))
            .route("/moved", get(|| async { Redirect::permanent("/story") }))
            .route("/huge", get(|| async { HtmlBody("x".repeat(4096)) }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_public_addresses() {
        for public in ["93.184.216.34", "8.8.8.8", "2606:4700::1111"] {
            assert!(is_public_ip(public.parse().unwrap()), "{}", public);
        }
        for private in [
            "127.0.0.1",
            "10.1.2.3",
            "172.16.0.1",
            "192.168.1.1",
            "169.254.169.254",
            "100.64.0.1",
            "0.0.0.0",
            "::1",
            "fe80::1",
            "fd00::1",
            "::ffff:127.0.0.1",
        ] {
            assert!(!is_public_ip(private.parse().unwrap()), "{}", private);
        }
    }

    #[tokio::test]
    async fn test_refuses_non_public_hosts() {
        let extractor = ContentExtractor::new();
        for url in [
            "http://127.0.0.1:3000/api/news",
            "http://169.254.169.254/latest/meta-data/",
            "http://[::1]/",
            "http://localhost/",
        ] {
            assert!(
                matches!(extractor.extract(url).await, Err(Error::InvalidUrl(_))),
                "{} was fetched",
                url
            );
        }
    }

    #[tokio::test]
    async fn test_local_publisher_is_refused_by_default() {
        let base = spawn_publisher().await;
        let result = ContentExtractor::new().extract(&format!("{}/story", base)).await;
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_follows_redirects() {
        let base = spawn_publisher().await;
        let extractor = ContentExtractor::new().allow_private_hosts();

        let content = extractor.extract(&format!("{}/moved", base)).await.unwrap();
        assert_eq!(content.body, "Served story text.");
    }

    #[tokio::test]
    async fn test_oversized_page_is_refused() {
        let base = spawn_publisher().await;
        let extractor = ContentExtractor::new().allow_private_hosts().with_max_body_bytes(1024);

        match extractor.extract(&format!("{}/huge", base)).await {
            Err(Error::Extraction(message)) => assert!(message.contains("larger than 1024 bytes")),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(extractor.extract(&format!("{}/story", base)).await.is_ok());
    }

    #[tokio::test]
    async fn test_rejects_non_http_urls() {
        let extractor = ContentExtractor::new();
        assert!(matches!(
            extractor.extract("ftp://example.com/a").await,
            Err(Error::InvalidUrl(_))
        ));
        assert!(matches!(extractor.extract("not a url").await, Err(Error::InvalidUrl(_))));
    }
}
