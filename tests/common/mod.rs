#![allow(dead_code)]

use async_trait::async_trait;
use site_feed::feed::FeedSource;
use site_feed::FetchFailure;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

pub const FEED_URL: &str = "https://ithaqua.substack.com/feed";

/// Replays canned fetch results in order.
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Result<String, FetchFailure>>>,
    pub calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(responses: Vec<Result<String, FetchFailure>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedSource for ScriptedSource {
    async fn fetch(&self, _url: &str) -> Result<String, FetchFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchFailure::transport("script exhausted")))
    }
}

// ── Feed fixtures ─────────────────────────────────────────────────────

pub fn item(title: &str, link: &str, description: &str, pub_date: &str) -> String {
    format!(
        "<item><title><![CDATA[{}]]></title><link>{}</link>\
         <description><![CDATA[{}]]></description><pubDate>{}</pubDate></item>",
        title, link, description, pub_date
    )
}

pub fn feed(items: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <rss xmlns:dc=\"http://purl.org/dc/elements/1.1/\" version=\"2.0\"><channel>\
         <title><![CDATA[Itha's Substack]]></title>\
         <link>https://ithaqua.substack.com</link>{}</channel></rss>",
        items.concat()
    )
}

// ── Log capture ───────────────────────────────────────────────────────

/// Counts WARN events seen by the subscriber it is installed in.
pub struct WarnCounter(pub Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Install a warning counter for the current thread.
pub fn count_warnings() -> (Arc<AtomicUsize>, tracing::subscriber::DefaultGuard) {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(count.clone()));
    let guard = tracing::subscriber::set_default(subscriber);
    (count, guard)
}

// ── Loopback HTTP ─────────────────────────────────────────────────────

/// Answer exactly one request on a loopback port with `status_line` and `body`.
pub async fn serve_once(status_line: &'static str, body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/rss+xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
    });
    format!("http://{}/feed", addr)
}

/// A loopback URL with nothing listening behind it.
pub async fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/feed", addr)
}
