//! Progressive console streaming.
//!
//! Jenkins exposes a running build's console as an append-only buffer that is
//! read by range: each poll sends `start=<offset>` and the server answers with
//! the new text, an `x-more-data` flag and an `x-text-size` header holding the
//! offset to ask for next.
//!
//! [`ConsoleStream`] turns that protocol into a lazy [`Stream`] of
//! [`ConsoleEvent`]s:
//!
//! - polls run one at a time, the next one only after the previous response has
//!   been handled and the poll interval has elapsed
//! - every non-empty body is yielded as [`ConsoleEvent::Data`], in request order
//! - [`ConsoleEvent::End`] is yielded once the server reports no more data
//! - an error is yielded once and ends the stream
//! - [`StopHandle::stop`] ends the stream before the next poll is scheduled

use crate::client::{Client, Request};
use crate::error::{ClientError, Result};
use bytes::Bytes;
use futures::Stream;
use futures::stream::{self, BoxStream, StreamExt};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};
use std::time::Duration;

/// Header telling whether the build is still producing output.
const MORE_DATA_HEADER: &str = "x-more-data";
/// Header holding the offset of the next poll.
const TEXT_SIZE_HEADER: &str = "x-text-size";

/// An event produced by a [`ConsoleStream`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    /// A chunk of console text.
    Data(Bytes),
    /// The build finished producing output.
    End,
}

/// One response of a progressive text endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressiveChunk {
    /// Text appended since the requested offset. May be empty.
    pub body: Bytes,
    /// Whether more text will follow.
    pub more_data: bool,
    /// Offset to request next. Authoritative, never computed by the client.
    pub text_size: u64,
}

/// Future returned by [`ProgressiveSource::fetch`].
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<ProgressiveChunk>> + Send + 'a>>;

/// Something that serves a progressive text buffer by offset.
pub trait ProgressiveSource: Send + Sync {
    /// Fetch the text starting at `start`.
    fn fetch(&self, start: u64) -> FetchFuture<'_>;
}

/// Progressive console of a job's last build.
#[derive(Debug, Clone)]
pub struct LastBuildConsole {
    client: Client,
    job_name: String,
}

impl LastBuildConsole {
    /// Console source for the last build of `job_name`.
    pub fn new(client: Client, job_name: impl Into<String>) -> Self {
        Self {
            client,
            job_name: job_name.into(),
        }
    }
}

impl ProgressiveSource for LastBuildConsole {
    fn fetch(&self, start: u64) -> FetchFuture<'_> {
        Box::pin(async move {
            let request = Request::get(format!(
                "job/{}/lastBuild/logText/progressiveText",
                self.job_name
            ))
            .query("start", start);

            let reply = self
                .client
                .send(&request)
                .await?
                .into_reply(|| ClientError::JobNotFound(self.job_name.clone()))?;

            let more_data = reply
                .header(MORE_DATA_HEADER)
                .is_some_and(|v| v.eq_ignore_ascii_case("true"));

            let text_size = match reply.header(TEXT_SIZE_HEADER) {
                Some(size) => size.trim().parse::<u64>().map_err(|_| {
                    ClientError::InvalidResponse(format!(
                        "{} is not an offset: {}",
                        TEXT_SIZE_HEADER, size
                    ))
                })?,
                None if more_data => {
                    return Err(ClientError::InvalidResponse(format!(
                        "{} missing while more data is pending",
                        TEXT_SIZE_HEADER
                    )));
                }
                None => start + reply.body.len() as u64,
            };

            Ok(ProgressiveChunk {
                body: reply.body,
                more_data,
                text_size,
            })
        })
    }
}

/// Requests a [`ConsoleStream`] to stop polling.
///
/// Cloneable, so it can be moved to another task (e.g. a Ctrl+C handler).
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Stop before the next poll. A poll already in flight still completes.
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether stop was requested.
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy)]
enum Cursor {
    /// Poll at `offset`, after waiting the interval unless this is the first poll.
    Poll { offset: u64, wait: bool },
    /// Server is done, emit the end event.
    Ended,
    Done,
}

struct State<S> {
    source: Arc<S>,
    cursor: Cursor,
    interval: Duration,
    stop: StopHandle,
}

/// A live, finite stream of a build's console output.
///
/// # Example
///
/// ```no_run
/// use futures::StreamExt;
/// use nestor_client::{Client, ConsoleEvent};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new("http://localhost:8080")?;
/// let mut console = client.console("my-app");
/// while let Some(event) = console.next().await {
///     match event? {
///         ConsoleEvent::Data(text) => print!("{}", String::from_utf8_lossy(&text)),
///         ConsoleEvent::End => println!("-- build finished --"),
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct ConsoleStream {
    inner: BoxStream<'static, Result<ConsoleEvent>>,
    stop: StopHandle,
}

impl ConsoleStream {
    /// Stream `source` from offset 0, waiting `interval` between polls.
    pub fn new<S>(source: S, interval: Duration) -> Self
    where
        S: ProgressiveSource + 'static,
    {
        let stop = StopHandle::default();
        let state = State {
            source: Arc::new(source),
            cursor: Cursor::Poll {
                offset: 0,
                wait: false,
            },
            interval,
            stop: stop.clone(),
        };

        let inner = stream::unfold(state, |mut state| async move {
            loop {
                match state.cursor {
                    Cursor::Done => return None,
                    Cursor::Ended => {
                        state.cursor = Cursor::Done;
                        return Some((Ok(ConsoleEvent::End), state));
                    }
                    Cursor::Poll { offset, wait } => {
                        if wait && !state.stop.is_stopped() {
                            tokio::time::sleep(state.interval).await;
                        }
                        if state.stop.is_stopped() {
                            tracing::debug!(offset, "Console stream stopped");
                            return None;
                        }

                        let chunk = match state.source.fetch(offset).await {
                            Ok(chunk) => chunk,
                            Err(e) => {
                                tracing::debug!(offset, error = %e, "Console poll failed");
                                state.cursor = Cursor::Done;
                                return Some((Err(e), state));
                            }
                        };

                        tracing::trace!(
                            offset,
                            bytes = chunk.body.len(),
                            more_data = chunk.more_data,
                            next = chunk.text_size,
                            "Console chunk received"
                        );

                        state.cursor = if chunk.more_data {
                            Cursor::Poll {
                                offset: chunk.text_size,
                                wait: true,
                            }
                        } else {
                            Cursor::Ended
                        };

                        if !chunk.body.is_empty() {
                            return Some((Ok(ConsoleEvent::Data(chunk.body)), state));
                        }
                    }
                }
            }
        })
        .boxed();

        Self { inner, stop }
    }

    /// Handle that stops this stream.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }
}

impl Stream for ConsoleStream {
    type Item = Result<ConsoleEvent>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl Client {
    /// Stream the console of a job's last build.
    ///
    /// Nothing is requested until the stream is polled. Polls are spaced by
    /// the client's poll interval (see [`Client::with_poll_interval`]).
    pub fn console(&self, job_name: &str) -> ConsoleStream {
        tracing::debug!(job = %job_name, "Streaming console");
        ConsoleStream::new(
            LastBuildConsole::new(self.clone(), job_name),
            self.poll_interval(),
        )
    }
}
