//! Incremental reader for streamed completion bodies.
//!
//! The backend answers `/completion` with a plain byte stream. Each chunk is
//! decoded to text for the token callback and forwarded unchanged to whoever
//! consumes the [`CompletionStream`].

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::stream::{self, BoxStream};
use futures_util::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Receives `(token, done)` for every chunk, then `("", true)` exactly once.
pub type TokenCallback = Box<dyn FnMut(&str, bool) + Send>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamMessage {
    Chunk(String),
    End,
}

/// Adapt the token callback into a channel for consumers that poll a receiver.
pub fn token_channel() -> (TokenCallback, mpsc::UnboundedReceiver<StreamMessage>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let callback: TokenCallback = Box::new(move |token: &str, done: bool| {
        let message = if done {
            StreamMessage::End
        } else {
            StreamMessage::Chunk(token.to_string())
        };
        let _ = tx.send(message);
    });
    (callback, rx)
}

struct ReaderState<S> {
    body: Pin<Box<S>>,
    cancel: CancellationToken,
    token_cb: Option<TokenCallback>,
}

impl<S> ReaderState<S> {
    fn emit(&mut self, token: &str, done: bool) {
        if let Some(cb) = self.token_cb.as_mut() {
            cb(token, done);
        }
    }

    fn finish(&mut self) {
        self.emit("", true);
    }
}

/// Lazily pulled, non-restartable sequence of completion body chunks.
///
/// Nothing is read until the stream is polled; at most one read is in flight.
/// Read failures and cancellation end the sequence the same way a clean end
/// does: the callback sees `("", true)` and no error escapes.
pub struct CompletionStream {
    inner: BoxStream<'static, Bytes>,
}

impl CompletionStream {
    pub fn new<S, E>(body: S, cancel: CancellationToken, token_cb: Option<TokenCallback>) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        let state = ReaderState {
            body: Box::pin(body),
            cancel,
            token_cb,
        };

        let inner = stream::unfold(state, |mut state| async move {
            let pulled = tokio::select! {
                biased;
                _ = state.cancel.cancelled() => None,
                next = state.body.next() => Some(next),
            };
            let Some(next) = pulled else {
                debug!("completion stream cancelled");
                state.finish();
                return None;
            };

            match next {
                Some(Ok(chunk)) => {
                    let token = String::from_utf8_lossy(&chunk).into_owned();
                    state.emit(&token, false);
                    Some((chunk, state))
                }
                Some(Err(err)) => {
                    warn!(error = %err, "completion stream read failed");
                    state.finish();
                    None
                }
                None => {
                    state.finish();
                    None
                }
            }
        });

        Self {
            inner: inner.fuse().boxed(),
        }
    }

    /// Drain the stream, returning everything it produced as text.
    pub async fn collect_text(mut self) -> String {
        let mut bytes = Vec::new();
        while let Some(chunk) = self.inner.next().await {
            bytes.extend_from_slice(&chunk);
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Stream for CompletionStream {
    type Item = Bytes;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl fmt::Debug for CompletionStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionStream").finish_non_exhaustive()
    }
}
