use futures_core::Stream;
use std::{
    pin::Pin,
    task::{Context, Poll},
};

use crate::lines::LineDecoder;

/// A stream of text lines read from a stream of byte chunks.
///
/// Errors from the inner stream are passed through as they are.
pub struct Lines<S> {
    inner: S,

    decoder: LineDecoder,
    done: bool,
}

impl<S, B, E> Stream for Lines<S>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: bytes::Buf,
{
    type Item = Result<String, E>;

    fn poll_next(mut self: Pin<&mut Self>, ctx: &mut Context) -> Poll<Option<Self::Item>> {
        // Hand out buffered lines first and only poll the inner stream once
        // the decoder has run dry.
        loop {
            if let Some(line) = self.decoder.next_line() {
                return Poll::Ready(Some(Ok(line)));
            }

            if self.done {
                return Poll::Ready(self.decoder.finish().map(Ok));
            }

            match Pin::new(&mut self.inner).poll_next(ctx) {
                Poll::Ready(Some(Err(err))) => return Poll::Ready(Some(Err(err))),
                Poll::Ready(None) => self.done = true,
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Some(Ok(bs))) => self.decoder.put(bs),
            }
        }
    }
}

impl<S, B, E> From<S> for Lines<S>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: bytes::Buf,
{
    fn from(inner: S) -> Self {
        Self {
            inner,
            decoder: LineDecoder::default(),
            done: false,
        }
    }
}

/// Turns a body stream of byte chunks into a stream of lines.
pub trait IntoLines: Sized {
    fn into_lines(self) -> Lines<Self>;
}

impl<S, B, E> IntoLines for S
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: bytes::Buf,
{
    fn into_lines(self) -> Lines<Self> {
        Lines::from(self)
    }
}
