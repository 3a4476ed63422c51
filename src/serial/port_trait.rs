//! Trait abstraction for the telemetry byte source to enable testing

use async_trait::async_trait;
use bytes::Bytes;
use std::io;

/// Byte source feeding the frame monitor
///
/// Transport details (device path, baud rate, read timeout) belong to the
/// implementation, not to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ByteSource: Send {
    /// Number of bytes waiting in the input buffer (non-blocking)
    fn bytes_available(&self) -> io::Result<usize>;

    /// Read up to `count` bytes, waiting at most the source's read timeout
    ///
    /// May return fewer bytes than requested, including none.
    async fn read_up_to(&mut self, count: usize) -> io::Result<Bytes>;

    /// Drop everything waiting in the input buffer
    fn discard_pending(&mut self) -> io::Result<()>;

    /// Release the underlying transport
    async fn close(&mut self) -> io::Result<()>;
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct ScriptedState {
        pending: VecDeque<u8>,
        read_calls: usize,
        discard_calls: usize,
        closed: bool,
    }

    /// Scripted byte source for testing
    ///
    /// Bytes pushed with [`ScriptedSource::push`] become "available" and are
    /// handed out by `read_up_to` in arrival order.
    #[derive(Clone, Default)]
    pub struct ScriptedSource {
        state: Arc<Mutex<ScriptedState>>,
    }

    impl ScriptedSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push(&self, data: &[u8]) {
            self.state.lock().unwrap().pending.extend(data.iter().copied());
        }

        pub fn pending(&self) -> usize {
            self.state.lock().unwrap().pending.len()
        }

        pub fn read_calls(&self) -> usize {
            self.state.lock().unwrap().read_calls
        }

        pub fn discard_calls(&self) -> usize {
            self.state.lock().unwrap().discard_calls
        }

        pub fn is_closed(&self) -> bool {
            self.state.lock().unwrap().closed
        }
    }

    #[async_trait]
    impl ByteSource for ScriptedSource {
        fn bytes_available(&self) -> io::Result<usize> {
            Ok(self.pending())
        }

        async fn read_up_to(&mut self, count: usize) -> io::Result<Bytes> {
            let mut state = self.state.lock().unwrap();
            state.read_calls += 1;
            let n = count.min(state.pending.len());
            Ok(state.pending.drain(..n).collect::<Vec<u8>>().into())
        }

        fn discard_pending(&mut self) -> io::Result<()> {
            let mut state = self.state.lock().unwrap();
            state.discard_calls += 1;
            state.pending.clear();
            Ok(())
        }

        async fn close(&mut self) -> io::Result<()> {
            self.state.lock().unwrap().closed = true;
            Ok(())
        }
    }
}
