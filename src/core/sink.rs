//! Sink trait for record output destinations

use super::error::Result;

/// Destination for serialized records.
///
/// A sink is moved into the logger's background worker and is only ever
/// touched from that one thread, hence `Send` without `Sync`.
pub trait Sink: Send {
    /// Write raw bytes. The worker calls this once with the record and once
    /// with the separator.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
