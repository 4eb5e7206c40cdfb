use rodio::{OutputStream, OutputStreamBuilder};

/// Open the default output device.
///
/// A missing device is not fatal: tracks simply fail to start and the UI
/// reports it.
pub fn open_output() -> Option<OutputStream> {
    match OutputStreamBuilder::open_default_stream() {
        Ok(mut stream) => {
            // rodio logs to stderr when OutputStream is dropped. That's noisy for a TUI app.
            stream.log_on_drop(false);
            Some(stream)
        }
        Err(e) => {
            tracing::warn!(error = %e, "no audio output device");
            None
        }
    }
}
