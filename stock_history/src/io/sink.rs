use std::{io::Write, sync::Mutex};

use async_trait::async_trait;
use snafu::{Backtrace, ResultExt, Snafu};

use crate::models::price_bar::PriceBar;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SinkError {
    /// An error occurred while trying to write the data (e.g., file I/O error).
    #[snafu(display("Failed to write data: {message}"))]
    WriteError {
        message: String,
        backtrace: Backtrace,
    },

    /// The records could not be serialized into the destination format.
    #[snafu(display("Data conversion error: {source}"))]
    ConversionError {
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    /// A generic I/O error.
    #[snafu(display("I/O error: {source}"))]
    Io {
        source: std::io::Error,
        backtrace: Backtrace,
    },
}

#[async_trait]
pub trait DataSink {
    /// The type of output returned after a successful write operation.
    ///
    /// A file sink might return the path it created; the JSON line sink
    /// returns the number of records written.
    type Output;

    /// Writes a slice of `PriceBar` to the destination.
    async fn write(&self, data: &[PriceBar]) -> Result<Self::Output, SinkError>;
}

/// Renders records as a single-line JSON array, without the trailing newline.
pub fn render_json_line(data: &[PriceBar]) -> Result<String, SinkError> {
    serde_json::to_string(data).context(ConversionSnafu)
}

/// Writes all records as one JSON array terminated by `\n`.
///
/// The line is rendered in full before anything reaches the writer, so a
/// serialization failure leaves the destination untouched.
pub struct JsonLineSink<W> {
    writer: Mutex<W>,
}

impl<W: Write> JsonLineSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer.into_inner().map_err(|_| {
            WriteSnafu {
                message: "writer lock poisoned",
            }
            .build()
        })
    }
}

#[async_trait]
impl<W: Write + Send> DataSink for JsonLineSink<W> {
    type Output = usize;

    async fn write(&self, data: &[PriceBar]) -> Result<usize, SinkError> {
        let mut line = render_json_line(data)?;
        line.push('\n');

        let mut writer = self.writer.lock().map_err(|_| {
            WriteSnafu {
                message: "writer lock poisoned",
            }
            .build()
        })?;
        writer.write_all(line.as_bytes()).context(IoSnafu)?;
        writer.flush().context(IoSnafu)?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, close: f64, volume: u64) -> PriceBar {
        PriceBar {
            date: date.to_string(),
            open: 100.0,
            high: 101.25,
            low: 99.5,
            close,
            volume,
        }
    }

    #[tokio::test]
    async fn writes_one_line_per_call() {
        let sink = JsonLineSink::new(Vec::new());
        let written = sink
            .write(&[record("2024-01-02", 100.5, 10), record("2024-01-03", 101.0, 0)])
            .await
            .unwrap();
        assert_eq!(written, 2);

        let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert!(out.ends_with('\n'));
        assert_eq!(out.lines().count(), 1);

        let parsed: Vec<PriceBar> = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(parsed[1].date, "2024-01-03");
        assert_eq!(parsed[1].volume, 0);
    }

    #[tokio::test]
    async fn empty_input_writes_empty_array() {
        let sink = JsonLineSink::new(Vec::new());
        assert_eq!(sink.write(&[]).await.unwrap(), 0);
        assert_eq!(sink.into_inner().unwrap(), b"[]\n");
    }

    #[test]
    fn rendered_line_shape() {
        let line = render_json_line(&[record("2024-01-02", 100.5, 82_488_700)]).unwrap();
        insta::assert_snapshot!(line, @r#"[{"date":"2024-01-02","open":100.0,"high":101.25,"low":99.5,"close":100.5,"volume":82488700}]"#);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn io_failures_surface_as_sink_errors() {
        let sink = JsonLineSink::new(BrokenPipe);
        let err = sink.write(&[record("2024-01-02", 1.0, 1)]).await.unwrap_err();
        assert!(matches!(err, SinkError::Io { .. }));
        assert!(snafu::ErrorCompat::backtrace(&err).is_some());
    }

    #[test]
    fn lock_failures_carry_a_backtrace() {
        let err = WriteSnafu {
            message: "writer lock poisoned",
        }
        .build();
        assert_eq!(err.to_string(), "Failed to write data: writer lock poisoned");
        assert!(snafu::ErrorCompat::backtrace(&err).is_some());
    }
}
