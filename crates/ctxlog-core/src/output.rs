//! Output destinations and their record formats.
//!
//! An [`Output`] is a list of sinks. Each sink pairs a writer with a
//! [`LogFormat`]; every record is rendered once per format and written to
//! every sink with a single `write_all`, so writers that lock per write
//! never interleave two records.
//!
//! Writers are anything implementing `tracing_subscriber`'s
//! [`MakeWriter`]: `std::io::stdout`, `Arc<File>`, `Mutex<W>`,
//! `tracing_appender` rolling appenders, or [`SharedBuffer`].

use crate::record::Record;
use crate::term;
use ctxlog_types::LogFormat;
use parking_lot::Mutex;
use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriter};

struct Sink {
    format: LogFormat,
    color: bool,
    writer: BoxMakeWriter,
}

/// Where and how a logger writes its records.
#[derive(Clone)]
pub struct Output {
    sinks: Vec<Arc<Sink>>,
}

impl Output {
    fn single<W>(format: LogFormat, color: bool, writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        Self {
            sinks: vec![Arc::new(Sink {
                format,
                color,
                writer: BoxMakeWriter::new(writer),
            })],
        }
    }

    /// JSON records on standard output.
    pub fn stdout() -> Self {
        Self::json(io::stdout)
    }

    /// JSON records on `writer`.
    pub fn json<W>(writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        Self::single(LogFormat::Json, false, writer)
    }

    /// Uncoloured console lines on `writer`.
    pub fn console<W>(writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        Self::single(LogFormat::Console, false, writer)
    }

    /// Console lines on `writer`, coloured when `color` is set.
    pub fn console_colored<W>(writer: W, color: bool) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        Self::single(LogFormat::Console, color, writer)
    }

    /// Fan out: every record goes to the sinks of `self` and of `other`.
    pub fn tee(mut self, other: Output) -> Self {
        self.sinks.extend(other.sinks);
        self
    }

    /// Formats of the sinks, in write order.
    pub fn formats(&self) -> Vec<LogFormat> {
        self.sinks.iter().map(|s| s.format).collect()
    }

    /// Render `record` and write it to every sink.
    ///
    /// Write failures are ignored; a logging call never fails.
    pub(crate) fn write(&self, record: &Record) {
        let mut json: Option<String> = None;

        for sink in self.sinks.iter() {
            let line = match sink.format {
                LogFormat::Json => json.get_or_insert_with(|| record.to_json_line()).clone(),
                LogFormat::Console => record.to_console_line(sink.color),
            };
            let mut writer = sink.writer.make_writer();
            let _ = writer.write_all(line.as_bytes());
            let _ = writer.flush();
        }
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("formats", &self.formats())
            .finish()
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::stdout()
    }
}

/// Console output to standard output, coloured when stdout is a terminal.
pub fn plain_text() -> Output {
    Output::console_colored(io::stdout, term::in_controlling_terminal())
}

/// Console output to standard output plus JSON records in `file`.
///
/// The caller keeps ownership of the file: it must stay open for as long
/// as the logger is used and is closed when the last `Arc` is dropped.
pub fn write_to_file(file: Arc<File>) -> Output {
    plain_text().tee(Output::json(file))
}

/// An in-memory, cloneable writer; useful for asserting on output.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, as lossy UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }

    /// Written lines, without the trailing empty line.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SharedBuffer {
    type Writer = SharedBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl fmt::Debug for SharedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedBuffer").field(&self.0.lock().len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Fields;
    use crate::time;
    use ctxlog_types::Level;

    fn write_one(output: &Output) {
        let context = Fields::new();
        output.write(&Record {
            level: Level::Info,
            time: time::now(),
            message: "m",
            context: &context,
            stack: None,
            error: None,
            fields: Fields::new().with("k", "v"),
            caller: None,
        });
    }

    #[test]
    fn test_tee_keeps_sink_order() {
        let output = Output::json(SharedBuffer::new())
            .tee(Output::console(SharedBuffer::new()).tee(Output::json(SharedBuffer::new())));
        assert_eq!(
            output.formats(),
            vec![LogFormat::Json, LogFormat::Console, LogFormat::Json]
        );
    }

    #[test]
    fn test_each_sink_gets_one_line() {
        let a = SharedBuffer::new();
        let b = SharedBuffer::new();
        let output = Output::json(a.clone()).tee(Output::json(b.clone()));

        write_one(&output);
        write_one(&output);

        assert_eq!(a.lines().len(), 2);
        assert_eq!(a.contents(), b.contents());
        assert!(a.lines()[0].ends_with(r#""message":"m"}"#));
    }

    #[test]
    fn test_failing_writer_is_ignored() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let ok = SharedBuffer::new();
        let output = Output::json(|| Broken).tee(Output::console(ok.clone()));

        write_one(&output);
        assert!(ok.contents().contains("k=v"));
    }

    #[test]
    fn test_plain_text_is_console() {
        assert_eq!(plain_text().formats(), vec![LogFormat::Console]);
    }
}
