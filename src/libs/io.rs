//! # I/O Operations Library
//!
//! Console output through a buffered stdout sink, line input, and file
//! operations for Ergo programs. File and input failures are soft: they come
//! back as `null` or `false` for the program to branch on.

use std::fs;
use std::io::{self, BufRead, BufWriter, IsTerminal, LineWriter, Stdout, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::{Mutex, Once};

use tracing::warn;

use crate::config::{self, Buffering};
use crate::error::Result;
use crate::runtime::format;
use crate::runtime::string::Str;
use crate::runtime::value::Value;

enum Sink {
    Line(LineWriter<Stdout>),
    Full(BufWriter<Stdout>),
}

/// Whether stdout should flush at every newline
fn line_buffered(mode: Buffering, terminal: bool) -> bool {
    match mode {
        Buffering::Line => true,
        Buffering::Full => false,
        Buffering::Auto => terminal,
    }
}

impl Sink {
    fn open(mode: Buffering) -> Sink {
        let stdout = io::stdout();
        if line_buffered(mode, stdout.is_terminal()) {
            Sink::Line(LineWriter::new(stdout))
        } else {
            Sink::Full(BufWriter::new(stdout))
        }
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Line(w) => w.write(buf),
            Sink::Full(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Line(w) => w.flush(),
            Sink::Full(w) => w.flush(),
        }
    }
}

lazy_static::lazy_static! {
    static ref STDOUT: Mutex<Option<Sink>> = Mutex::new(None);
}

static EXIT_FLUSH: Once = Once::new();

/// Runs from `exit()`, after `main` returns or `process::exit` is called
extern "C" fn flush_at_exit() {
    let mut guard = match STDOUT.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if let Some(sink) = guard.as_mut() {
        let _ = sink.flush();
    }
}

fn with_stdout<R>(f: impl FnOnce(&mut Sink) -> io::Result<R>) -> io::Result<R> {
    let mut guard = STDOUT
        .lock()
        .map_err(|_| io::Error::new(io::ErrorKind::Other, "stdout sink poisoned"))?;
    let sink = guard.get_or_insert_with(|| {
        EXIT_FLUSH.call_once(|| {
            // SAFETY: `flush_at_exit` is a plain function that neither unwinds
            // nor calls `exit`.
            if unsafe { libc::atexit(flush_at_exit) } != 0 {
                warn!("could not register the stdout flush at exit");
            }
        });
        Sink::open(config::active().stdout_buffering)
    });
    f(sink)
}

/// Flush stdout without blocking; used on the way into a trap
pub(crate) fn flush_quietly() {
    if let Ok(mut guard) = STDOUT.try_lock() {
        if let Some(sink) = guard.as_mut() {
            let _ = sink.flush();
        }
    }
}

fn path_of(path: &Value) -> Result<PathBuf> {
    let s = path.try_as_str()?;
    Ok(PathBuf::from(s.to_string_lossy().into_owned()))
}

fn str_value(bytes: Vec<u8>) -> Value {
    Value::Str(Rc::new(Str::from_bytes(bytes)))
}

/// Console operations
pub struct Console;

impl Console {
    /// Print the stringified value
    pub fn write(value: &Value) -> Value {
        let mut bytes = Vec::new();
        format::render_into(value, &mut bytes);
        Console::emit(&bytes)
    }

    /// Print the stringified value and a newline
    pub fn writeln(value: &Value) -> Value {
        let mut bytes = Vec::new();
        format::render_into(value, &mut bytes);
        bytes.push(b'\n');
        Console::emit(&bytes)
    }

    /// Print `fmt` with its `{}` placeholders filled from `args`
    pub fn writef(fmt: &Value, args: &[Value]) -> Result<Value> {
        let mut bytes = Vec::new();
        format::interpolate(fmt.try_as_str()?.as_bytes(), args, &mut bytes);
        Ok(Console::emit(&bytes))
    }

    /// Like `writef`, but into a new string instead of stdout
    pub fn format(fmt: &Value, args: &[Value]) -> Result<Value> {
        let mut bytes = Vec::new();
        format::interpolate(fmt.try_as_str()?.as_bytes(), args, &mut bytes);
        Ok(str_value(bytes))
    }

    pub fn writef_to<W: Write>(out: &mut W, fmt: &Value, args: &[Value]) -> Result<()> {
        let mut bytes = Vec::new();
        format::interpolate(fmt.try_as_str()?.as_bytes(), args, &mut bytes);
        out.write_all(&bytes)?;
        Ok(())
    }

    fn emit(bytes: &[u8]) -> Value {
        match with_stdout(|sink| sink.write_all(bytes)) {
            Ok(()) => Value::Bool(true),
            Err(e) => {
                warn!(error = %e, "write to stdout failed");
                Value::Bool(false)
            }
        }
    }

    pub fn flush() -> Value {
        match with_stdout(|sink| sink.flush()) {
            Ok(()) => Value::Bool(true),
            Err(e) => {
                warn!(error = %e, "flushing stdout failed");
                Value::Bool(false)
            }
        }
    }

    /// Next line of stdin without its line terminator, `null` at end of input
    pub fn read_line() -> Value {
        // Prompts written with `write` must be visible before blocking on input
        Console::flush();
        Console::read_line_from(&mut io::stdin().lock())
    }

    pub fn read_line_from<R: BufRead>(reader: &mut R) -> Value {
        let mut line = Vec::new();
        match reader.read_until(b'\n', &mut line) {
            Ok(0) => Value::Null,
            Ok(_) => {
                if line.ends_with(b"\n") {
                    line.pop();
                    if line.ends_with(b"\r") {
                        line.pop();
                    }
                }
                str_value(line)
            }
            Err(e) => {
                warn!(error = %e, "reading from stdin failed");
                Value::Null
            }
        }
    }

    /// Read one stdin line and scan it against `fmt`
    pub fn readf(fmt: &Value, hints: &[Value]) -> Result<Value> {
        Console::flush();
        Console::readf_from(&mut io::stdin().lock(), fmt, hints)
    }

    pub fn readf_from<R: BufRead>(reader: &mut R, fmt: &Value, hints: &[Value]) -> Result<Value> {
        let fmt = fmt.try_as_str()?;
        match Console::read_line_from(reader) {
            Value::Str(line) => Ok(Value::array(format::scan(
                fmt.as_bytes(),
                line.as_bytes(),
                hints,
            ))),
            _ => Ok(Value::Null),
        }
    }

    /// Scan an already read `line` against `fmt`
    pub fn scanf(fmt: &Value, line: &Value, hints: &[Value]) -> Result<Value> {
        let fmt = fmt.try_as_str()?;
        let line = line.try_as_str()?;
        Ok(Value::array(format::scan(fmt.as_bytes(), line.as_bytes(), hints)))
    }
}

/// File operations
pub struct FileOps;

impl FileOps {
    /// Whole file as a string, `null` when it cannot be read
    pub fn read_file(path: &Value) -> Result<Value> {
        let file_path = path_of(path)?;
        match fs::read(&file_path) {
            Ok(contents) => Ok(str_value(contents)),
            Err(e) => {
                warn!(path = %file_path.display(), error = %e, "read_file failed");
                Ok(Value::Null)
            }
        }
    }

    /// Write the stringified `content`, replacing the file; `false` on failure
    pub fn write_file(path: &Value, content: &Value) -> Result<Value> {
        let file_path = path_of(path)?;
        let mut bytes = Vec::new();
        format::render_into(content, &mut bytes);
        match fs::write(&file_path, bytes) {
            Ok(()) => Ok(Value::Bool(true)),
            Err(e) => {
                warn!(path = %file_path.display(), error = %e, "write_file failed");
                Ok(Value::Bool(false))
            }
        }
    }

    pub fn file_exists(path: &Value) -> Result<Value> {
        Ok(Value::Bool(path_of(path)?.exists()))
    }
}
