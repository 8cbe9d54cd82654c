use std::{
    io::{self, BufRead, BufReader, Cursor, Write},
    sync::{Arc, Mutex, PoisonError},
};
use duck_base::Result;

pub type Input = Box<dyn BufRead + Send>;
pub type Output = Box<dyn Write + Send>;

// The console is the script's view of standard input and output. Every unit
// of control shares it; each write and each line read holds the lock for
// that one call only.
pub struct Console {
    input: Mutex<Input>,
    output: Mutex<Output>,
}

impl Console {
    pub fn new(input: Input, output: Output) -> Self {
        Console {
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }

    pub fn stdio() -> Self {
        Console::new(
            Box::new(BufReader::new(io::stdin())),
            Box::new(io::stdout()),
        )
    }

    /// A console reading from a fixed string, with output collected in memory.
    pub fn memory(input: &str) -> (Self, MemOutput) {
        let out = MemOutput::default();
        let console = Console::new(
            Box::new(Cursor::new(input.as_bytes().to_vec())),
            Box::new(out.clone()),
        );
        (console, out)
    }

    /// Writes without a trailing newline and flushes, so prompts show up
    /// before a blocking read.
    pub fn write(&self, text: &str) -> Result<()> {
        let mut out = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        out.write_all(text.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    /// Reads one line, newline included. End of input reads as "".
    pub fn read_line(&self) -> Result<String> {
        let mut line = String::new();
        self.input
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .read_line(&mut line)?;
        Ok(line)
    }
}

// MemOutput

#[derive(Clone, Default)]
pub struct MemOutput {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemOutput {
    pub fn contents(&self) -> String {
        let buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl Write for MemOutput {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(data);
        Ok(data.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
