//! Copy a line stream to stdout and any number of files (`tee`).

use crate::error::{IoContext, Result};
use std::fs::OpenOptions;
use std::io::{BufRead, Write};
use std::path::Path;

/// A set of writers that every line is copied to.
pub struct Tee {
    sinks: Vec<Box<dyn Write>>,
}

impl Tee {
    pub fn new(primary: Box<dyn Write>) -> Self {
        Self {
            sinks: vec![primary],
        }
    }

    /// Add a file sink, truncating it unless `append` is set.
    pub fn add_file(&mut self, path: &Path, append: bool) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)
            .io_context(|| format!("cannot open {}", path.display()))?;
        self.sinks.push(Box::new(std::io::BufWriter::new(file)));
        Ok(())
    }

    /// Copy `reader` line by line to every sink, then flush them all.
    /// Returns the number of lines copied.
    pub fn copy_lines<R: BufRead>(&mut self, reader: R) -> Result<u64> {
        let mut count = 0;
        for line in reader.lines() {
            let line = line.io_context(|| "cannot read input")?;
            for sink in &mut self.sinks {
                writeln!(sink, "{}", line).io_context(|| "write error")?;
            }
            count += 1;
        }

        for sink in &mut self.sinks {
            sink.flush().io_context(|| "flush error")?;
        }
        Ok(count)
    }
}
