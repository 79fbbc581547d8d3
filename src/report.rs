use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/** progress report of a run: printed on the console and mirrored line by line in a log file.
A logger can also keep the lines in memory instead of printing them.
*/
#[derive(Debug)]
pub struct RunLogger {
    /// run log file (if any)
    file: Option<(PathBuf, BufWriter<File>)>,
    /// print lines on stdout
    console: bool,
    /// lines kept in memory (if enabled)
    history: Option<Vec<String>>,
}

impl RunLogger {
    /// prints on the console only
    pub fn console() -> Self { Self { file: None, console: true, history: None } }

    /// prints on the console and writes in the given file (truncated)
    pub fn with_file<P:AsRef<Path>>(path:P) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = BufWriter::new(File::create(&path)?);
        Ok(Self { file: Some((path, file)), console: true, history: None })
    }

    /// keeps the lines in memory, prints nothing
    pub fn in_memory() -> Self { Self { file: None, console: false, history: Some(Vec::new()) } }

    /// path of the run log file
    pub fn path(&self) -> Option<&Path> { self.file.as_ref().map(|(p,_)| p.as_path()) }

    /// lines reported so far (in-memory loggers only)
    pub fn history(&self) -> &[String] {
        self.history.as_deref().unwrap_or(&[])
    }

    /// reports a line
    pub fn line<S:AsRef<str>>(&mut self, msg:S) {
        let msg = msg.as_ref();
        if self.console { println!("{}", msg); }
        if let Some(history) = self.history.as_mut() { history.push(msg.to_string()); }
        let failed = match self.file.as_mut() {
            Some((path, file)) => match writeln!(file, "{}", msg) {
                Ok(()) => false,
                Err(e) => {
                    log::warn!("unable to write in {}: {} (run log disabled)", path.display(), e);
                    true
                }
            },
            None => false,
        };
        if failed { self.file = None; }
    }

    /// writes the buffered lines in the run log file
    pub fn flush(&mut self) {
        if let Some((path, file)) = self.file.as_mut() {
            if let Err(e) = file.flush() {
                log::warn!("unable to write in {}: {}", path.display(), e);
            }
        }
    }
}

impl Drop for RunLogger {
    fn drop(&mut self) { self.flush(); }
}
