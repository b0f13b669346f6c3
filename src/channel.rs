use std::fmt;
use std::io::{Read, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};
use pocket_terminal::{Channel, TerminalError, TerminalResult, TerminalSize};

const READ_CHUNK: usize = 4096;

/// A local program on a pseudo-terminal, standing in for the remote shell.
///
/// The program is started by the pty request. The master side is drained by
/// a reader thread into a queue, so `read` never blocks.
pub struct ProcessChannel {
    program: String,
    args: Vec<String>,
    master: Option<Box<dyn MasterPty + Send>>,
    child: Option<Box<dyn Child + Send + Sync>>,
    writer: Option<Box<dyn Write + Send>>,
    output: Option<Receiver<Vec<u8>>>,
    open: bool,
}

impl fmt::Debug for ProcessChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessChannel")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("open", &self.open)
            .finish_non_exhaustive()
    }
}

fn pty_error(err: impl fmt::Display) -> TerminalError {
    TerminalError::PtyRequest(err.to_string())
}

impl ProcessChannel {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            master: None,
            child: None,
            writer: None,
            output: None,
            open: false,
        }
    }

    fn spawn_reader(mut source: Box<dyn Read + Send>, tx: mpsc::Sender<Vec<u8>>) {
        thread::spawn(move || {
            let mut buf = [0u8; READ_CHUNK];
            loop {
                match source.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        if tx.send(buf[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                    // Linux reports EIO once the slave side is gone.
                    Err(e) => {
                        tracing::debug!("pty reader stopped: {}", e);
                        break;
                    }
                }
            }
        });
    }
}

impl Channel for ProcessChannel {
    fn request_pty(&mut self, term_type: &str, size: TerminalSize) -> TerminalResult<()> {
        let pair = native_pty_system()
            .openpty(PtySize {
                rows: size.rows,
                cols: size.cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(pty_error)?;

        let mut cmd = CommandBuilder::new(&self.program);
        cmd.args(&self.args);
        cmd.env("TERM", term_type);
        if let Ok(cwd) = std::env::current_dir() {
            cmd.cwd(cwd);
        }

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| pty_error(format!("{}: {}", self.program, e)))?;
        let reader = pair.master.try_clone_reader().map_err(pty_error)?;
        let writer = pair.master.take_writer().map_err(pty_error)?;
        // Only the child may hold the slave, or the reader never sees it close.
        drop(pair.slave);

        let (tx, rx) = mpsc::channel();
        Self::spawn_reader(reader, tx);

        tracing::info!(
            program = %self.program,
            pid = ?child.process_id(),
            cols = size.cols,
            rows = size.rows,
            "spawned remote stand-in on a pty"
        );
        self.master = Some(pair.master);
        self.child = Some(child);
        self.writer = Some(writer);
        self.output = Some(rx);
        self.open = true;
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> TerminalResult<()> {
        let writer = self.writer.as_mut().ok_or(TerminalError::NotConnected)?;
        writer.write_all(data)?;
        writer.flush()?;
        Ok(())
    }

    fn read(&mut self) -> TerminalResult<Vec<u8>> {
        let Some(rx) = self.output.as_ref() else {
            return Err(TerminalError::NotConnected);
        };
        let mut data = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(chunk) => data.extend_from_slice(&chunk),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.open = false;
                    break;
                }
            }
        }
        Ok(data)
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) -> TerminalResult<()> {
        self.open = false;
        self.writer = None;
        self.output = None;
        if let Some(mut child) = self.child.take() {
            if child.try_wait()?.is_none() {
                if let Err(e) = child.kill() {
                    tracing::debug!("kill failed, child likely gone: {}", e);
                }
            }
            let status = child.wait()?;
            tracing::info!(code = status.exit_code(), "remote stand-in exited");
        }
        self.master = None;
        Ok(())
    }
}
