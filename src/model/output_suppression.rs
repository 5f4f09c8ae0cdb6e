//! Silencing native solver output
//!
//! Native solvers print straight to the process's stdout. A [`Gag`] can
//! redirect it, but only one gag per stream may exist at a time, so gags are
//! shared: every [`OutputGag`] taken while another one is alive reuses the
//! same redirect, and the stream is restored once the last one is dropped.

use std::{
    io,
    sync::{Arc, Mutex, PoisonError, Weak},
};

use gag::Gag;

/// Shared redirect of one output stream, released on drop
pub struct OutputGag {
    _gag: Arc<Gag>,
}

impl OutputGag {
    pub fn stdout() -> io::Result<Self> {
        STDOUT.acquire()
    }

    pub fn stderr() -> io::Result<Self> {
        STDERR.acquire()
    }
}

struct SharedGag {
    current: Mutex<Weak<Gag>>,
    open: fn() -> io::Result<Gag>,
}

impl SharedGag {
    const fn new(open: fn() -> io::Result<Gag>) -> Self {
        Self {
            current: Mutex::new(Weak::new()),
            open,
        }
    }

    fn acquire(&self) -> io::Result<OutputGag> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);

        let gag = match current.upgrade() {
            Some(gag) => gag,
            None => {
                let gag = Arc::new((self.open)()?);
                *current = Arc::downgrade(&gag);
                gag
            }
        };

        Ok(OutputGag { _gag: gag })
    }
}

static STDOUT: SharedGag = SharedGag::new(Gag::stdout);
static STDERR: SharedGag = SharedGag::new(Gag::stderr);

/// Silence stdout while `show_log` is off
pub fn silence_unless(show_log: bool) -> io::Result<Option<OutputGag>> {
    if show_log {
        Ok(None)
    } else {
        OutputGag::stdout().map(Some)
    }
}
