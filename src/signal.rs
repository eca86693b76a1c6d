use std::io;
use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

const NOTICE: &[u8] = b"\nConfiguration reloaded\n";

static RELOAD: AtomicBool = AtomicBool::new(false);
static RECEIVED: AtomicU64 = AtomicU64::new(0);

extern "C" fn on_sighup(_: libc::c_int) {
    // only async-signal-safe calls in here
    unsafe {
        libc::write(libc::STDOUT_FILENO, NOTICE.as_ptr().cast(), NOTICE.len());
    }
    RECEIVED.fetch_add(1, Ordering::SeqCst);
    RELOAD.store(true, Ordering::SeqCst);
}

/// Installs the SIGHUP handler. Interrupted reads are restarted.
pub fn install() -> io::Result<()> {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = on_sighup as extern "C" fn(libc::c_int) as libc::sighandler_t;
        libc::sigemptyset(&mut sa.sa_mask);
        sa.sa_flags = libc::SA_RESTART;
        if libc::sigaction(libc::SIGHUP, &sa, ptr::null_mut()) != 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

/// True if a SIGHUP arrived since the last call.
pub fn take_reload() -> bool {
    RELOAD.swap(false, Ordering::SeqCst)
}

pub fn received() -> u64 {
    RECEIVED.load(Ordering::SeqCst)
}
