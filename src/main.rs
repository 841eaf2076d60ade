use sockring::{RingBuffer, RingConfig};
use std::io;
use std::net::{TcpListener, TcpStream};
use std::os::unix::io::{AsRawFd, RawFd};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const POLL_TIMEOUT_MS: i32 = 100;

#[derive(Debug, Default, Clone, Copy)]
struct SessionStats {
    bytes: u64,
    records: u64,
    rewinds: u64,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:7878".to_string());
    let config = RingConfig::from_env()?;

    println!("sockring v0.1.0");
    println!("Draining newline records on {}, press Ctrl+C to stop\n", addr);

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        println!("\nShutting down...");
        r.store(false, Ordering::SeqCst);
    })?;

    let listener = TcpListener::bind(&addr)?;
    listener.set_nonblocking(true)?;

    while running.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, peer)) => {
                tracing::info!(%peer, "connection accepted");
                let stats = serve(stream, config, &running)?;
                tracing::info!(
                    %peer,
                    bytes = stats.bytes,
                    records = stats.records,
                    rewinds = stats.rewinds,
                    "connection finished"
                );
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                std::thread::sleep(Duration::from_millis(10));
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn serve(stream: TcpStream, config: RingConfig, running: &AtomicBool) -> io::Result<SessionStats> {
    stream.set_nonblocking(true)?;
    let mut ring = RingBuffer::with_config(config)?;
    let mut stats = SessionStats::default();
    let mut last_report = Instant::now();

    while running.load(Ordering::SeqCst) {
        if !wait_readable(stream.as_raw_fd(), POLL_TIMEOUT_MS)? {
            continue;
        }

        match ring.copy_from_socket(&stream) {
            Ok(0) if ring.is_full() => {}
            Ok(0) => break,
            Ok(n) => stats.bytes += n as u64,
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                ) =>
            {
                continue;
            }
            Err(e) => return Err(e),
        }

        stats.records += drain_records(&mut ring);
        if ring.rewind()? > 0 {
            stats.rewinds += 1;
        }

        if last_report.elapsed() >= Duration::from_secs(5) {
            tracing::info!(
                bytes = stats.bytes,
                records = stats.records,
                ring_used = ring.len(),
                ring_capacity = ring.capacity(),
                "status"
            );
            last_report = Instant::now();
        }
    }

    Ok(stats)
}

/// Consumes every complete `\n`-terminated record, leaving a partial tail.
fn drain_records(ring: &mut RingBuffer) -> u64 {
    let mut records = 0;
    loop {
        let (first, second) = ring.as_slices();
        let Some(end) = first.iter().chain(second).position(|&b| b == b'\n') else {
            break;
        };
        ring.discard(end + 1);
        records += 1;
    }
    records
}

fn wait_readable(fd: RawFd, timeout_ms: i32) -> io::Result<bool> {
    let mut pfd = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    let rc = unsafe { libc::poll(&mut pfd, 1, timeout_ms) };
    if rc < 0 {
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::Interrupted {
            return Ok(false);
        }
        return Err(err);
    }
    Ok(rc > 0)
}
