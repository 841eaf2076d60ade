use sockring::{RingBuffer, RingConfig};
use std::io::{self, Write};
use std::os::unix::net::UnixStream;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

const RECORD_SIZE: usize = 64;

#[derive(Debug, Default, Clone, Copy)]
struct ReaderStats {
    records: u64,
    rewinds: u64,
    capacity: usize,
}

fn main() {
    tracing_subscriber::fmt().init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("sockring stress test: socket -> ring -> consume\n");

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .map_err(|e| format!("Failed to set Ctrl+C handler: {}", e))?;

    let (mut peer, sock) = UnixStream::pair()?;
    let mut ring = RingBuffer::with_config(RingConfig::with_capacity(4096))?;

    std::thread::scope(|scope| {
        let writer_running = running.clone();
        let writer = scope.spawn(move || -> std::io::Result<u64> {
            let mut count = 0u64;
            let payload = [0xA5u8; RECORD_SIZE];

            while writer_running.load(Ordering::Relaxed) {
                peer.write_all(&payload)?;
                count += 1;
            }

            Ok(count)
        });

        let reader = scope.spawn(move || consume_records(&mut ring, &sock));

        println!("Running for 5 seconds...");
        let started = Instant::now();
        while running.load(Ordering::SeqCst) && started.elapsed() < Duration::from_secs(5) {
            std::thread::sleep(Duration::from_millis(50));
        }
        running.store(false, Ordering::SeqCst);

        let written = writer.join().map_err(|_| "writer thread panicked")??;
        let stats = reader.join().map_err(|_| "reader thread panicked")??;
        let elapsed = started.elapsed().as_secs_f64();

        println!("\nResults:");
        println!("  Written to socket: {} records", written);
        println!("  Consumed from ring: {} records", stats.records);
        println!("  Rewinds: {}", stats.rewinds);
        println!("  Final ring capacity: {} bytes", stats.capacity);
        println!(
            "  Throughput: {:.2} MB/sec",
            (stats.records as usize * RECORD_SIZE) as f64 / elapsed / 1024.0 / 1024.0
        );

        Ok(())
    })
}

/// Reads whole records until the peer closes. A socket error stops the
/// reader and is handed back to the caller.
fn consume_records(ring: &mut RingBuffer, sock: &UnixStream) -> io::Result<ReaderStats> {
    let mut stats = ReaderStats::default();

    loop {
        match ring.copy_from_socket(sock) {
            Ok(0) if ring.is_full() => {}
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "socket read failed, stopping reader");
                return Err(e);
            }
        }

        let whole = ring.len() / RECORD_SIZE * RECORD_SIZE;
        ring.discard(whole);
        stats.records += (whole / RECORD_SIZE) as u64;

        if ring.rewind()? > 0 {
            stats.rewinds += 1;
        }
    }

    stats.capacity = ring.capacity();
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_whole_records_until_close() {
        let (mut peer, sock) = UnixStream::pair().unwrap();
        let mut ring = RingBuffer::new(RECORD_SIZE).unwrap();
        peer.write_all(&[1u8; RECORD_SIZE * 3 + 5]).unwrap();
        drop(peer);

        let stats = consume_records(&mut ring, &sock).unwrap();

        assert_eq!(stats.records, 3);
        assert_eq!(ring.len(), 5);
    }

    #[test]
    fn socket_error_is_returned() {
        let (_peer, sock) = UnixStream::pair().unwrap();
        sock.set_nonblocking(true).unwrap();
        let mut ring = RingBuffer::new(RECORD_SIZE).unwrap();

        let err = consume_records(&mut ring, &sock).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
    }
}
