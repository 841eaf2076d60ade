use super::RingBuffer;
use std::io;
use std::os::unix::io::{AsRawFd, RawFd};

impl RingBuffer {
    #[inline]
    pub fn copy_from_socket<S: AsRawFd + ?Sized>(&mut self, socket: &S) -> io::Result<usize> {
        self.copy_from_fd(socket.as_raw_fd())
    }

    /// Reads whatever `fd` has ready straight into free space.
    ///
    /// Issues exactly one `read` or `readv`. `Ok(0)` means either the buffer
    /// was full and nothing was attempted, or the peer closed; errors come
    /// back exactly as the OS reported them and leave the buffer untouched.
    pub fn copy_from_fd(&mut self, fd: RawFd) -> io::Result<usize> {
        let result = if self.head == self.tail {
            if !self.is_empty() {
                return Ok(0);
            }
            self.reset();
            read_fd(fd, &mut self.buf[..])
        } else if self.tail < self.head {
            let (head, tail) = (self.head, self.tail);
            read_fd(fd, &mut self.buf[tail..head])
        } else {
            let head = self.head;
            let (front, back) = self.buf.split_at_mut(self.tail);
            readv_fd(fd, back, &mut front[..head])
        };

        match result {
            Ok(n) if n > 0 => {
                self.commit_write(n);
                tracing::trace!(
                    target: "sockring::ring",
                    fd,
                    n,
                    read_cursor = self.head,
                    write_cursor = self.tail,
                    "copied from socket"
                );
                Ok(n)
            }
            other => other,
        }
    }
}

fn read_fd(fd: RawFd, buf: &mut [u8]) -> io::Result<usize> {
    let n = unsafe { libc::read(fd, buf.as_mut_ptr().cast::<libc::c_void>(), buf.len()) };
    if n < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(n as usize)
}

fn readv_fd(fd: RawFd, first: &mut [u8], second: &mut [u8]) -> io::Result<usize> {
    let iov = [
        libc::iovec {
            iov_base: first.as_mut_ptr().cast::<libc::c_void>(),
            iov_len: first.len(),
        },
        libc::iovec {
            iov_base: second.as_mut_ptr().cast::<libc::c_void>(),
            iov_len: second.len(),
        },
    ];
    let cnt = if second.is_empty() { 1 } else { 2 };
    let n = unsafe { libc::readv(fd, iov.as_ptr(), cnt) };
    if n < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(n as usize)
}
