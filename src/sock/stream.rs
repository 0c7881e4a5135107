//! Stream-socket operations: `connect`/`send`/`receive` for clients,
//! `listen`/`accept` for servers. Both roles share one `Socket<P>` type
//! since the underlying descriptor supports either depending on the call
//! sequence — mirroring how a single `int` fd does both in the syscall
//! layer this wraps.
//!
//! Grounded on `jar::net::socket` (`socket.hpp`) plus its stream/server-only
//! `connect`/`listen`/`accept`/`send`/`receive` members.
use std::os::unix::io::RawFd;

use crate::error::Result;
use crate::precondition::{no_system_error, not_zero};

use super::socket::{Protocol, Socket, StreamProtocol};
use super::Address;

impl<P: StreamProtocol> Socket<P> {
    pub fn connect(&self, addr: &Address<P::Family>) -> Result<()> {
        no_system_error(unsafe { libc::connect(self.native(), addr.as_ptr(), addr.len()) } as isize)?;
        Ok(())
    }

    /// Marks the socket as accepting incoming connections.
    /// `backlog` is capped at `libc::SOMAXCONN`.
    pub fn listen(&self, backlog: i32) -> Result<()> {
        let backlog = backlog.min(libc::SOMAXCONN);
        no_system_error(unsafe { libc::listen(self.native(), backlog) } as isize)?;
        Ok(())
    }

    /// Accepts one pending connection and invokes `handler` with the
    /// accepted client socket. Returns what `handler` returns.
    pub fn accept<F, T>(&self, handler: F) -> Result<T>
    where
        F: FnOnce(Socket<P>) -> T,
    {
        let fd = no_system_error(unsafe {
            libc::accept(self.native(), std::ptr::null_mut(), std::ptr::null_mut())
        } as isize)? as RawFd;
        Ok(handler(Socket::from_raw(fd)))
    }

    /// Writes `buf` to the connected peer. Returns the number of bytes
    /// actually written.
    ///
    /// Passes `MSG_NOSIGNAL`: writing to a peer that already closed its end
    /// reports `EPIPE` through the normal error path instead of raising
    /// `SIGPIPE` on this process.
    pub fn send(&self, buf: &[u8]) -> Result<usize> {
        not_zero(buf.len(), "send buffer must not be empty")?;
        no_system_error(unsafe {
            libc::send(
                self.native(),
                buf.as_ptr() as *const libc::c_void,
                buf.len(),
                libc::MSG_NOSIGNAL,
            )
        } as isize)
    }

    /// Reads into `buf`. Zero means the peer performed an orderly
    /// shutdown.
    pub fn receive(&self, buf: &mut [u8]) -> Result<usize> {
        not_zero(buf.len(), "receive buffer must not be empty")?;
        no_system_error(unsafe {
            libc::recv(self.native(), buf.as_mut_ptr() as *mut libc::c_void, buf.len(), 0)
        } as isize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sock::{UnixStream};
    use std::thread;

    #[test]
    fn connect_send_receive_over_unix_stream_pair() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("conveyor-test-{}.sock", std::process::id()));
        let path_str = path.to_str().unwrap();

        let server = Socket::<UnixStream>::new().unwrap();
        server.bind_unix(&Address::from_path(path_str).unwrap()).unwrap();
        server.listen(1).unwrap();

        let path_owned = path_str.to_string();
        let client_thread = thread::spawn(move || {
            let client = Socket::<UnixStream>::new().unwrap();
            client.connect(&Address::from_path(&path_owned).unwrap()).unwrap();
            client.send(b"ping").unwrap();
            let mut buf = [0u8; 4];
            let n = client.receive(&mut buf).unwrap();
            assert_eq!(&buf[..n], b"pong");
        });

        server
            .accept(|peer| {
                let mut buf = [0u8; 4];
                let n = peer.receive(&mut buf).unwrap();
                assert_eq!(&buf[..n], b"ping");
                peer.send(b"pong").unwrap();
            })
            .unwrap();

        client_thread.join().unwrap();
        let _ = std::fs::remove_file(path_str);
    }

    #[test]
    fn send_on_shutdown_peer_raises_epipe_without_killing_the_process() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("conveyor-test-epipe-{}.sock", std::process::id()));
        let path_str = path.to_str().unwrap();

        let server = Socket::<UnixStream>::new().unwrap();
        server.bind_unix(&Address::from_path(path_str).unwrap()).unwrap();
        server.listen(1).unwrap();

        let client = Socket::<UnixStream>::new().unwrap();
        client.connect(&Address::from_path(path_str).unwrap()).unwrap();

        server
            .accept(|peer| {
                peer.shutdown(super::super::socket::ShutdownMode::Both).unwrap();
            })
            .unwrap();

        // Drain the shutdown notification, then write repeatedly: without
        // `MSG_NOSIGNAL` one of these would raise `SIGPIPE` and abort the
        // test process instead of returning an error.
        let mut buf = [0u8; 1];
        let _ = client.receive(&mut buf);
        let mut saw_epipe = false;
        for _ in 0..10 {
            match client.send(b"x") {
                Ok(_) => continue,
                Err(crate::error::Error::System(err)) => {
                    if err.raw_os_error() == Some(libc::EPIPE) {
                        saw_epipe = true;
                        break;
                    }
                }
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
        assert!(saw_epipe, "expected at least one EPIPE from the shutdown peer");

        let _ = std::fs::remove_file(path_str);
    }
}
