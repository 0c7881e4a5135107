//! `Socket<P>`: a `Handle`-owned file descriptor plus a protocol tag
//! fixing its family, type, and protocol number.
//!
//! Grounded on `jar::net::socket` (`socket.hpp`), constructed there with a
//! runtime `(family, type)` pair. Here that pair moves to compile time via
//! the `Protocol` trait, so `Socket<TcpV4>` and `Socket<UdpV4>` are distinct
//! types that cannot be confused at a call site, while still sharing every
//! common operation through one generic impl block.
use std::marker::PhantomData;
use std::mem;
use std::os::unix::io::RawFd;

use crate::error::Result;
use crate::precondition::{no_system_error, no_system_error_except};
use crate::sock::address::AddressFamily;
use crate::sock::handle::{Handle, Resource};

use super::{Address, Unix};

pub struct FdResource;

impl Resource for FdResource {
    type Native = RawFd;
    const INVALID: RawFd = -1;

    fn destroy(native: RawFd) {
        unsafe {
            libc::close(native);
        }
    }
}

/// Fixes a socket's address family, type, and protocol number at compile
/// time.
pub trait Protocol {
    type Family: AddressFamily;

    fn socket_type() -> libc::c_int;
    fn protocol_number() -> libc::c_int;
}

/// Protocols on which `listen`/`accept`/stream `send`/`receive` make sense.
pub trait StreamProtocol: Protocol {}

/// Protocols on which `send_to`/`receive_from` make sense.
pub trait DatagramProtocol: Protocol {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownMode {
    Receive,
    Send,
    Both,
}

impl ShutdownMode {
    fn as_how(self) -> libc::c_int {
        match self {
            ShutdownMode::Receive => libc::SHUT_RD,
            ShutdownMode::Send => libc::SHUT_WR,
            ShutdownMode::Both => libc::SHUT_RDWR,
        }
    }
}

/// A socket bound to protocol `P`. Construction opens the underlying
/// descriptor; `Drop` (via the inner [`Handle`]) closes it.
pub struct Socket<P: Protocol> {
    handle: Handle<FdResource>,
    _protocol: PhantomData<P>,
}

impl<P: Protocol> Socket<P> {
    pub fn new() -> Result<Self> {
        let fd = unsafe {
            libc::socket(
                P::Family::family_value() as libc::c_int,
                P::socket_type(),
                P::protocol_number(),
            )
        };
        let fd = no_system_error(fd as isize)? as RawFd;
        Ok(Self {
            handle: Handle::from_native(fd),
            _protocol: PhantomData,
        })
    }

    /// Wraps an already-open descriptor (e.g. one returned by `accept`).
    pub fn from_raw(fd: RawFd) -> Self {
        Self {
            handle: Handle::from_native(fd),
            _protocol: PhantomData,
        }
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_valid()
    }

    pub fn native(&self) -> RawFd {
        self.handle.native()
    }

    pub fn set_non_blocking(&self, enabled: bool) -> Result<()> {
        let flags = no_system_error(unsafe { libc::fcntl(self.native(), libc::F_GETFL) } as isize)? as libc::c_int;
        let flags = if enabled {
            flags | libc::O_NONBLOCK
        } else {
            flags & !libc::O_NONBLOCK
        };
        no_system_error(unsafe { libc::fcntl(self.native(), libc::F_SETFL, flags) } as isize)?;
        Ok(())
    }

    pub fn is_non_blocking(&self) -> Result<bool> {
        let flags = no_system_error(unsafe { libc::fcntl(self.native(), libc::F_GETFL) } as isize)?;
        Ok((flags as libc::c_int) & libc::O_NONBLOCK != 0)
    }

    pub fn shutdown(&self, mode: ShutdownMode) -> Result<()> {
        no_system_error_except(
            unsafe { libc::shutdown(self.native(), mode.as_how()) } as isize,
            &[libc::ENOTCONN],
        )?;
        Ok(())
    }

    pub fn send_buffer_size(&self) -> Result<usize> {
        let mut value: libc::c_int = 0;
        let mut len = mem::size_of::<libc::c_int>() as libc::socklen_t;
        no_system_error(unsafe {
            libc::getsockopt(
                self.native(),
                libc::SOL_SOCKET,
                libc::SO_SNDBUF,
                &mut value as *mut libc::c_int as *mut libc::c_void,
                &mut len,
            )
        } as isize)?;
        Ok(value as usize)
    }

    fn set_timeout(&self, option: libc::c_int, micros: u64) -> Result<()> {
        let timeout = libc::timeval {
            tv_sec: (micros / 1_000_000) as libc::time_t,
            tv_usec: (micros % 1_000_000) as libc::suseconds_t,
        };
        no_system_error(unsafe {
            libc::setsockopt(
                self.native(),
                libc::SOL_SOCKET,
                option,
                &timeout as *const libc::timeval as *const libc::c_void,
                mem::size_of::<libc::timeval>() as libc::socklen_t,
            )
        } as isize)?;
        Ok(())
    }

    pub fn set_send_timeout(&self, micros: u64) -> Result<()> {
        self.set_timeout(libc::SO_SNDTIMEO, micros)
    }

    pub fn set_receive_timeout(&self, micros: u64) -> Result<()> {
        self.set_timeout(libc::SO_RCVTIMEO, micros)
    }

    pub fn bind(&self, addr: &Address<P::Family>) -> Result<()> {
        no_system_error(unsafe { libc::bind(self.native(), addr.as_ptr(), addr.len()) } as isize)?;
        Ok(())
    }
}

impl<P: Protocol<Family = Unix>> Socket<P> {
    /// Binds to a Unix-domain `addr`, first unlinking any existing
    /// filesystem endpoint at that path so a stale socket file left behind
    /// by a previous run doesn't make the bind fail with `EADDRINUSE`.
    pub fn bind_unix(&self, addr: &Address<Unix>) -> Result<()> {
        let _ = addr.unlink();
        self.bind(addr)
    }
}
