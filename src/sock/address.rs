//! Value-typed socket endpoints.
//!
//! Grounded on `jar::net::socket_address<T>`
//! (`lib_static/inc/jar/net/socket_address.hpp`), which supplies
//! `operator==`/`!=` and `address()`/`size()` accessors over a
//! family-specific native representation via a CRTP base. Each family gets
//! its own concrete `Address<Family>` instantiation here, with per-family
//! behavior (construction, semantic equality, display) directly on those
//! instantiations, since address families are fixed at compile time and
//! never added at runtime.
use std::ffi::CStr;
use std::fmt;
use std::mem;

use crate::error::{Error, Result};
use crate::precondition::not_greater;

/// Tags a concrete native `sockaddr_*` representation.
pub trait AddressFamily {
    type Native: Copy;

    fn family_value() -> libc::sa_family_t;
}

/// IPv4 endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inet4;

impl AddressFamily for Inet4 {
    type Native = libc::sockaddr_in;

    fn family_value() -> libc::sa_family_t {
        libc::AF_INET as libc::sa_family_t
    }
}

/// Unix-domain (filesystem path or abstract) endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unix;

impl AddressFamily for Unix {
    type Native = libc::sockaddr_un;

    fn family_value() -> libc::sa_family_t {
        libc::AF_UNIX as libc::sa_family_t
    }
}

/// A value-typed socket address: a native `sockaddr_*` plus its logical
/// length (`libc::socklen_t`). Length is always a read-only capacity/size
/// quantity here; the kernel-filled length out-parameter that `accept`/
/// `recvfrom` produce is modeled as their returned length instead of a
/// mutable field on the address itself.
pub struct Address<A: AddressFamily> {
    native: A::Native,
    len: libc::socklen_t,
}

impl<A: AddressFamily> Address<A> {
    pub fn len(&self) -> libc::socklen_t {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn max_len() -> usize {
        mem::size_of::<A::Native>()
    }

    pub fn as_ptr(&self) -> *const libc::sockaddr {
        &self.native as *const A::Native as *const libc::sockaddr
    }

    pub fn as_mut_ptr(&mut self) -> *mut libc::sockaddr {
        &mut self.native as *mut A::Native as *mut libc::sockaddr
    }
}

impl Address<Inet4> {
    pub fn new(octets: [u8; 4], port: u16) -> Self {
        let mut native: libc::sockaddr_in = unsafe { mem::zeroed() };
        native.sin_family = Inet4::family_value();
        native.sin_port = port.to_be();
        native.sin_addr.s_addr = u32::from_ne_bytes(octets);
        Self {
            native,
            len: mem::size_of::<libc::sockaddr_in>() as libc::socklen_t,
        }
    }

    pub fn port(&self) -> u16 {
        u16::from_be(self.native.sin_port)
    }

    pub fn octets(&self) -> [u8; 4] {
        self.native.sin_addr.s_addr.to_ne_bytes()
    }

    /// Constructs from a raw `sockaddr_in` already filled in by a syscall
    /// (e.g. `accept`/`recvfrom`), together with the length the kernel
    /// reported.
    pub fn from_native(native: libc::sockaddr_in, len: libc::socklen_t) -> Self {
        Self { native, len }
    }
}

impl fmt::Display for Address<Inet4> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.octets();
        write!(f, "{a}.{b}.{c}.{d}:{}", self.port())
    }
}

impl PartialEq for Address<Inet4> {
    fn eq(&self, other: &Self) -> bool {
        self.native.sin_port == other.native.sin_port && self.native.sin_addr.s_addr == other.native.sin_addr.s_addr
    }
}
impl Eq for Address<Inet4> {}

impl Address<Unix> {
    /// Builds a filesystem-path Unix-domain address. Rejects paths that
    /// would not fit in `sun_path` (including the trailing NUL).
    pub fn from_path(path: &str) -> Result<Self> {
        let bytes = path.as_bytes();
        let mut native: libc::sockaddr_un = unsafe { mem::zeroed() };
        let capacity = native.sun_path.len();
        not_greater(bytes.len() + 1, capacity, "unix socket path too long")?;

        native.sun_family = Unix::family_value();
        for (slot, byte) in native.sun_path.iter_mut().zip(bytes.iter()) {
            *slot = *byte as libc::c_char;
        }

        let header_len = mem::size_of::<libc::sa_family_t>();
        let len = header_len + bytes.len() + 1;
        Ok(Self {
            native,
            len: len as libc::socklen_t,
        })
    }

    pub fn path(&self) -> Result<&str> {
        // SAFETY: `sun_path` is NUL-terminated by construction.
        let cstr = unsafe { CStr::from_ptr(self.native.sun_path.as_ptr()) };
        cstr.to_str().map_err(|_| Error::Domain("unix socket path is not valid UTF-8"))
    }

    pub fn from_native(native: libc::sockaddr_un, len: libc::socklen_t) -> Self {
        Self { native, len }
    }

    /// Removes the backing filesystem path, if any. A no-op (not an error)
    /// if the path does not exist.
    pub fn unlink(&self) -> Result<()> {
        let path = self.path()?;
        if path.is_empty() {
            return Ok(());
        }
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Error::System(err)),
        }
    }
}

impl fmt::Display for Address<Unix> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path() {
            Ok(path) => write!(f, "{path}"),
            Err(_) => write!(f, "<invalid unix path>"),
        }
    }
}

impl PartialEq for Address<Unix> {
    fn eq(&self, other: &Self) -> bool {
        self.path().ok() == other.path().ok()
    }
}
impl Eq for Address<Unix> {}
