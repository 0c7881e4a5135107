//! A RAII socket façade over raw `libc` syscalls: [`Handle`]-based file
//! descriptor ownership, value-typed [`Address`]es, and a [`Socket`] wrapper
//! parameterized by a protocol tag.
//!
//! Grounded on `jar::net::socket`/`socket_address`
//! (`lib_static/inc/jar/net/socket.hpp`, `socket_address.hpp`) in preference
//! over the virtual-interface `jar/net2/*` revision — see `SPEC_FULL.md`
//! §0 for why.
pub mod address;
pub mod datagram;
pub mod handle;
pub mod socket;
pub mod stream;

pub use address::{Address, AddressFamily, Inet4, Unix};
pub use handle::{Handle, Resource};
pub use socket::{Protocol, ShutdownMode, Socket};

/// TCP/IPv4 stream sockets.
#[derive(Debug, Clone, Copy)]
pub struct TcpV4;
impl Protocol for TcpV4 {
    type Family = Inet4;
    fn socket_type() -> libc::c_int {
        libc::SOCK_STREAM
    }
    fn protocol_number() -> libc::c_int {
        0
    }
}
impl socket::StreamProtocol for TcpV4 {}

/// UDP/IPv4 datagram sockets.
#[derive(Debug, Clone, Copy)]
pub struct UdpV4;
impl Protocol for UdpV4 {
    type Family = Inet4;
    fn socket_type() -> libc::c_int {
        libc::SOCK_DGRAM
    }
    fn protocol_number() -> libc::c_int {
        0
    }
}
impl socket::DatagramProtocol for UdpV4 {}

/// Unix-domain stream sockets (`SOCK_STREAM`, `AF_UNIX`).
#[derive(Debug, Clone, Copy)]
pub struct UnixStream;
impl Protocol for UnixStream {
    type Family = Unix;
    fn socket_type() -> libc::c_int {
        libc::SOCK_STREAM
    }
    fn protocol_number() -> libc::c_int {
        0
    }
}
impl socket::StreamProtocol for UnixStream {}

/// Unix-domain datagram sockets (`SOCK_DGRAM`, `AF_UNIX`).
#[derive(Debug, Clone, Copy)]
pub struct UnixDatagram;
impl Protocol for UnixDatagram {
    type Family = Unix;
    fn socket_type() -> libc::c_int {
        libc::SOCK_DGRAM
    }
    fn protocol_number() -> libc::c_int {
        0
    }
}
impl socket::DatagramProtocol for UnixDatagram {}
