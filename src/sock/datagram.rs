//! Datagram-socket operations: `send_to`/`receive_from`.
//!
//! Grounded on `jar::net::socket` (`socket.hpp`) and its datagram-only
//! `send_to`/`receive_from` members.
use crate::error::Result;
use crate::precondition::{no_system_error, not_zero};

use super::socket::{DatagramProtocol, Protocol, Socket};
use super::Address;

impl<P: DatagramProtocol> Socket<P> {
    pub fn send_to(&self, addr: &Address<P::Family>, buf: &[u8]) -> Result<usize> {
        not_zero(buf.len(), "send_to buffer must not be empty")?;
        no_system_error(unsafe {
            libc::sendto(
                self.native(),
                buf.as_ptr() as *const libc::c_void,
                buf.len(),
                0,
                addr.as_ptr(),
                addr.len(),
            )
        } as isize)
    }
}

impl Socket<super::UdpV4> {
    pub fn receive_from(&self, buf: &mut [u8]) -> Result<(usize, Address<super::Inet4>)> {
        not_zero(buf.len(), "receive_from buffer must not be empty")?;
        let mut native: libc::sockaddr_in = unsafe { std::mem::zeroed() };
        let mut len = std::mem::size_of::<libc::sockaddr_in>() as libc::socklen_t;
        let n = no_system_error(unsafe {
            libc::recvfrom(
                self.native(),
                buf.as_mut_ptr() as *mut libc::c_void,
                buf.len(),
                0,
                &mut native as *mut libc::sockaddr_in as *mut libc::sockaddr,
                &mut len,
            )
        } as isize)?;
        Ok((n, Address::from_native(native, len)))
    }
}

impl Socket<super::UnixDatagram> {
    pub fn receive_from(&self, buf: &mut [u8]) -> Result<(usize, Address<super::Unix>)> {
        not_zero(buf.len(), "receive_from buffer must not be empty")?;
        let mut native: libc::sockaddr_un = unsafe { std::mem::zeroed() };
        let mut len = std::mem::size_of::<libc::sockaddr_un>() as libc::socklen_t;
        let n = no_system_error(unsafe {
            libc::recvfrom(
                self.native(),
                buf.as_mut_ptr() as *mut libc::c_void,
                buf.len(),
                0,
                &mut native as *mut libc::sockaddr_un as *mut libc::sockaddr,
                &mut len,
            )
        } as isize)?;
        Ok((n, Address::from_native(native, len)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sock::UdpV4;

    #[test]
    fn send_to_and_receive_from_over_udp_loopback() {
        let server = Socket::<UdpV4>::new().unwrap();
        server.bind(&Address::<super::super::Inet4>::new([127, 0, 0, 1], 0)).unwrap();

        // Port 0 binds to an ephemeral port; discover it with getsockname
        // so the client can address the server.
        let mut native: libc::sockaddr_in = unsafe { std::mem::zeroed() };
        let mut len = std::mem::size_of::<libc::sockaddr_in>() as libc::socklen_t;
        let rc = unsafe {
            libc::getsockname(
                server.native(),
                &mut native as *mut libc::sockaddr_in as *mut libc::sockaddr,
                &mut len,
            )
        };
        assert_eq!(rc, 0);
        let server_addr = Address::<super::super::Inet4>::from_native(native, len);

        let client = Socket::<UdpV4>::new().unwrap();
        client.bind(&Address::<super::super::Inet4>::new([127, 0, 0, 1], 0)).unwrap();

        let mut client_native: libc::sockaddr_in = unsafe { std::mem::zeroed() };
        let mut client_len = std::mem::size_of::<libc::sockaddr_in>() as libc::socklen_t;
        let rc = unsafe {
            libc::getsockname(
                client.native(),
                &mut client_native as *mut libc::sockaddr_in as *mut libc::sockaddr,
                &mut client_len,
            )
        };
        assert_eq!(rc, 0);
        let client_addr = Address::<super::super::Inet4>::from_native(client_native, client_len);

        client.send_to(&server_addr, b"hello").unwrap();

        let mut buf = [0u8; 5];
        let (n, from) = server.receive_from(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"hello");
        assert_eq!(from, client_addr, "receive_from must return the sender's address");
    }
}
