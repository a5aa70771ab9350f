//! Control socket for querying CARP virtual host status.
//!
//! The kernel hands out CARP status through the `SIOCGVH` interface ioctl,
//! issued on any `AF_INET` datagram socket with `ifr_data` pointing at a
//! `struct carpreq`.

use crate::types::CarpStatus;
use socket2::{Domain, Socket, Type};
use std::ffi::OsStr;
use std::io;
use std::os::fd::AsRawFd;
use std::os::unix::ffi::OsStrExt;
use tracing::{debug, trace};

/// Anything that can report the CARP status of a named interface.
#[cfg_attr(test, mockall::automock)]
pub trait StatusSource {
    /// Query the status of the first virtual host on `interface`.
    fn carp_status(&self, interface: &OsStr) -> io::Result<CarpStatus>;
}

/// Datagram socket used as the handle for `SIOCGVH`.
pub struct CarpSocket {
    socket: Socket,
}

impl CarpSocket {
    /// Open the control socket.
    pub fn new() -> io::Result<Self> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, None)?;
        trace!(fd = socket.as_raw_fd(), "Opened control socket");

        Ok(Self { socket })
    }
}

impl StatusSource for CarpSocket {
    fn carp_status(&self, interface: &OsStr) -> io::Result<CarpStatus> {
        let name = interface_name(interface);

        debug!(interface = %interface.display(), "Issuing SIOCGVH");
        let status = sys::get_vh(self.socket.as_raw_fd(), &name)?;
        debug!(
            interface = %interface.display(),
            vhid = status.vhid,
            state = status.state,
            advbase = status.advbase,
            advskew = status.advskew,
            "SIOCGVH returned"
        );

        Ok(status)
    }
}

/// Fill an `ifr_name` buffer the way `strlcpy` does: at most
/// `IFNAMSIZ - 1` bytes, always NUL terminated.
fn interface_name(interface: &OsStr) -> [libc::c_char; libc::IFNAMSIZ] {
    let mut name = [0 as libc::c_char; libc::IFNAMSIZ];

    for (dst, &src) in name
        .iter_mut()
        .zip(interface.as_bytes().iter().take(libc::IFNAMSIZ - 1))
    {
        *dst = src as libc::c_char;
    }

    name
}

#[cfg(any(target_os = "freebsd", target_os = "openbsd"))]
mod sys {
    use crate::types::CarpStatus;
    use std::io;
    use std::os::fd::RawFd;

    const CARP_KEY_LEN: usize = 20;

    /// `ifr_ifru` is as large as its biggest member, `struct sockaddr`.
    const IFRU_SIZE: usize = 16;

    /// `struct carpreq` from FreeBSD's `netinet/ip_carp.h`
    #[cfg(target_os = "freebsd")]
    #[repr(C)]
    #[derive(Debug, Default)]
    pub struct CarpReq {
        pub carpr_count: libc::c_int,
        pub carpr_vhid: libc::c_int,
        pub carpr_state: libc::c_int,
        pub carpr_advskew: libc::c_int,
        pub carpr_advbase: libc::c_int,
        pub carpr_key: [u8; CARP_KEY_LEN],
    }

    #[cfg(target_os = "openbsd")]
    const CARP_MAXNODES: usize = 32;

    #[cfg(target_os = "openbsd")]
    const CARPDEVNAMSIZ: usize = 16;

    /// `struct carpreq` from OpenBSD's `netinet/ip_carp.h`
    ///
    /// The kernel copies out the whole record, so the trailing per-node
    /// arrays have to be present even though only the leading fields are read.
    #[cfg(target_os = "openbsd")]
    #[repr(C)]
    #[derive(Debug, Default)]
    pub struct CarpReq {
        pub carpr_state: libc::c_int,
        pub carpr_vhid: libc::c_int,
        pub carpr_advskew: libc::c_int,
        pub carpr_advbase: libc::c_int,
        pub carpr_key: [u8; CARP_KEY_LEN],
        pub carpr_peer: u32,
        pub carpr_carpdev: [libc::c_char; CARPDEVNAMSIZ],
        pub carpr_vhids: [u8; CARP_MAXNODES],
        pub carpr_advskews: [u8; CARP_MAXNODES],
        pub carpr_states: [u8; CARP_MAXNODES],
        pub carpr_balancing: u8,
    }

    impl CarpReq {
        /// Zeroed request for the first vhid on the interface.
        fn request() -> Self {
            #[cfg(target_os = "freebsd")]
            {
                // FreeBSD wants room for at least one record.
                Self {
                    carpr_count: 1,
                    ..Default::default()
                }
            }
            #[cfg(target_os = "openbsd")]
            {
                Self::default()
            }
        }

        fn status(&self) -> CarpStatus {
            CarpStatus {
                vhid: self.carpr_vhid,
                state: self.carpr_state,
                advbase: self.carpr_advbase,
                advskew: self.carpr_advskew,
            }
        }
    }

    /// `struct ifreq` with the `ifru_data` arm of the union selected.
    #[repr(C)]
    pub struct IfReq {
        pub ifr_name: [libc::c_char; libc::IFNAMSIZ],
        pub ifr_data: *mut libc::c_void,
        pub _pad: [u8; IFRU_SIZE - size_of::<*mut libc::c_void>()],
    }

    // SIOCGVH = _IOWR('i', 246, struct ifreq) on both BSDs
    nix::ioctl_readwrite!(siocgvh, b'i', 246, IfReq);

    pub(super) fn get_vh(
        fd: RawFd,
        name: &[libc::c_char; libc::IFNAMSIZ],
    ) -> io::Result<CarpStatus> {
        let mut carpr = CarpReq::request();

        let mut ifr = IfReq {
            ifr_name: *name,
            ifr_data: (&mut carpr as *mut CarpReq).cast(),
            _pad: [0; IFRU_SIZE - size_of::<*mut libc::c_void>()],
        };

        // SAFETY: `ifr` and the `carpr` it points to are live, zero
        // initialised and laid out as the kernel expects for SIOCGVH.
        unsafe { siocgvh(fd, &mut ifr) }.map_err(io::Error::from)?;

        Ok(carpr.status())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_ifreq_layout() {
            assert_eq!(size_of::<IfReq>(), libc::IFNAMSIZ + IFRU_SIZE);
        }

        #[cfg(target_os = "freebsd")]
        #[test]
        fn test_carpreq_layout() {
            assert_eq!(size_of::<CarpReq>(), 5 * size_of::<libc::c_int>() + CARP_KEY_LEN);
            assert_eq!(CarpReq::request().carpr_count, 1);
        }

        #[cfg(target_os = "openbsd")]
        #[test]
        fn test_carpreq_layout() {
            // 4 ints, key, peer, carpdev, 3 node arrays, balancing; padded to int
            assert_eq!(size_of::<CarpReq>(), 156);
            assert_eq!(std::mem::offset_of!(CarpReq, carpr_key), 16);
            assert_eq!(std::mem::offset_of!(CarpReq, carpr_peer), 36);
            assert_eq!(std::mem::offset_of!(CarpReq, carpr_vhids), 56);
        }

        #[test]
        fn test_status_from_record() {
            let mut carpr = CarpReq::request();
            carpr.carpr_vhid = 5;
            carpr.carpr_state = 2;
            carpr.carpr_advbase = 1;
            carpr.carpr_advskew = 100;

            assert_eq!(
                carpr.status(),
                CarpStatus {
                    vhid: 5,
                    state: 2,
                    advbase: 1,
                    advskew: 100,
                }
            );
        }
    }
}

#[cfg(not(any(target_os = "freebsd", target_os = "openbsd")))]
mod sys {
    use crate::types::CarpStatus;
    use std::io;
    use std::os::fd::RawFd;

    pub(super) fn get_vh(
        _fd: RawFd,
        _name: &[libc::c_char; libc::IFNAMSIZ],
    ) -> io::Result<CarpStatus> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "SIOCGVH is not available on this platform",
        ))
    }
}
