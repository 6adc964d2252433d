//! Raw libtoxcore types, constants and callback shims
//!
//! Everything here is link-free: the opaque handle types, the C enum values
//! the engine uses, the `extern "C"` callbacks that turn engine notifications
//! into `ToxEvent`s, and the error-code tables. `ffi` builds the linked
//! engine on top of it when the `toxcore` feature is on.
#![cfg_attr(not(feature = "toxcore"), allow(dead_code))]

use super::traits::*;
use std::ffi::{c_int, c_void};

/// Opaque `Tox` instance
#[repr(C)]
pub struct Tox {
    _private: [u8; 0],
}

/// Opaque `Tox_Options`
#[repr(C)]
pub struct ToxOptions {
    _private: [u8; 0],
}

pub(super) const TOX_ERR_OK: c_int = 0;
pub(super) const TOX_SAVEDATA_TYPE_TOX_SAVE: c_int = 1;
pub(super) const TOX_PROXY_TYPE_SOCKS5: c_int = 2;
pub(super) const TOX_MESSAGE_TYPE_NORMAL: c_int = 0;
pub(super) const TOX_CONNECTION_TCP: c_int = 1;
pub(super) const TOX_CONNECTION_UDP: c_int = 2;

pub(super) type FriendRequestCb =
    unsafe extern "C" fn(*mut Tox, *const u8, *const u8, usize, *mut c_void);
pub(super) type FriendMessageCb =
    unsafe extern "C" fn(*mut Tox, u32, c_int, *const u8, usize, *mut c_void);
pub(super) type SelfConnectionStatusCb = unsafe extern "C" fn(*mut Tox, c_int, *mut c_void);

/// Recover the event buffer passed to `tox_iterate`
///
/// # Safety
/// `user_data` must be the `*mut Vec<ToxEvent>` set up by `ToxCore::iterate`.
unsafe fn events<'a>(user_data: *mut c_void) -> Option<&'a mut Vec<ToxEvent>> {
    (user_data as *mut Vec<ToxEvent>).as_mut()
}

unsafe fn bytes_to_string(data: *const u8, length: usize) -> String {
    if data.is_null() || length == 0 {
        return String::new();
    }
    String::from_utf8_lossy(std::slice::from_raw_parts(data, length)).into_owned()
}

pub(super) unsafe extern "C" fn on_friend_request(
    _tox: *mut Tox,
    public_key: *const u8,
    message: *const u8,
    length: usize,
    user_data: *mut c_void,
) {
    let Some(events) = events(user_data) else {
        return;
    };
    if public_key.is_null() {
        return;
    }
    let mut key = [0u8; PUBLIC_KEY_SIZE];
    key.copy_from_slice(std::slice::from_raw_parts(public_key, PUBLIC_KEY_SIZE));
    events.push(ToxEvent::FriendRequest {
        public_key: PublicKey(key),
        message: bytes_to_string(message, length),
    });
}

pub(super) unsafe extern "C" fn on_friend_message(
    _tox: *mut Tox,
    friend_number: u32,
    kind: c_int,
    message: *const u8,
    length: usize,
    user_data: *mut c_void,
) {
    // Actions (/me) are not commands
    if kind != TOX_MESSAGE_TYPE_NORMAL {
        return;
    }
    let Some(events) = events(user_data) else {
        return;
    };
    events.push(ToxEvent::FriendMessage {
        friend: FriendNumber(friend_number),
        text: bytes_to_string(message, length),
    });
}

pub(super) unsafe extern "C" fn on_self_connection_status(
    _tox: *mut Tox,
    status: c_int,
    user_data: *mut c_void,
) {
    let Some(events) = events(user_data) else {
        return;
    };
    let status = match status {
        TOX_CONNECTION_TCP => ConnectionStatus::Tcp,
        TOX_CONNECTION_UDP => ConnectionStatus::Udp,
        _ => ConnectionStatus::None,
    };
    events.push(ToxEvent::SelfConnection(status));
}

pub(super) fn describe_new_error(code: c_int) -> &'static str {
    match code {
        1 => "null argument",
        2 => "out of memory",
        3 => "could not bind to a port",
        4 => "bad proxy type",
        5 => "bad proxy host",
        6 => "bad proxy port",
        7 => "proxy not found",
        8 => "savedata is encrypted",
        9 => "savedata has a bad format",
        _ => "unknown tox_new error",
    }
}

pub(super) fn describe_set_info_error(code: c_int) -> &'static str {
    match code {
        1 => "null argument",
        2 => "too long",
        _ => "unknown error",
    }
}

pub(super) fn describe_bootstrap_error(code: c_int) -> &'static str {
    match code {
        1 => "null argument",
        2 => "bad host",
        3 => "bad port",
        _ => "unknown bootstrap error",
    }
}

pub(super) fn describe_friend_add_error(code: c_int) -> &'static str {
    match code {
        1 => "null argument",
        2 => "message too long",
        3 => "empty message",
        4 => "own key",
        5 => "already a friend",
        6 => "bad checksum",
        7 => "nospam changed",
        8 => "out of memory",
        _ => "unknown friend add error",
    }
}

pub(super) fn describe_send_error(code: c_int) -> &'static str {
    match code {
        1 => "null argument",
        2 => "friend not found",
        3 => "friend not connected",
        4 => "send queue full",
        5 => "message too long",
        6 => "empty message",
        _ => "unknown send error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_descriptions() {
        assert_eq!(describe_new_error(9), "savedata has a bad format");
        assert_eq!(describe_bootstrap_error(2), "bad host");
        assert_eq!(describe_friend_add_error(5), "already a friend");
        assert_eq!(describe_send_error(3), "friend not connected");
        assert_eq!(describe_set_info_error(42), "unknown error");
    }

    #[test]
    fn test_callbacks_push_into_buffer() {
        let mut buffer: Vec<ToxEvent> = Vec::new();
        let user_data = &mut buffer as *mut Vec<ToxEvent> as *mut c_void;
        let key = [0x11u8; PUBLIC_KEY_SIZE];
        let msg = b"hello";

        unsafe {
            on_friend_request(
                std::ptr::null_mut(),
                key.as_ptr(),
                msg.as_ptr(),
                msg.len(),
                user_data,
            );
            on_friend_message(
                std::ptr::null_mut(),
                4,
                TOX_MESSAGE_TYPE_NORMAL,
                msg.as_ptr(),
                msg.len(),
                user_data,
            );
            // Action messages are dropped
            on_friend_message(std::ptr::null_mut(), 4, 1, msg.as_ptr(), msg.len(), user_data);
            on_self_connection_status(std::ptr::null_mut(), TOX_CONNECTION_UDP, user_data);
        }

        assert_eq!(
            buffer,
            vec![
                ToxEvent::FriendRequest {
                    public_key: PublicKey(key),
                    message: "hello".to_string(),
                },
                ToxEvent::FriendMessage {
                    friend: FriendNumber(4),
                    text: "hello".to_string(),
                },
                ToxEvent::SelfConnection(ConnectionStatus::Udp),
            ]
        );
    }

    #[test]
    fn test_callbacks_ignore_missing_buffer() {
        let key = [0x22u8; PUBLIC_KEY_SIZE];
        // Must not dereference a null user_data
        unsafe {
            on_friend_request(
                std::ptr::null_mut(),
                key.as_ptr(),
                std::ptr::null(),
                0,
                std::ptr::null_mut(),
            );
            on_self_connection_status(
                std::ptr::null_mut(),
                TOX_CONNECTION_TCP,
                std::ptr::null_mut(),
            );
        }
    }

    #[test]
    fn test_connection_status_mapping() {
        let mut buffer: Vec<ToxEvent> = Vec::new();
        let user_data = &mut buffer as *mut Vec<ToxEvent> as *mut c_void;

        unsafe {
            on_self_connection_status(std::ptr::null_mut(), TOX_CONNECTION_TCP, user_data);
            on_self_connection_status(std::ptr::null_mut(), 0, user_data);
            on_self_connection_status(std::ptr::null_mut(), 99, user_data);
        }

        assert_eq!(
            buffer,
            vec![
                ToxEvent::SelfConnection(ConnectionStatus::Tcp),
                ToxEvent::SelfConnection(ConnectionStatus::None),
                ToxEvent::SelfConnection(ConnectionStatus::None),
            ]
        );
    }

    #[test]
    fn test_empty_request_message() {
        let mut buffer: Vec<ToxEvent> = Vec::new();
        let user_data = &mut buffer as *mut Vec<ToxEvent> as *mut c_void;
        let key = [0x33u8; PUBLIC_KEY_SIZE];

        unsafe {
            on_friend_request(std::ptr::null_mut(), key.as_ptr(), std::ptr::null(), 0, user_data);
        }

        assert_eq!(
            buffer,
            vec![ToxEvent::FriendRequest {
                public_key: PublicKey(key),
                message: String::new(),
            }]
        );
    }
}
