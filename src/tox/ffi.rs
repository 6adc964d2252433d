//! libtoxcore Engine
//!
//! Implements `ToxEngine` over the c-toxcore C API. Opt-in behind the
//! `toxcore` feature; `build.rs` emits the link flags.
//!
//! Callbacks (see `sys`) are registered once at construction. `iterate`
//! passes a pointer to a local event buffer as the C `user_data`, the
//! callbacks push into it, and the buffer is returned to the caller once
//! `tox_iterate` is done.

use super::bootstrap::BootstrapNode;
use super::sys::*;
use super::traits::*;
use std::ffi::{c_char, c_int, c_void, CString};
use std::ptr::NonNull;
use std::time::Duration;
use tracing::warn;

extern "C" {
    fn tox_options_new(error: *mut c_int) -> *mut ToxOptions;
    fn tox_options_free(options: *mut ToxOptions);
    fn tox_options_set_savedata_type(options: *mut ToxOptions, kind: c_int);
    fn tox_options_set_savedata_data(options: *mut ToxOptions, data: *const u8, length: usize);
    fn tox_options_set_proxy_type(options: *mut ToxOptions, kind: c_int);
    fn tox_options_set_proxy_host(options: *mut ToxOptions, host: *const c_char);
    fn tox_options_set_proxy_port(options: *mut ToxOptions, port: u16);
    fn tox_options_set_udp_enabled(options: *mut ToxOptions, enabled: bool);

    fn tox_new(options: *const ToxOptions, error: *mut c_int) -> *mut Tox;
    fn tox_kill(tox: *mut Tox);

    fn tox_get_savedata_size(tox: *const Tox) -> usize;
    fn tox_get_savedata(tox: *const Tox, savedata: *mut u8);

    fn tox_bootstrap(
        tox: *mut Tox,
        host: *const c_char,
        port: u16,
        public_key: *const u8,
        error: *mut c_int,
    ) -> bool;

    fn tox_iteration_interval(tox: *const Tox) -> u32;
    fn tox_iterate(tox: *mut Tox, user_data: *mut c_void);

    fn tox_self_get_address(tox: *const Tox, address: *mut u8);
    fn tox_self_get_public_key(tox: *const Tox, public_key: *mut u8);
    fn tox_self_set_name(tox: *mut Tox, name: *const u8, length: usize, error: *mut c_int)
        -> bool;
    fn tox_self_set_status_message(
        tox: *mut Tox,
        status_message: *const u8,
        length: usize,
        error: *mut c_int,
    ) -> bool;

    fn tox_friend_add_norequest(tox: *mut Tox, public_key: *const u8, error: *mut c_int) -> u32;
    fn tox_friend_send_message(
        tox: *mut Tox,
        friend_number: u32,
        kind: c_int,
        message: *const u8,
        length: usize,
        error: *mut c_int,
    ) -> u32;

    fn tox_callback_friend_request(tox: *mut Tox, callback: Option<FriendRequestCb>);
    fn tox_callback_friend_message(tox: *mut Tox, callback: Option<FriendMessageCb>);
    fn tox_callback_self_connection_status(
        tox: *mut Tox,
        callback: Option<SelfConnectionStatusCb>,
    );
}

/// Owned libtoxcore instance
pub struct ToxCore {
    raw: NonNull<Tox>,
}

impl ToxCore {
    /// Construct a Tox instance, restoring savedata and proxy settings
    pub fn open(options: EngineOptions) -> ToxResult<Self> {
        let mut err: c_int = TOX_ERR_OK;
        let opts = unsafe { tox_options_new(&mut err) };
        if opts.is_null() || err != TOX_ERR_OK {
            return Err(ToxError::Construction(format!(
                "tox_options_new failed (code {err})"
            )));
        }

        // Both must outlive tox_new: the options struct only borrows them
        let savedata = options.savedata.unwrap_or_default();
        let proxy_host = match &options.proxy {
            Some(proxy) => Some(CString::new(proxy.host.as_str()).map_err(|_| {
                unsafe { tox_options_free(opts) };
                ToxError::Construction("proxy host contains NUL".to_string())
            })?),
            None => None,
        };

        unsafe {
            if !savedata.is_empty() {
                tox_options_set_savedata_type(opts, TOX_SAVEDATA_TYPE_TOX_SAVE);
                tox_options_set_savedata_data(opts, savedata.as_ptr(), savedata.len());
            }
            if let (Some(proxy), Some(host)) = (&options.proxy, &proxy_host) {
                if proxy.has_credentials() {
                    warn!("toxcore does not support proxy authentication; credentials ignored");
                }
                tox_options_set_proxy_type(opts, TOX_PROXY_TYPE_SOCKS5);
                tox_options_set_proxy_host(opts, host.as_ptr());
                tox_options_set_proxy_port(opts, proxy.port);
                // UDP cannot be tunnelled through SOCKS5
                tox_options_set_udp_enabled(opts, false);
            }
        }

        let mut err: c_int = TOX_ERR_OK;
        let raw = unsafe { tox_new(opts, &mut err) };
        unsafe { tox_options_free(opts) };

        let raw = match NonNull::new(raw) {
            Some(raw) if err == TOX_ERR_OK => raw,
            _ => return Err(ToxError::Construction(describe_new_error(err).to_string())),
        };

        unsafe {
            tox_callback_friend_request(raw.as_ptr(), Some(on_friend_request));
            tox_callback_friend_message(raw.as_ptr(), Some(on_friend_message));
            tox_callback_self_connection_status(raw.as_ptr(), Some(on_self_connection_status));
        }

        Ok(Self { raw })
    }
}

impl Drop for ToxCore {
    fn drop(&mut self) {
        unsafe { tox_kill(self.raw.as_ptr()) };
    }
}

impl ToxEngine for ToxCore {
    fn self_address(&self) -> String {
        let mut address = [0u8; ADDRESS_SIZE];
        unsafe { tox_self_get_address(self.raw.as_ptr(), address.as_mut_ptr()) };
        hex::encode_upper(address)
    }

    fn self_public_key(&self) -> PublicKey {
        let mut key = [0u8; PUBLIC_KEY_SIZE];
        unsafe { tox_self_get_public_key(self.raw.as_ptr(), key.as_mut_ptr()) };
        PublicKey(key)
    }

    fn set_name(&mut self, name: &str) -> ToxResult<()> {
        let mut err: c_int = TOX_ERR_OK;
        let ok = unsafe {
            tox_self_set_name(self.raw.as_ptr(), name.as_ptr(), name.len(), &mut err)
        };
        if ok {
            Ok(())
        } else {
            Err(ToxError::Profile(describe_set_info_error(err).to_string()))
        }
    }

    fn set_status_message(&mut self, status: &str) -> ToxResult<()> {
        let mut err: c_int = TOX_ERR_OK;
        let ok = unsafe {
            tox_self_set_status_message(self.raw.as_ptr(), status.as_ptr(), status.len(), &mut err)
        };
        if ok {
            Ok(())
        } else {
            Err(ToxError::Profile(describe_set_info_error(err).to_string()))
        }
    }

    fn bootstrap(&mut self, node: &BootstrapNode) -> ToxResult<()> {
        let key = PublicKey::from_hex(&node.public_key)?;
        let host = CString::new(node.host.as_str()).map_err(|_| ToxError::Bootstrap {
            host: node.host.clone(),
            port: node.port,
            reason: "host contains NUL".to_string(),
        })?;

        let mut err: c_int = TOX_ERR_OK;
        let ok = unsafe {
            tox_bootstrap(
                self.raw.as_ptr(),
                host.as_ptr(),
                node.port,
                key.0.as_ptr(),
                &mut err,
            )
        };
        if ok {
            Ok(())
        } else {
            Err(ToxError::Bootstrap {
                host: node.host.clone(),
                port: node.port,
                reason: describe_bootstrap_error(err).to_string(),
            })
        }
    }

    fn friend_add_norequest(&mut self, public_key: &PublicKey) -> ToxResult<FriendNumber> {
        let mut err: c_int = TOX_ERR_OK;
        let friend =
            unsafe { tox_friend_add_norequest(self.raw.as_ptr(), public_key.0.as_ptr(), &mut err) };
        if err == TOX_ERR_OK {
            Ok(FriendNumber(friend))
        } else {
            Err(ToxError::FriendAdd(describe_friend_add_error(err).to_string()))
        }
    }

    fn friend_send_message(&mut self, friend: FriendNumber, text: &str) -> ToxResult<u32> {
        let mut err: c_int = TOX_ERR_OK;
        let id = unsafe {
            tox_friend_send_message(
                self.raw.as_ptr(),
                friend.0,
                TOX_MESSAGE_TYPE_NORMAL,
                text.as_ptr(),
                text.len(),
                &mut err,
            )
        };
        if err == TOX_ERR_OK {
            Ok(id)
        } else {
            Err(ToxError::Send(describe_send_error(err).to_string()))
        }
    }

    fn iterate(&mut self) -> Vec<ToxEvent> {
        let mut events: Vec<ToxEvent> = Vec::new();
        unsafe {
            tox_iterate(
                self.raw.as_ptr(),
                &mut events as *mut Vec<ToxEvent> as *mut c_void,
            )
        };
        events
    }

    fn iteration_interval(&self) -> Duration {
        let ms = unsafe { tox_iteration_interval(self.raw.as_ptr()) };
        Duration::from_millis(u64::from(ms))
    }

    fn savedata(&self) -> Vec<u8> {
        let size = unsafe { tox_get_savedata_size(self.raw.as_ptr()) };
        let mut data = vec![0u8; size];
        if size > 0 {
            unsafe { tox_get_savedata(self.raw.as_ptr(), data.as_mut_ptr()) };
        }
        data
    }
}
