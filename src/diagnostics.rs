//! Fail-stop handling and panic diagnostics.
//!
//! Unrecoverable init failures end in [`halt`]: the reason is logged, the
//! tick source is stopped and the task parks forever.  No indicator is
//! touched, so whatever the board showed at the time of failure stays.

use core::fmt::Display;
use std::any::Any;

use crate::drivers::tick_timer;

/// Log `reason` and stop.  Never returns.
pub fn halt(reason: &dyn Display) -> ! {
    log::error!("HALT: {}", reason);
    tick_timer::stop();
    loop {
        std::thread::sleep(std::time::Duration::from_secs(1));
    }
}

/// Best-effort string form of a panic payload.
pub fn panic_reason(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic"
    }
}

/// Install a panic hook that logs the reason and uptime before the
/// default handler aborts.
pub fn install_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        let reason = panic_reason(info.payload());

        #[cfg(target_os = "espidf")]
        {
            // SAFETY: esp_timer_get_time is a plain counter read, safe in
            // panic context.
            let uptime = (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000_000;
            log::error!("PANIC at {}s: {}", uptime, reason);
        }

        #[cfg(not(target_os = "espidf"))]
        {
            log::error!("PANIC (simulation): {}", reason);
        }

        tick_timer::stop();
    }));
}
