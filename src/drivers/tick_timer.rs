//! Periodic tick timer using ESP-IDF's esp_timer API.
//!
//! Drives the shared [`TICK`] source at `tick_period_ms`.  The callback
//! runs in the esp_timer task (not ISR) and only calls
//! [`TickSource::signal`](crate::tick::TickSource::signal), which is a
//! single atomic RMW.
//!
//! On simulation targets a background thread stands in for the timer.

use crate::tick::TICK;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

#[cfg(target_os = "espidf")]
static mut TICK_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// SAFETY: TICK_TIMER is written once in `start()` before any callback
/// fires.  Only called from the single main task.
#[cfg(target_os = "espidf")]
unsafe fn tick_timer() -> esp_timer_handle_t { unsafe { TICK_TIMER } }

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tick_cb(_arg: *mut core::ffi::c_void) {
    TICK.signal();
}

/// Errors from timer setup.  Carries the raw esp_err_t on target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerError(pub i32);

impl core::fmt::Display for TimerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "tick timer setup failed (rc={})", self.0)
    }
}

impl core::error::Error for TimerError {}

/// Start the periodic tick.  Call once at boot.
#[cfg(target_os = "espidf")]
pub fn start(period_ms: u32) -> Result<(), TimerError> {
    // SAFETY: TICK_TIMER is written here once at boot from the main task
    // before the callback can fire.
    unsafe {
        let args = esp_timer_create_args_t {
            callback: Some(tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"tick\0".as_ptr() as *const _,
            skip_unhandled_events: false,
        };
        let ret = esp_timer_create(&args, &raw mut TICK_TIMER);
        if ret != ESP_OK {
            return Err(TimerError(ret));
        }
        let ret = esp_timer_start_periodic(TICK_TIMER, u64::from(period_ms) * 1_000);
        if ret != ESP_OK {
            return Err(TimerError(ret));
        }
    }
    info!("tick_timer: {} ms period started", period_ms);
    Ok(())
}

/// Stop the tick.  Safe to call when the timer was never started.
#[cfg(target_os = "espidf")]
pub fn stop() {
    // SAFETY: tick_timer() contract — main task only; null-check guards
    // against a failed start().
    unsafe {
        let t = tick_timer();
        if !t.is_null() {
            esp_timer_stop(t);
        }
    }
}

// ── Simulation ────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
static SIM_RUNNING: core::sync::atomic::AtomicBool = core::sync::atomic::AtomicBool::new(false);

#[cfg(not(target_os = "espidf"))]
pub fn start(period_ms: u32) -> Result<(), TimerError> {
    use core::sync::atomic::Ordering;

    if SIM_RUNNING.swap(true, Ordering::AcqRel) {
        return Ok(());
    }
    let period = std::time::Duration::from_millis(u64::from(period_ms.max(1)));
    std::thread::Builder::new()
        .name("tick".into())
        .spawn(move || {
            while SIM_RUNNING.load(Ordering::Acquire) {
                std::thread::sleep(period);
                TICK.signal();
            }
        })
        .map_err(|_| TimerError(-1))?;
    info!("tick_timer(sim): {} ms period started", period_ms);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn stop() {
    SIM_RUNNING.store(false, core::sync::atomic::Ordering::Release);
}
