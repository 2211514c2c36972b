//! Callback registration, start/stop and dispatch tests for tc-driver

mod common;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use common::{bank, bank_with_reserved, LineOp, MockHw, State};
use tc_driver::{StatusFlags, TcError, Timebase, TimerBank, TimerId};

static TICKS: AtomicU32 = AtomicU32::new(0);

fn count_tick() {
    TICKS.fetch_add(1, Ordering::SeqCst);
}

static REPLACED_TICKS: AtomicU32 = AtomicU32::new(0);

fn count_replaced_tick() {
    REPLACED_TICKS.fetch_add(1, Ordering::SeqCst);
}

fn noop() {}

#[test]
fn test_timer_lookup_rejects_out_of_range_ids() {
    let (bank, _) = bank();
    assert_eq!(bank.timer(TimerId::new(3)).err(), Some(TcError::InvalidTimer));
    let timer = bank.timer(TimerId::new(2)).unwrap();
    assert_eq!(timer.id(), TimerId::new(2));
}

#[test]
fn test_handles_with_same_id_are_equal() {
    let (bank, _) = bank();
    let a = bank.timer(TimerId::new(1)).unwrap();
    let b = a;
    assert_eq!(a, b);
    assert_ne!(a, bank.timer(TimerId::new(2)).unwrap());
}

#[test]
fn test_find_available_prefers_lowest_free() {
    let (bank, _) = bank();
    assert_eq!(bank.find_available(), TimerId::new(0));

    bank.attach_interrupt(TimerId::new(0), noop);
    assert_eq!(bank.find_available(), TimerId::new(1));

    bank.attach_interrupt(TimerId::new(1), noop);
    bank.attach_interrupt(TimerId::new(2), noop);
    // Fully booked: fall back to the lowest id rather than failing.
    assert_eq!(bank.find_available(), TimerId::new(0));
}

#[test]
fn test_find_available_skips_reserved_ids() {
    let (bank, _) = bank_with_reserved(0b001);
    assert_eq!(bank.find_available(), TimerId::new(1));

    bank.attach_interrupt(TimerId::new(1), noop);
    bank.attach_interrupt(TimerId::new(2), noop);
    // The fallback also avoids reserved ids.
    assert_eq!(bank.find_available(), TimerId::new(1));
}

#[test]
fn test_bare_start_defaults_to_one_hertz() {
    let (bank, state) = bank();
    bank.start(TimerId::new(0));

    assert_eq!(bank.frequency(TimerId::new(0)), Some(1.0));
    let state = state.lock().unwrap();
    assert_eq!(state.channels[0].rc, 656_250);
    assert!(state.channels[0].running);
}

#[test]
fn test_start_enables_line_only_with_callback() {
    let (bank, state) = bank();
    bank.start(TimerId::new(0));
    assert!(!state.lock().unwrap().line_enabled(27));
    assert!(state.lock().unwrap().channels[0].running);

    bank.attach_interrupt(TimerId::new(0), noop);
    bank.start(TimerId::new(0));
    assert!(state.lock().unwrap().line_enabled(27));
}

#[test]
fn test_start_clears_pending_before_enabling_line() {
    let (bank, state) = bank();
    bank.timer(TimerId::new(1))
        .unwrap()
        .attach_interrupt(noop)
        .start();

    let state = state.lock().unwrap();
    let cleared = state.position_of(LineOp::Clear(28)).unwrap();
    let enabled = state.position_of(LineOp::Enable(28)).unwrap();
    assert!(cleared < enabled);
}

#[test]
fn test_stop_disables_line_and_halts() {
    let (bank, state) = bank();
    bank.timer(TimerId::new(0))
        .unwrap()
        .attach_interrupt(noop)
        .start()
        .stop();

    assert!(!state.lock().unwrap().channels[0].running);
    assert!(!state.lock().unwrap().line_enabled(27));

    // Stopping a stopped timer is fine.
    bank.stop(TimerId::new(0));
    assert!(!state.lock().unwrap().channels[0].running);
}

#[test]
fn test_stop_keeps_configuration() {
    let (bank, _) = bank();
    let timer = bank.timer(TimerId::new(0)).unwrap();
    timer.set_frequency(1000.0).stop();

    assert_eq!(timer.frequency(), Some(1000.0));
    assert_eq!(timer.start().frequency(), Some(1000.0));
}

#[test]
fn test_detach_frees_the_slot_and_stops() {
    let (bank, state) = bank();
    let timer = bank.timer(TimerId::new(0)).unwrap();
    timer.attach_interrupt(noop).start();
    assert_eq!(bank.find_available(), TimerId::new(1));

    timer.detach_interrupt();
    assert_eq!(bank.find_available(), TimerId::new(0));
    assert!(!state.lock().unwrap().channels[0].running);
    assert!(!state.lock().unwrap().line_enabled(27));
}

#[test]
fn test_dispatch_caches_status_and_fires_callback() {
    let (bank, state) = bank();
    let id = TimerId::new(0);
    bank.attach_interrupt(id, count_tick);
    state.lock().unwrap().channels[0].status = StatusFlags::RC_COMPARE;

    bank.dispatch(id);

    assert_eq!(TICKS.load(Ordering::SeqCst), 1);
    assert_eq!(bank.status_register(id), StatusFlags::RC_COMPARE);
    // The hardware read cleared the live flags.
    assert!(state.lock().unwrap().channels[0].status.is_empty());
}

#[test]
fn test_dispatch_without_callback_still_caches_status() {
    let (bank, state) = bank();
    let id = TimerId::new(2);
    state.lock().unwrap().channels[2].status =
        StatusFlags::COUNTER_OVERFLOW | StatusFlags::RA_LOADED;

    bank.dispatch(id);

    let cached = bank.status_register(id);
    assert!(cached.contains(StatusFlags::COUNTER_OVERFLOW));
    assert!(cached.contains(StatusFlags::RA_LOADED));
}

#[test]
fn test_status_is_cached_per_channel() {
    let (bank, state) = bank();
    state.lock().unwrap().channels[0].status = StatusFlags::RC_COMPARE;
    state.lock().unwrap().channels[1].status = StatusFlags::COUNTER_OVERFLOW;

    bank.dispatch(TimerId::new(0));
    bank.dispatch(TimerId::new(1));

    assert_eq!(bank.status_register(TimerId::new(0)), StatusFlags::RC_COMPARE);
    assert_eq!(
        bank.status_register(TimerId::new(1)),
        StatusFlags::COUNTER_OVERFLOW
    );
}

static SELF_STOP: OnceLock<(TimerBank<MockHw, 3>, Arc<Mutex<State>>)> = OnceLock::new();

fn stop_own_timer() {
    let (bank, _) = SELF_STOP.get().unwrap();
    bank.stop(TimerId::new(0));
}

// The callback runs outside the dispatch critical section, so it may
// reconfigure the very timer that fired it.
#[test]
fn test_callback_may_stop_its_own_timer() {
    let (bank, state) = SELF_STOP.get_or_init(bank);
    bank.timer(TimerId::new(0))
        .unwrap()
        .attach_interrupt(stop_own_timer)
        .start();
    assert!(state.lock().unwrap().channels[0].running);

    bank.dispatch(TimerId::new(0));

    assert!(!state.lock().unwrap().channels[0].running);
    assert!(!state.lock().unwrap().line_enabled(27));
}

#[test]
fn test_attach_replaces_previous_callback() {
    let (bank, _) = bank();
    let id = TimerId::new(1);
    bank.attach_interrupt(id, noop);
    bank.attach_interrupt(id, count_replaced_tick);

    bank.dispatch(id);
    assert_eq!(REPLACED_TICKS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_timebase_starts_unset() {
    let (bank, _) = bank();
    assert_eq!(bank.timebase(TimerId::new(0)), Timebase::Unset);
    assert_eq!(bank.frequency(TimerId::new(0)), None);
    assert_eq!(bank.period_micros(TimerId::new(0)), None);
}
