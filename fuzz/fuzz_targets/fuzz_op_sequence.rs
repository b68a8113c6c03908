#![no_main]

//! Drives a channel through arbitrary operation sequences and checks the
//! single-threaded invariants after every step: the slot count never exceeds
//! capacity, an off channel holds no copies, and every received copy matches
//! the value most recently installed.

use levelcast::BroadcastChannel;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut bytes = data.iter().copied();
    let Some(hint) = bytes.next() else { return };

    let channel: BroadcastChannel<u64> = BroadcastChannel::new(usize::from(hint % 16));
    let mailbox = channel.mailbox();
    let mut current = 0_u64;

    while let Some(op) = bytes.next() {
        match op % 6 {
            0 => channel.turn_on(),
            1 => channel.turn_off(),
            2 => {
                let value = u64::from(bytes.next().unwrap_or(0));
                channel.set(value);
                current = value;
            }
            3 => {
                let value = u64::from(bytes.next().unwrap_or(0));
                channel.broadcast(value);
                current = value;
            }
            4 => {
                if let Ok(value) = mailbox.try_recv() {
                    assert_eq!(value, current, "received copy of a non-current value");
                }
            }
            5 => mailbox.acknowledge(),
            _ => unreachable!(),
        }

        assert!(
            channel.len() <= channel.capacity(),
            "slot count exceeded capacity"
        );
        if !channel.is_broadcasting() {
            assert!(channel.is_empty(), "off channel held copies");
        }
    }
});
