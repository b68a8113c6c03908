#![no_main]

//! Spreads receives and acknowledgments across several cloned mailboxes of
//! one channel. Clones share the slots, so the invariants are identical to
//! the single-mailbox case; the target checks nothing about which clone
//! observed a copy, only that the copy was current.

use levelcast::BroadcastChannel;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let channel: BroadcastChannel<u64> = BroadcastChannel::new(3);
    let root = channel.mailbox();
    let mailboxes = [root.clone(), root.clone(), root];
    let mut current = 0_u64;

    let mut bytes = data.iter().copied();
    while let Some(op) = bytes.next() {
        let mailbox = &mailboxes[usize::from(op >> 4) % mailboxes.len()];
        match op % 5 {
            0 => channel.turn_on(),
            1 => channel.turn_off(),
            2 => {
                let value = u64::from(bytes.next().unwrap_or(0));
                channel.broadcast(value);
                current = value;
            }
            3 => {
                if let Ok(value) = mailbox.try_recv() {
                    assert_eq!(value, current, "received copy of a non-current value");
                }
            }
            4 => mailbox.acknowledge(),
            _ => unreachable!(),
        }

        assert!(
            channel.len() <= channel.capacity(),
            "slot count exceeded capacity"
        );
    }

    channel.turn_off();
    assert!(channel.is_empty(), "turn_off left copies queued");
});
