//! Receive queue tests

use std::sync::Arc;
use std::thread;

use uart_shell::queue::{ByteQueue, QUEUE_SIZE};

#[test]
fn test_queue_default_capacity() {
    let queue: ByteQueue = ByteQueue::new();
    assert_eq!(queue.capacity(), QUEUE_SIZE);
    assert!(queue.is_empty());
    assert_eq!(queue.pop(), None);
}

#[test]
fn test_queue_len_never_exceeds_capacity() {
    let queue: ByteQueue<16> = ByteQueue::new();

    for i in 0..100u8 {
        queue.push(i);
        assert!(queue.len() <= 16);
    }

    assert_eq!(queue.len(), 16);
    assert_eq!(queue.dropped(), 84);
}

#[test]
fn test_queue_overflow_drops_newest() {
    let queue: ByteQueue<4> = ByteQueue::new();

    assert!(queue.push(b'a'));
    assert!(queue.push(b'b'));
    assert!(queue.push(b'c'));
    assert!(queue.push(b'd'));
    assert!(!queue.push(b'e'));

    let drained: Vec<u8> = std::iter::from_fn(|| queue.pop()).collect();
    assert_eq!(drained, b"abcd");
    assert_eq!(queue.pop(), None);
}

#[test]
fn test_queue_no_pop_from_unwritten_slot() {
    let queue: ByteQueue<8> = ByteQueue::new();

    queue.push(1);
    queue.push(2);
    assert_eq!(queue.pop(), Some(1));
    assert_eq!(queue.pop(), Some(2));

    // Slots 2..8 were never written
    for _ in 0..10 {
        assert_eq!(queue.pop(), None);
    }
    assert_eq!(queue.len(), 0);
}

#[test]
fn test_queue_on_byte_received() {
    let queue: ByteQueue<2> = ByteQueue::new();

    queue.on_byte_received(b'x');
    queue.on_byte_received(b'y');
    queue.on_byte_received(b'z'); // dropped, no panic

    assert_eq!(queue.pop(), Some(b'x'));
    assert_eq!(queue.pop(), Some(b'y'));
    assert_eq!(queue.dropped(), 1);
}

#[test]
fn test_queue_accepts_again_after_drain() {
    let queue: ByteQueue<4> = ByteQueue::new();

    for round in 0..10u8 {
        for i in 0..4 {
            assert!(queue.push(round * 4 + i));
        }
        assert!(!queue.push(0xFF));
        for i in 0..4 {
            assert_eq!(queue.pop(), Some(round * 4 + i));
        }
    }
    assert_eq!(queue.dropped(), 10);
}

#[test]
fn test_queue_spsc_order_preserved() {
    const TOTAL: usize = 100_000;
    let queue: Arc<ByteQueue<64>> = Arc::new(ByteQueue::new());

    let producer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            let mut accepted = Vec::with_capacity(TOTAL);
            for i in 0..TOTAL {
                let byte = (i % 251) as u8;
                if queue.push(byte) {
                    accepted.push(byte);
                }
                if i % 1000 == 0 {
                    thread::yield_now();
                }
            }
            accepted
        })
    };

    let mut received = Vec::with_capacity(TOTAL);
    loop {
        match queue.pop() {
            Some(byte) => received.push(byte),
            None if producer.is_finished() => break,
            None => thread::yield_now(),
        }
    }

    let accepted = producer.join().unwrap();
    while let Some(byte) = queue.pop() {
        received.push(byte);
    }

    // Only drops are removed: the received stream is exactly what was accepted
    assert_eq!(received, accepted);
    assert_eq!(accepted.len() + queue.dropped() as usize, TOTAL);
}
