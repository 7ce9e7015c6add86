#![cfg(not(loom))]

use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
};

use hazard_collections::{config::QueueConfig, queue::Queue};
use rand::Rng;

struct Counted {
    value: usize,
    drops: Arc<AtomicUsize>,
}
impl Drop for Counted {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn fifo_order() {
    let queue = Queue::new();

    for i in 0..100 {
        queue.push(i);
    }
    for i in 0..100 {
        assert_eq!(Some(i), queue.pop());
    }
    assert_eq!(None, queue.pop());

    queue.push(7);
    assert_eq!(Some(7), queue.pop());
    assert_eq!(None, queue.pop());
}

#[test]
fn producer_order_is_kept() {
    const PRODUCERS: usize = 4;
    const PER_PRODUCER: usize = 5000;

    let queue = Arc::new(Queue::new());

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|producer| {
            let queue = queue.clone();
            thread::spawn(move || {
                for seq in 0..PER_PRODUCER {
                    queue.push((producer, seq));
                }
            })
        })
        .collect();

    let mut last_seen: Vec<Option<usize>> = vec![None; PRODUCERS];
    let mut received = 0;
    while received < PRODUCERS * PER_PRODUCER {
        if let Some((producer, seq)) = queue.pop() {
            if let Some(last) = last_seen[producer] {
                assert!(last < seq, "producer {} went {} -> {}", producer, last, seq);
            }
            last_seen[producer] = Some(seq);
            received += 1;
        }
    }

    for handle in producers {
        handle.join().unwrap();
    }
    assert_eq!(None, queue.pop());
}

#[test]
fn multi_producer_multi_consumer() {
    const PRODUCERS: usize = 4;
    const CONSUMERS: usize = 4;
    const PER_PRODUCER: usize = 10000;
    const TOTAL: usize = PRODUCERS * PER_PRODUCER;

    let queue = Arc::new(Queue::new());
    let received = Arc::new(AtomicUsize::new(0));

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|producer| {
            let queue = queue.clone();
            thread::spawn(move || {
                for i in 0..PER_PRODUCER {
                    queue.push(producer * PER_PRODUCER + i);
                }
            })
        })
        .collect();

    let consumers: Vec<_> = (0..CONSUMERS)
        .map(|_| {
            let queue = queue.clone();
            let received = received.clone();
            thread::spawn(move || {
                let mut popped = Vec::new();
                while received.load(Ordering::SeqCst) < TOTAL {
                    if let Some(value) = queue.pop() {
                        received.fetch_add(1, Ordering::SeqCst);
                        popped.push(value);
                    }
                }
                popped
            })
        })
        .collect();

    for handle in producers {
        handle.join().unwrap();
    }

    let mut seen = HashSet::new();
    for handle in consumers {
        for value in handle.join().unwrap() {
            assert!(seen.insert(value), "{} was popped twice", value);
        }
    }

    assert_eq!(TOTAL, seen.len());
    assert_eq!(None, queue.pop());
}

#[test]
fn random_interleaving() {
    const THREADS: usize = 6;
    const OPS: usize = 5000;

    let queue = Arc::new(Queue::with_config(QueueConfig::new().with_garbage_threshold(8)).unwrap());

    let handles: Vec<_> = (0..THREADS)
        .map(|id| {
            let queue = queue.clone();
            thread::spawn(move || {
                let mut rng = rand::thread_rng();
                let mut pushed = Vec::new();
                let mut popped = Vec::new();
                for i in 0..OPS {
                    if rng.gen_bool(0.5) {
                        let value = id * OPS + i;
                        queue.push(value);
                        pushed.push(value);
                    } else if let Some(value) = queue.pop() {
                        popped.push(value);
                    }
                }
                (pushed, popped)
            })
        })
        .collect();

    let mut pushed = HashSet::new();
    let mut popped = HashSet::new();
    for handle in handles {
        let (p, c) = handle.join().unwrap();
        pushed.extend(p);
        for value in c {
            assert!(popped.insert(value));
        }
    }
    while let Some(value) = queue.pop() {
        assert!(popped.insert(value));
    }

    assert_eq!(pushed, popped);
}

#[test]
fn teardown_drops_everything() {
    const THREADS: usize = 4;
    const PER_THREAD: usize = 2000;

    let drops = Arc::new(AtomicUsize::new(0));
    let queue = Arc::new(Queue::new());

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let queue = queue.clone();
            let drops = drops.clone();
            thread::spawn(move || {
                let mut popped = 0;
                for value in 0..PER_THREAD {
                    queue.push(Counted {
                        value,
                        drops: drops.clone(),
                    });
                    if value % 3 == 0 {
                        if let Some(entry) = queue.pop() {
                            assert!(entry.value < PER_THREAD);
                            popped += 1;
                        }
                    }
                }
                popped
            })
        })
        .collect();
    let popped: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    assert_eq!(popped, drops.load(Ordering::SeqCst));

    drop(queue);
    assert_eq!(THREADS * PER_THREAD, drops.load(Ordering::SeqCst));
}
