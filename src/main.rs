use std::{
    ops::Div,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
    time::Instant,
};

use hazard_collections::{queue::Queue, stack::Stack};

const ITERATIONS: usize = 100000;
const PRODUCER_THREADS: usize = 4;
const CONSUMER_THREADS: usize = 4;

trait Container: Send + Sync + 'static {
    fn insert(&self, data: u64);
    fn remove(&self) -> Option<u64>;
}

impl Container for Queue<u64> {
    fn insert(&self, data: u64) {
        self.push(data);
    }
    fn remove(&self) -> Option<u64> {
        self.pop()
    }
}

impl Container for Stack<u64> {
    fn insert(&self, data: u64) {
        self.push(data);
    }
    fn remove(&self) -> Option<u64> {
        self.pop()
    }
}

fn run<C>(name: &str, container: C)
where
    C: Container,
{
    let container = Arc::new(container);
    let total = PRODUCER_THREADS * ITERATIONS;
    let received = Arc::new(AtomicUsize::new(0));

    let start = Instant::now();

    let producers: Vec<_> = (0..PRODUCER_THREADS)
        .map(|_| {
            let container = container.clone();
            thread::spawn(move || {
                for i in 0..ITERATIONS {
                    container.insert(i as u64);
                }
            })
        })
        .collect();

    let consumers: Vec<_> = (0..CONSUMER_THREADS)
        .map(|_| {
            let container = container.clone();
            let received = received.clone();
            thread::spawn(move || {
                while received.load(Ordering::Relaxed) < total {
                    if container.remove().is_some() {
                        received.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();

    for th in producers {
        th.join().unwrap();
    }
    for th in consumers {
        th.join().unwrap();
    }

    let duration = start.elapsed();
    let per_element = duration.div(total as u32);

    println!("[{}] Duration: {:?} / {}", name, duration, total);
    println!("[{}] Duration-Per-Element: {:?}", name, per_element);
}

pub fn main() {
    run("queue", Queue::<u64>::new());
    run("stack", Stack::<u64>::new());
}
