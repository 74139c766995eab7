//! Concurrency tests for the directory. These run with parking_lot's deadlock_detection
//! feature and keep a background checker alive that fails the test on any deadlock.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use super::{DirectoryService, SearchCriteria, Security, SecurityRequest};
use crate::tprintln;

fn start_deadlock_detector(stop: Arc<AtomicBool>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while !stop.load(Ordering::Relaxed) {
            thread::sleep(Duration::from_millis(100));
            let deadlocks = parking_lot::deadlock::check_deadlock();
            if !deadlocks.is_empty() {
                eprintln!("\n[deadlock] DETECTED {} deadlock(s)", deadlocks.len());
                for (i, threads) in deadlocks.iter().enumerate() {
                    eprintln!("\nDeadlock #{}:", i);
                    for t in threads {
                        eprintln!("Thread Id {:#?}", t.thread_id());
                        eprintln!("Backtrace:\n{:?}", t.backtrace());
                    }
                }
                panic!("deadlock detected by parking_lot detector");
            }
        }
    })
}

/// A payload whose fields are all derived from `k`, so a reader can tell whether a record
/// mixes two writes.
fn versioned(symbol: &str, k: i64) -> SecurityRequest {
    SecurityRequest {
        symbol: symbol.to_string(),
        name: format!("{symbol} v{k}"),
        price: k as f64,
        change: k as f64 / 2.0,
        change_percent: 0.0,
        volume: k,
        market_cap: k * 1_000,
        sector: "Technology".to_string(),
    }
}

fn assert_consistent(s: &Security) {
    let k = s.volume;
    assert_eq!(s.name, format!("{} v{}", s.symbol, k), "torn record {s:?}");
    assert_eq!(s.price, k as f64, "torn record {s:?}");
    assert_eq!(s.change, k as f64 / 2.0, "torn record {s:?}");
    assert_eq!(s.market_cap, k * 1_000, "torn record {s:?}");
}

#[test]
fn concurrent_creates_get_distinct_ids() {
    let svc = DirectoryService::default();
    let threads = 8;
    let per_thread = 50;
    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let svc = svc.clone();
            thread::spawn(move || {
                (0..per_thread)
                    .map(|i| svc.create(versioned(&format!("S{t}X{i}"), i as i64)).unwrap().id)
                    .collect::<Vec<String>>()
            })
        })
        .collect();
    let ids: Vec<String> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
    let distinct: HashSet<&String> = ids.iter().collect();
    assert_eq!(ids.len(), threads * per_thread);
    assert_eq!(distinct.len(), ids.len());
    assert_eq!(svc.store().len(), threads * per_thread);
}

#[test]
fn readers_never_see_half_applied_updates() {
    let svc = DirectoryService::default();
    let ids: Vec<String> = ["AAA", "BBB", "CCC"]
        .iter()
        .map(|sym| svc.create(versioned(sym, 0)).unwrap().id)
        .collect();
    let stop = Arc::new(AtomicBool::new(false));

    let writers: Vec<_> = ids
        .iter()
        .cloned()
        .map(|id| {
            let svc = svc.clone();
            thread::spawn(move || {
                let symbol = svc.get(&id).unwrap().symbol;
                for k in 1..=300 {
                    svc.update(&id, versioned(&symbol, k)).unwrap();
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let svc = svc.clone();
            let stop = stop.clone();
            thread::spawn(move || {
                let mut seen = 0usize;
                while !stop.load(Ordering::Relaxed) {
                    let page = svc.search(&SearchCriteria::default());
                    assert_eq!(page.total, 3);
                    page.items.iter().for_each(assert_consistent);
                    svc.store().list().iter().for_each(assert_consistent);
                    seen += page.items.len();
                }
                seen
            })
        })
        .collect();

    for w in writers { w.join().unwrap(); }
    stop.store(true, Ordering::Relaxed);
    for r in readers {
        let seen = r.join().unwrap();
        tprintln!("reader checked {} records", seen);
    }
    for id in &ids {
        let s = svc.get(id).unwrap();
        assert_consistent(&s);
        assert_eq!(s.volume, 300);
    }
}

#[test]
fn no_deadlocks_under_mixed_directory_load() {
    let stop = Arc::new(AtomicBool::new(false));
    let monitor = start_deadlock_detector(stop.clone());

    let svc = DirectoryService::with_demo_data().unwrap();
    let threads = thread::available_parallelism().map(|n| n.get()).unwrap_or(8).min(8);
    let duration = Duration::from_secs(2);
    let start = Instant::now();
    let progress = Arc::new(AtomicU64::new(0));

    let workers: Vec<_> = (0..threads)
        .map(|t| {
            let svc = svc.clone();
            let progress = progress.clone();
            thread::spawn(move || {
                let mut k = 0i64;
                while start.elapsed() < duration {
                    k += 1;
                    match (t + k as usize) % 4 {
                        0 => {
                            let s = svc.create(versioned(&format!("T{t}"), k)).unwrap();
                            svc.toggle_favorite(&s.id, k % 2 == 0).unwrap();
                            svc.delete(&s.id).unwrap();
                        }
                        1 => {
                            let _ = svc.search(&SearchCriteria { min_price: Some(100.0), ..Default::default() });
                        }
                        2 => {
                            let _ = svc.list_favorites(&SearchCriteria { limit: Some(3), ..Default::default() });
                        }
                        _ => {
                            if let Some(first) = svc.store().list().into_iter().next() {
                                let _ = svc.toggle_favorite(&first.id, true);
                            }
                        }
                    }
                    progress.fetch_add(1, Ordering::Relaxed);
                }
            })
        })
        .collect();

    for w in workers { w.join().unwrap(); }
    stop.store(true, Ordering::Relaxed);
    assert!(monitor.join().is_ok(), "deadlock detector fired");
    tprintln!("directory load: {} operations on {} threads", progress.load(Ordering::Relaxed), threads);
    assert!(progress.load(Ordering::Relaxed) > 0);
    // Demo records are never deleted by the workers.
    assert!(svc.store().len() >= 8);
}
