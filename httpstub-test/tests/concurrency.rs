//! Many threads registering and fetching stubs at the same time.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::Rng;

use httpstub::*;
use httpstub_test::*;

const THREADS: usize = 4;
const ROUND_TRIPS: usize = 50;

fn round_trips(servers: &StubServers, ssl: bool) -> std::result::Result<usize, String> {
    let client = http_client();
    let content = format!("{}{}", TEST_CONTENT, random_content(10));
    for _ in 0..ROUND_TRIPS {
        let mut stub = Stub::new().content(content.clone());
        if ssl {
            stub = stub.ssl();
        }
        let url = stub.start(servers).map_err(|e| e.to_string())?;
        let text = client
            .get(&url)
            .send()
            .and_then(|r| r.text())
            .map_err(|e| format!("{}: {}", url, e))?;
        if text != content {
            return Err(format!("{}: expected {:?}, got {:?}", url, content, text));
        }
        thread::sleep(Duration::from_millis(rand::thread_rng().gen_range(0..10)));
    }
    Ok(ROUND_TRIPS)
}

fn run_threads(ssl: bool) {
    init_logger();

    let servers = Arc::new(StubServers::new());
    let (tx, rx) = mpsc::channel();

    for _ in 0..THREADS {
        let servers = servers.clone();
        let tx = tx.clone();
        thread::spawn(move || {
            drop(tx.send(round_trips(&servers, ssl)));
        });
    }
    drop(tx);

    let mut completed = 0;
    for _ in 0..THREADS {
        let done = t!(rx.recv_timeout(Duration::from_secs(60)));
        completed += t!(done);
    }
    assert_eq!(THREADS * ROUND_TRIPS, completed);
}

#[test]
fn multi_threaded() {
    run_threads(false);
}

#[test]
fn multi_threaded_tls() {
    run_threads(true);
}

#[test]
fn slow_handler_does_not_block_others() {
    init_logger();

    let servers = StubServers::new();
    let (release_tx, release_rx) = mpsc::sync_channel::<()>(0);
    let release_rx = std::sync::Mutex::new(release_rx);
    let slow = t!(Stub::new()
        .handler_fn(move |_req, resp| {
            drop(release_rx.lock().unwrap().recv());
            resp.send_found_200_plain_text("slow")
        })
        .start(&servers));
    let fast = t!(Stub::new().content("fast").start(&servers));

    let slow_thread = thread::spawn(move || get_text(&slow));

    // served while the slow handler is blocked
    assert_eq!("fast", get_text(&fast));

    t!(release_tx.send(()));
    assert_eq!("slow", t!(slow_thread.join()));
}
