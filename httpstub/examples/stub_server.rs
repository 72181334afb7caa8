use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;

use httpstub::Headers;
use httpstub::Stub;
use httpstub::StubServers;

fn main() {
    let servers = StubServers::new();

    let hello = Stub::new()
        .content("hello\n")
        .headers_text("Content-Type: text/plain\nX-Stub: hello")
        .start(&servers)
        .expect("hello");
    println!("fixed:    {}", hello);

    let secure = Stub::new()
        .ssl()
        .content("secret\n")
        .start(&servers)
        .expect("secure");
    println!("https:    {}", secure);

    let payment = Stub::new()
        .response_code(402)
        .start(&servers)
        .expect("payment");
    println!("402:      {}", payment);

    let echo = Stub::new().start_echo(&servers).expect("echo");
    println!("echo:     {}", echo);

    let counter = Arc::new(AtomicUsize::new(0));
    let counting = Stub::new()
        .handler_fn(move |req, resp| {
            if req.method == "POST" {
                counter.fetch_add(1, Ordering::Relaxed);
                resp.send_redirect_302(req.path())
            } else {
                let page = format!("Counter: {}\n", counter.load(Ordering::Relaxed));
                resp.send(
                    200,
                    Headers::new().with("Content-Type", "text/plain; charset=utf-8"),
                    page,
                )
            }
        })
        .start(&servers)
        .expect("counter");
    println!("counter:  {} (POST to increment)", counting);

    loop {
        thread::park();
    }
}
