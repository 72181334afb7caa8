//! Stub registration through `StubServers`.

#[macro_use]
extern crate log;

use std::net::TcpListener;

use bytes::Bytes;

use httpstub::*;
use httpstub_test::*;

#[test]
fn http() {
    init_logger();

    let servers = StubServers::new();
    let url = t!(Stub::new().content(TEST_CONTENT).start(&servers));
    assert!(url.starts_with("http://127.0.0.1:"), "{}", url);
    assert_eq!(TEST_CONTENT, get_text(&url));
}

#[test]
fn https() {
    init_logger();

    let servers = StubServers::new();
    let url = t!(Stub::new().ssl().content(TEST_CONTENT).start(&servers));
    assert!(url.starts_with("https://127.0.0.1:"), "{}", url);
    assert_eq!(TEST_CONTENT, get_text(&url));
}

#[test]
fn plain_and_tls_are_separate_servers() {
    init_logger();

    let servers = StubServers::new();
    let plain = t!(Stub::new().content("plain").start(&servers));
    let tls = t!(Stub::new().ssl().content("tls").start(&servers));

    let plain_origin = servers.origin(HttpScheme::Http).unwrap();
    let tls_origin = servers.origin(HttpScheme::Https).unwrap();
    assert_ne!(plain_origin, tls_origin);
    assert_eq!(format!("{}/0", plain_origin), plain);
    assert_eq!(format!("{}/1", tls_origin), tls);

    assert_eq!("plain", get_text(&plain));
    assert_eq!("tls", get_text(&tls));
}

#[test]
fn content_bytes_unchanged() {
    init_logger();

    let servers = StubServers::new();
    let content = Bytes::from_static(b"\x00\x01binary\xff\r\n\r\n");
    let url = t!(Stub::new().content(content.clone()).start(&servers));
    let response = get_response(&url);
    assert_eq!(200, response.status().as_u16());
    assert_eq!(content, t!(response.bytes()));
}

#[test]
fn empty_content() {
    init_logger();

    let servers = StubServers::new();
    let url = t!(Stub::new().start(&servers));
    let response = get_response(&url);
    assert_eq!(200, response.status().as_u16());
    assert_eq!(Some(0), response.content_length());
    assert_eq!("", t!(response.text()));
}

#[test]
fn echo() {
    init_logger();

    let servers = StubServers::new();
    let url = t!(Stub::new().start_echo(&servers));
    let response = t!(http_client()
        .get(&url)
        .header("Referer", "http://localhost")
        .send());
    assert_eq!(200, response.status().as_u16());
    let body = t!(response.text());
    debug!("echo: {}", body);
    assert!(body.starts_with("GET /0 HTTP/1.1\n"), "{}", body);
    assert!(
        body.lines().any(|l| l == "Referer: http://localhost"),
        "{}",
        body
    );
    assert!(body.ends_with("\nREQUEST BODY:\n"), "{}", body);
}

#[test]
fn echo_post_body_over_tls() {
    init_logger();

    let servers = StubServers::new();
    let url = t!(Stub::new().ssl().start_echo(&servers));
    let response = t!(http_client()
        .post(format!("{}?q=1", url))
        .body("ping")
        .send());
    let body = t!(response.text());
    assert!(body.starts_with("POST /0?q=1 HTTP/1.1\n"), "{}", body);
    assert!(body.ends_with("\nREQUEST BODY:\nping"), "{}", body);
}

#[test]
fn response_code_500() {
    init_logger();

    let servers = StubServers::new();
    let url = t!(Stub::new().response_code(500).start(&servers));
    let response = get_response(&url);
    assert_eq!(500, response.status().as_u16());
}

#[test]
fn response_code_402() {
    init_logger();

    let servers = StubServers::new();
    let url = t!(Stub::new().response_code(402).start(&servers));
    let response = get_response(&url);
    assert_eq!(402, response.status().as_u16());
    assert_eq!(Some("Payment Required"), response.status().canonical_reason());
}

#[test]
fn invalid_response_code() {
    init_logger();

    let servers = StubServers::new();
    match Stub::new().response_code(1000).start(&servers) {
        Err(Error::InvalidStatusCode(1000)) => {}
        r => panic!("unexpected: {:?}", r),
    }
}

#[test]
fn interim_response_code_rejected() {
    init_logger();

    let servers = StubServers::new();
    match Stub::new().response_code(150).content("x").start(&servers) {
        Err(Error::InvalidStatusCode(150)) => {}
        r => panic!("unexpected: {:?}", r),
    }
    assert!(!servers.is_running(HttpScheme::Http));

    let url = t!(Stub::new().response_code(200).start(&servers));
    assert!(url.ends_with("/0"), "{}", url);
}

#[test]
fn handler_interim_status_is_500() {
    init_logger();

    let servers = StubServers::new();
    let url = t!(Stub::new()
        .handler_fn(|_req, resp| resp.send_status(101))
        .start(&servers));
    let response = get_response(&url);
    assert_eq!(500, response.status().as_u16());
}

#[test]
fn binds_next_free_port() {
    init_logger();

    let servers = StubServers::new();
    let first = t!(Stub::new().start_echo(&servers));
    let port = t!(t!(reqwest::Url::parse(&first))
        .port()
        .ok_or("no port"));

    servers.stop();
    assert!(!servers.is_running(HttpScheme::Http));

    // ignore error, the port may be taken by somebody else already
    let _blocker = TcpListener::bind((BIND_HOST, port));

    let url = t!(Stub::new().start_echo(&servers));
    assert!(!url.contains(&format!(":{}/", port)), "{}", url);
    assert!(url.ends_with("/1"), "{}", url);
    assert!(get_text(&url).starts_with("GET /1 HTTP/1.1\n"));
}

#[test]
fn stop_is_idempotent() {
    init_logger();

    let servers = StubServers::new();
    servers.stop();
    servers.stop();

    let url = t!(Stub::new().ssl().start(&servers));
    servers.stop();
    servers.stop();
    assert!(!servers.is_running(HttpScheme::Https));
    assert!(http_client().get(&url).send().is_err());
}

#[test]
fn sends_parsed_headers() {
    init_logger();

    let servers = StubServers::new();
    let url = t!(Stub::new()
        .headers_text("My1stHeader: My1stHeadersValue\nMy2ndHeader: My2ndHeadersValue")
        .start(&servers));
    let headers = response_headers(&get_response(&url));
    assert!(headers.contains(&("my1stheader".to_owned(), "My1stHeadersValue".to_owned())));
    assert!(headers.contains(&("my2ndheader".to_owned(), "My2ndHeadersValue".to_owned())));
}

#[test]
fn sends_headers_map() {
    init_logger();

    let servers = StubServers::new();
    let text = t!(Stub::new()
        .headers_text("My1stHeader: A\nMy2ndHeader: B")
        .start(&servers));
    let map = t!(Stub::new()
        .headers(Headers::from_multimap(vec![
            ("My1stHeader", vec!["A"]),
            ("My2ndHeader", vec!["B"]),
        ]))
        .start(&servers));

    let without_date = |url: &str| {
        let mut headers = response_headers(&get_response(url));
        headers.retain(|(name, _)| name != "date");
        headers
    };
    assert_eq!(without_date(&text), without_date(&map));
    assert!(without_date(&map).contains(&("my1stheader".to_owned(), "A".to_owned())));
}

#[test]
fn repeated_header_values() {
    init_logger();

    let servers = StubServers::new();
    let url = t!(Stub::new()
        .headers_text("Set-Cookie: a=1\nSet-Cookie: b=2")
        .start(&servers));
    let response = get_response(&url);
    let cookies: Vec<_> = response
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap().to_owned())
        .collect();
    assert_eq!(vec!["a=1", "b=2"], cookies);
}

#[test]
fn sends_redirect() {
    init_logger();

    let servers = StubServers::new();
    let target = t!(Stub::new().content(TEST_CONTENT).start(&servers));
    let url = t!(Stub::new()
        .response_code(302)
        .headers_text(&format!("Location: {}", target))
        .start(&servers));

    let response = t!(http_client_no_redirect().get(&url).send());
    assert_eq!(302, response.status().as_u16());
    assert_eq!(
        Some(target.as_str()),
        response
            .headers()
            .get("location")
            .and_then(|l| l.to_str().ok())
    );

    assert_eq!(TEST_CONTENT, get_text(&url));
}

#[test]
fn lambda_server() {
    init_logger();

    let servers = StubServers::new();
    let url = t!(Stub::new()
        .response_code(500)
        .content("ignored")
        .handler_fn(|_req, resp| resp.send_found_200_plain_text(TEST_CONTENT))
        .start(&servers));
    assert_eq!(TEST_CONTENT, get_text(&url));
}

struct MethodHandler;

impl ServerHandler for MethodHandler {
    fn start_request(&self, req: ServerRequest, resp: ServerResponse) -> httpstub::Result<()> {
        let body = format!("{} {}", req.method, req.path());
        resp.send(201, Headers::new().with("X-Method", req.method.clone()), body)
    }
}

#[test]
fn custom_handler() {
    init_logger();

    let servers = StubServers::new();
    let url = t!(Stub::new().handler(MethodHandler).start(&servers));
    let response = t!(http_client().put(format!("{}/sub?x=y", url)).send());
    assert_eq!(201, response.status().as_u16());
    assert_eq!(
        Some("PUT"),
        response.headers().get("x-method").and_then(|v| v.to_str().ok())
    );
    assert_eq!("PUT /0/sub", t!(response.text()));
}

#[test]
fn identical_stubs_get_distinct_paths() {
    init_logger();

    let servers = StubServers::new();
    let a = t!(Stub::new().content(TEST_CONTENT).start(&servers));
    let b = t!(Stub::new().content(TEST_CONTENT).start(&servers));
    assert_ne!(a, b);
    assert_eq!(TEST_CONTENT, get_text(&a));
    assert_eq!(TEST_CONTENT, get_text(&b));
}

#[test]
fn unknown_context_is_404() {
    init_logger();

    let servers = StubServers::new();
    let url = t!(Stub::new().content(TEST_CONTENT).start(&servers));
    assert!(url.ends_with("/0"));

    let response = get_response(&format!("{}0", url));
    assert_eq!(404, response.status().as_u16());

    let origin = servers.origin(HttpScheme::Http).unwrap();
    assert_eq!(404, get_response(&format!("{}/", origin)).status().as_u16());
}
