//! Blocking HTTP client trusting any server certificate.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::redirect;

fn client_builder() -> reqwest::blocking::ClientBuilder {
    // stub certificate is self-signed and expired;
    // header names are sent title-cased so echo shows them as written
    Client::builder()
        .danger_accept_invalid_certs(true)
        .http1_title_case_headers()
        .no_proxy()
        .timeout(Duration::from_secs(10))
}

/// Client following redirects.
pub fn http_client() -> Client {
    t!(client_builder().build())
}

/// Client returning redirect responses as is.
pub fn http_client_no_redirect() -> Client {
    t!(client_builder().redirect(redirect::Policy::none()).build())
}

pub fn get_response(url: &str) -> Response {
    t!(http_client().get(url).send())
}

/// Body of a `200` response.
pub fn get_text(url: &str) -> String {
    let response = get_response(url);
    assert_eq!(200, response.status().as_u16(), "{}", url);
    t!(response.text())
}

/// Response headers as `(lowercase name, value)` pairs, in received order.
pub fn response_headers(response: &Response) -> Vec<(String, String)> {
    response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_owned(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}
