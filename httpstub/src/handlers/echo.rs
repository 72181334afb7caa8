use crate::misc::latin1_to_string;
use crate::Headers;
use crate::ServerHandler;
use crate::ServerRequest;
use crate::ServerResponse;

/// Responds `200` with a text description of the request.
///
/// The body is the request line, then one `Name: v1; v2` line per header
/// name, then `REQUEST BODY:` and the request body. Body bytes are mapped
/// one to one to characters, so only ASCII bodies are echoed faithfully.
#[derive(Debug, Clone, Default)]
pub struct Echo;

impl Echo {
    /// Text sent back for the request.
    pub fn render(req: &ServerRequest) -> String {
        let mut echo = format!("{} {} {}\n", req.method, req.uri, req.protocol);
        for header in req.headers.iter() {
            let values: Vec<&str> = header.values.iter().map(|v| v.trim()).collect();
            echo.push_str(&format!("{}: {}\n", header.name, values.join("; ")));
        }
        echo.push_str("REQUEST BODY:\n");
        echo.push_str(&latin1_to_string(&req.body));
        echo
    }
}

impl ServerHandler for Echo {
    fn start_request(&self, req: ServerRequest, resp: ServerResponse) -> crate::Result<()> {
        let echo = Echo::render(&req);
        resp.send(200, Headers::new(), echo.into_bytes())
    }
}
