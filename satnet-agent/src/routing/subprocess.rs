use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;

use satnet_store::Store;

use super::RoutingModule;

/// Framed JSON request sent on the module's stdin, one line per call.
#[derive(Serialize)]
struct Request<'a> {
    op: &'a str,
    node: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    iface: Option<&'a str>,
}

#[derive(Deserialize)]
struct Response {
    message: String,
    ok: bool,
}

/// Proxies the routing-module hooks to an external executable speaking a
/// one-request-per-line JSON protocol over stdin/stdout (§9 REDESIGN FLAGS
/// "dynamic routing-module loading" — plug-ins Rust cannot load in-process
/// are represented as a subprocess behind the same trait).
pub struct SubprocessModule {
    program: String,
}

impl SubprocessModule {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn call(&self, op: &str, node: &str, iface: Option<&str>) -> (String, bool) {
        let request = Request { op, node, iface };
        let line = match serde_json::to_string(&request) {
            Ok(line) => line,
            Err(e) => return (format!("subprocess request encode failed: {e}"), false),
        };

        let mut child = match Command::new(&self.program)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => return (format!("subprocess {} spawn failed: {e}", self.program), false),
        };

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(format!("{line}\n").as_bytes()).await {
                return (format!("subprocess {} write failed: {e}", self.program), false);
            }
        }

        let stdout = match child.stdout.take() {
            Some(stdout) => stdout,
            None => return (format!("subprocess {} has no stdout", self.program), false),
        };
        let mut reader = BufReader::new(stdout);
        let mut response_line = String::new();
        if let Err(e) = reader.read_line(&mut response_line).await {
            return (format!("subprocess {} read failed: {e}", self.program), false);
        }

        let _ = child.wait().await;

        match serde_json::from_str::<Response>(response_line.trim()) {
            Ok(response) => (response.message, response.ok),
            Err(e) => (
                format!("subprocess {} returned malformed response: {e}", self.program),
                false,
            ),
        }
    }
}

#[async_trait::async_trait]
impl RoutingModule for SubprocessModule {
    async fn init(&self, _store: &dyn Store, node: &str) -> (String, bool) {
        self.call("init", node, None).await
    }

    async fn link_add(&self, _store: &dyn Store, node: &str, iface: &str) -> (String, bool) {
        self.call("link-add", node, Some(iface)).await
    }

    async fn link_del(&self, _store: &dyn Store, node: &str, iface: &str) -> (String, bool) {
        self.call("link-del", node, Some(iface)).await
    }
}
