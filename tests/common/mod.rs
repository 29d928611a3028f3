//! Minimal stdio LSP client for driving the server binary in tests
#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::time::{Duration, Instant};

use serde_json::Value;

pub const SERVER_TIMEOUT: Duration = Duration::from_secs(5);

pub struct LspClient {
    child: Child,
    reader: BufReader<ChildStdout>,
}

impl LspClient {
    /// Spawn the server with an isolated working and config directory
    pub fn spawn(workdir: &Path, extra_env: &[(&str, &str)]) -> Self {
        let mut command = Command::new(env!("CARGO_BIN_EXE_aam-ls"));
        command
            .current_dir(workdir)
            .env("XDG_CONFIG_HOME", workdir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        for (key, value) in extra_env {
            command.env(key, value);
        }

        let mut child = command.spawn().expect("Failed to spawn language server");
        let stdout = child
            .stdout
            .take()
            .expect("Child stdout should be available");

        Self {
            child,
            reader: BufReader::new(stdout),
        }
    }

    pub fn send(&mut self, message: &Value) {
        let body = message.to_string();
        let request = format!("Content-Length: {}\r\n\r\n{}", body.len(), body);

        let stdin = self
            .child
            .stdin
            .as_mut()
            .expect("Child stdin should be available");
        stdin
            .write_all(request.as_bytes())
            .expect("Failed to write request");
        stdin.flush().expect("Failed to flush stdin");
    }

    pub fn request(&mut self, id: i64, method: &str, params: Value) {
        self.send(&serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        }));
    }

    pub fn notify(&mut self, method: &str, params: Value) {
        self.send(&serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
        }));
    }

    /// Read one message from the server
    pub fn read_message(&mut self) -> Value {
        let content_length = self.read_content_length_header();
        let mut body_bytes = vec![0u8; content_length];
        self.reader
            .read_exact(&mut body_bytes)
            .expect("Failed to read response body");

        let body = String::from_utf8(body_bytes).expect("Response body should be valid UTF-8");
        serde_json::from_str(&body)
            .unwrap_or_else(|e| panic!("Invalid JSON response: {}\nBody: {}", e, body))
    }

    /// Skip messages until the response to request `id`
    pub fn read_response(&mut self, id: i64) -> Value {
        let start_time = Instant::now();
        loop {
            assert!(
                start_time.elapsed() < SERVER_TIMEOUT,
                "Timeout waiting for response {}",
                id
            );
            let message = self.read_message();
            if message.get("id").and_then(|v| v.as_i64()) == Some(id)
                && message.get("method").is_none()
            {
                return message;
            }
        }
    }

    /// Skip messages until a notification with the given method
    pub fn read_notification(&mut self, method: &str) -> Value {
        let start_time = Instant::now();
        loop {
            assert!(
                start_time.elapsed() < SERVER_TIMEOUT,
                "Timeout waiting for {}",
                method
            );
            let message = self.read_message();
            if message.get("method").and_then(|v| v.as_str()) == Some(method)
                && message.get("id").is_none()
            {
                return message;
            }
        }
    }

    fn read_content_length_header(&mut self) -> usize {
        let mut content_length = None;

        loop {
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => panic!("Unexpected EOF while reading headers"),
                Ok(_) => {
                    if line.trim().is_empty() {
                        // End of headers - we've consumed the empty line
                        if content_length.is_some() {
                            break;
                        }
                        continue;
                    }

                    if let Some(length_str) = line.strip_prefix("Content-Length:") {
                        content_length = Some(
                            length_str
                                .trim()
                                .parse::<usize>()
                                .expect("Invalid Content-Length header"),
                        );
                    }
                }
                Err(e) => panic!("Error reading headers: {}", e),
            }
        }

        content_length.expect("Missing Content-Length header")
    }

    /// Orderly shutdown: `shutdown` request, `exit` notification, then reap the process
    pub fn shutdown(mut self, id: i64) {
        self.send(&serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "shutdown",
        }));
        let response = self.read_response(id);
        assert!(response.get("error").is_none(), "shutdown failed: {}", response);

        self.notify("exit", Value::Null);
        drop(self.child.stdin.take());
        self.wait_or_kill();
    }

    /// Close stdin and give the server a moment to exit
    pub fn close(mut self) {
        drop(self.child.stdin.take());
        self.wait_or_kill();
    }

    fn wait_or_kill(&mut self) {
        let start_time = Instant::now();
        while start_time.elapsed() < SERVER_TIMEOUT {
            match self.child.try_wait() {
                Ok(Some(_)) => return,
                Ok(None) => std::thread::sleep(Duration::from_millis(50)),
                Err(e) => panic!("Error checking server status: {}", e),
            }
        }

        eprintln!("Server didn't exit gracefully, forcing termination");
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub fn initialize_params() -> Value {
    serde_json::json!({
        "processId": null,
        "rootUri": null,
        "capabilities": {
            "textDocument": {
                "codeAction": { "dynamicRegistration": false },
                "publishDiagnostics": { "relatedInformation": false }
            }
        },
        "clientInfo": { "name": "test-client", "version": "1.0" }
    })
}
