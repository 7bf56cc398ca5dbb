//! Hand-written mocks of the I/O boundary traits shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::sync::Mutex;

use pccctl::infrastructure::traits::{
    CommandRunner, FileSystem, HttpRequest, HttpResponse, HttpTransport, TransportFailure,
};

pub const API_DOCS: &str = r#"{
  "paths": {
    "/management/v1/regions": {
      "get": {
        "commandName": "list-regions",
        "parameters": [{"name": "group", "in": "query", "required": false}]
      },
      "post": {
        "commandName": "create-region",
        "parameters": [{"name": "body", "in": "body", "required": true}]
      }
    },
    "/management/v1/regions/{id}": {
      "get": {
        "commandName": "get-region",
        "parameters": [{"name": "id", "in": "path", "required": true}]
      },
      "delete": {
        "commandName": "delete-region",
        "parameters": [{"name": "id", "in": "path", "required": true}]
      }
    },
    "/management/v1/members": {
      "get": {"commandName": "list-members"}
    },
    "/management/v1/ping": {
      "get": {"commandName": "ping"}
    }
  }
}"#;

pub const REGIONS_RESPONSE: &str = r#"{
  "statusCode": "OK",
  "result": [
    {"name": "region1", "type": "PARTITION", "groups": "[groupA, groupB]", "entryCount": 5.0},
    {"name": "region2", "type": "REPLICATE", "groups": "[groupC]", "entryCount": 0},
    {"name": "region3", "type": "REPLICATE"}
  ]
}"#;

// ============================================================
// HttpTransport
// ============================================================

/// Replays queued responses and records every request.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, String>>>,
    pub requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpTransport for MockTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportFailure> {
        self.requests.lock().unwrap().push(request.clone());
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(message.into()),
            None => Err("no response queued".into()),
        }
    }
}

// ============================================================
// FileSystem
// ============================================================

/// In-memory files.
#[derive(Default)]
pub struct MockFileSystem {
    files: HashMap<PathBuf, String>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(PathBuf::from(path), content.to_string());
        self
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }
}

// ============================================================
// CommandRunner
// ============================================================

/// Returns canned output per joined argument line and records invocations.
#[derive(Default)]
pub struct MockCommandRunner {
    outputs: HashMap<String, (i32, String)>,
    pub calls: Mutex<Vec<String>>,
}

impl MockCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, args: &str, exit_code: i32, stdout: &str) -> Self {
        self.outputs
            .insert(args.to_string(), (exit_code, stdout.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for MockCommandRunner {
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output> {
        let line = args.join(" ");
        self.calls.lock().unwrap().push(format!("{cmd} {line}"));
        let (code, stdout) = self.outputs.get(&line).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{cmd}: not found"))
        })?;
        Ok(Output {
            status: ExitStatus::from_raw(code << 8),
            stdout: stdout.into_bytes(),
            stderr: Vec::new(),
        })
    }
}
