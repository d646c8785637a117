#![allow(dead_code)]

use std::{
    collections::VecDeque,
    io,
    path::Path,
    sync::{Arc, Mutex},
};

use akv_keygen_client::{CommandOutput, CommandRunner};
use async_trait::async_trait;

/// Replays canned outputs in order and records every argument list it is
/// given, along with the contents of any `--file` argument at call time.
#[derive(Default)]
pub struct ScriptedRunner {
    outputs: Mutex<VecDeque<io::Result<CommandOutput>>>,
    calls: Mutex<Vec<Vec<String>>>,
    file_contents: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new<I>(outputs: I) -> Arc<Self>
    where
        I: IntoIterator<Item = CommandOutput>,
    {
        Arc::new(Self {
            outputs: Mutex::new(outputs.into_iter().map(Ok).collect()),
            ..Self::default()
        })
    }

    pub fn failing(kind: io::ErrorKind) -> Arc<Self> {
        Arc::new(Self {
            outputs: Mutex::new(VecDeque::from([Err(io::Error::from(kind))])),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> Vec<Vec<String>> { self.calls.lock().unwrap().clone() }

    pub fn call_count(&self) -> usize { self.calls.lock().unwrap().len() }

    pub fn file_contents(&self) -> Vec<String> { self.file_contents.lock().unwrap().clone() }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    fn program(&self) -> &Path { Path::new("az") }

    async fn run(&self, args: &[String]) -> io::Result<CommandOutput> {
        if let Some(path) = args.iter().skip_while(|arg| *arg != "--file").nth(1) {
            self.file_contents.lock().unwrap().push(std::fs::read_to_string(path)?);
        }
        self.calls.lock().unwrap().push(args.to_vec());
        self.outputs
            .lock()
            .unwrap()
            .pop_front()
            .expect("runner was called more often than scripted")
    }
}

pub const SERVICE_UNAVAILABLE: &str = "ERROR: HTTPSConnectionPool(host='management.azure.com', \
                                       port=443): Max retries exceeded with url: \
                                       /subscriptions?api-version=2022-12-01";

pub fn service_unavailable() -> CommandOutput { CommandOutput::failure(1, SERVICE_UNAVAILABLE) }
