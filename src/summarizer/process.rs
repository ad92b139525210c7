//! Lifecycle of a local `ollama serve` process

use std::process::Stdio;
use std::time::Duration;

use reqwest::Client;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncRead;
use tokio::io::BufReader;
use tokio::process::Child;
use tokio::process::Command;
use tokio::time::sleep;
use tokio::time::timeout;
use url::Url;

use crate::config::OllamaConfig;

/// How long to wait for a started server to answer
const STARTUP_ATTEMPTS: u32 = 10;
const STARTUP_INTERVAL: Duration = Duration::from_millis(500);

/// How long a stopping server may take before giving up on it
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// An Ollama server started by us, if any
///
/// Servers that were already running are never stopped
pub struct OllamaProcess {
    child: Option<Child>,
}

impl OllamaProcess {
    /// Start `ollama serve` when enabled and no server is answering yet
    ///
    /// Failing to start is not fatal, summaries will just fail until a server is available
    pub async fn start(config: &OllamaConfig) -> Self {
        if !config.manage_process {
            return Self { child: None };
        }

        if is_running(&config.base_url).await {
            tracing::info!("Ollama already running, skipping startup");
            return Self { child: None };
        }

        tracing::info!("Starting Ollama server");

        let child = Command::new(&config.binary)
            .arg("serve")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let mut child = match child {
            Ok(child) => child,
            Err(err) => {
                tracing::warn!("Failed to start Ollama: {err}");
                return Self { child: None };
            }
        };

        // a full pipe blocks the server on its next log line
        forward_output(child.stdout.take(), "stdout");
        forward_output(child.stderr.take(), "stderr");

        for _ in 0..STARTUP_ATTEMPTS {
            sleep(STARTUP_INTERVAL).await;

            if is_running(&config.base_url).await {
                tracing::info!("Ollama started");
                return Self { child: Some(child) };
            }
        }

        tracing::warn!("Ollama started but is not answering on {}", config.base_url);

        Self { child: Some(child) }
    }

    /// Did we start the server?
    pub fn is_managed(&self) -> bool {
        self.child.is_some()
    }

    /// Stop the server if we started it
    pub async fn stop(mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        tracing::info!("Stopping Ollama");

        if let Err(err) = child.start_kill() {
            tracing::warn!("Could not stop Ollama: {err}");
            return;
        }

        match timeout(SHUTDOWN_TIMEOUT, child.wait()).await {
            Ok(Ok(status)) => tracing::info!("Ollama stopped ({status})"),
            Ok(Err(err)) => tracing::warn!("Could not wait for Ollama to stop: {err}"),
            Err(_) => tracing::warn!("Ollama did not stop within {SHUTDOWN_TIMEOUT:?}"),
        }
    }
}

/// Read the output of the server until it closes, every line ends up in the debug log
fn forward_output<R>(output: Option<R>, stream: &'static str)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let Some(output) = output else {
        return;
    };

    tokio::spawn(async move {
        let mut reader = BufReader::new(output);
        let mut line = Vec::new();

        loop {
            line.clear();

            match reader.read_until(b'\n', &mut line).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&line);
                    tracing::debug!("ollama {stream}: {}", line.trim_end());
                }
                Err(err) => {
                    tracing::warn!("Could not read Ollama {stream}: {err}");
                    break;
                }
            }
        }
    });
}

/// Is an Ollama server answering on the given base URL?
async fn is_running(base_url: &Url) -> bool {
    let Ok(version_url) = base_url.join("api/version") else {
        return false;
    };

    let Ok(client) = Client::builder().timeout(Duration::from_secs(1)).build() else {
        return false;
    };

    client
        .get(version_url)
        .send()
        .await
        .is_ok_and(|response| response.status().is_success())
}
