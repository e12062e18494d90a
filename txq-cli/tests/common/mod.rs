use assert_cmd::Command;
use wiremock::MockServer;

/// A mock exchange plus a preconfigured `txq` invocation pointing at it.
pub struct TestEnv {
    pub server: MockServer,
}

impl TestEnv {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn txq(&self) -> Command {
        let mut cmd = Command::cargo_bin("txq").unwrap();
        cmd.env("TX_ACCESS_TOKEN", "test-token");
        cmd.arg("--base-url").arg(self.server.uri());
        cmd
    }

    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}
