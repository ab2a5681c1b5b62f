//! Background manifest watcher
//!
//! Polls the modification time of the manifest files and asks the service
//! for a debounced reload when it changes. A reload skipped by the cooldown
//! is retried on the next tick; a failed reload is not retried until the
//! files change again.

use crate::manifests::FileManifestSource;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use switchyard_application::{ReloadOutcome, Switchyard};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub struct ManifestWatcher {
    files: FileManifestSource,
    interval: Duration,
}

impl ManifestWatcher {
    pub fn new(files: FileManifestSource, interval: Duration) -> Self {
        Self { files, interval }
    }

    /// Record the current modification time, then poll until `token` is cancelled.
    pub async fn spawn(self, switchyard: Arc<Switchyard>, token: CancellationToken) -> JoinHandle<()> {
        let baseline = self.files.last_modified().await;
        tokio::spawn(async move { self.run(baseline, switchyard, token).await })
    }

    async fn run(
        self,
        baseline: Option<SystemTime>,
        switchyard: Arc<Switchyard>,
        token: CancellationToken,
    ) {
        let mut last_seen = baseline;
        info!(
            source = %switchyard.source().describe(),
            interval_ms = self.interval.as_millis() as u64,
            "Manifest watcher started"
        );

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }

            let current = self.files.last_modified().await;
            if !changed(last_seen, current) {
                continue;
            }
            debug!("Manifest files changed");

            match switchyard.reload_debounced().await {
                Ok(ReloadOutcome::Skipped) => continue,
                Ok(ReloadOutcome::Reloaded { agents, generation }) => {
                    info!(agents, generation, "Manifests reloaded after change");
                }
                Err(e) => warn!(error = %e, "Manifest change rejected"),
            }
            last_seen = current;
        }

        debug!("Manifest watcher stopped");
    }
}

fn changed(previous: Option<SystemTime>, current: Option<SystemTime>) -> bool {
    match (previous, current) {
        (_, None) => false,
        (None, Some(_)) => true,
        (Some(a), Some(b)) => a != b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::Path;
    use switchyard_application::{
        Decision, DecisionError, DecisionRequest, DecisionService, HandlerRegistry, ReloadParams,
    };

    struct Unreachable;

    #[async_trait]
    impl DecisionService for Unreachable {
        async fn decide(&self, _request: &DecisionRequest) -> Result<Decision, DecisionError> {
            Err(DecisionError::Other("not used".into()))
        }
    }

    const TOOLS: &str = r#"[{"id": "calculator", "parameters": {"expression": {"type": "string"}}}]"#;

    fn agents(names: &[&str]) -> String {
        let entries: Vec<String> = names
            .iter()
            .map(|n| format!(r#"{{"agent_name": "{}", "tools": ["calculator"]}}"#, n))
            .collect();
        format!("[{}]", entries.join(","))
    }

    fn touch(path: &Path, offset: Duration) {
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() + offset).unwrap();
    }

    #[test]
    fn test_changed() {
        let t = SystemTime::now();
        assert!(!changed(Some(t), Some(t)));
        assert!(changed(Some(t), Some(t + Duration::from_secs(1))));
        assert!(changed(None, Some(t)));
        assert!(!changed(Some(t), None));
    }

    #[tokio::test]
    async fn test_reloads_on_change_and_stops_on_cancel() {
        let dir = tempfile::tempdir().unwrap();
        let tools_path = dir.path().join("tools.json");
        let agents_path = dir.path().join("agents.json");
        std::fs::write(&tools_path, TOOLS).unwrap();
        std::fs::write(&agents_path, agents(&["Math Agent"])).unwrap();

        let files = FileManifestSource::new(&tools_path, &agents_path);
        let switchyard = Arc::new(
            Switchyard::builder(Arc::new(Unreachable), Arc::new(files.clone()))
                .with_registry(crate::handlers::default_registry(None))
                .with_reload_params(ReloadParams {
                    cooldown: Duration::ZERO,
                })
                .build(),
        );
        switchyard.reload().await.unwrap();

        let token = CancellationToken::new();
        let handle = ManifestWatcher::new(files, Duration::from_millis(20))
            .spawn(Arc::clone(&switchyard), token.clone())
            .await;

        std::fs::write(&agents_path, agents(&["Math Agent", "Time Agent"])).unwrap();
        touch(&agents_path, Duration::from_secs(10));

        let reloaded = tokio::time::timeout(Duration::from_secs(5), async {
            while switchyard.snapshot().generation() < 2 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        assert!(reloaded.is_ok());
        assert_eq!(switchyard.snapshot().agents().len(), 2);

        token.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
