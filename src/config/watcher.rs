//! Configuration file watcher for route hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::ServerConfig;
use crate::observability::metrics;
use crate::routing::{RouteTable, Router};

/// Watches the configuration file and emits every valid new version.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<ServerConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<ServerConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file. The returned watcher must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Config file change detected, reloading...");
                        match load_config(&path) {
                            Ok(new_config) => {
                                let _ = tx.send(new_config);
                            }
                            Err(e) => {
                                metrics::record_reload(false);
                                tracing::error!(
                                    error = %e,
                                    "Failed to reload config. Keeping current routes."
                                );
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

/// Rebuild the router from each received config and swap it in.
///
/// Only routes are reloaded; listener and dispatch settings need a restart.
pub async fn apply_route_updates(
    table: RouteTable,
    mut updates: mpsc::UnboundedReceiver<ServerConfig>,
) {
    while let Some(config) = updates.recv().await {
        let router = Router::from_routes(&config.routes);
        metrics::record_route_count(router.len());
        metrics::record_reload(true);
        table.replace(router);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_apply_route_updates() {
        let table = RouteTable::default();
        let (tx, rx) = mpsc::unbounded_channel();

        let mut config = ServerConfig::default();
        config.routes.push(crate::config::RouteConfig {
            pattern: "/reloaded/:id".into(),
            id: 11,
            flags: Default::default(),
        });
        tx.send(config).unwrap();
        drop(tx);

        apply_route_updates(table.clone(), rx).await;
        assert_eq!(table.load().get_endpoint_id("/reloaded/1"), 11);
    }
}
