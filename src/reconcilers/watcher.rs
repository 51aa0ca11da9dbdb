// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace watcher - turns the watch stream into add/update callbacks and
//! re-delivers updates for every known namespace on a fixed resync period.

use crate::error::Result;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use k8s_openapi::api::core::v1::Namespace;
use kube::runtime::watcher::{watcher, Config as WatcherConfig, Error as WatcherError, Event};
use kube::runtime::WatchStreamExt;
use kube::{Api, Client, ResourceExt};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Callbacks for namespace events, invoked one at a time
#[async_trait]
pub trait NamespaceEventHandler: Send + Sync {
    async fn on_add(&self, ns: &Namespace) -> Result<()>;

    async fn on_update(&self, old: &Namespace, new: &Namespace) -> Result<()>;
}

pub struct NamespaceWatcher {
    handler: Arc<dyn NamespaceEventHandler>,
    resync_period: Duration,
    /// Last seen state of every namespace, keyed by name
    known: BTreeMap<String, Namespace>,
    /// Names seen since the last `Init`, while a relist is in progress
    relist: Option<BTreeSet<String>>,
}

impl NamespaceWatcher {
    pub fn new(handler: Arc<dyn NamespaceEventHandler>, resync_period: Duration) -> Self {
        Self {
            handler,
            resync_period,
            known: BTreeMap::new(),
            relist: None,
        }
    }

    /// Watch all namespaces until the stream ends. Events and resyncs are
    /// handled sequentially on this task.
    pub async fn run(self, client: Client) -> anyhow::Result<()> {
        let namespaces: Api<Namespace> = Api::all(client);
        let stream = watcher(namespaces, WatcherConfig::default()).default_backoff();

        self.drive(stream).await
    }

    /// Consume a namespace event stream, interleaving a resync of every known
    /// namespace each `resync_period`. Stream errors are logged and skipped.
    pub async fn drive<S>(mut self, stream: S) -> anyhow::Result<()>
    where
        S: Stream<Item = std::result::Result<Event<Namespace>, WatcherError>>,
    {
        let mut stream = std::pin::pin!(stream);

        let mut resync = interval_at(Instant::now() + self.resync_period, self.resync_period);
        resync.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Watching namespaces, resync every {}s",
            self.resync_period.as_secs()
        );

        loop {
            tokio::select! {
                event = stream.next() => match event {
                    Some(Ok(event)) => self.handle_event(event).await,
                    Some(Err(e)) => warn!("Namespace watch error: {}", e),
                    None => break,
                },
                _ = resync.tick() => self.resync().await,
            }
        }

        warn!("Namespace watch stream ended");
        Ok(())
    }

    pub async fn handle_event(&mut self, event: Event<Namespace>) {
        match event {
            Event::Init => {
                debug!("Namespace relist started");
                self.relist = Some(BTreeSet::new());
            }
            Event::InitApply(ns) => {
                if let Some(seen) = self.relist.as_mut() {
                    seen.insert(ns.name_any());
                }
                self.apply(ns).await;
            }
            Event::InitDone => {
                if let Some(seen) = self.relist.take() {
                    self.known.retain(|name, _| seen.contains(name));
                }
                debug!("Namespace relist done, {} known", self.known.len());
            }
            Event::Apply(ns) => self.apply(ns).await,
            Event::Delete(ns) => {
                debug!("Namespace {} deleted", ns.name_any());
                self.known.remove(&ns.name_any());
            }
        }
    }

    /// Deliver an update for every known namespace, in name order
    pub async fn resync(&self) {
        debug!("Resyncing {} namespaces", self.known.len());

        for (name, ns) in &self.known {
            if let Err(e) = self.handler.on_update(ns, ns).await {
                error!("Failed to reconcile namespace {}: {}", name, e);
            }
        }
    }

    async fn apply(&mut self, ns: Namespace) {
        let name = ns.name_any();

        let result = match self.known.get(&name) {
            Some(old) => self.handler.on_update(old, &ns).await,
            None => self.handler.on_add(&ns).await,
        };
        if let Err(e) = result {
            error!("Failed to reconcile namespace {}: {}", name, e);
        }

        self.known.insert(name, ns);
    }
}
