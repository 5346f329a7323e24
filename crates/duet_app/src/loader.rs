//! Background glTF loading.
//!
//! Requests are spawned on the ambient tokio runtime and results come back
//! over a `flume` channel that the app drains once per frame, so the render
//! loop never blocks on disk or network.

use duet_core::{AvatarKind, Clip, ClipLibrary, ModelSource, Result, StageError};
use myth::assets::SharedPrefab;
use myth::prelude::*;
use tokio::runtime::Handle;

/// A finished load.
pub enum LoadEvent {
    Model {
        kind: AvatarKind,
        /// Model revision the request was made for; stale results are dropped.
        revision: u32,
        result: Result<SharedPrefab>,
    },
    Clip {
        kind: AvatarKind,
        clip: Clip,
        result: Result<SharedPrefab>,
    },
}

pub struct AssetLoader {
    assets: AssetServer,
    runtime: Handle,
    tx: flume::Sender<LoadEvent>,
    rx: flume::Receiver<LoadEvent>,
}

impl AssetLoader {
    /// Fails when called outside a tokio runtime context.
    pub fn new(assets: AssetServer) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| StageError::Engine(format!("no async runtime for asset loading: {e}")))?;
        let (tx, rx) = flume::unbounded();
        Ok(Self {
            assets,
            runtime,
            tx,
            rx,
        })
    }

    pub fn request_model(&self, kind: AvatarKind, revision: u32, source: &ModelSource) {
        let uri = source.uri();
        log::info!("Loading {kind} model {uri} (revision {revision})");
        let assets = self.assets.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = load_prefab(uri, assets).await;
            let _ = tx.send(LoadEvent::Model {
                kind,
                revision,
                result,
            });
        });
    }

    /// Loads every clip file of `library`.
    pub fn request_clips(&self, library: &ClipLibrary) {
        let kind = library.kind();
        for (clip, path) in library.iter() {
            let uri = path.to_string_lossy().into_owned();
            log::debug!("Loading {kind} {clip} clip from {uri}");
            let assets = self.assets.clone();
            let tx = self.tx.clone();
            self.runtime.spawn(async move {
                let result = load_prefab(uri, assets).await;
                let _ = tx.send(LoadEvent::Clip { kind, clip, result });
            });
        }
    }

    /// Finished loads, without blocking.
    pub fn drain(&self) -> impl Iterator<Item = LoadEvent> + '_ {
        self.rx.try_iter()
    }
}

async fn load_prefab(uri: String, assets: AssetServer) -> Result<SharedPrefab> {
    GltfLoader::load_async(uri.clone(), assets)
        .await
        .map_err(|e| StageError::AssetLoad {
            uri,
            message: e.to_string(),
        })
}
