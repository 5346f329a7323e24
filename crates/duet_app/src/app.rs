//! The stage application handler.
//!
//! Frame order in [`StageApp::update`]:
//!
//! 1. drain finished loads into the rigs
//! 2. run the overlay UI, collecting commands
//! 3. apply queued commands to the [`Stage`] and tick its motion gates
//! 4. request changed models, then sync each rig from its avatar state
//! 5. move the orbit camera from the engine's mouse state

use std::sync::OnceLock;

use duet_core::{AvatarKind, Command, Overlay, Result, Stage, StageConfig, StageError};
use myth::prelude::*;
use myth::renderer::graph::{FrameComposer, RenderStage};
use myth::utils::FpsCounter;
use winit::event::WindowEvent;

use crate::keyboard::{KeyAction, KeyboardShortcuts};
use crate::loader::{AssetLoader, LoadEvent};
use crate::overlay_pass::{OverlayFrame, OverlayPass};
use crate::rig::AvatarRig;
use crate::scene;

static CONFIG: OnceLock<StageConfig> = OnceLock::new();

/// Opens the stage window and blocks until it closes.
///
/// Must be called from within a tokio runtime context; models are loaded on
/// that runtime.
pub fn run(config: StageConfig) -> Result<()> {
    let [r, g, b, a] = config.window.background;
    let settings = RendererSettings {
        path: RenderPath::BasicForward { msaa_samples: 4 },
        vsync: config.window.vsync,
        clear_color: wgpu::Color { r, g, b, a },
        ..Default::default()
    };
    let title = config.window.title.clone();

    CONFIG
        .set(config)
        .map_err(|_| StageError::Engine("the stage is already running".to_string()))?;

    App::new()
        .with_title(title)
        .with_settings(settings)
        .run::<StageApp>()
        .map_err(|e| StageError::Engine(e.to_string()))
}

pub struct StageApp {
    title: String,
    stage: Stage,
    overlay: Overlay,
    pending: Vec<Command>,

    rigs: [AvatarRig; 2],
    loader: Option<AssetLoader>,

    overlay_pass: Option<OverlayPass>,
    controls: OrbitControls,
    keyboard: KeyboardShortcuts,
    fps_counter: FpsCounter,
}

impl AppHandler for StageApp {
    fn init(engine: &mut Engine, window: &dyn Window) -> Self {
        let config = CONFIG.get().cloned().unwrap_or_default();

        let overlay_pass = match (engine.renderer.wgpu_ctx(), winit_window(window)) {
            (Some(ctx), Some(win)) => Some(OverlayPass::new(&ctx.device, ctx.config.format, win)),
            _ => {
                log::warn!("No winit window or GPU context; running without the control overlay");
                None
            }
        };

        let size = window.inner_size();
        let aspect = if size.y > 0.0 { size.x / size.y } else { 16.0 / 9.0 };

        let stage = Stage::new(&config);
        let scene = scene::compose(engine, &config, aspect);
        let rigs = AvatarKind::ALL.map(|kind| AvatarRig::new(scene, stage.avatar(kind), kind, &config));

        let loader = match AssetLoader::new(engine.assets.clone()) {
            Ok(loader) => {
                for kind in AvatarKind::ALL {
                    loader.request_clips(&config.avatars.clip_library(kind));
                }
                Some(loader)
            }
            Err(e) => {
                log::error!("{e}");
                None
            }
        };

        Self {
            title: config.window.title.clone(),
            stage,
            overlay: Overlay::new(),
            pending: Vec::new(),
            rigs,
            loader,
            overlay_pass,
            controls: scene::orbit_controls(&config.camera),
            keyboard: KeyboardShortcuts::new(),
            fps_counter: FpsCounter::new(),
        }
    }

    fn on_event(&mut self, _engine: &mut Engine, window: &dyn Window, event: &WindowEvent) -> bool {
        let win = winit_window(window);

        if let (WindowEvent::Resized(size), Some(pass)) = (event, self.overlay_pass.as_mut()) {
            pass.resize(size.width, size.height, window.scale_factor());
        }

        // consumed events never reach the engine's input, so the camera stays put
        if let (Some(pass), Some(win)) = (self.overlay_pass.as_mut(), win) {
            if pass.handle_input(win, event) {
                return true;
            }
        }

        let typing = self
            .overlay_pass
            .as_ref()
            .is_some_and(OverlayPass::wants_keyboard_input);
        match self.keyboard.handle(event) {
            Some(_) if typing => {}
            Some(KeyAction::Stage(command)) => self.pending.push(command),
            Some(KeyAction::ClosePanel) => self.overlay.close_panel(),
            None => {}
        }

        false
    }

    fn update(&mut self, engine: &mut Engine, window: &dyn Window, frame: &FrameState) {
        let Some(scene) = engine.scene_manager.active_scene_mut() else {
            return;
        };

        self.receive_loads(scene);

        let loading = !self.rigs.iter().all(AvatarRig::is_ready);
        if let (Some(pass), Some(win)) = (self.overlay_pass.as_mut(), winit_window(window)) {
            let overlay_frame = OverlayFrame {
                stage: &self.stage,
                loading,
            };
            let commands = pass.show(win, &mut self.overlay, overlay_frame);
            self.pending.extend(commands);
        }

        for command in std::mem::take(&mut self.pending) {
            if let Err(err) = self.stage.apply(&command) {
                log::error!("{err}");
                self.overlay.record_failure(command.avatar(), &err);
            }
        }
        self.stage.tick(frame.dt);

        for rig in &mut self.rigs {
            let kind = rig.kind();
            let state = self.stage.avatar(kind);
            if let Some(revision) = rig.wanted_revision(state) {
                if let Some(loader) = &self.loader {
                    loader.request_model(kind, revision, &self.stage.model_source(kind));
                }
                rig.mark_requested(revision);
            }
            rig.sync(scene, state, frame.dt);
        }

        if let Some((transform, camera)) = scene.query_main_camera_bundle() {
            self.controls
                .update(transform, &engine.input, camera.fov.to_degrees(), frame.dt);
        }

        if let Some(fps) = self.fps_counter.update() {
            window.set_title(&format!("{} | FPS: {fps:.0}", self.title));
        }
    }

    fn compose_frame<'a>(&'a mut self, composer: FrameComposer<'a>) {
        match self.overlay_pass.as_mut() {
            Some(pass) => composer.add_node(RenderStage::UI, pass).render(),
            None => composer.render(),
        }
    }
}

impl StageApp {
    fn receive_loads(&mut self, scene: &mut Scene) {
        let Some(loader) = &self.loader else {
            return;
        };

        for event in loader.drain() {
            match event {
                LoadEvent::Model {
                    kind,
                    revision,
                    result,
                } => {
                    let rig = &mut self.rigs[kind.index()];
                    match result {
                        Ok(prefab) => rig.attach_model(scene, revision, &prefab),
                        Err(err) => {
                            rig.model_failed(revision, &err);
                            // the bundled model has no overlay entry to roll back
                            if revision > 0 {
                                self.overlay.record_failure(kind, &err);
                            }
                        }
                    }
                }
                LoadEvent::Clip { kind, clip, result } => {
                    let rig = &mut self.rigs[kind.index()];
                    match result {
                        Ok(prefab) => rig.attach_clip(scene, clip, &prefab),
                        Err(err) => rig.clip_failed(clip, &err),
                    }
                }
            }
        }
    }
}

fn winit_window(window: &dyn Window) -> Option<&winit::window::Window> {
    window.as_any().downcast_ref::<winit::window::Window>()
}
