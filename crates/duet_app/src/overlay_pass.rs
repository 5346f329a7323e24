//! egui front end of the control [`Overlay`].
//!
//! [`OverlayPass`] is both the egui driver and the render node that paints
//! it. The app feeds it window events, calls [`show`](OverlayPass::show) once
//! per `update` to turn the overlay model into widgets and collect the
//! resulting [`Command`]s, and adds it to the frame at the UI stage, where it
//! paints over the finished scene.

use duet_core::{AvatarKind, Clip, Command, Facing, Overlay, Stage};
use myth::renderer::graph::{ExecuteContext, PrepareContext, RenderNode};
use wgpu::{Device, TextureFormat};
use winit::event::{ElementState, WindowEvent};
use winit::window::Window;

/// What the overlay needs to know about the rest of the app this frame.
#[derive(Debug, Clone, Copy)]
pub struct OverlayFrame<'a> {
    pub stage: &'a Stage,
    pub loading: bool,
}

pub struct OverlayPass {
    ctx: egui::Context,
    bridge: egui_winit::State,
    painter: egui_wgpu::Renderer,

    // output of the last `show`, uploaded in `prepare` and drawn in `run`
    primitives: Vec<egui::ClippedPrimitive>,
    textures: egui::TexturesDelta,
    screen: egui_wgpu::ScreenDescriptor,
}

impl OverlayPass {
    pub fn new(device: &Device, output_format: TextureFormat, window: &Window) -> Self {
        let ctx = egui::Context::default();
        let scale = window.scale_factor() as f32;
        let bridge =
            egui_winit::State::new(ctx.clone(), ctx.viewport_id(), window, Some(scale), None, None);
        let painter =
            egui_wgpu::Renderer::new(device, output_format, egui_wgpu::RendererOptions::default());

        let size = window.inner_size();
        Self {
            ctx,
            bridge,
            painter,
            primitives: Vec::new(),
            textures: egui::TexturesDelta::default(),
            screen: egui_wgpu::ScreenDescriptor {
                size_in_pixels: [size.width, size.height],
                pixels_per_point: scale,
            },
        }
    }

    /// Feeds a window event to egui and reports whether the overlay took it.
    pub fn handle_input(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let consumed = self.bridge.on_window_event(window, event).consumed;
        // a release has to reach the engine or a camera drag never ends
        let released = matches!(
            event,
            WindowEvent::MouseInput {
                state: ElementState::Released,
                ..
            }
        );
        consumed && !released
    }

    pub fn resize(&mut self, width: u32, height: u32, scale_factor: f32) {
        self.screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: scale_factor,
        };
    }

    /// `true` while a text field has focus.
    #[must_use]
    pub fn wants_keyboard_input(&self) -> bool {
        self.ctx.egui_wants_keyboard_input()
    }

    /// Runs one egui pass over `overlay` and returns the emitted commands.
    pub fn show(
        &mut self,
        window: &Window,
        overlay: &mut Overlay,
        frame: OverlayFrame<'_>,
    ) -> Vec<Command> {
        self.ctx.begin_pass(self.bridge.take_egui_input(window));

        let ctx = self.ctx.clone();
        let commands = if frame.loading {
            loading_screen(&ctx);
            Vec::new()
        } else {
            controls(&ctx, overlay, frame.stage)
        };
        alert(&ctx, overlay);

        let output = self.ctx.end_pass();
        self.bridge.handle_platform_output(window, output.platform_output);
        self.textures.append(output.textures_delta);
        self.primitives = self.ctx.tessellate(output.shapes, output.pixels_per_point);

        commands
    }
}

// ============================================================================
// Widgets
// ============================================================================

fn loading_screen(ctx: &egui::Context) {
    egui::Area::new(egui::Id::new("loading"))
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.spinner();
                ui.label(egui::RichText::new("Loading Scene...").size(18.0));
            });
        });
}

fn alert(ctx: &egui::Context, overlay: &mut Overlay) {
    let Some(message) = overlay.alert().map(str::to_owned) else {
        return;
    };
    let mut dismissed = false;
    egui::Window::new("Alert")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 24.0))
        .show(ctx, |ui| {
            ui.label(message);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });
    if dismissed {
        overlay.dismiss_alert();
    }
}

fn controls(ctx: &egui::Context, overlay: &mut Overlay, stage: &Stage) -> Vec<Command> {
    let mut commands = Vec::new();

    egui::Area::new(egui::Id::new("main-menu"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
        .show(ctx, |ui| {
            if overlay.is_menu_open() {
                for kind in AvatarKind::ALL {
                    if ui.button(kind.title()).clicked() {
                        overlay.open_panel(kind);
                    }
                }
                ui.add_space(8.0);
            }
            let icon = if overlay.is_menu_open() { "✖" } else { "☰" };
            if ui
                .add(egui::Button::new(egui::RichText::new(icon).size(22.0)).corner_radius(24.0))
                .clicked()
            {
                overlay.toggle_menu();
            }
        });

    let Some(kind) = overlay.active() else {
        return commands;
    };

    let mut close = false;
    let response = egui::Modal::new(egui::Id::new("avatar-panel")).show(ctx, |ui| {
        ui.set_width(260.0);
        close = panel_header(ui, kind).clicked();
        ui.separator();

        ui.label(egui::RichText::new("Movement").strong());
        dpad(ui, overlay, &mut commands);
        ui.add_space(8.0);

        ui.label(egui::RichText::new("Animation").strong());
        let current = stage.avatar(kind).clip;
        ui.horizontal(|ui| {
            for clip in Clip::ALL {
                if ui.selectable_label(current == clip, clip.label()).clicked() {
                    commands.extend(overlay.choose_clip(clip));
                }
            }
        });
        ui.add_space(8.0);

        ui.label(egui::RichText::new("Load Model").strong());
        ui.horizontal(|ui| {
            let field = ui.add(
                egui::TextEdit::singleline(&mut overlay.url_draft)
                    .hint_text("https://…/model.glb")
                    .desired_width(180.0),
            );
            let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Load").clicked() || submitted {
                // a refused URL raises the overlay alert
                if let Ok(command) = overlay.submit_model() {
                    commands.extend(command);
                }
            }
        });
        if let Some(url) = overlay.loaded_url(kind) {
            ui.weak(format!("Current: {url}"));
        }
    });

    if close || response.should_close() {
        overlay.close_panel();
    }

    commands
}

/// Avatar title with the panel's close button; returns the button.
fn panel_header(ui: &mut egui::Ui, kind: AvatarKind) -> egui::Response {
    ui.horizontal(|ui| {
        ui.heading(kind.title());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.button("✖").on_hover_text("Close")
        })
        .inner
    })
    .inner
}

/// D-pad layout; `None` facing is the centre reset button.
const DPAD: [[Option<(&str, Option<Facing>)>; 3]; 3] = [
    [None, Some(("⬆", Some(Facing::Up))), None],
    [
        Some(("⬅", Some(Facing::Left))),
        Some(("⟲", None)),
        Some(("➡", Some(Facing::Right))),
    ],
    [None, Some(("⬇", Some(Facing::Down))), None],
];

fn dpad(ui: &mut egui::Ui, overlay: &Overlay, commands: &mut Vec<Command>) {
    let size = egui::vec2(36.0, 36.0);

    egui::Grid::new("dpad").spacing([4.0, 4.0]).show(ui, |ui| {
        for row in DPAD {
            for cell in row {
                let Some((label, facing)) = cell else {
                    ui.label("");
                    continue;
                };
                if ui.add_sized(size, egui::Button::new(label)).clicked() {
                    commands.extend(match facing {
                        Some(facing) => overlay.press_direction(facing),
                        None => overlay.press_reset(),
                    });
                }
            }
            ui.end_row();
        }
    });
}

// ============================================================================
// Render graph
// ============================================================================

impl RenderNode for OverlayPass {
    fn name(&self) -> &str {
        "Stage Overlay"
    }

    fn prepare(&mut self, ctx: &mut PrepareContext) {
        let device = &ctx.wgpu_ctx.device;
        let queue = &ctx.wgpu_ctx.queue;

        for (id, delta) in self.textures.set.drain(..) {
            self.painter.update_texture(device, queue, id, &delta);
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Stage Overlay Upload"),
        });
        let callbacks =
            self.painter
                .update_buffers(device, queue, &mut encoder, &self.primitives, &self.screen);
        queue.submit(std::iter::once(encoder.finish()).chain(callbacks));

        for id in self.textures.free.drain(..) {
            self.painter.free_texture(&id);
        }
    }

    fn run(&self, ctx: &ExecuteContext, encoder: &mut wgpu::CommandEncoder) {
        // draw over the resolved scene, keep what is there
        let target = wgpu::RenderPassColorAttachment {
            view: ctx.surface_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        };
        let mut pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Stage Overlay"),
                color_attachments: &[Some(target)],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            })
            .forget_lifetime();

        self.painter.render(&mut pass, &self.primitives, &self.screen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Runs one headless egui pass with the header in a fixed area.
    fn header_pass(ctx: &egui::Context, events: Vec<egui::Event>) -> egui::Response {
        ctx.begin_pass(egui::RawInput {
            events,
            ..Default::default()
        });
        let header = egui::Area::new(egui::Id::new("header"))
            .fixed_pos(egui::pos2(10.0, 10.0))
            .show(ctx, |ui| {
                ui.set_width(260.0);
                panel_header(ui, AvatarKind::Female)
            })
            .inner;
        let _ = ctx.end_pass();
        header
    }

    fn button(pos: egui::Pos2, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::NONE,
        }
    }

    #[test]
    fn header_close_button_clicks() {
        let ctx = egui::Context::default();
        let close = header_pass(&ctx, Vec::new());
        assert!(!close.clicked());

        let at = close.rect.center();
        let pressed = header_pass(&ctx, vec![egui::Event::PointerMoved(at), button(at, true)]);
        assert!(!pressed.clicked());
        let released = header_pass(&ctx, vec![button(at, false)]);
        assert!(released.clicked());
    }

    #[test]
    fn header_ignores_clicks_elsewhere() {
        let ctx = egui::Context::default();
        let close = header_pass(&ctx, Vec::new());

        let at = close.rect.left_center() - egui::vec2(100.0, 0.0);
        header_pass(&ctx, vec![egui::Event::PointerMoved(at), button(at, true)]);
        assert!(!header_pass(&ctx, vec![button(at, false)]).clicked());
    }
}
