//! Viewer application: toggle state, input handling, per-frame update.

use std::collections::HashSet;

use orbis_engine::core::{App, AppControl, FrameCtx};
use orbis_engine::input::{Key, MouseButton};

use crate::mesh::SphereMesh;
use crate::render::{RenderSettings, SphereRenderer};
use crate::shape::{create_shapes, Shape};

/// Wall-clock to simulation-time factor for auto-rotation.
const TIME_SCALE: f32 = 0.4;

/// Editor background, the classic Monokai gray.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 39.0 / 255.0,
    g: 40.0 / 255.0,
    b: 34.0 / 255.0,
    a: 1.0,
};

pub struct ViewerApp {
    shapes: Vec<Shape>,
    renderer: SphereRenderer,

    rotating: bool,
    wireframe: bool,
    color_mode: u32,
    use_solid_color: bool,

    /// True once a drag has consumed its first (delta-discarding) frame.
    drag_armed: bool,
}

impl ViewerApp {
    pub fn new() -> Self {
        Self {
            shapes: create_shapes(),
            renderer: SphereRenderer::new(SphereMesh::unit()),
            rotating: true,
            wireframe: false,
            color_mode: 0,
            use_solid_color: false,
            drag_armed: false,
        }
    }

    pub fn print_help() {
        log::info!("key bindings:");
        log::info!("- press ESC or 'q' to terminate");
        log::info!("- press F1 or 'h' to see this help");
        log::info!("- press 'd' to change color mode");
        log::info!("- press 'w' to toggle wireframe");
        log::info!("- press 'r' to start/stop rotation");
        log::info!("- drag with the left mouse button (while rotation is stopped) to rotate");
    }

    /// Applies this frame's key presses to the toggle state.
    fn apply_keys(&mut self, pressed: &HashSet<Key>, wireframe_supported: bool) -> AppControl {
        if pressed.contains(&Key::Escape) || pressed.contains(&Key::Q) {
            return AppControl::Exit;
        }
        if pressed.contains(&Key::F1) || pressed.contains(&Key::H) {
            Self::print_help();
        }
        if pressed.contains(&Key::D) {
            self.color_mode = (self.color_mode + 1) % 3;
            log::info!("using color mode: {}", self.color_mode);
        }
        if pressed.contains(&Key::W) {
            if wireframe_supported {
                self.wireframe = !self.wireframe;
                log::info!(
                    "using {} mode",
                    if self.wireframe { "wireframe" } else { "solid" }
                );
            } else {
                log::warn!("wireframe unavailable: adapter lacks line polygon mode");
            }
        }
        if pressed.contains(&Key::R) {
            self.rotating = !self.rotating;
            log::info!("rotate {}", if self.rotating { "start" } else { "stop" });
        }

        AppControl::Continue
    }

    /// Advances or drags the shapes for one frame.
    ///
    /// Drag mode engages only while the left button is held and auto-rotation
    /// is stopped. The press frame discards any pointer delta accumulated
    /// before the button went down.
    fn step(&mut self, dt: f32, left_down: bool, pointer_delta: (f32, f32)) {
        if !left_down {
            self.drag_armed = false;
        }

        if self.rotating || !left_down {
            // Frozen shapes still rebuild their matrix from unchanged angles.
            let dt = if self.rotating { TIME_SCALE * dt } else { 0.0 };
            for shape in &mut self.shapes {
                shape.advance(dt);
            }
            return;
        }

        let (dx, dy) = if !self.drag_armed {
            self.drag_armed = true;
            (0.0, 0.0)
        } else {
            pointer_delta
        };

        for shape in &mut self.shapes {
            shape.drag(dx, dy);
        }
    }
}

impl Default for ViewerApp {
    fn default() -> Self {
        Self::new()
    }
}

impl App for ViewerApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let wireframe_supported = ctx
            .gpu
            .device()
            .features()
            .contains(wgpu::Features::POLYGON_MODE_LINE);

        if self.apply_keys(&ctx.input_frame.keys_pressed, wireframe_supported) == AppControl::Exit {
            return AppControl::Exit;
        }

        self.step(
            ctx.time.dt,
            ctx.input.button_down(MouseButton::Left),
            ctx.input_frame.pointer_delta,
        );

        let settings = RenderSettings {
            wireframe: self.wireframe,
            color_mode: self.color_mode,
            use_solid_color: self.use_solid_color,
        };

        let shapes = &self.shapes;
        let renderer = &mut self.renderer;

        ctx.render(CLEAR_COLOR, |rctx, target| {
            renderer.render(rctx, target, shapes, settings);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pressed(keys: &[Key]) -> HashSet<Key> {
        keys.iter().copied().collect()
    }

    #[test]
    fn color_mode_cycles_through_three() {
        let mut app = ViewerApp::new();
        for expected in [1, 2, 0, 1] {
            app.apply_keys(&pressed(&[Key::D]), true);
            assert_eq!(app.color_mode, expected);
        }
    }

    #[test]
    fn rotate_key_toggles_auto_rotation() {
        let mut app = ViewerApp::new();
        assert!(app.rotating);
        app.apply_keys(&pressed(&[Key::R]), true);
        assert!(!app.rotating);
        app.apply_keys(&pressed(&[Key::R]), true);
        assert!(app.rotating);
    }

    #[test]
    fn wireframe_stays_off_without_line_mode() {
        let mut app = ViewerApp::new();
        app.apply_keys(&pressed(&[Key::W]), false);
        assert!(!app.wireframe);
        app.apply_keys(&pressed(&[Key::W]), true);
        assert!(app.wireframe);
    }

    #[test]
    fn escape_and_q_request_exit() {
        let mut app = ViewerApp::new();
        assert_eq!(
            app.apply_keys(&pressed(&[Key::Escape]), true),
            AppControl::Exit
        );
        assert_eq!(app.apply_keys(&pressed(&[Key::Q]), true), AppControl::Exit);
        assert_eq!(app.apply_keys(&pressed(&[]), true), AppControl::Continue);
    }

    #[test]
    fn auto_rotation_scales_frame_time() {
        let mut app = ViewerApp::new();
        app.step(1.0, false, (0.0, 0.0));
        assert!((app.shapes[0].theta - TIME_SCALE).abs() < 1e-6);
        assert_eq!(app.shapes[0].phi, 0.0);
    }

    #[test]
    fn press_frame_discards_accumulated_delta() {
        let mut app = ViewerApp::new();
        app.rotating = false;

        // Button goes down with movement already accumulated this frame.
        app.step(0.016, true, (40.0, -25.0));
        assert_eq!(app.shapes[0].theta, 0.0);
        assert_eq!(app.shapes[0].phi, 0.0);

        // The next frame consumes the delta.
        app.step(0.016, true, (40.0, -25.0));
        assert!((app.shapes[0].theta - 0.4).abs() < 1e-6);
        assert!((app.shapes[0].phi + 0.25).abs() < 1e-6);
    }

    #[test]
    fn releasing_the_button_rearms_the_discard() {
        let mut app = ViewerApp::new();
        app.rotating = false;

        app.step(0.016, true, (0.0, 0.0));
        app.step(0.016, true, (10.0, 0.0));
        let theta = app.shapes[0].theta;

        // Release, then press again with stale movement in the frame.
        app.step(0.016, false, (99.0, 99.0));
        app.step(0.016, true, (99.0, 99.0));
        assert_eq!(app.shapes[0].theta, theta);
        assert_eq!(app.shapes[0].phi, 0.0);
    }

    #[test]
    fn drag_requires_rotation_stopped() {
        let mut app = ViewerApp::new();
        app.step(0.0, true, (10.0, 10.0));
        app.step(0.0, true, (10.0, 10.0));
        assert_eq!(app.shapes[0].theta, 0.0);
        assert_eq!(app.shapes[0].phi, 0.0);
    }
}
