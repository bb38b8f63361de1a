//! Ripple Field entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_demo {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, PointerEvent};

    use ripple_field::renderer::{RenderState, request_adapter};
    use ripple_field::{RenderError, Settings, Viewport, WaveField};

    /// Demo instance holding all state
    struct Demo {
        field: WaveField,
        settings: Settings,
        viewport: Viewport,
        canvas: HtmlCanvasElement,
        render_state: Option<RenderState>,
    }

    impl Demo {
        /// Advance the waves and draw the frame
        fn frame(&mut self, time: f64) {
            let frame = self.field.tick(time);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(frame, self.settings.ripples, time) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Match the canvas backing store to the window
        fn resize(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let css_w = window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0) as f32;
            let css_h = window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0) as f32;

            self.viewport
                .resize(css_w, css_h, window.device_pixel_ratio() as f32);
            let (width, height) = self.viewport.physical_size();
            self.canvas.set_width(width);
            self.canvas.set_height(height);

            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(self.viewport);
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Ripple Field starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("scene")
            .ok_or("no canvas")?
            .dyn_into()?;

        let mut settings = Settings::load();
        if let Ok(query) = window.location().search()
            && settings.apply_query(&query)
        {
            settings.save();
        }
        let seed = js_sys::Date::now() as u64;
        let field = WaveField::new(settings.effective_config(), seed)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!(
            "Wave field: {} slots ({}), seed {}",
            field.capacity(),
            settings.quality.as_str(),
            seed
        );

        let demo = Rc::new(RefCell::new(Demo {
            field,
            settings,
            viewport: Viewport::new(1.0, 1.0, 1.0),
            canvas: canvas.clone(),
            render_state: None,
        }));
        demo.borrow_mut().resize();

        let (viewport, capacity) = {
            let d = demo.borrow();
            (d.viewport, d.field.capacity())
        };
        let render_state = init_gpu(canvas.clone(), viewport, capacity)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        demo.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, demo.clone());
        setup_resize_handler(demo.clone());

        request_animation_frame(demo);

        log::info!("Ripple Field running!");
        Ok(())
    }

    /// Create the surface, pick an adapter and build the render state
    async fn init_gpu(
        canvas: HtmlCanvasElement,
        viewport: Viewport,
        capacity: usize,
    ) -> Result<RenderState, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?;
        let adapter = request_adapter(&instance, Some(&surface)).await?;
        RenderState::new(surface, &adapter, viewport, capacity).await
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, demo: Rc<RefCell<Demo>>) {
        // Pointer move - offset coords are CSS pixels relative to the canvas
        let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
            let mut d = demo.borrow_mut();
            let pos = d
                .viewport
                .pointer_to_ndc(event.offset_x() as f32, event.offset_y() as f32);
            d.field.on_pointer_move(pos, event.time_stamp());
        });
        let _ = canvas
            .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize_handler(demo: Rc<RefCell<Demo>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            demo.borrow_mut().resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(demo: Rc<RefCell<Demo>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(demo, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(demo: Rc<RefCell<Demo>>, time: f64) {
        demo.borrow_mut().frame(time);
        request_animation_frame(demo);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_demo::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Ripple Field (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    if let Err(e) = run_headless() {
        log::error!("Headless run failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Sweep a synthetic pointer in a circle for a few seconds at 60 Hz
#[cfg(not(target_arch = "wasm32"))]
fn run_headless() -> Result<(), ripple_field::ConfigError> {
    use glam::Vec2;
    use ripple_field::{Settings, Viewport, WaveField};

    const FRAMES: u32 = 240;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    let mut settings = Settings::load();
    // Same `quality=..&ripples=..` overrides the web build reads from the URL
    if let Some(query) = std::env::args().nth(1)
        && settings.apply_query(&query)
    {
        settings.save();
    }
    let viewport = Viewport::new(1280.0, 720.0, 1.0);
    let mut field = WaveField::new(settings.effective_config(), 0x5eed)?;
    let floor = field.config().alpha_floor;

    for frame in 0..FRAMES {
        let now = frame as f64 * FRAME_MS;
        // Pointer rests for the second half of every second
        if frame % 60 < 30 {
            let t = frame as f32 / 60.0;
            let css = Vec2::new(640.0 + 300.0 * t.cos(), 360.0 + 200.0 * t.sin());
            field.on_pointer_move(viewport.pointer_to_ndc(css.x, css.y), now);
        }
        let floats = field.tick(now).scalars().len();

        if frame % 60 == 59 {
            let live = field
                .particles()
                .iter()
                .filter(|p| !p.is_dormant(floor))
                .count();
            log::info!(
                "t={:.2}s cursor={} live={} floats={}",
                now / 1000.0,
                field.cursor(),
                live,
                floats
            );
        }
    }

    println!(
        "Simulated {} frames over {} slots",
        FRAMES,
        field.capacity()
    );
    Ok(())
}
