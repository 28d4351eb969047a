//! Mitosys entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{MouseEvent, TouchEvent};

    use mitosys::panel::PanelField;
    use mitosys::pointer::PointerSample;
    use mitosys::surface::DomSurface;
    use mitosys::{Bounds, Scene, Settings, SettingsChange};

    /// Id of the `<svg>` element in index.html
    const SVG_ELEMENT_ID: &str = "mitosys";

    /// App instance holding all state
    struct App {
        scene: Scene<DomSurface>,
        pointer: Vec2,
    }

    thread_local! {
        static APP: RefCell<Option<Rc<RefCell<App>>>> = const { RefCell::new(None) };
    }

    fn app() -> Option<Rc<RefCell<App>>> {
        APP.with(|a| a.borrow().clone())
    }

    fn viewport() -> Bounds {
        let window = web_sys::window().unwrap();
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Bounds::new(w as f32, h as f32)
    }

    /// Handle for an external control panel widget
    #[wasm_bindgen]
    pub struct MitosysPanel {
        app: Rc<RefCell<App>>,
    }

    #[wasm_bindgen]
    impl MitosysPanel {
        #[wasm_bindgen(constructor)]
        pub fn new() -> Result<MitosysPanel, JsValue> {
            app()
                .map(|app| MitosysPanel { app })
                .ok_or_else(|| JsValue::from_str("mitosys is not running"))
        }

        /// Current settings as JSON
        pub fn settings(&self) -> String {
            self.app.borrow().scene.settings().to_json()
        }

        /// Replace all settings from JSON
        pub fn apply(&self, json: &str) -> Result<(), JsValue> {
            let settings = Settings::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
            self.reconfigure(settings);
            Ok(())
        }

        /// Set a single field by its panel name. Returns false if rejected.
        pub fn set(&self, name: &str, value: &str) -> bool {
            let next = {
                let app = self.app.borrow();
                PanelField::parse(name, value).and_then(|f| f.apply(app.scene.settings()))
            };
            match next {
                Some(settings) => {
                    self.reconfigure(settings);
                    true
                }
                None => {
                    log::warn!("Rejected panel value {}={:?}", name, value);
                    false
                }
            }
        }

        pub fn download(&self) {
            if let Err(e) = self.app.borrow().scene.surface().download() {
                log::warn!("Download failed: {}", e);
            }
        }

        pub fn random(&self) {
            let mut app = self.app.borrow_mut();
            app.scene.random();
            app.scene.settings().save();
        }

        fn reconfigure(&self, settings: Settings) {
            let mut app = self.app.borrow_mut();
            let change = app.scene.reconfigure(settings);
            if change != SettingsChange::Unchanged {
                app.scene.settings().save();
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Mitosys starting...");

        let Some(surface) = DomSurface::attach(SVG_ELEMENT_ID) else {
            log::error!("No <svg id=\"{}\"> element found", SVG_ELEMENT_ID);
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let mut scene = Scene::new(surface, Settings::load(), seed);
        scene.initialize(viewport());
        log::info!("Scene seeded with {}", seed);

        let app = Rc::new(RefCell::new(App {
            scene,
            pointer: Vec2::ZERO,
        }));
        APP.with(|a| *a.borrow_mut() = Some(app.clone()));

        setup_pointer_handlers(app.clone());
        setup_resize_handler(app.clone());

        request_animation_frame(app);

        log::info!("Mitosys running!");
    }

    fn setup_pointer_handlers(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();

        // Mouse move
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let sample = PointerSample::mouse(
                    Vec2::new(event.client_x() as f32, event.client_y() as f32),
                    Vec2::new(event.page_x() as f32, event.page_y() as f32),
                );
                app.borrow_mut().pointer = sample.resolve();
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let touch = event
                    .touches()
                    .get(0)
                    .map(|t| Vec2::new(t.page_x() as f32, t.page_y() as f32));
                app.borrow_mut().pointer = PointerSample::touch(touch).resolve();
            });
            let _ = window
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().scene.resize(viewport());
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            frame_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            let pointer = a.pointer;
            a.scene.tick(pointer);
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use mitosys::host::{self, HeadlessConfig};
    use mitosys::{Scene, SvgDocument, export};

    env_logger::init();
    log::info!("Mitosys (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the live version");

    let config = HeadlessConfig::from_env();
    let mut scene = Scene::new(SvgDocument::new(), config.settings.clone(), config.seed);
    scene.initialize(config.bounds);

    let bounds = config.bounds;
    let frames = host::run(
        |frame| scene.tick(host::orbit_pointer(bounds, frame)),
        |frame| frame < config.frames,
    );
    log::info!("Ran {} frames with seed {}", frames, config.seed);

    // Export failures are reported, never fatal
    if let Err(e) = export::write_to_dir(scene.surface(), &config.out_dir) {
        log::warn!("Export failed: {}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
