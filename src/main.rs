//! Colliding Disks entry point
//!
//! Handles platform-specific initialization and runs the frame loop:
//! a canvas host on the web, a terminal host on native.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_host {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

    use colliding_disks::consts::{BACKGROUND, LABEL_FONT, STROKE_WIDTH};
    use colliding_disks::{EdgePolicy, RenderSurface, Rgb, Scheduler, Settings, Simulation, Viewport};

    /// Draws onto the page's 2D canvas
    struct CanvasSurface {
        ctx: CanvasRenderingContext2d,
        width: f64,
        height: f64,
    }

    impl RenderSurface for CanvasSurface {
        fn clear(&mut self) {
            self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
        }

        fn draw_disk(&mut self, center: Vec2, radius: f32, color: Rgb, label: &str) {
            let ctx = &self.ctx;
            let (x, y) = (center.x as f64, center.y as f64);
            ctx.begin_path();
            ctx.set_stroke_style_str(&color.to_hex());
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            ctx.set_font(LABEL_FONT);
            let _ = ctx.fill_text(label, x, y);
            ctx.set_line_width(STROKE_WIDTH);
            let _ = ctx.arc(x, y, radius as f64, 0.0, std::f64::consts::TAU);
            ctx.stroke();
            ctx.close_path();
        }
    }

    type Game = Scheduler<CanvasSurface>;

    pub fn run() -> Result<(), JsValue> {
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        console_error_panic_hook::set_once();
        log::info!("Colliding Disks starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no #canvas element")?
            .dyn_into()?;

        // Viewport is fixed at startup; resizes are not tracked
        let width = window.inner_width()?.as_f64().unwrap_or(800.0);
        let height = window.inner_height()?.as_f64().unwrap_or(600.0);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
        canvas.style().set_property("background", BACKGROUND)?;

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let settings = settings_from_query(&window);
        let seed = settings.seed.unwrap_or(js_sys::Date::now() as u64);
        let sim = Simulation::new(settings, Viewport::new(width as f32, height as f32), seed)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let game = Rc::new(RefCell::new(Scheduler::new(
            sim,
            CanvasSurface { ctx, width, height },
        )));

        setup_click_handler(&canvas, game.clone());
        request_animation_frame(game);

        log::info!("Colliding Disks running!");
        Ok(())
    }

    /// `?policy=bounce&removal=0&seed=42` style overrides
    fn settings_from_query(window: &Window) -> Settings {
        let mut settings = Settings::default();
        let search = window.location().search().unwrap_or_default();

        for pair in search.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "policy" => match EdgePolicy::from_str(value) {
                    Some(policy) => settings.edge_policy = policy,
                    None => log::warn!("Unknown policy '{}'", value),
                },
                "removal" => settings.click_removal = !matches!(value, "0" | "false" | "off"),
                "seed" => settings.seed = value.parse().ok(),
                _ => {}
            }
        }
        settings
    }

    fn setup_click_handler(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let target = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let rect = target.get_bounding_client_rect();
            let x = event.client_x() as f64 - rect.left();
            let y = event.client_y() as f64 - rect.top();
            game.borrow_mut().click(Vec2::new(x as f32, y as f32));
        });
        let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time as u64);
        request_animation_frame(game);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod terminal_host {
    use std::error::Error;
    use std::io::{self, Stdout, Write};
    use std::ops::ControlFlow;
    use std::time::Duration;

    use crossterm::event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers, MouseButton, MouseEventKind,
    };
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
    use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
    use crossterm::{cursor, execute, queue};
    use glam::Vec2;

    use colliding_disks::{Rgb, Scheduler, Settings, Simulation, TextSurface};

    /// Surface units covered by one terminal cell (cells are ~1:2)
    const CELL_SIZE: Vec2 = Vec2::new(8.0, 16.0);
    /// ~60 Hz
    const FRAME_INTERVAL: Duration = Duration::from_millis(16);
    /// Optional path to a JSON settings file
    const SETTINGS_ENV: &str = "COLLIDING_DISKS_SETTINGS";

    type Game = Scheduler<TextSurface>;

    pub fn run() -> Result<(), Box<dyn Error>> {
        let settings = match std::env::var_os(SETTINGS_ENV) {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        let (cols, rows) = terminal::size()?;
        let surface = TextSurface::new(cols as usize, rows as usize, CELL_SIZE);
        let seed = settings.seed.unwrap_or_else(rand::random);
        let sim = Simulation::new(settings, surface.viewport(), seed)?;
        let mut game = Scheduler::new(sim, surface);

        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, cursor::Hide, EnableMouseCapture)?;

        let result = drive(&mut game, &mut out);

        // Restore the terminal even if the loop failed
        let _ = execute!(out, DisableMouseCapture, cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        Ok(result?)
    }

    fn drive(game: &mut Game, out: &mut Stdout) -> io::Result<()> {
        let mut failure = None;
        game.run_paced(FRAME_INTERVAL, |game| {
            let step = present(game.surface(), out).and_then(|()| poll_input(game));
            match step {
                Ok(flow) => flow,
                Err(e) => {
                    failure = Some(e);
                    ControlFlow::Break(())
                }
            }
        });
        failure.map_or(Ok(()), Err)
    }

    /// Drain pending terminal events; `Break` when the user quits
    fn poll_input(game: &mut Game) -> io::Result<ControlFlow<()>> {
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(ControlFlow::Break(())),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(ControlFlow::Break(()));
                    }
                    _ => {}
                },
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    let point = game
                        .surface()
                        .cell_center(mouse.column as usize, mouse.row as usize);
                    game.click(point);
                }
                _ => {}
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn present(surface: &TextSurface, out: &mut Stdout) -> io::Result<()> {
        for row in 0..surface.rows() {
            queue!(out, cursor::MoveTo(0, row as u16), ResetColor)?;
            let mut current: Option<Rgb> = None;
            for cell in surface.row(row) {
                if cell.fg != current {
                    match cell.fg {
                        Some(c) => queue!(
                            out,
                            SetForegroundColor(Color::Rgb {
                                r: c.r,
                                g: c.g,
                                b: c.b
                            })
                        )?,
                        None => queue!(out, ResetColor)?,
                    }
                    current = cell.fg;
                }
                queue!(out, Print(cell.ch))?;
            }
        }
        queue!(out, ResetColor)?;
        out.flush()
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_host::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Colliding Disks (native) starting...");

    if let Err(e) = terminal_host::run() {
        log::error!("{}", e);
        eprintln!("colliding-disks: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
