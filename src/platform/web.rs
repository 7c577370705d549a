//! Browser entry points (wasm32)

use std::cell::RefCell;
use std::rc::Rc;

use glam::DVec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, KeyboardEvent, MouseEvent};

use super::{Session, session_settings};
use crate::controls::editor::ACTION_ATTR;
use crate::controls::{Action, KeyBindingEditor, KeyBindings};
use crate::error::MapError;
use crate::geo::FeatureCollection;
use crate::persistence::{MemoryStorage, Storage};
use crate::sim::{AsteroidsGame, SnakeGame};

/// `window.localStorage`
pub struct LocalStorage(web_sys::Storage);

impl LocalStorage {
    pub fn open() -> Option<Self> {
        web_sys::window()?.local_storage().ok()?.map(Self)
    }
}

impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, MapError> {
        self.0
            .get_item(key)
            .map_err(|e| MapError::Storage(format!("{e:?}")))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), MapError> {
        self.0
            .set_item(key, value)
            .map_err(|e| MapError::Storage(format!("{e:?}")))
    }
}

fn init_logging() {
    console_error_panic_hook::set_once();
    // every export calls this; only the first init succeeds
    let _ = console_log::init_with_level(log::Level::Info);
}

fn host(selector: &str) -> Result<Element, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    document
        .query_selector(selector)?
        .ok_or_else(|| JsValue::from_str(&format!("no element matches `{selector}`")))
}

fn open_storage() -> Box<dyn Storage> {
    match LocalStorage::open() {
        Some(storage) => Box::new(storage),
        None => {
            log::warn!("localStorage unavailable; key bindings will not persist");
            Box::new(MemoryStorage::new())
        }
    }
}

fn load_bindings() -> KeyBindings {
    KeyBindings::load(open_storage().as_ref())
}

/// Wrap a JS `([x, y]) -> [x, y]` function. Points the function rejects
/// pass through unchanged.
fn js_projection(f: js_sys::Function) -> impl Fn(DVec2) -> DVec2 {
    move |p| {
        let arg = js_sys::Array::of2(&JsValue::from_f64(p.x), &JsValue::from_f64(p.y));
        match f.call1(&JsValue::NULL, &arg) {
            Ok(out) => {
                let out = js_sys::Array::from(&out);
                DVec2::new(
                    out.get(0).as_f64().unwrap_or(p.x),
                    out.get(1).as_f64().unwrap_or(p.y),
                )
            }
            Err(e) => {
                log::warn!("projection failed: {e:?}");
                p
            }
        }
    }
}

fn parse_input(geojson: &str, options: Option<String>) -> Result<(FeatureCollection, crate::Settings), JsValue> {
    let collection =
        FeatureCollection::from_geojson(geojson).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let settings = session_settings(options.as_deref(), js_sys::Date::now() as u64);
    Ok((collection, settings))
}

/// Start Map Asteroids inside the element matching `selector`
#[wasm_bindgen(js_name = mapAsteroids)]
pub fn map_asteroids(
    selector: &str,
    geojson: &str,
    options: Option<String>,
    projection: Option<js_sys::Function>,
) -> Result<(), JsValue> {
    init_logging();
    let element = host(selector)?;
    let (collection, settings) = parse_input(geojson, options)?;
    let projection = projection.map(js_projection);
    let game = AsteroidsGame::new(
        &collection,
        settings,
        &load_bindings(),
        projection.as_ref().map(|f| f as &dyn Fn(DVec2) -> DVec2),
    );
    run(element, game)
}

/// Start Map Snake inside the element matching `selector`
#[wasm_bindgen(js_name = mapSnake)]
pub fn map_snake(
    selector: &str,
    geojson: &str,
    options: Option<String>,
    projection: Option<js_sys::Function>,
) -> Result<(), JsValue> {
    init_logging();
    let element = host(selector)?;
    let (collection, settings) = parse_input(geojson, options)?;
    let projection = projection.map(js_projection);
    let game = SnakeGame::new(
        &collection,
        settings,
        &load_bindings(),
        projection.as_ref().map(|f| f as &dyn Fn(DVec2) -> DVec2),
    );
    run(element, game)
}

/// Show the key-binding editor inside the element matching `selector`
#[wasm_bindgen(js_name = mapStationController)]
pub fn map_station_controller(selector: &str) -> Result<(), JsValue> {
    init_logging();
    let element = host(selector)?;
    let storage = open_storage();
    let editor = KeyBindingEditor::new(KeyBindings::load(storage.as_ref()));
    element.set_inner_html(&editor.scene().to_svg());

    let state = Rc::new(RefCell::new((editor, storage)));
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

    // Keyboard
    {
        let state = state.clone();
        let element = element.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut guard = state.borrow_mut();
            let (editor, storage) = &mut *guard;
            editor.key_down(event.key_code(), storage.as_mut());
            element.set_inner_html(&editor.scene().to_svg());
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let state = state.clone();
        let element = element.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: KeyboardEvent| {
            let mut guard = state.borrow_mut();
            guard.0.key_up();
            element.set_inner_html(&guard.0.scene().to_svg());
        });
        window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Button selection; clicks outside any button cancel
    {
        let target_host = element.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let action = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest(&format!("[{ACTION_ATTR}]")).ok().flatten())
                .and_then(|el| el.get_attribute(ACTION_ATTR))
                .and_then(|name| Action::from_str(&name));
            let mut guard = state.borrow_mut();
            match action {
                Some(action) => guard.0.select(action),
                None => guard.0.cancel(),
            }
            target_host.set_inner_html(&guard.0.scene().to_svg());
        });
        element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

/// Wire keys and start the animation loop
fn run<S: Session + 'static>(element: Element, session: S) -> Result<(), JsValue> {
    element.set_inner_html(&session.to_svg());
    let session = Rc::new(RefCell::new(session));
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

    {
        let session = session.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            session.borrow_mut().key_down(event.key_code());
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let session = session.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            session.borrow_mut().key_up(event.key_code());
        });
        window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    request_animation_frame(session, element)
}

fn request_animation_frame<S: Session + 'static>(
    session: Rc<RefCell<S>>,
    element: Element,
) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let closure = Closure::once(move |time: f64| {
        game_loop(session, element, time);
    });
    window.request_animation_frame(closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn game_loop<S: Session + 'static>(session: Rc<RefCell<S>>, element: Element, time: f64) {
    {
        let mut s = session.borrow_mut();
        if s.frame(time) {
            element.set_inner_html(&s.to_svg());
        }
    }
    // nothing above the rAF callback to return the error to
    if let Err(e) = request_animation_frame(session, element) {
        log::error!("animation loop stopped: {e:?}");
    }
}
