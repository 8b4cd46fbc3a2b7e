//! Browser binding: a `<canvas>` surface, a download-based frame sink and
//! the `WebBoard` object exported to JavaScript.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    Blob, CanvasRenderingContext2d, Document, Event, EventTarget, HtmlAnchorElement,
    HtmlCanvasElement, HtmlElement, MouseEvent, Url,
};

use crate::config::ViewConfig;
use crate::controller::BoardView;
use crate::error::{Error, Result, SurfaceError};
use crate::logging;
use crate::surface::{FrameSink, Point, Rect, Shape, Stroke, Surface};
use crate::update::UpdateEnvelope;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| Error::MissingElement("2d canvas context".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| Error::MissingElement("2d canvas context".to_string()))?;
        Ok(Self { canvas, ctx })
    }
}

impl Surface for CanvasSurface {
    fn display_size(&self) -> (f64, f64) {
        (
            self.canvas.client_width() as f64,
            self.canvas.client_height() as f64,
        )
    }

    fn buffer_size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn set_buffer_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn origin(&self) -> Point {
        let rect = self.canvas.get_bounding_client_rect();
        Point::new(rect.left(), rect.top())
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.ctx.clear_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn stroke(
        &mut self,
        shape: &Shape,
        stroke: &Stroke,
    ) -> std::result::Result<(), SurfaceError> {
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.set_line_width(stroke.width);
        ctx.set_stroke_style_str(&stroke.color);
        match shape {
            Shape::Segments(segments) => {
                for (from, to) in segments {
                    ctx.move_to(from.x, from.y);
                    ctx.line_to(to.x, to.y);
                }
            }
            Shape::Circle { center, radius } => {
                ctx.arc(center.x, center.y, *radius, 0.0, TAU)
                    .map_err(SurfaceError::draw)?;
            }
        }
        ctx.stroke();
        Ok(())
    }
}

/// Saves the canvas contents as a PNG download.
///
/// Encoding happens asynchronously in the browser; `export_frame` only
/// reports failures to start it. Later failures are logged.
pub struct CanvasDownload {
    canvas: HtmlCanvasElement,
}

impl CanvasDownload {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas }
    }
}

impl FrameSink for CanvasDownload {
    fn export_frame(&mut self, name: &str) -> std::result::Result<(), SurfaceError> {
        let name = name.to_string();
        let callback = Closure::once_into_js(move |value: JsValue| {
            let Ok(blob) = value.dyn_into::<Blob>() else {
                tracing::warn!(name = %name, "canvas produced no image");
                return;
            };
            if let Err(err) = save_blob(&blob, &name) {
                tracing::warn!(name = %name, error = ?err, "saving frame failed");
            }
        });
        self.canvas
            .to_blob(callback.unchecked_ref())
            .map_err(SurfaceError::export)
    }
}

fn save_blob(blob: &Blob, name: &str) -> std::result::Result<(), JsValue> {
    let url = Url::create_object_url_with_blob(blob)?;
    let anchor = document()
        .map_err(JsValue::from)?
        .create_element("a")?
        .dyn_into::<HtmlAnchorElement>()?;
    anchor.set_href(&url);
    anchor.set_download(name);
    anchor.click();
    Url::revoke_object_url(&url)
}

fn document() -> Result<Document> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| Error::MissingElement("document".to_string()))
}

type CanvasView = BoardView<CanvasSurface, CanvasDownload>;

/// An event listener that is detached again when dropped.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target,
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback(
            self.kind,
            self.callback.as_ref().unchecked_ref(),
        );
    }
}

/// A board bound to a canvas element on the page.
///
/// Pointer presses and window resizes are handled internally. The host
/// page forwards server replies through `applyUpdate`, wires its reset
/// button to `reset`, and reads `boardRequest` to build the request it
/// sends to the server.
#[wasm_bindgen]
pub struct WebBoard {
    view: Rc<RefCell<CanvasView>>,
    status: Option<HtmlElement>,
    _listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl WebBoard {
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        status_id: Option<String>,
        options: JsValue,
    ) -> std::result::Result<WebBoard, JsValue> {
        console_error_panic_hook::set_once();
        let config = if options.is_undefined() || options.is_null() {
            ViewConfig::default()
        } else {
            serde_wasm_bindgen::from_value::<ViewConfig>(options)
                .map_err(|err| Error::Config(err.to_string()))?
        };
        logging::init(&config.log_level);
        Ok(Self::mount(canvas_id, status_id.as_deref(), config)?)
    }

    pub fn reset(&self) -> std::result::Result<(), JsValue> {
        self.view.borrow_mut().reset()?;
        self.show_status();
        Ok(())
    }

    /// Applies a server reply of the form `{ data: { board, nextPlayer,
    /// result, winningLine? } }`.
    #[wasm_bindgen(js_name = applyUpdate)]
    pub fn apply_update(&self, payload: JsValue) -> std::result::Result<(), JsValue> {
        let envelope: UpdateEnvelope =
            serde_wasm_bindgen::from_value(payload).map_err(Error::from)?;
        self.view.borrow_mut().apply_envelope(envelope)?;
        self.show_status();
        Ok(())
    }

    pub fn redraw(&self) -> std::result::Result<(), JsValue> {
        self.view.borrow_mut().redraw()?;
        Ok(())
    }

    pub fn status(&self) -> String {
        self.view.borrow().status().to_string()
    }

    #[wasm_bindgen(js_name = boardRequest)]
    pub fn board_request(&self) -> std::result::Result<JsValue, JsValue> {
        let request = self.view.borrow().board_request();
        Ok(serde_wasm_bindgen::to_value(&request)?)
    }
}

impl WebBoard {
    fn mount(canvas_id: &str, status_id: Option<&str>, config: ViewConfig) -> Result<Self> {
        let document = document()?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| Error::MissingElement(format!("#{canvas_id}")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| Error::MissingElement(format!("#{canvas_id} is not a canvas")))?;
        let status = match status_id {
            Some(id) => Some(
                document
                    .get_element_by_id(id)
                    .ok_or_else(|| Error::MissingElement(format!("#{id}")))?
                    .dyn_into::<HtmlElement>()
                    .map_err(|_| Error::MissingElement(format!("#{id} is not an element")))?,
            ),
            None => None,
        };

        let surface = CanvasSurface::new(canvas.clone())?;
        let sink = CanvasDownload::new(canvas.clone());
        let view = Rc::new(RefCell::new(BoardView::new(surface, sink, config)?));

        let on_press = {
            let view = Rc::clone(&view);
            Listener::attach(canvas.into(), "mousedown", move |event: Event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let (x, y) = (event.client_x() as f64, event.client_y() as f64);
                if let Err(err) = view.borrow_mut().on_pointer_down(x, y) {
                    tracing::warn!(%err, "handling pointer press failed");
                }
            })?
        };
        let window =
            web_sys::window().ok_or_else(|| Error::MissingElement("window".to_string()))?;
        let on_resize = {
            let view = Rc::clone(&view);
            Listener::attach(window.into(), "resize", move |_event: Event| {
                if let Err(err) = view.borrow_mut().redraw() {
                    tracing::warn!(%err, "redraw after resize failed");
                }
            })?
        };

        let board = Self {
            view,
            status,
            _listeners: vec![on_press, on_resize],
        };
        board.show_status();
        Ok(board)
    }

    fn show_status(&self) {
        if let Some(element) = &self.status {
            element.set_inner_text(self.view.borrow().status());
        }
    }
}
