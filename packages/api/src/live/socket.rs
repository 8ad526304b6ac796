//! Browser websocket driver for the live-count session.
//!
//! Owns the `WebSocket`, its event closures and the reconnect timer. The
//! closures hold a `Weak` handle back to the shared state so dropping the
//! client frees everything; `deactivate` closes with code 1000 and cancels a
//! pending retry.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

use super::session::{host_of, ConnectionMachine, ConnectionState, SessionOutput, StompSession};
use super::LiveOptions;
use crate::models::CountsPatch;

type CountsCallback = Rc<dyn Fn(CountsPatch)>;
type StateCallback = Rc<dyn Fn(ConnectionState)>;

struct Handlers {
    _open: Closure<dyn FnMut(Event)>,
    _message: Closure<dyn FnMut(MessageEvent)>,
    _error: Closure<dyn FnMut(Event)>,
    _close: Closure<dyn FnMut(CloseEvent)>,
}

struct Inner {
    options: LiveOptions,
    session: StompSession,
    machine: ConnectionMachine,
    socket: Option<WebSocket>,
    handlers: Option<Handlers>,
    /// Bumped whenever a scheduled retry should no longer fire.
    retry_epoch: u64,
    on_counts: CountsCallback,
    on_state: StateCallback,
}

/// One live-count connection. Clones share the same socket.
#[derive(Clone)]
pub struct LiveCountClient {
    inner: Rc<RefCell<Inner>>,
}

impl LiveCountClient {
    /// Open the socket and keep it open until [`deactivate`](Self::deactivate).
    pub fn activate(
        options: LiveOptions,
        token: Option<String>,
        on_counts: impl Fn(CountsPatch) + 'static,
        on_state: impl Fn(ConnectionState) + 'static,
    ) -> Self {
        let session = StompSession::new(host_of(&options.ws_url), token, options.topic.clone());
        let machine = ConnectionMachine::new(options.reconnect_delay);
        let client = Self {
            inner: Rc::new(RefCell::new(Inner {
                options,
                session,
                machine,
                socket: None,
                handlers: None,
                retry_epoch: 0,
                on_counts: Rc::new(on_counts),
                on_state: Rc::new(on_state),
            })),
        };
        connect(&client.inner);
        client
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.borrow().machine.state()
    }

    pub fn deactivate(&self) {
        let (socket, on_state, goodbye) = {
            let mut inner = self.inner.borrow_mut();
            if inner.machine.state() == ConnectionState::Closed {
                return;
            }
            inner.machine.deactivate();
            inner.retry_epoch += 1;
            let goodbye = inner.session.close_frame();
            (inner.socket.take(), inner.on_state.clone(), goodbye)
        };
        if let Some(socket) = socket {
            detach(&socket);
            if socket.ready_state() == WebSocket::OPEN {
                let _ = socket.send_with_str(&goodbye);
            }
            if let Err(e) = socket.close_with_code(1000) {
                tracing::warn!("Closing live socket failed: {e:?}");
            }
        }
        self.inner.borrow_mut().handlers = None;
        tracing::info!("Live counts deactivated");
        on_state(ConnectionState::Closed);
    }
}

fn connect(shared: &Rc<RefCell<Inner>>) {
    let (url, on_state) = {
        let mut inner = shared.borrow_mut();
        if !inner.machine.begin_connect() {
            tracing::debug!("Live connect skipped in state {:?}", inner.machine.state());
            return;
        }
        (inner.options.ws_url.clone(), inner.on_state.clone())
    };
    on_state(ConnectionState::Connecting);

    let socket = match WebSocket::new(&url) {
        Ok(socket) => socket,
        Err(e) => {
            tracing::warn!("Opening live socket to {url} failed: {e:?}");
            lost(shared);
            return;
        }
    };
    socket.set_binary_type(web_sys::BinaryType::Arraybuffer);

    let weak = Rc::downgrade(shared);
    let open = Closure::wrap(Box::new({
        let weak = weak.clone();
        move |_: Event| {
            if let Some(shared) = weak.upgrade() {
                let frame = shared.borrow().session.open_frame();
                send(&shared, &frame);
            }
        }
    }) as Box<dyn FnMut(Event)>);

    let message = Closure::wrap(Box::new({
        let weak = weak.clone();
        move |event: MessageEvent| {
            let Some(shared) = weak.upgrade() else { return };
            let Some(text) = event.data().as_string() else {
                tracing::debug!("Ignoring binary live message");
                return;
            };
            handle_text(&shared, &text);
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    let error = Closure::wrap(Box::new({
        let weak = weak.clone();
        move |_: Event| {
            if weak.upgrade().is_some() {
                tracing::warn!("Live socket error");
            }
        }
    }) as Box<dyn FnMut(Event)>);

    let close = Closure::wrap(Box::new(move |event: CloseEvent| {
        if let Some(shared) = weak.upgrade() {
            tracing::warn!("Live socket closed ({})", event.code());
            lost(&shared);
        }
    }) as Box<dyn FnMut(CloseEvent)>);

    socket.set_onopen(Some(open.as_ref().unchecked_ref()));
    socket.set_onmessage(Some(message.as_ref().unchecked_ref()));
    socket.set_onerror(Some(error.as_ref().unchecked_ref()));
    socket.set_onclose(Some(close.as_ref().unchecked_ref()));

    let mut inner = shared.borrow_mut();
    inner.socket = Some(socket);
    inner.handlers = Some(Handlers {
        _open: open,
        _message: message,
        _error: error,
        _close: close,
    });
}

fn send(shared: &Rc<RefCell<Inner>>, frame: &str) {
    let socket = shared.borrow().socket.clone();
    if let Some(socket) = socket {
        if let Err(e) = socket.send_with_str(frame) {
            tracing::warn!("Live socket send failed: {e:?}");
        }
    }
}

fn handle_text(shared: &Rc<RefCell<Inner>>, text: &str) {
    let outputs = shared.borrow().session.handle_text(text);
    for output in outputs {
        match output {
            SessionOutput::Send(frame) => send(shared, &frame),
            SessionOutput::Connected => {
                let on_state = {
                    let mut inner = shared.borrow_mut();
                    inner.machine.on_connected();
                    inner.on_state.clone()
                };
                on_state(ConnectionState::Connected);
            }
            SessionOutput::Counts(patch) => {
                let on_counts = shared.borrow().on_counts.clone();
                on_counts(patch);
            }
            SessionOutput::Failed(_) => {
                let socket = shared.borrow().socket.clone();
                if let Some(socket) = socket {
                    let _ = socket.close();
                }
            }
        }
    }
}

/// Drop the dead socket and schedule the next attempt.
fn lost(shared: &Rc<RefCell<Inner>>) {
    let (delay, on_state, epoch) = {
        let mut inner = shared.borrow_mut();
        let Some(delay) = inner.machine.on_lost() else {
            return;
        };
        if let Some(socket) = inner.socket.take() {
            detach(&socket);
        }
        inner.retry_epoch += 1;
        (delay, inner.on_state.clone(), inner.retry_epoch)
    };
    on_state(ConnectionState::Reconnecting);

    let weak: Weak<RefCell<Inner>> = Rc::downgrade(shared);
    let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
    // The old handlers stay alive until `connect` replaces them: this may be
    // running inside one of them.
    Timeout::new(millis, move || {
        let Some(shared) = weak.upgrade() else { return };
        if shared.borrow().retry_epoch == epoch {
            connect(&shared);
        }
    })
    .forget();
}

fn detach(socket: &WebSocket) {
    socket.set_onopen(None);
    socket.set_onmessage(None);
    socket.set_onerror(None);
    socket.set_onclose(None);
}
