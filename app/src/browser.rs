//! Browser bindings
//!
//! Local storage, outbound links, camera streams, frame sampling and
//! animation-frame scheduling over `web_sys`. Everything here degrades to an
//! error value (never a panic) when the API is missing.

use passport_core::scan::CameraStream;
use passport_core::storage::{KeyValueStore, StorageError};
use passport_core::{CameraError, LinkOpener};
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};

/// `HTMLMediaElement.HAVE_ENOUGH_DATA`
const HAVE_ENOUGH_DATA: u16 = 4;

fn js_reason(value: &JsValue) -> String {
    if let Some(e) = value.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Local storage
// ─────────────────────────────────────────────────────────────────────────────

/// `window.localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn backing() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(StorageError::Unavailable)
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::backing()?
            .get_item(key)
            .map_err(|e| StorageError::Read {
                key: key.to_string(),
                reason: js_reason(&e),
            })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::backing()?
            .set_item(key, value)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                reason: js_reason(&e),
            })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::backing()?
            .remove_item(key)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                reason: js_reason(&e),
            })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Navigation
// ─────────────────────────────────────────────────────────────────────────────

/// Opens links with `window.open(url, "_blank", "noopener,noreferrer")`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserLinks;

impl LinkOpener for BrowserLinks {
    fn open_in_new_context(&self, url: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) =
            window.open_with_url_and_target_and_features(url, "_blank", "noopener,noreferrer")
        {
            warn!(url, error = %js_reason(&e), "Failed to open link");
        }
    }
}

/// Page origin, e.g. `https://passport.example`.
pub fn page_origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

pub fn reload_page() {
    if let Some(window) = web_sys::window()
        && let Err(e) = window.location().reload()
    {
        warn!(error = %js_reason(&e), "Reload failed");
    }
}

/// Resolves on the next `requestAnimationFrame` callback.
pub async fn next_animation_frame() {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let scheduled = web_sys::window()
            .map(|w| w.request_animation_frame(&resolve).is_ok())
            .unwrap_or(false);
        if !scheduled {
            let _ = resolve.call0(&JsValue::NULL);
        }
    });
    let _ = JsFuture::from(promise).await;
}

// ─────────────────────────────────────────────────────────────────────────────
// Camera
// ─────────────────────────────────────────────────────────────────────────────

fn camera_error(value: JsValue) -> CameraError {
    if let Some(e) = value.dyn_ref::<web_sys::DomException>() {
        return CameraError::new(e.name(), e.message());
    }
    if let Some(e) = value.dyn_ref::<js_sys::Error>() {
        return CameraError::new(String::from(e.name()), String::from(e.message()));
    }
    CameraError::new("Error", js_reason(&value))
}

/// A live camera stream shown in a `<video>` element.
pub struct BrowserCamera {
    stream: MediaStream,
    video: HtmlVideoElement,
}

impl CameraStream for BrowserCamera {
    fn stop(&mut self) {
        for track in self.stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
        self.video.set_src_object(None);
        debug!("Camera tracks stopped");
    }
}

pub fn video_element(id: &str) -> Result<HtmlVideoElement, CameraError> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|e| e.dyn_into::<HtmlVideoElement>().ok())
        .ok_or_else(|| CameraError::new("NotFoundError", "video element missing"))
}

/// Request a camera stream with the given facing-mode hint and attach it to
/// the `<video>` element with id `video_id`.
pub async fn open_camera(video_id: &str, facing_mode: &str) -> Result<BrowserCamera, CameraError> {
    let window = web_sys::window()
        .ok_or_else(|| CameraError::new("NotSupportedError", "no browser window"))?;
    let video = video_element(video_id)?;
    let devices = window.navigator().media_devices().map_err(camera_error)?;

    let video_constraints = js_sys::Object::new();
    js_sys::Reflect::set(
        &video_constraints,
        &JsValue::from_str("facingMode"),
        &JsValue::from_str(facing_mode),
    )
    .map_err(camera_error)?;
    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&video_constraints.into());

    let request = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(camera_error)?;
    let stream: MediaStream = JsFuture::from(request)
        .await
        .map_err(camera_error)?
        .dyn_into()
        .map_err(|_| CameraError::new("TypeError", "not a media stream"))?;

    // Owned from here on; stopped on the failure path below
    let mut camera = BrowserCamera { stream, video };
    camera.video.set_src_object(Some(&camera.stream));
    let playing = match camera.video.play() {
        Ok(promise) => JsFuture::from(promise).await.map(|_| ()),
        Err(e) => Err(e),
    };
    if let Err(e) = playing {
        camera.stop();
        return Err(camera_error(e));
    }
    Ok(camera)
}

/// An RGBA snapshot of one video frame.
pub struct SampledFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Offscreen canvas that video frames are drawn into for decoding.
pub struct FrameSampler {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl FrameSampler {
    pub fn new() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let canvas: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
        let context: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;
        Some(Self { canvas, context })
    }

    /// Copy the current frame, or `None` while the video has no data yet.
    pub fn sample(&self, video: &HtmlVideoElement) -> Option<SampledFrame> {
        if video.ready_state() < HAVE_ENOUGH_DATA {
            return None;
        }
        let (width, height) = (video.video_width(), video.video_height());
        if width == 0 || height == 0 {
            return None;
        }

        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.context
            .draw_image_with_html_video_element(video, 0.0, 0.0)
            .ok()?;
        let image = self
            .context
            .get_image_data(0.0, 0.0, width as f64, height as f64)
            .ok()?;

        Some(SampledFrame {
            width: image.width(),
            height: image.height(),
            pixels: image.data().0,
        })
    }
}
