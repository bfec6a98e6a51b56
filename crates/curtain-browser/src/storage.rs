//! Persisted-flag storage access.
//!
//! The backend is runtime-detected once: a WebExtensions storage area when
//! a `browser` or `chrome` global exposes `storage.local`, otherwise
//! `window.localStorage` for the dev harness and the browser test runner.
//! Reads degrade to "no stored value" with a logged warning; writes surface
//! their error to the caller. Change subscriptions are removed on drop.

use curtain_core::{ENABLED_KEY, decode_flag};
use gloo_events::EventListener;
use gloo_storage::errors::StorageError;
use gloo_storage::{LocalStorage, Storage};
use js_sys::Reflect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::StorageEvent;

/// Reads, writes, and watches the persisted enabled flag.
pub struct SettingsStore {
    backend: Backend,
}

enum Backend {
    /// The `storage` namespace object of a WebExtensions runtime.
    Extension(js_sys::Object),
    Local,
}

/// Active change subscription; dropping it removes the listener.
pub struct FlagSubscription {
    kind: SubscriptionKind,
}

enum SubscriptionKind {
    Extension {
        on_changed: JsValue,
        listener: Closure<dyn FnMut(JsValue, JsValue)>,
    },
    Local {
        _listener: EventListener,
    },
}

impl SettingsStore {
    pub fn new() -> Self {
        let backend = match extension_storage() {
            Some(storage) => Backend::Extension(storage),
            None => {
                tracing::debug!("no extension storage; using window.localStorage");
                Backend::Local
            }
        };
        Self { backend }
    }

    /// Read the stored flag. `None` means absent, unreadable, or
    /// undecodable; callers apply the fail-open default.
    pub async fn load(&self) -> Option<bool> {
        match &self.backend {
            Backend::Extension(storage) => match extension_read(storage).await {
                Ok(value) => flag_from_js(&value),
                Err(err) => {
                    tracing::warn!(?err, "extension storage read failed; using default");
                    None
                }
            },
            Backend::Local => match LocalStorage::get::<bool>(ENABLED_KEY) {
                Ok(stored) => Some(stored),
                Err(StorageError::KeyNotFound(_)) => None,
                Err(err) => {
                    tracing::warn!(%err, "local storage read failed; using default");
                    None
                }
            },
        }
    }

    /// Persist the flag. The change notification loops back to every
    /// subscribed document, including this one on the extension backend.
    pub async fn store(&self, enabled: bool) -> Result<(), JsValue> {
        match &self.backend {
            Backend::Extension(storage) => extension_write(storage, enabled).await,
            Backend::Local => LocalStorage::set(ENABLED_KEY, enabled)
                .map_err(|err| JsValue::from_str(&err.to_string())),
        }
    }

    /// Watch for flag changes made by other documents.
    ///
    /// The callback receives the new stored value, `None` when the key was
    /// removed or the value is undecodable.
    pub fn subscribe(
        &self,
        on_change: impl Fn(Option<bool>) + 'static,
    ) -> Result<FlagSubscription, JsValue> {
        match &self.backend {
            Backend::Extension(storage) => subscribe_extension(storage, on_change),
            Backend::Local => subscribe_local(on_change),
        }
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FlagSubscription {
    fn drop(&mut self) {
        if let SubscriptionKind::Extension {
            on_changed,
            listener,
        } = &mut self.kind
        {
            let removed = Reflect::get(on_changed, &"removeListener".into())
                .ok()
                .and_then(|remove| remove.dyn_into::<js_sys::Function>().ok())
                .and_then(|remove| remove.call1(on_changed, listener.as_ref()).ok());
            if removed.is_none() {
                tracing::debug!("storage change listener removal failed");
            }
        }
    }
}

/// Probe for a WebExtensions storage namespace, `browser` first.
fn extension_storage() -> Option<js_sys::Object> {
    let global = js_sys::global();
    for name in ["browser", "chrome"] {
        let Ok(root) = Reflect::get(&global, &JsValue::from_str(name)) else {
            continue;
        };
        if root.is_undefined() || root.is_null() {
            continue;
        }
        let Ok(storage) = Reflect::get(&root, &"storage".into()) else {
            continue;
        };
        let Ok(local) = Reflect::get(&storage, &"local".into()) else {
            continue;
        };
        if local.is_undefined() || local.is_null() {
            continue;
        }
        let Ok(storage) = storage.dyn_into::<js_sys::Object>() else {
            continue;
        };
        tracing::debug!(namespace = name, "extension storage detected");
        return Some(storage);
    }
    None
}

async fn extension_read(storage: &js_sys::Object) -> Result<JsValue, JsValue> {
    let local = Reflect::get(storage, &"local".into())?;
    let get: js_sys::Function = Reflect::get(&local, &"get".into())?.dyn_into()?;
    let promise: js_sys::Promise = get.call1(&local, &JsValue::from_str(ENABLED_KEY))?.dyn_into()?;
    let items = JsFuture::from(promise).await?;
    Reflect::get(&items, &JsValue::from_str(ENABLED_KEY))
}

async fn extension_write(storage: &js_sys::Object, enabled: bool) -> Result<(), JsValue> {
    let local = Reflect::get(storage, &"local".into())?;
    let set: js_sys::Function = Reflect::get(&local, &"set".into())?.dyn_into()?;
    let items = js_sys::Object::new();
    Reflect::set(&items, &JsValue::from_str(ENABLED_KEY), &JsValue::from_bool(enabled))?;
    let promise: js_sys::Promise = set.call1(&local, &items)?.dyn_into()?;
    JsFuture::from(promise).await?;
    Ok(())
}

fn subscribe_extension(
    storage: &js_sys::Object,
    on_change: impl Fn(Option<bool>) + 'static,
) -> Result<FlagSubscription, JsValue> {
    let on_changed = Reflect::get(storage, &"onChanged".into())?;
    let add: js_sys::Function = Reflect::get(&on_changed, &"addListener".into())?.dyn_into()?;

    let listener = Closure::wrap(Box::new(move |changes: JsValue, area: JsValue| {
        if area.as_string().as_deref() != Some("local") {
            return;
        }
        let Ok(change) = Reflect::get(&changes, &JsValue::from_str(ENABLED_KEY)) else {
            return;
        };
        if change.is_undefined() {
            return;
        }
        let new_value = Reflect::get(&change, &"newValue".into()).unwrap_or(JsValue::UNDEFINED);
        on_change(flag_from_js(&new_value));
    }) as Box<dyn FnMut(JsValue, JsValue)>);

    add.call1(&on_changed, listener.as_ref())?;
    Ok(FlagSubscription {
        kind: SubscriptionKind::Extension {
            on_changed,
            listener,
        },
    })
}

fn subscribe_local(
    on_change: impl Fn(Option<bool>) + 'static,
) -> Result<FlagSubscription, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let listener = EventListener::new(&window, "storage", move |event| {
        let Some(event) = event.dyn_ref::<StorageEvent>() else {
            return;
        };
        // A None key means the whole storage area was cleared.
        let key = event.key();
        if key.is_some() && key.as_deref() != Some(ENABLED_KEY) {
            return;
        }
        let stored = event.new_value().and_then(|raw| match decode_flag(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(%err, "undecodable stored flag; using default");
                None
            }
        });
        on_change(stored);
    });
    Ok(FlagSubscription {
        kind: SubscriptionKind::Local {
            _listener: listener,
        },
    })
}

/// Interpret a raw stored value; non-booleans degrade to `None`.
fn flag_from_js(value: &JsValue) -> Option<bool> {
    if value.is_undefined() || value.is_null() {
        return None;
    }
    let stored = value.as_bool();
    if stored.is_none() {
        tracing::warn!("stored enabled flag is not a boolean; using default");
    }
    stored
}
