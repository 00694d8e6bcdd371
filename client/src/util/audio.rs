//! Notification sound.
//!
//! The clip is stored in the `notification-sounds` Cache Storage bucket at
//! start-up so the first alert after going offline still plays. Playback
//! prefers the cached blob and falls back to the network URL. Every failure is
//! logged and swallowed; a missing sound never affects the feed.

#[cfg(test)]
#[path = "audio_test.rs"]
mod audio_test;

/// Cache Storage bucket holding the clip.
pub const AUDIO_CACHE_NAME: &str = "notification-sounds";
/// Same-origin path of the clip.
pub const NOTIFICATION_SOUND_URL: &str = "/simple-notification-152054.mp3";

/// Where a clip is played from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AudioSource {
    /// Object URL of the cached blob.
    Cached(String),
    /// The asset URL itself.
    Network(String),
}

impl AudioSource {
    /// Prefer the cached blob when one was found.
    #[must_use]
    pub fn choose(cached_blob_url: Option<String>, url: &str) -> Self {
        match cached_blob_url {
            Some(blob_url) => Self::Cached(blob_url),
            None => Self::Network(url.to_owned()),
        }
    }

    #[must_use]
    pub fn src(&self) -> &str {
        match self {
            Self::Cached(src) | Self::Network(src) => src,
        }
    }

    /// Object URL to revoke once playback settled, if this source minted one.
    #[must_use]
    pub fn object_url(&self) -> Option<&str> {
        match self {
            Self::Cached(url) => Some(url),
            Self::Network(_) => None,
        }
    }
}

/// Store the clip in Cache Storage. Fire-and-forget.
pub fn cache_notification_sound() {
    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async {
        if let Err(e) = browser::cache_file(AUDIO_CACHE_NAME, NOTIFICATION_SOUND_URL).await {
            leptos::logging::warn!("caching notification sound failed: {e:?}");
        }
    });
}

/// Play the clip once. Fire-and-forget.
pub fn play_notification_sound() {
    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async {
        if let Err(e) = browser::play(AUDIO_CACHE_NAME, NOTIFICATION_SOUND_URL).await {
            leptos::logging::warn!("notification sound failed: {e:?}");
        }
    });
}

#[cfg(feature = "csr")]
mod browser {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;

    use super::AudioSource;

    async fn open_cache(name: &str) -> Result<web_sys::Cache, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let caches = window.caches()?;
        JsFuture::from(caches.open(name)).await?.dyn_into::<web_sys::Cache>()
    }

    pub(super) async fn cache_file(cache_name: &str, url: &str) -> Result<(), JsValue> {
        let cache = open_cache(cache_name).await?;
        JsFuture::from(cache.add_with_str(url)).await?;
        Ok(())
    }

    async fn cached_blob_url(cache_name: &str, url: &str) -> Result<Option<String>, JsValue> {
        let cache = open_cache(cache_name).await?;
        let matched = JsFuture::from(cache.match_with_str(url)).await?;
        if matched.is_undefined() || matched.is_null() {
            return Ok(None);
        }
        let response = matched.dyn_into::<web_sys::Response>()?;
        let blob = JsFuture::from(response.blob()?).await?.dyn_into::<web_sys::Blob>()?;
        web_sys::Url::create_object_url_with_blob(&blob).map(Some)
    }

    pub(super) async fn play(cache_name: &str, url: &str) -> Result<(), JsValue> {
        let cached = match cached_blob_url(cache_name, url).await {
            Ok(found) => {
                if found.is_none() {
                    leptos::logging::warn!("notification sound not cached; playing from network");
                }
                found
            }
            Err(e) => {
                leptos::logging::warn!("cache lookup failed: {e:?}");
                None
            }
        };
        let source = AudioSource::choose(cached, url);
        let played = start(source.src()).await;
        if let Some(object_url) = source.object_url() {
            if let Err(e) = web_sys::Url::revoke_object_url(object_url) {
                leptos::logging::warn!("revoking sound blob url failed: {e:?}");
            }
        }
        played
    }

    async fn start(src: &str) -> Result<(), JsValue> {
        let audio = web_sys::HtmlAudioElement::new_with_src(src)?;
        JsFuture::from(audio.play()?).await?;
        Ok(())
    }
}
