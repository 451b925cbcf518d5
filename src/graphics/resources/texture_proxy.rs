use std::{
    fmt,
    ops::Deref,
    sync::{Arc, OnceLock},
};

use glam::UVec2;
use parking_lot::Mutex;

use crate::graphics::{error::InstantiateError, provider::ResourceProvider};

use super::{Texture, TextureDesc};

pub type LazyInstantiateCallback =
    Box<dyn FnOnce(&dyn ResourceProvider) -> Option<Texture> + Send + 'static>;

/// Deferred reference to a [`Texture`].
///
/// Backing is bound by [`TextureProxy::instantiate`] and never released while
/// the proxy lives. A lazy proxy runs its callback instead of asking the
/// provider for a fresh allocation, which is how imported or externally owned
/// textures enter a recording.
#[derive(Clone)]
pub struct TextureProxy(Arc<TextureProxyInner>);

impl Deref for TextureProxy {
    type Target = TextureProxyInner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub struct TextureProxyInner {
    desc: TextureDesc,
    lazy: bool,
    texture: OnceLock<Texture>,
    pending: Mutex<Option<LazyInstantiateCallback>>,
}

impl TextureProxy {
    /// Proxy allocated from the resource provider on first instantiation.
    pub fn new(desc: TextureDesc) -> Self {
        Self(Arc::new(TextureProxyInner {
            desc,
            lazy: false,
            texture: OnceLock::new(),
            pending: Mutex::new(None),
        }))
    }

    pub fn lazy<F>(desc: TextureDesc, callback: F) -> Self
    where
        F: FnOnce(&dyn ResourceProvider) -> Option<Texture> + Send + 'static,
    {
        Self(Arc::new(TextureProxyInner {
            desc,
            lazy: true,
            texture: OnceLock::new(),
            pending: Mutex::new(Some(Box::new(callback))),
        }))
    }

    pub fn wrap(texture: Texture) -> Self {
        let desc = texture.desc().clone();

        Self(Arc::new(TextureProxyInner {
            desc,
            lazy: false,
            texture: OnceLock::from(texture),
            pending: Mutex::new(None),
        }))
    }

    pub fn ptr_eq(&self, other: &TextureProxy) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl TextureProxyInner {
    pub fn desc(&self) -> &TextureDesc {
        &self.desc
    }

    pub fn dimensions(&self) -> UVec2 {
        self.desc.dimensions
    }

    pub fn is_lazy(&self) -> bool {
        self.lazy
    }

    pub fn is_instantiated(&self) -> bool {
        self.texture.get().is_some()
    }

    /// Binds backing memory unless the proxy already has some.
    pub fn instantiate(&self, provider: &dyn ResourceProvider) -> Result<(), InstantiateError> {
        let mut pending = self.pending.lock();

        if self.is_instantiated() {
            return Ok(());
        }

        let texture = if self.lazy {
            let callback = pending.take().ok_or(InstantiateError::CallbackConsumed)?;
            callback(provider).ok_or(InstantiateError::LazyCallbackFailed)?
        } else {
            provider.create_texture(&self.desc)?
        };

        if texture.dimensions() != self.desc.dimensions {
            return Err(InstantiateError::DescMismatch {
                expected: self.desc.dimensions,
                actual: texture.dimensions(),
            });
        }

        tracing::debug!(
            texture = %texture.id(),
            lazy = self.lazy,
            "instantiated texture proxy"
        );

        // The lock above serializes every writer.
        let bound = self.texture.set(texture);
        debug_assert!(bound.is_ok(), "texture proxy bound twice");

        Ok(())
    }

    /// Strong reference to the backing texture, `None` until instantiated.
    pub fn texture(&self) -> Option<Texture> {
        self.texture.get().cloned()
    }
}

impl fmt::Debug for TextureProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureProxy")
            .field("desc", &self.desc)
            .field("lazy", &self.lazy)
            .field("texture", &self.texture.get().map(|t| t.id()))
            .finish()
    }
}

#[cfg(test)]
#[allow(unused)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use glam::UVec2;

    use super::TextureProxy;
    use crate::graphics::{
        error::InstantiateError,
        provider::{BudgetedResourceProvider, ResourceProvider},
        resources::{Texture, TextureDesc},
        types::TextureFormat,
    };

    const fn is_send_sync<T: Send + Sync>() {}

    const _: () = is_send_sync::<TextureProxy>();

    fn desc() -> TextureDesc {
        TextureDesc::new(16, 16, TextureFormat::Rgba8Unorm)
    }

    #[test]
    fn deferred_proxy_allocates_from_provider() {
        let provider = BudgetedResourceProvider::new(4096);
        let proxy = TextureProxy::new(desc());

        assert!(!proxy.is_instantiated());
        assert!(proxy.texture().is_none());

        proxy.instantiate(&provider).unwrap();

        assert!(proxy.is_instantiated());
        assert_eq!(provider.used(), 16 * 16 * 4);
        assert_eq!(proxy.texture().unwrap().dimensions(), proxy.dimensions());
    }

    #[test]
    fn instantiate_is_idempotent() {
        let provider = BudgetedResourceProvider::new(4096);
        let proxy = TextureProxy::new(desc());

        proxy.instantiate(&provider).unwrap();
        let first = proxy.texture().unwrap();
        proxy.instantiate(&provider).unwrap();

        assert!(first.ptr_eq(&proxy.texture().unwrap()));
        assert_eq!(provider.used(), 16 * 16 * 4);
    }

    #[test]
    fn lazy_callback_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let proxy = TextureProxy::lazy(desc(), move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
            Some(Texture::new(desc()))
        });
        let provider = BudgetedResourceProvider::new(0);

        assert!(proxy.is_lazy());
        proxy.instantiate(&provider).unwrap();
        proxy.instantiate(&provider).unwrap();

        assert_eq!(calls.load(Ordering::Relaxed), 1);
        assert!(proxy.is_instantiated());
    }

    #[test]
    fn failed_lazy_callback_stays_unresolved() {
        let proxy = TextureProxy::lazy(desc(), |_| None);
        let provider = BudgetedResourceProvider::new(4096);

        assert_eq!(
            proxy.instantiate(&provider),
            Err(InstantiateError::LazyCallbackFailed)
        );
        assert!(!proxy.is_instantiated());
        assert_eq!(
            proxy.instantiate(&provider),
            Err(InstantiateError::CallbackConsumed)
        );
    }

    #[test]
    fn lazy_texture_of_wrong_size_is_rejected() {
        let proxy = TextureProxy::lazy(desc(), |_| {
            Some(Texture::new(TextureDesc::new(8, 8, TextureFormat::Rgba8Unorm)))
        });
        let provider = BudgetedResourceProvider::new(0);

        let err = proxy.instantiate(&provider).unwrap_err();

        assert_eq!(
            err,
            InstantiateError::DescMismatch {
                expected: UVec2::new(16, 16),
                actual: UVec2::new(8, 8),
            }
        );
        assert_eq!(
            err.to_string(),
            "instantiated texture is 8x8 but the proxy expects 16x16"
        );
        assert!(!proxy.is_instantiated());
        assert_eq!(
            proxy.instantiate(&provider),
            Err(InstantiateError::CallbackConsumed)
        );
    }

    #[test]
    fn mismatched_lazy_texture_returns_its_budget() {
        let provider = BudgetedResourceProvider::new(4096);
        let proxy = TextureProxy::lazy(desc(), |provider| {
            provider
                .create_texture(&TextureDesc::new(4, 4, TextureFormat::Rgba8Unorm))
                .ok()
        });

        assert!(matches!(
            proxy.instantiate(&provider),
            Err(InstantiateError::DescMismatch { .. })
        ));
        assert_eq!(provider.used(), 0);
    }

    #[test]
    fn out_of_budget_fails() {
        let provider = BudgetedResourceProvider::new(16);
        let proxy = TextureProxy::new(desc());

        assert!(matches!(
            proxy.instantiate(&provider),
            Err(InstantiateError::OutOfBudget { .. })
        ));
        assert!(proxy.texture().is_none());
    }

    #[test]
    fn wrapped_texture_is_already_instantiated() {
        let texture = Texture::new(desc());
        let proxy = TextureProxy::wrap(texture.clone());

        assert!(proxy.is_instantiated());
        assert!(proxy.texture().unwrap().ptr_eq(&texture));
        proxy
            .instantiate(&BudgetedResourceProvider::new(0))
            .unwrap();
    }
}
