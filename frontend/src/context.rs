use std::rc::Rc;

use shared::session::Session;
use yew::context::ContextHandle;
use yew::prelude::*;

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::route::Route;
use crate::session::BrowserStore;

pub type PortalSession = Session<BrowserStore>;

/// Shared by every screen: endpoints, the login session and navigation.
#[derive(Clone, PartialEq)]
pub struct PortalContext {
    pub config: Rc<AppConfig>,
    pub session: Rc<PortalSession>,
    pub navigator: Callback<Route>,
}

impl PortalContext {
    pub fn api(&self) -> ApiClient {
        ApiClient::new(&self.config)
    }

    pub fn navigate(&self, route: Route) {
        self.navigator.emit(route);
    }

    pub fn navigate_to(&self, route: Route) -> Callback<MouseEvent> {
        let navigator = self.navigator.clone();
        Callback::from(move |_| navigator.emit(route))
    }

    /// Used when a component renders outside the app root, which only
    /// happens in isolation. Navigation is a no-op there.
    pub fn detached() -> Self {
        log::error!("PortalContext missing; falling back to build defaults");
        Self {
            config: Rc::new(AppConfig::from_build_env()),
            session: Rc::new(Session::new(BrowserStore)),
            navigator: Callback::noop(),
        }
    }

    /// Context lookup for struct components. The handle must be kept alive.
    pub fn from_scope<C: Component>(ctx: &yew::Context<C>) -> (Self, Option<ContextHandle<Self>>) {
        match ctx.link().context::<Self>(Callback::noop()) {
            Some((portal, handle)) => (portal, Some(handle)),
            None => (Self::detached(), None),
        }
    }
}

/// Function components read the portal context through this. The app root
/// always provides it.
#[hook]
pub fn use_portal() -> PortalContext {
    use_context::<PortalContext>().unwrap_or_else(PortalContext::detached)
}
