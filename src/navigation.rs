use crate::session::Session;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Screens of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Board,
    Login,
    Register,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Board => "/",
            Route::Login => "/login",
            Route::Register => "/register",
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Board)
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Holds the current route; clones share it.
#[derive(Debug, Clone)]
pub struct Router {
    current: Arc<Mutex<Route>>,
    session: Session,
}

impl Router {
    pub fn new(session: Session) -> Self {
        Self {
            current: Arc::new(Mutex::new(Route::Login)),
            session,
        }
    }

    /// Protected routes fall back to login without a token.
    pub fn guard(route: Route, session: &Session) -> Route {
        if route.is_protected() && !session.is_authenticated() {
            Route::Login
        } else {
            route
        }
    }

    pub fn current(&self) -> Route {
        self.current.lock().map(|r| *r).unwrap_or(Route::Login)
    }
}

impl Navigator for Router {
    fn navigate(&self, route: Route) {
        let target = Self::guard(route, &self.session);
        debug!(requested = route.path(), target = target.path(), "navigate");
        if let Ok(mut current) = self.current.lock() {
            *current = target;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_requires_a_token() {
        let session = Session::in_memory();
        assert_eq!(Router::guard(Route::Board, &session), Route::Login);
        assert_eq!(Router::guard(Route::Register, &session), Route::Register);

        session.set_token("t").unwrap();
        assert_eq!(Router::guard(Route::Board, &session), Route::Board);
    }

    #[test]
    fn router_clones_share_the_route() {
        let session = Session::in_memory();
        let router = Router::new(session.clone());
        let handle = router.clone();

        handle.navigate(Route::Board);
        assert_eq!(router.current(), Route::Login);

        session.set_token("t").unwrap();
        handle.navigate(Route::Board);
        assert_eq!(router.current(), Route::Board);
    }
}
