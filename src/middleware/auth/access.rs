//! Gate middleware: run a `Gate` before the handler and pass the `AuthCtx` along.
//!
//! - Strict gates answer the request themselves on failure (the handler never runs).
//! - No-throw gates always call the next handler; the slot tells it what happened.
//! - Several gates may be stacked (e.g. principal + visitor); each one only writes its own slot.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};
use std::sync::Arc;

use crate::api::v1::extractors::AuthCtx;
use crate::middleware::auth::gate::Gate;

/// Router に gate を掛ける。
///
/// 例：
/// ```ignore
/// let me = Router::new().route("/me", get(me));
/// let me = middleware::auth::access::apply(me, Gate::verify(auth.clone(), OnFailure::Default));
/// app = app.merge(me);
/// ```
pub fn apply<S>(router: Router<S>, gate: Gate) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    // route_layer: 存在しないパスは gate を通さず 404 のまま
    router.route_layer(middleware::from_fn_with_state(Arc::new(gate), gate_middleware))
}

async fn gate_middleware(
    State(gate): State<Arc<Gate>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // middleware → gate → extractor へ、AuthCtx は値として受け渡す
    let ctx = req.extensions_mut().remove::<AuthCtx>().unwrap_or_default();

    match gate.run(req.headers(), ctx).await {
        Ok(ctx) => {
            req.extensions_mut().insert(ctx);
            next.run(req).await
        }
        Err(rejection) => rejection,
    }
}
