/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 * - auth::access::apply(...), cors::apply(...), http::apply(...) など
 */
pub mod auth;
pub mod cors;
pub mod http;
