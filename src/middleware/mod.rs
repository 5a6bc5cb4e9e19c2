// SPDX-License-Identifier: MIT

//! Middleware modules (reverse proxy, security headers).

pub mod proxy;
pub mod security;

pub use proxy::proxy_pass;
