//! # varicache
//!
//! An on-demand image variant cache in front of an object store. Clients ask
//! for an image by a name that may carry target dimensions; the first request
//! for a size derives it from the original, every later request is served
//! the stored result.
//!
//! ```text
//! GET /photos/trips/cat_w300_h200.webp
//!      ──┬─── ───────────┬──────────
//!   container         variant (cache key, 300×200)
//! ```
//!
//! # Request Lifecycle
//!
//! ```text
//! 1. Parse        path      →  (container, variant, width, height)
//! 2. Resolve      exists?   →  cached bytes, or base image bytes
//! 3. Materialize  (miss)    →  cover-fit resize + WebP encode
//! 4. Respond      200 image/webp, Cache-Control: public, max-age=2629440
//! 5. Write back   (miss)    →  store under the variant name, not awaited
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | `_w<N>` / `_h<N>` naming convention: path parsing, dimension extraction, base-name stripping |
//! | [`resolve`] | Existence check, syntactic fallback to the base image, materialization on a miss |
//! | [`imaging`] | Codec seam ([`imaging::ImageBackend`]) and the pure-Rust WebP backend |
//! | [`storage`] | Storage seam ([`storage::ObjectStore`]) with filesystem and in-memory stores |
//! | [`server`] | axum router, response mapping, fire-and-forget write-back |
//! | [`config`] | `varicache.toml` loading and validation |
//!
//! # Design Decisions
//!
//! ## The Name Is The Cache Key
//!
//! There is no index from originals to their variants. A miss derives the
//! base name by deleting the dimension tokens from the requested name, so
//! resolution costs one existence check and one read. A missing name without
//! dimension tokens has nothing to fall back to and fails.
//!
//! ## Deterministic Output
//!
//! A variant is stored forever once derived, and two concurrent requests for
//! the same missing variant both derive and both write it. Lossless WebP with
//! a fixed resampling filter makes those writes byte-identical, so the race
//! is harmless.
//!
//! ## Write-Back Is Not Awaited
//!
//! The write-back runs as a detached task spawned alongside the response.
//! It may run before, during or after the body is sent. A slow or failing
//! store write never delays or changes the response.

pub mod config;
pub mod imaging;
pub mod naming;
pub mod resolve;
pub mod server;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_helpers;
