//! API feature clients. Each feature owns its request/response types and the
//! endpoint wrappers built on the shared HTTP helpers in `crate::client`.

pub mod recovery;
