// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The projection engine.
//!
//! A [`Projector`] validates interface descriptors, builds one
//! [`DispatchTable`] per interface and binds interfaces to documents. The
//! resulting [`Projection`] answers method calls by name:
//!
//! * identity operations (`equals`, `hashCode`, `toString`, DOM access) are
//!   answered directly
//! * methods of a capability with a registered mixin are delegated to it
//! * read, write and delete methods render their selector template with the call
//!   arguments and run it against the bound node

mod dispatch;
mod invocation;
mod io;
mod mixins;
mod projection;
mod projector;
mod read;
mod sync;
mod write;

#[cfg(test)]
mod integration_tests;

pub use dispatch::{DispatchEntry, DispatchTable, IdentityOp, MethodBinding, Operation};
pub use io::{FileIo, ProjectorIo};
pub use mixins::MixinRegistry;
pub use projection::Projection;
pub use projector::{MixinBuilder, Projector};
