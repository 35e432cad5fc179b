// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::engine::Projection;
use crate::errors::ProjectionError;
use crate::types::Value;

/// Extra behavior attached to a projection interface.
///
/// A mixin implements one or more capability interfaces. When it is registered for
/// a projection interface it is indexed under every capability that the projection
/// interface also extends (or the projection interface itself), and calls to
/// methods declared by those capabilities are delegated to it.
pub trait Mixin: Send + Sync {
    /// Capability interfaces this mixin implements
    fn capabilities(&self) -> Vec<String>;

    /// Handle a delegated call. `receiver` is the projection the call was made on,
    /// so the mixin can call back into projection methods.
    fn invoke(
        &self,
        receiver: &Projection,
        method: &str,
        args: &[Value],
    ) -> Result<Value, ProjectionError>;
}
