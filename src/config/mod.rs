// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod interface;
mod interface_map;
mod loader;
mod runtime;
mod validation;
pub mod write_selector;

pub mod consts;

pub use interface::{InterfaceKind, MethodDescriptor, MethodKind, ParamDescriptor, ProjectionInterface};
pub use interface_map::InterfaceMap;
pub use loader::{
    load_and_validate_interfaces, load_interfaces, load_projector_config, Flag, ProjectorConfig,
};
pub use runtime::ProjectorBuilder;
pub use validation::validate_projection_interface;
pub use write_selector::{
    is_legal_for_mutation, is_legal_template_for_mutation, keeps_predicate_shape, parse_write_path,
    WritePath, WriteStep,
};
