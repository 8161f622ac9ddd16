//! Composition of the generated state, handlers and operations.

use crate::config::StoreConfig;
use crate::core::{NamingConvention, StoreState};
use crate::descriptor::ResourceDescriptor;
use crate::generate::operations::{build_operations, OperationMap};
use crate::generate::state_shape::build_state;
use crate::generate::transitions::{build_transitions, TransitionHandlerMap};
use crate::validation::{check, DescriptorError};
use tracing::debug;

/// Everything generated from one descriptor, handed to the host runtime.
#[derive(Clone, Debug)]
pub struct StoreModule {
    pub state: StoreState,
    pub mutations: TransitionHandlerMap,
    pub actions: OperationMap,
}

/// Validate `descriptor` under the default configuration, then generate.
pub fn assemble(descriptor: &ResourceDescriptor) -> Result<StoreModule, DescriptorError> {
    assemble_with(descriptor, &StoreConfig::default())
}

/// Validate `descriptor` under `config`, then generate.
pub fn assemble_with(
    descriptor: &ResourceDescriptor,
    config: &StoreConfig,
) -> Result<StoreModule, DescriptorError> {
    check(descriptor, &config.naming)?;
    Ok(assemble_unchecked(descriptor, &config.naming))
}

/// Generate without validating; colliding properties or names silently
/// overwrite each other, last declaration winning.
pub fn assemble_unchecked(descriptor: &ResourceDescriptor, naming: &NamingConvention) -> StoreModule {
    let module = StoreModule {
        state: build_state(descriptor),
        mutations: build_transitions(descriptor, naming),
        actions: build_operations(descriptor),
    };

    debug!(
        operations = descriptor.len(),
        mutations = module.mutations.len(),
        actions = module.actions.len(),
        "assembled store module"
    );

    module
}
