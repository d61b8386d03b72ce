//! Generator bodies for the three service variants.
//!
//! Each generator is a composition of builders and cannot fail. The
//! functions are public so callers can assemble custom registries from them.

pub mod api;
pub mod broker;
pub mod listener;
pub mod shared;

use crate::domain::{
    registry::GeneratorRegistry,
    value_objects::{Bucket, Variant},
};

/// The pre-registered bundle of `variant`.
pub(crate) fn bundle(variant: Variant) -> GeneratorRegistry {
    match variant {
        Variant::Api => GeneratorRegistry::new()
            .with_generator(Bucket::Config, api::config_file)
            .with_generator(Bucket::Routes, shared::routes_file)
            .with_generator(Bucket::Main, shared::http_main_file)
            .with_generator(Bucket::Handlers, shared::handler_files),
        Variant::Broker => GeneratorRegistry::new()
            .with_generator(Bucket::Config, broker::config_file)
            .with_generator(Bucket::Routes, shared::routes_file)
            .with_generator(Bucket::Main, shared::http_main_file)
            .with_generator(Bucket::Handlers, shared::handler_files)
            .with_generator(Bucket::Event, broker::emitter_file)
            .with_generator(Bucket::Event, broker::event_file),
        Variant::Listener => GeneratorRegistry::new()
            .with_generator(Bucket::Config, listener::config_file)
            .with_generator(Bucket::Main, listener::main_file)
            .with_generator(Bucket::Event, listener::consumer_file)
            .with_generator(Bucket::Event, listener::event_file),
    }
}
