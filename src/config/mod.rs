// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod builder;
mod loader;

pub mod consts;

pub use builder::{validate_capacity, DispatcherBuilder};
pub use loader::{
    load_and_validate_config, load_config, parse_toml, parse_yaml, Config, DispatcherOptions,
};
