// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod dispatch;

pub use config::ConfigurationError;
pub use dispatch::DispatchError;
