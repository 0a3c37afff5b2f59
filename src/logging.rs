// This file is part of the terraform-provider-bunny project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Log output of the provider process
//!
//! Terraform forwards what plugins write on stderr to its own log.
//! When `PLUGIN_LOG_FILE` is set, [`tf_provider::serve`] installs its own file subscriber instead.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives
pub const LOG_FILTER_ENV: &str = "TF_LOG_PROVIDER_BUNNY";
/// Filter used when [`LOG_FILTER_ENV`] is unset or invalid
pub const DEFAULT_LOG_FILTER: &str = "warn";

const PLUGIN_LOG_FILE_ENV: &str = "PLUGIN_LOG_FILE";

/// Install the stderr subscriber, unless the server is going to log to a file
pub fn init() {
    if std::env::var_os(PLUGIN_LOG_FILE_ENV).is_some() {
        return;
    }

    // stdout carries the plugin handshake
    let result = tracing_subscriber::fmt()
        .with_env_filter(filter(std::env::var(LOG_FILTER_ENV).ok().as_deref()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
    if let Err(err) = result {
        eprintln!("could not install log subscriber: {err}");
    }
}

fn filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_filter() {
        assert_eq!(filter(None).to_string(), DEFAULT_LOG_FILTER);
    }

    #[test]
    fn keeps_valid_directives() {
        assert_eq!(
            filter(Some("terraform_provider_bunny=debug")).to_string(),
            "terraform_provider_bunny=debug"
        );
    }
}
