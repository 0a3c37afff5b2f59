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

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::debug;

use tf_provider::schema::Schema;
use tf_provider::value::Value;
use tf_provider::{AttributePath, Diagnostics};

pub(crate) trait WithSchema {
    fn schema() -> Schema;
}

pub(crate) trait WithValidate {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath);
}

impl<T: WithValidate> WithValidate for Value<T> {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        if let Value::Value(value) = self {
            value.validate(diags, attr_path);
        }
    }
}

/// Report a failed API call
pub(crate) fn report(diags: &mut Diagnostics, summary: &'static str, err: &bunny_client::Error) {
    debug!(summary, error = %err, "bunny.net request failed");
    diags.root_error(summary, err.to_string());
}

pub(crate) fn no_errors(diags: &Diagnostics) -> Option<()> {
    if diags.errors.is_empty() {
        Some(())
    } else {
        None
    }
}

/// Current time, as stored in `last_updated`
pub(crate) fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_is_rfc3339() {
        let now = now_rfc3339();
        assert!(OffsetDateTime::parse(&now, &Rfc3339).is_ok());
    }

    #[test]
    fn api_errors_keep_their_message() {
        let err = bunny_client::classify_response(
            400,
            "https://api.bunny.net/pullzone",
            br#"{"ErrorKey": "pullzone.name_taken", "Field": "Name", "Message": "The name is already taken"}"#,
        );
        let mut diags = Diagnostics::default();
        report(&mut diags, "creating pull zone failed", &err);
        assert_eq!(diags.errors[0].summary, "creating pull zone failed");
        assert!(diags.errors[0].detail.contains("The name is already taken"));
        assert_eq!(no_errors(&diags), None);
    }
}
