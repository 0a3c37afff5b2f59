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

//! Comparison of string sets the API may return reordered or recased

use tf_provider::value::{Value, ValueSet, ValueString};
use tracing::debug;

use crate::fields::{set_strings, value_set};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct StrSetOpts {
    pub ignore_order: bool,
    pub case_insensitive: bool,
}

impl StrSetOpts {
    pub const ORDER: StrSetOpts = StrSetOpts {
        ignore_order: true,
        case_insensitive: false,
    };
    pub const ORDER_AND_CASE: StrSetOpts = StrSetOpts {
        ignore_order: true,
        case_insensitive: true,
    };
}

pub(crate) fn normalize(items: &[String], opts: StrSetOpts) -> Vec<String> {
    let mut normalized = if opts.case_insensitive {
        items.iter().map(|item| item.to_lowercase()).collect()
    } else {
        items.to_vec()
    };
    if opts.ignore_order {
        normalized.sort();
    }
    normalized
}

/// Set to store after reading `remote`
///
/// The prior set is kept when both are equal once normalized.
/// An unset attribute stays unset while the API returns nothing.
pub(crate) fn reconcile_str_set<'a>(
    attribute: &str,
    prior: &ValueSet<ValueString<'a>>,
    remote: Option<Vec<String>>,
    opts: StrSetOpts,
) -> ValueSet<ValueString<'a>> {
    let remote = remote.unwrap_or_default();
    if prior.is_null() && remote.is_empty() {
        return Value::Null;
    }
    if prior.is_value() && normalize(&set_strings(prior), opts) == normalize(&remote, opts) {
        debug!(attribute, "remote set equals the prior one, keeping it");
        return prior.clone();
    }
    value_set(remote)
}

/// Comma separated list, trimmed and sorted
pub(crate) fn normalize_str_list(list: &str) -> Vec<String> {
    let mut items = list
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect::<Vec<_>>();
    items.sort();
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn permutations_normalize_equally() {
        let a = strings(&["DE", "fr", "Us"]);
        let b = strings(&["us", "DE", "FR"]);
        assert_eq!(
            normalize(&a, StrSetOpts::ORDER_AND_CASE),
            normalize(&b, StrSetOpts::ORDER_AND_CASE)
        );
        assert_ne!(normalize(&a, StrSetOpts::ORDER), normalize(&b, StrSetOpts::ORDER));
        assert_eq!(
            normalize(&strings(&["b", "a"]), StrSetOpts::default()),
            strings(&["b", "a"])
        );
    }

    #[test]
    fn equal_sets_keep_prior_state() {
        let prior = value_set(strings(&["de", "FR"]));
        let reconciled = reconcile_str_set(
            "blocked_countries",
            &prior,
            Some(strings(&["fr", "DE"])),
            StrSetOpts::ORDER_AND_CASE,
        );
        assert_eq!(reconciled, prior);
    }

    #[test]
    fn changed_sets_take_remote_value() {
        let prior = value_set(strings(&["de"]));
        let reconciled = reconcile_str_set(
            "blocked_countries",
            &prior,
            Some(strings(&["DE", "FR"])),
            StrSetOpts::ORDER_AND_CASE,
        );
        assert_eq!(reconciled, value_set(strings(&["DE", "FR"])));
    }

    #[test]
    fn unset_attribute_stays_null_on_empty_remote() {
        let reconciled =
            reconcile_str_set("blocked_ips", &Value::Null, Some(vec![]), StrSetOpts::ORDER);
        assert!(reconciled.is_null());
        let reconciled = reconcile_str_set("blocked_ips", &Value::Null, None, StrSetOpts::ORDER);
        assert!(reconciled.is_null());
    }

    #[test]
    fn comma_lists_are_trimmed_and_sorted() {
        assert_eq!(
            normalize_str_list("woff, eot,ttf , "),
            strings(&["eot", "ttf", "woff"])
        );
    }
}
