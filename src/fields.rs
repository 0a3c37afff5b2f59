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

//! Conversions between Terraform values and API fields
//!
//! Request builders only send the fields that hold a value: `Null` and `Unknown` become `None`.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt::Display;

use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Description};
use tf_provider::value::{Value, ValueNumber, ValueSet, ValueString};
use tf_provider::{AttributePath, Diagnostics};

/// Value of a field, if it is known
pub(crate) fn known<T: Clone>(value: &Value<T>) -> Option<T> {
    value.as_ref_option().cloned()
}

pub(crate) fn known_str(value: &ValueString) -> Option<String> {
    value.as_deref_option().map(str::to_owned)
}

/// Known number narrowed to an `i32`, range is checked by [`validate_int32`]
pub(crate) fn known_i32(value: &ValueNumber) -> Option<i32> {
    value.as_ref_option().and_then(|v| i32::try_from(*v).ok())
}

/// Plan the default of an optional attribute that is absent from the config
pub(crate) fn default_to<T>(planned: &mut Value<T>, config: &Value<T>, default: T) {
    if config.is_null() {
        *planned = Value::Value(default);
    }
}

pub(crate) fn default_str<'a>(planned: &mut ValueString<'a>, config: &ValueString, default: &'a str) {
    if config.is_null() {
        *planned = Value::Value(Cow::Borrowed(default));
    }
}

/// Keep the value a computed attribute had before
pub(crate) fn keep_prior<T: Clone>(planned: &mut Value<T>, prior: &Value<T>) {
    *planned = prior.clone();
}

pub(crate) fn computed_unknown<T>(planned: &mut Value<T>) {
    *planned = Value::Unknown;
}

/// Value to store after an apply, an applied state holds no `Unknown`
pub(crate) fn settled<T: Clone>(value: &Value<T>) -> Value<T> {
    match value {
        Value::Unknown => Value::Null,
        value => value.clone(),
    }
}

/// Value read back for an optional attribute without default
///
/// A zero value is kept `Null` when the attribute was not set, so that an unset
/// attribute does not show a difference after every refresh.
pub(crate) fn from_remote<T: Default + PartialEq>(prior: &Value<T>, remote: Option<T>) -> Value<T> {
    match remote {
        Some(value) if !(prior.is_null() && value == T::default()) => Value::Value(value),
        _ => Value::Null,
    }
}

pub(crate) fn from_remote_str<'a>(prior: &ValueString, remote: Option<String>) -> ValueString<'a> {
    from_remote(&prior.as_ref().map(|s| s.to_string()), remote).map(Cow::Owned)
}

pub(crate) fn string_value<'a>(remote: Option<String>) -> ValueString<'a> {
    Value::from(remote.map(Cow::Owned))
}

/// Parse a numeric remote id stored as a string
pub(crate) fn id_as_i64(diags: &mut Diagnostics, id: &ValueString) -> Option<i64> {
    let Some(raw) = id.as_deref_option() else {
        diags.error_short("id is not known", AttributePath::new("id"));
        return None;
    };
    match raw.parse() {
        Ok(id) => Some(id),
        Err(err) => {
            diags.error(
                format!("invalid id {raw:?}"),
                format!("the id must be a number: {err}"),
                AttributePath::new("id"),
            );
            None
        }
    }
}

pub(crate) fn required_number(
    diags: &mut Diagnostics,
    value: &ValueNumber,
    name: &'static str,
) -> Option<i64> {
    let number = value.as_ref_option().copied();
    if number.is_none() {
        diags.error_short(format!("{name} is not known"), AttributePath::new(name));
    }
    number
}

pub(crate) fn value_set<'a>(items: impl IntoIterator<Item = String>) -> ValueSet<ValueString<'a>> {
    Value::Value(
        items
            .into_iter()
            .map(|item| Value::Value(Cow::Owned(item)))
            .collect::<BTreeSet<_>>(),
    )
}

/// Set content to send to the API
///
/// A `Null` set clears the remote list, an `Unknown` set leaves it untouched.
pub(crate) fn set_as_vec(set: &ValueSet<ValueString>) -> Option<Vec<String>> {
    match set {
        Value::Value(items) => Some(
            items
                .iter()
                .filter_map(|item| item.as_deref_option().map(str::to_owned))
                .collect(),
        ),
        Value::Null => Some(Vec::new()),
        Value::Unknown => None,
    }
}

/// Strings of a set, `Null` and `Unknown` being empty
pub(crate) fn set_strings(set: &ValueSet<ValueString>) -> Vec<String> {
    set.iter()
        .flatten()
        .filter_map(|item| item.as_deref_option().map(str::to_owned))
        .collect()
}

pub(crate) fn validate_int32(diags: &mut Diagnostics, value: &ValueNumber, path: AttributePath) {
    if let Value::Value(value) = value {
        if i32::try_from(*value).is_err() {
            diags.error(
                "value out of range",
                format!(
                    "{value} does not fit in a 32 bit integer ({}..={})",
                    i32::MIN,
                    i32::MAX
                ),
                path,
            );
        }
    }
}

pub(crate) fn validate_one_of<T: PartialEq + Display>(
    diags: &mut Diagnostics,
    value: &Value<T>,
    accepted: &[T],
    path: AttributePath,
) {
    if let Value::Value(value) = value {
        if !accepted.contains(value) {
            let accepted = accepted
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            diags.error(
                format!("invalid value {value}"),
                format!("expected one of: {accepted}"),
                path,
            );
        }
    }
}

pub(crate) fn attribute(
    attr_type: AttributeType,
    constraint: AttributeConstraint,
    description: &str,
) -> Attribute {
    Attribute {
        attr_type,
        description: Description::plain(description),
        constraint,
        ..Default::default()
    }
}

pub(crate) fn sensitive(attribute: Attribute) -> Attribute {
    Attribute {
        sensitive: true,
        ..attribute
    }
}

pub(crate) fn string_set() -> AttributeType {
    AttributeType::Set(AttributeType::String.into())
}
