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

//! `timeouts` block of the hostname resource

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, NestedBlock};
use tf_provider::value::{Value, ValueString};
use tf_provider::map;

use crate::fields::attribute;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Timeouts<'a> {
    #[serde(borrow = "'a")]
    pub create: ValueString<'a>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid duration {0:?}, expected numbers followed by a unit among h, m and s, like \"1h30m\"")]
pub struct InvalidDuration(pub String);

impl Timeouts<'_> {
    pub fn block() -> NestedBlock {
        NestedBlock::Optional(Block {
            attributes: map! {
                "create" => attribute(AttributeType::String, AttributeConstraint::Optional, "How long to wait for the hostname to be created, including its free certificate"),
            },
            description: Description::plain("Operation timeouts"),
            ..Default::default()
        })
    }
}

/// Parse durations like `20m`, `45s` or `1h30m`
pub fn parse_duration(duration: &str) -> Result<Duration, InvalidDuration> {
    let invalid = || InvalidDuration(duration.to_owned());
    let trimmed = duration.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let mut seconds = 0u64;
    let mut number: Option<u64> = None;
    for c in trimmed.chars() {
        if let Some(digit) = c.to_digit(10) {
            let value = number.unwrap_or(0);
            number = Some(
                value
                    .checked_mul(10)
                    .and_then(|value| value.checked_add(digit.into()))
                    .ok_or_else(invalid)?,
            );
            continue;
        }
        let unit = match c {
            'h' => 3600,
            'm' => 60,
            's' => 1,
            _ => return Err(invalid()),
        };
        let value = number.take().ok_or_else(invalid)?;
        seconds = value
            .checked_mul(unit)
            .and_then(|v| seconds.checked_add(v))
            .ok_or_else(invalid)?;
    }
    if number.is_some() {
        return Err(invalid());
    }
    Ok(Duration::from_secs(seconds))
}

/// Create timeout set in `timeouts`, `default` when none is set
pub fn create_timeout(
    timeouts: &Value<Timeouts>,
    default: Duration,
) -> Result<Duration, InvalidDuration> {
    match timeouts
        .as_ref_option()
        .and_then(|timeouts| timeouts.create.as_deref_option())
    {
        Some(create) => parse_duration(create),
        None => Ok(default),
    }
}
