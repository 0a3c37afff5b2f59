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

//! Bunny Optimizer settings
//!
//! The optimizer block nests two more optional blocks.
//! Both are flattened only when the configuration uses them.

use std::borrow::Cow;

use bunny_client::PullZoneSettings;
use serde::{Deserialize, Serialize};

use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, NestedBlock};
use tf_provider::value::{self, Value, ValueBool, ValueNumber, ValueString};
use tf_provider::{map, AttributePath, Diagnostics};

use crate::fields::{attribute, default_to, known, known_i32, known_str, validate_int32};
use crate::utils::WithValidate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Optimizer<'a> {
    pub enabled: ValueBool,
    pub enable_webp: ValueBool,
    pub minify_css: ValueBool,
    pub minify_javascript: ValueBool,
    pub enable_manipulation_engine: ValueBool,
    #[serde(with = "value::serde_as_vec")]
    pub smart_image_optimization: Value<SmartImageOptimization>,
    #[serde(borrow = "'a")]
    #[serde(with = "value::serde_as_vec")]
    pub watermark: Value<Watermark<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SmartImageOptimization {
    pub enabled: ValueBool,
    pub desktop_max_width: ValueNumber,
    pub image_quality: ValueNumber,
    pub mobile_max_width: ValueNumber,
    pub mobile_image_quality: ValueNumber,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Watermark<'a> {
    pub enabled: ValueBool,
    #[serde(borrow = "'a")]
    pub url: ValueString<'a>,
    pub offset: Value<f64>,
    pub min_image_size: ValueNumber,
    pub position: ValueNumber,
}

impl<'a> Optimizer<'a> {
    pub(super) fn block() -> Block {
        use AttributeConstraint::OptionalComputed;
        use AttributeType::{Bool, Number};
        Block {
            attributes: map! {
                "enabled" => attribute(Bool, OptionalComputed, "Enable the optimizer for this zone"),
                "enable_webp" => attribute(Bool, OptionalComputed, "Convert images to WebP when the client supports it"),
                "minify_css" => attribute(Bool, OptionalComputed, "Minify CSS files"),
                "minify_javascript" => attribute(Bool, OptionalComputed, "Minify JavaScript files"),
                "enable_manipulation_engine" => attribute(Bool, OptionalComputed, "Enable URL based image manipulation"),
            },
            blocks: map! {
                "smart_image_optimization" => NestedBlock::Optional(Block {
                    attributes: map! {
                        "enabled" => attribute(Bool, OptionalComputed, "Resize and compress images for desktop and mobile clients"),
                        "desktop_max_width" => attribute(Number, OptionalComputed, "Maximum image width for desktop clients"),
                        "image_quality" => attribute(Number, OptionalComputed, "Image quality for desktop clients"),
                        "mobile_max_width" => attribute(Number, OptionalComputed, "Maximum image width for mobile clients"),
                        "mobile_image_quality" => attribute(Number, OptionalComputed, "Image quality for mobile clients"),
                    },
                    description: Description::plain("Automatic image optimization"),
                    ..Default::default()
                }),
                "watermark" => NestedBlock::Optional(Block {
                    attributes: map! {
                        "enabled" => attribute(Bool, OptionalComputed, "Add a watermark to images"),
                        "url" => attribute(AttributeType::String, AttributeConstraint::Optional, "URL of the watermark image"),
                        "offset" => attribute(Number, OptionalComputed, "Offset of the watermark image"),
                        "min_image_size" => attribute(Number, OptionalComputed, "Minimum size of images the watermark is added to"),
                        "position" => attribute(Number, OptionalComputed, "Position of the watermark image"),
                    },
                    description: Description::plain("Image watermarking"),
                    ..Default::default()
                }),
            },
            description: Description::plain("Bunny Optimizer settings"),
            ..Default::default()
        }
    }

    pub(super) fn apply_defaults(&mut self, config: &Self) {
        default_to(&mut self.enabled, &config.enabled, false);
        default_to(&mut self.enable_webp, &config.enable_webp, true);
        default_to(&mut self.minify_css, &config.minify_css, true);
        default_to(&mut self.minify_javascript, &config.minify_javascript, true);
        default_to(
            &mut self.enable_manipulation_engine,
            &config.enable_manipulation_engine,
            true,
        );
        if let (Value::Value(planned), Value::Value(config)) =
            (&mut self.smart_image_optimization, &config.smart_image_optimization)
        {
            default_to(&mut planned.enabled, &config.enabled, true);
            default_to(&mut planned.desktop_max_width, &config.desktop_max_width, 1600);
            default_to(&mut planned.image_quality, &config.image_quality, 85);
            default_to(&mut planned.mobile_max_width, &config.mobile_max_width, 800);
            default_to(&mut planned.mobile_image_quality, &config.mobile_image_quality, 70);
        }
        if let (Value::Value(planned), Value::Value(config)) = (&mut self.watermark, &config.watermark) {
            default_to(&mut planned.enabled, &config.enabled, true);
            default_to(&mut planned.offset, &config.offset, 3.0);
            default_to(&mut planned.min_image_size, &config.min_image_size, 300);
            default_to(&mut planned.position, &config.position, 0);
        }
    }

    pub(super) fn expand(&self, settings: &mut PullZoneSettings) {
        settings.optimizer_enabled = known(&self.enabled);
        settings.optimizer_enable_webp = known(&self.enable_webp);
        settings.optimizer_minify_css = known(&self.minify_css);
        settings.optimizer_minify_javascript = known(&self.minify_javascript);
        settings.optimizer_enable_manipulation_engine = known(&self.enable_manipulation_engine);

        if let Value::Value(smart) = &self.smart_image_optimization {
            settings.optimizer_automatic_optimization_enabled = known(&smart.enabled);
            settings.optimizer_desktop_max_width = known_i32(&smart.desktop_max_width);
            settings.optimizer_image_quality = known_i32(&smart.image_quality);
            settings.optimizer_mobile_max_width = known_i32(&smart.mobile_max_width);
            settings.optimizer_mobile_image_quality = known_i32(&smart.mobile_image_quality);
        }
        if let Value::Value(watermark) = &self.watermark {
            settings.optimizer_watermark_enabled = known(&watermark.enabled);
            settings.optimizer_watermark_url = known_str(&watermark.url);
            settings.optimizer_watermark_offset = known(&watermark.offset);
            settings.optimizer_watermark_min_image_size = known_i32(&watermark.min_image_size);
            settings.optimizer_watermark_position = known_i32(&watermark.position);
        }
    }

    /// `flatten_all` also fills the nested blocks that are absent from `prior`
    pub(super) fn flatten(settings: &PullZoneSettings, prior: &Self, flatten_all: bool) -> Self {
        let smart_image_optimization = if flatten_all || prior.smart_image_optimization.is_value() {
            Value::Value(SmartImageOptimization {
                enabled: settings.optimizer_automatic_optimization_enabled.into(),
                desktop_max_width: settings.optimizer_desktop_max_width.map(i64::from).into(),
                image_quality: settings.optimizer_image_quality.map(i64::from).into(),
                mobile_max_width: settings.optimizer_mobile_max_width.map(i64::from).into(),
                mobile_image_quality: settings
                    .optimizer_mobile_image_quality
                    .map(i64::from)
                    .into(),
            })
        } else {
            Value::Null
        };

        let watermark = match (&prior.watermark, flatten_all) {
            (Value::Value(prior), _) => Value::Value(Watermark::flatten(settings, &prior.url)),
            (_, true) => Value::Value(Watermark::flatten(settings, &Value::Null)),
            _ => Value::Null,
        };

        Self {
            enabled: settings.optimizer_enabled.into(),
            enable_webp: settings.optimizer_enable_webp.into(),
            minify_css: settings.optimizer_minify_css.into(),
            minify_javascript: settings.optimizer_minify_javascript.into(),
            enable_manipulation_engine: settings.optimizer_enable_manipulation_engine.into(),
            smart_image_optimization,
            watermark,
        }
    }
}

impl<'a> Watermark<'a> {
    fn flatten(settings: &PullZoneSettings, prior_url: &ValueString<'a>) -> Self {
        let url = match settings.optimizer_watermark_url.as_deref() {
            None | Some("") if !prior_url.is_value() => Value::Null,
            url => url.map(|url| Cow::Owned(url.to_owned())).into(),
        };
        Self {
            enabled: settings.optimizer_watermark_enabled.into(),
            url,
            offset: settings.optimizer_watermark_offset.into(),
            min_image_size: settings
                .optimizer_watermark_min_image_size
                .map(i64::from)
                .into(),
            position: settings.optimizer_watermark_position.map(i64::from).into(),
        }
    }
}

impl<'a> WithValidate for Optimizer<'a> {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        if let Value::Value(smart) = &self.smart_image_optimization {
            let path = attr_path.clone().attribute("smart_image_optimization").index(0);
            for (name, value) in [
                ("desktop_max_width", &smart.desktop_max_width),
                ("image_quality", &smart.image_quality),
                ("mobile_max_width", &smart.mobile_max_width),
                ("mobile_image_quality", &smart.mobile_image_quality),
            ] {
                validate_int32(diags, value, path.clone().attribute(name));
            }
        }
        if let Value::Value(watermark) = &self.watermark {
            let path = attr_path.attribute("watermark").index(0);
            validate_int32(diags, &watermark.min_image_size, path.clone().attribute("min_image_size"));
            validate_int32(diags, &watermark.position, path.attribute("position"));
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn remote() -> PullZoneSettings {
        PullZoneSettings {
            optimizer_enabled: Some(true),
            optimizer_enable_webp: Some(false),
            optimizer_minify_css: Some(true),
            optimizer_minify_javascript: Some(false),
            optimizer_enable_manipulation_engine: Some(true),
            optimizer_automatic_optimization_enabled: Some(true),
            optimizer_desktop_max_width: Some(1920),
            optimizer_image_quality: Some(90),
            optimizer_mobile_max_width: Some(640),
            optimizer_mobile_image_quality: Some(60),
            optimizer_watermark_enabled: Some(true),
            optimizer_watermark_url: Some("https://example.com/mark.png".to_owned()),
            optimizer_watermark_offset: Some(2.5),
            optimizer_watermark_min_image_size: Some(400),
            optimizer_watermark_position: Some(3),
            ..Default::default()
        }
    }

    #[test]
    fn flatten_then_expand_reproduces_settings() {
        let flat = Optimizer::flatten(&remote(), &Optimizer::default(), true);
        let mut settings = PullZoneSettings::default();
        flat.expand(&mut settings);
        assert_eq!(settings, remote());
    }

    #[test]
    fn nested_blocks_follow_prior_state() {
        let prior = Optimizer {
            smart_image_optimization: Value::Value(Default::default()),
            ..Default::default()
        };
        let flat = Optimizer::flatten(&remote(), &prior, false);
        assert!(flat.smart_image_optimization.is_value());
        assert!(flat.watermark.is_null());

        let mut settings = PullZoneSettings::default();
        flat.expand(&mut settings);
        assert_eq!(settings.optimizer_desktop_max_width, Some(1920));
        assert_eq!(settings.optimizer_watermark_url, None);
    }

    #[test]
    fn nested_defaults_need_the_block() {
        let config = Optimizer {
            watermark: Value::Value(Default::default()),
            ..Default::default()
        };
        let mut planned = config.clone();
        planned.apply_defaults(&config);
        assert!(planned.smart_image_optimization.is_null());
        let watermark = planned.watermark.as_ref_option().unwrap();
        assert_eq!(watermark.offset, Value::Value(3.0));
        assert_eq!(watermark.min_image_size, Value::Value(300));
        assert!(watermark.url.is_null());
        assert_eq!(planned.minify_css, Value::Value(true));
    }
}
