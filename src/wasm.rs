//! Browser export.
//!
//! `render_html(source, options)` takes a plain JS object whose fields
//! mirror [`Options`] in camelCase. Every field is optional.

use serde::Deserialize;
use std::collections::HashMap;
use wasm_bindgen::prelude::*;

use crate::{LinkStyle, Options, SmileyMode};

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderOptions {
    namespace: Option<String>,
    interwiki: Option<HashMap<String, String>>,
    allow_html: Option<bool>,
    typography: Option<bool>,
    page_base: Option<String>,
    media_base: Option<String>,
    path_template: Option<bool>,
    append_extension: Option<bool>,
    smiley_images: Option<bool>,
    smiley_base: Option<String>,
}

impl RenderOptions {
    fn into_options(self) -> Options {
        let mut out = Options::default();
        if let Some(namespace) = self.namespace {
            out.namespace = namespace;
        }
        if let Some(interwiki) = self.interwiki {
            out.interwiki.extend(
                interwiki
                    .into_iter()
                    .map(|(prefix, url)| (prefix.to_ascii_lowercase(), url)),
            );
        }
        if let Some(allow_html) = self.allow_html {
            out.allow_html = allow_html;
        }
        if let Some(typography) = self.typography {
            out.typography = typography;
        }
        if let Some(page_base) = self.page_base {
            out.page_base = page_base;
        }
        if let Some(media_base) = self.media_base {
            out.media_base = media_base;
        }
        if self.path_template == Some(true) {
            out.link_style = LinkStyle::PathTemplate;
        }
        if let Some(append_extension) = self.append_extension {
            out.append_extension = append_extension;
        }
        if self.smiley_images == Some(true) {
            out.smileys = SmileyMode::Image;
        }
        if let Some(smiley_base) = self.smiley_base {
            out.smiley_base = smiley_base;
        }
        out
    }
}

/// Render wiki markup to HTML.
#[wasm_bindgen]
pub fn render_html(source: &str, options: JsValue) -> String {
    crate::to_html_with_options(source, &options_from_js(options))
}

/// Unreadable options fall back to the defaults.
fn options_from_js(value: JsValue) -> Options {
    if value.is_null() || value.is_undefined() {
        return Options::default();
    }
    match serde_wasm_bindgen::from_value::<RenderOptions>(value) {
        Ok(parsed) => parsed.into_options(),
        Err(err) => {
            log::error!("invalid render options, using defaults: {err}");
            Options::default()
        }
    }
}
