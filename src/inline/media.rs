//! Media embeds: `{{ns:file.png?200x100&nolink|caption}}`.

use super::links::{anchor, media_href};
use super::scan::replace_delimited;
use crate::context::RenderContext;
use crate::escape::{escape_attr_into, escape_text, url_attr_into, url_encode_component_into};
use crate::limits::MAX_MEDIA_DIMENSION;
use crate::namespace::{self, Target};
use crate::placeholder::PlaceholderKind;
use crate::LinkStyle;

/// Extensions rendered inline as images.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp", "bmp", "ico"];

/// Feed aggregation is not supported; feeds render this instead.
const FEED_STUB: &str = "<em class=\"rss\">RSS feed</em>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    None,
    Left,
    Right,
    Center,
}

impl Align {
    fn class(self) -> &'static str {
        match self {
            Align::None => "media",
            Align::Left => "medialeft",
            Align::Right => "mediaright",
            Align::Center => "mediacenter",
        }
    }
}

/// How an image links to its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkMode {
    Details,
    Direct,
    NoLink,
    LinkOnly,
}

#[derive(Debug)]
struct Embed<'a> {
    src: &'a str,
    caption: Option<&'a str>,
    align: Align,
    width: Option<u32>,
    height: Option<u32>,
    mode: LinkMode,
}

fn parse(inner: &str) -> Embed<'_> {
    let (src_part, caption) = match inner.split_once('|') {
        Some((src, caption)) => (src, Some(caption.trim()).filter(|c| !c.is_empty())),
        None => (inner, None),
    };
    let align = match (src_part.starts_with(' '), src_part.ends_with(' ')) {
        (true, true) => Align::Center,
        (true, false) => Align::Right,
        (false, true) => Align::Left,
        (false, false) => Align::None,
    };

    let src_part = src_part.trim();
    let split = if src_part.contains("://") {
        src_part.rsplit_once('?')
    } else {
        src_part.split_once('?')
    };
    let (src, params) = split.unwrap_or((src_part, ""));

    let mut embed = Embed {
        src: src.trim(),
        caption,
        align,
        width: None,
        height: None,
        mode: LinkMode::Details,
    };
    for param in params.split('&').map(str::trim) {
        match param.to_ascii_lowercase().as_str() {
            "" => {}
            "nolink" => embed.mode = LinkMode::NoLink,
            "linkonly" => embed.mode = LinkMode::LinkOnly,
            "direct" => embed.mode = LinkMode::Direct,
            dims => {
                let (w, h) = dims.split_once('x').unwrap_or((dims, ""));
                if let Some(w) = parse_dimension(w) {
                    embed.width = Some(w);
                    embed.height = parse_dimension(h);
                } else {
                    log::debug!("ignoring media parameter `{param}`");
                }
            }
        }
    }
    embed
}

fn parse_dimension(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok().filter(|&n| n > 0 && n <= MAX_MEDIA_DIMENSION)
}

/// Lowercased file extension of a media source.
fn extension(src: &str) -> String {
    let path = src.split(['?', '#']).next().unwrap_or(src);
    match path.rsplit_once('.') {
        Some((_, ext)) if !ext.contains(['/', ':']) => ext.to_ascii_lowercase(),
        _ => String::new(),
    }
}

/// Whether a trimmed line consists of exactly one embed.
pub(crate) fn is_standalone_embed(line: &str) -> bool {
    let line = line.trim();
    line.len() > 4
        && line.starts_with("{{")
        && line.ends_with("}}")
        && !line[2..line.len() - 2].contains("{{")
        && !line[2..line.len() - 2].contains("}}")
}

/// `{{…}}` embeds.
pub(super) fn embeds(text: &str, ctx: &mut RenderContext<'_>) -> String {
    if !text.contains("{{") {
        return text.to_string();
    }
    replace_delimited(text, "{{", "}}", |inner| render_embed(inner, ctx))
}

fn render_embed(inner: &str, ctx: &mut RenderContext<'_>) -> Option<String> {
    let embed = parse(inner);
    if embed.src.is_empty() {
        return None;
    }
    if embed.src.starts_with("rss>") {
        log::debug!("feed `{}` rendered as stub", embed.src);
        return Some(ctx.raw(FEED_STUB));
    }

    let options = ctx.options;
    let external = embed.src.contains("://");
    let (id, url) = if external {
        (embed.src.to_string(), embed.src.to_string())
    } else {
        let id = namespace::resolve_with(embed.src, &options.namespace, Target::Media, false);
        let url = media_href(&id, options);
        (id, url)
    };
    let name = id.rsplit([':', '/']).next().unwrap_or(&id);
    let ext = extension(embed.src);
    let label = escape_text(embed.caption.unwrap_or(name));

    if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        if ctx.in_link {
            return Some(label);
        }
        let class = if ext.is_empty() {
            "mediafile".to_string()
        } else {
            format!("mediafile mf_{ext}")
        };
        let html = anchor(&url, &class, Some(&id), false, &label);
        return Some(ctx.placeholders.insert(PlaceholderKind::Link, html));
    }

    if embed.mode == LinkMode::LinkOnly {
        if ctx.in_link {
            return Some(label);
        }
        let html = anchor(&url, "media", Some(&id), false, &label);
        return Some(ctx.placeholders.insert(PlaceholderKind::Link, html));
    }

    let mut img = String::with_capacity(url.len() + 64);
    img.push_str("<img src=\"");
    url_attr_into(&mut img, &url);
    img.push_str("\" class=\"");
    img.push_str(embed.align.class());
    img.push('"');
    if let Some(width) = embed.width {
        img.push_str(&format!(" width=\"{width}\""));
    }
    if let Some(height) = embed.height {
        img.push_str(&format!(" height=\"{height}\""));
    }
    img.push_str(" alt=\"");
    escape_attr_into(&mut img, embed.caption.unwrap_or(name));
    img.push('"');
    if let Some(caption) = embed.caption {
        img.push_str(" title=\"");
        escape_attr_into(&mut img, caption);
        img.push('"');
    }
    img.push_str(" />");
    let img = ctx.placeholders.insert(PlaceholderKind::Media, img);

    if ctx.in_link || embed.mode == LinkMode::NoLink {
        return Some(img);
    }
    let href = match (embed.mode, external, options.link_style) {
        (LinkMode::Details, false, LinkStyle::Query) => {
            let mut href = format!("{}?do=media&image=", options.page_base);
            url_encode_component_into(&mut href, &id);
            href
        }
        _ => url,
    };
    let html = anchor(&href, "media", Some(&id), false, &img);
    Some(ctx.placeholders.insert(PlaceholderKind::Link, html))
}
