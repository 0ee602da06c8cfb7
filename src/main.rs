//! ferrowiki CLI - render wiki markup to HTML

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser};
use ferrowiki::{LinkStyle, Options, SmileyMode};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("input is empty")]
    EmptyInput,
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "ferrowiki", version, about = "Render wiki markup to HTML")]
struct Cli {
    /// Input file; reads stdin when omitted or `-`
    input: Option<PathBuf>,

    /// Namespace of the rendered page
    #[arg(long, env = "WIKI_NAMESPACE", default_value = "")]
    namespace: String,

    /// Extra interwiki prefixes as `prefix=url`, comma separated
    #[arg(long, env = "WIKI_INTERWIKI", value_delimiter = ',', value_parser = parse_interwiki)]
    interwiki: Vec<(String, String)>,

    /// Pass <html> and <php> content through unescaped
    #[arg(long, env = "WIKI_ALLOW_HTML")]
    allow_html: bool,

    /// Typographic replacements (arrows, dashes, quotes)
    #[arg(long, env = "WIKI_TYPOGRAPHY", default_value_t = true, action = ArgAction::Set)]
    typography: bool,

    /// Base of page links
    #[arg(long, env = "WIKI_PAGE_BASE", default_value = "/doku.php")]
    page_base: String,

    /// Base of media links
    #[arg(long, env = "WIKI_MEDIA_BASE", default_value = "/lib/exe/fetch.php")]
    media_base: String,

    /// Build path-style links (`base/ns/page`) instead of `?id=` queries
    #[arg(long, env = "WIKI_PATH_TEMPLATE")]
    path_template: bool,

    /// Append `.html` to path-style page links
    #[arg(long, env = "WIKI_APPEND_EXTENSION")]
    append_extension: bool,

    /// Render smileys as images instead of emoji
    #[arg(long, env = "WIKI_SMILEY_IMAGES")]
    smiley_images: bool,

    /// Directory of smiley images
    #[arg(long, env = "WIKI_SMILEY_BASE", default_value = "/lib/images/smileys")]
    smiley_base: String,
}

impl Cli {
    fn options(&self) -> Options {
        let mut interwiki = Options::default_interwiki();
        interwiki.extend(self.interwiki.iter().cloned());
        Options {
            namespace: self.namespace.clone(),
            interwiki,
            allow_html: self.allow_html,
            typography: self.typography,
            page_base: self.page_base.clone(),
            media_base: self.media_base.clone(),
            link_style: if self.path_template {
                LinkStyle::PathTemplate
            } else {
                LinkStyle::Query
            },
            append_extension: self.append_extension,
            smileys: if self.smiley_images {
                SmileyMode::Image
            } else {
                SmileyMode::Emoji
            },
            smiley_base: self.smiley_base.clone(),
        }
    }
}

fn parse_interwiki(entry: &str) -> Result<(String, String), String> {
    let (prefix, url) = entry
        .split_once('=')
        .ok_or_else(|| format!("expected `prefix=url`, got `{entry}`"))?;
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Err(format!("missing interwiki prefix in `{entry}`"));
    }
    Ok((prefix.to_ascii_lowercase(), url.trim().to_string()))
}

fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    let input = match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)?,
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    if input.trim().is_empty() {
        return Err(CliError::EmptyInput);
    }
    Ok(input)
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let input = read_input(cli.input.as_deref())?;
    log::debug!("rendering {} bytes", input.len());
    let html = ferrowiki::to_html_with_options(&input, &cli.options());
    io::stdout().write_all(html.as_bytes())?;
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("ferrowiki: {err}");
        process::exit(1);
    }
}
