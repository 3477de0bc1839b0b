//! Console presentation of posts

use colored::{Color, Colorize};

use crate::feed::PostRecord;
use crate::stream::Presenter;

/// Prints records as `name: text (url)` with per-field colors.
///
/// Colors come from `DISPLAY_NAME_COLOR`, `TEXT_COLOR` and `URL_COLOR`;
/// unknown or unset names fall back to the defaults (yellow, blue, cyan).
/// Coloring is disabled when stdout is not a terminal.
pub struct ConsolePresenter {
    name_color: Color,
    text_color: Color,
    url_color: Color,
    numbered: bool,
    count: usize,
}

impl ConsolePresenter {
    pub fn from_env() -> Self {
        if !atty::is(atty::Stream::Stdout) {
            colored::control::set_override(false);
        }

        Self {
            name_color: color_from_env("DISPLAY_NAME_COLOR", Color::Yellow),
            text_color: color_from_env("TEXT_COLOR", Color::Blue),
            url_color: color_from_env("URL_COLOR", Color::Cyan),
            numbered: false,
            count: 0,
        }
    }

    /// Prefix each record with a running 1-based index (sky-feed listing).
    pub fn numbered(mut self) -> Self {
        self.numbered = true;
        self
    }
}

impl Presenter for ConsolePresenter {
    fn display(&mut self, post: &PostRecord) {
        let name = if post.author.is_empty() {
            &post.handle
        } else {
            &post.author
        };
        let url = at_uri_to_url(&post.uri);

        let line = format!(
            "{}: {} ({})",
            name.color(self.name_color),
            post.text.color(self.text_color),
            url.color(self.url_color)
        );

        if self.numbered {
            self.count += 1;
            println!("{}: {}", self.count, line);
        } else {
            println!("{}", line);
        }
    }
}

/// Transform an AT URI into a public web URL.
///
/// `at://did:plc:xyz/app.bsky.feed.post/abc` becomes
/// `https://bsky.app/profile/did:plc:xyz/post/abc`. Inputs with an
/// unexpected shape are returned unchanged.
pub fn at_uri_to_url(uri: &str) -> String {
    let parts: Vec<&str> = uri.split('/').collect();
    if parts.len() < 5 {
        return uri.to_string();
    }

    let did = parts[2];
    let rkey = parts[parts.len() - 1];
    format!("https://bsky.app/profile/{}/post/{}", did, rkey)
}

fn color_from_env(var: &str, default: Color) -> Color {
    std::env::var(var)
        .ok()
        .and_then(|name| parse_color(&name))
        .unwrap_or(default)
}

fn parse_color(name: &str) -> Option<Color> {
    match name.to_lowercase().as_str() {
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "cyan" => Some(Color::Cyan),
        "magenta" => Some(Color::Magenta),
        "white" => Some(Color::White),
        _ => None,
    }
}
